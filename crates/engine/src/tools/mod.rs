//! Tool contract and the nine interactive tools.
//!
//! Every tool is a small state machine behind the [`Tool`] trait; the closed
//! [`ToolKind`] sum gives the manager an exhaustive registry without an
//! inheritance chain. Tools receive the narrow model interface through
//! [`ToolCtx`] at every call — there is no ambient global state.

pub mod common;
pub mod cut;
pub mod door;
pub mod floor;
pub mod opening;
pub mod select;
pub mod transform;
pub mod wall;
pub mod window;

use shared::{BuildingElement, ToolType};

use crate::camera::OrbitCamera;
use crate::constraints::ToolConfig;
use crate::events::{EventKind, InputEvent, PointerButton};
use crate::model::ModelStore;

pub use cut::CutTool;
pub use door::DoorTool;
pub use floor::FloorTool;
pub use select::SelectTool;
pub use transform::{MoveTool, RotateTool, ScaleTool};
pub use wall::WallTool;
pub use window::WindowTool;

/// Everything a tool may touch, injected per call
pub struct ToolCtx<'a> {
    pub model: &'a mut ModelStore,
    pub camera: &'a OrbitCamera,
    pub config: &'a ToolConfig,
}

/// Result envelope returned by tool handlers.
///
/// `None` from a handler means the event had no observable effect; a
/// `ToolResult` reports either a successful action (optionally carrying
/// freshly built elements for the manager to commit) or a validation failure.
#[derive(Debug, Clone, Default)]
pub struct ToolResult {
    pub success: bool,
    pub element: Option<BuildingElement>,
    pub elements: Option<Vec<BuildingElement>>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ToolResult {
    /// Success carrying one element to commit
    pub fn ok_element(element: BuildingElement, message: impl Into<String>) -> Self {
        Self {
            success: true,
            element: Some(element),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Success carrying several elements to commit
    pub fn ok_elements(elements: Vec<BuildingElement>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            elements: Some(elements),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Success with a status message and nothing to commit
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Validation failure; the model must not have been mutated
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// All elements carried by this result
    pub fn all_elements(&self) -> Vec<&BuildingElement> {
        let mut out = Vec::new();
        if let Some(e) = &self.element {
            out.push(e);
        }
        if let Some(es) = &self.elements {
            out.extend(es.iter());
        }
        out
    }
}

/// The tool state machine contract.
///
/// `handle_event` dispatches by event kind to the per-kind handlers; a tool
/// only ever receives events while it is the active tool (the manager is the
/// single point of ingress and enforces the idle/active gate).
pub trait Tool {
    fn tool_type(&self) -> ToolType;

    /// Hook invoked after the tool becomes active
    fn on_activate(&mut self, _ctx: &mut ToolCtx) {}

    /// Hook invoked on deactivation; must release all transient state
    fn on_deactivate(&mut self, _ctx: &mut ToolCtx) {}

    fn on_pointer_down(&mut self, _event: &InputEvent, _ctx: &mut ToolCtx) -> Option<ToolResult> {
        None
    }

    fn on_pointer_move(&mut self, _event: &InputEvent, _ctx: &mut ToolCtx) -> Option<ToolResult> {
        None
    }

    fn on_pointer_up(&mut self, _event: &InputEvent, _ctx: &mut ToolCtx) -> Option<ToolResult> {
        None
    }

    fn on_key_down(&mut self, _event: &InputEvent, _ctx: &mut ToolCtx) -> Option<ToolResult> {
        None
    }

    fn on_key_up(&mut self, _event: &InputEvent, _ctx: &mut ToolCtx) -> Option<ToolResult> {
        None
    }

    fn on_wheel(&mut self, _event: &InputEvent, _ctx: &mut ToolCtx) -> Option<ToolResult> {
        None
    }

    /// Typed dispatch by event kind. Non-primary pointer buttons are
    /// rejected here so no tool ever seeds state from a right or middle
    /// click.
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        match event.kind {
            EventKind::PointerDown | EventKind::PointerUp
                if event.button != PointerButton::Primary =>
            {
                None
            }
            EventKind::PointerDown => self.on_pointer_down(event, ctx),
            EventKind::PointerMove => self.on_pointer_move(event, ctx),
            EventKind::PointerUp => self.on_pointer_up(event, ctx),
            EventKind::KeyDown => self.on_key_down(event, ctx),
            EventKind::KeyUp => self.on_key_up(event, ctx),
            EventKind::Wheel => self.on_wheel(event, ctx),
        }
    }
}

/// Closed sum over the nine tools; the manager's registry values
pub enum ToolKind {
    Select(SelectTool),
    Wall(WallTool),
    Floor(FloorTool),
    Door(DoorTool),
    Window(WindowTool),
    Cut(CutTool),
    Move(MoveTool),
    Rotate(RotateTool),
    Scale(ScaleTool),
}

impl ToolKind {
    /// Fresh tool instance for a tool type
    pub fn new(tool_type: ToolType) -> Self {
        match tool_type {
            ToolType::Select => Self::Select(SelectTool::new()),
            ToolType::Wall => Self::Wall(WallTool::new()),
            ToolType::Floor => Self::Floor(FloorTool::new()),
            ToolType::Door => Self::Door(DoorTool::new()),
            ToolType::Window => Self::Window(WindowTool::new()),
            ToolType::Cut => Self::Cut(CutTool::new()),
            ToolType::Move => Self::Move(MoveTool::new()),
            ToolType::Rotate => Self::Rotate(RotateTool::new()),
            ToolType::Scale => Self::Scale(ScaleTool::new()),
        }
    }

    fn as_tool(&mut self) -> &mut dyn Tool {
        match self {
            Self::Select(t) => t,
            Self::Wall(t) => t,
            Self::Floor(t) => t,
            Self::Door(t) => t,
            Self::Window(t) => t,
            Self::Cut(t) => t,
            Self::Move(t) => t,
            Self::Rotate(t) => t,
            Self::Scale(t) => t,
        }
    }

    pub fn tool_type(&mut self) -> ToolType {
        self.as_tool().tool_type()
    }

    pub fn activate(&mut self, ctx: &mut ToolCtx) {
        self.as_tool().on_activate(ctx);
    }

    pub fn deactivate(&mut self, ctx: &mut ToolCtx) {
        self.as_tool().on_deactivate(ctx);
    }

    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        self.as_tool().handle_event(event, ctx)
    }
}
