//! Door placement tool: single click on a wall.

use shared::{ElementKind, ToolType};

use crate::events::InputEvent;

use super::opening::{place_opening, preview_opening};
use super::{Tool, ToolCtx, ToolResult};

/// Places a door with the configured default size at the clicked point on the
/// nearest wall. All placement and validation logic lives in [`super::opening`].
#[derive(Default)]
pub struct DoorTool;

impl DoorTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for DoorTool {
    fn tool_type(&self) -> ToolType {
        ToolType::Door
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        ctx.model.clear_preview();
    }

    fn on_pointer_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        place_opening(ToolType::Door, ElementKind::Door, event, ctx)
    }

    fn on_pointer_move(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        preview_opening(ToolType::Door, ElementKind::Door, event, ctx)
    }
}
