use serde::{Deserialize, Serialize};

mod patch;
pub use patch::ElementPatch;

/// Unique identifier of an element in the model
pub type ElementId = String;

/// Discriminant of a building element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Wall,
    Floor,
    Door,
    Window,
    Cut,
    Custom,
}

impl ElementKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Wall => "Wall",
            Self::Floor => "Floor",
            Self::Door => "Door",
            Self::Window => "Window",
            Self::Cut => "Cut",
            Self::Custom => "Custom",
        }
    }
}

/// Position/rotation/scale of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: [x, y, z],
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// A door/window cut recorded against a wall.
///
/// Stored by value inside the wall's properties; `id` equals the id of the
/// door/window element the opening belongs to. The reverse lookup (which wall
/// owns an opening) goes through the model store by `wall_id`, never through
/// object references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub id: ElementId,
    /// World-space center of the opening on the wall centerline
    pub position: [f64; 3],
    pub width: f64,
    pub height: f64,
    /// Height of the opening bottom above floor level (0 for doors)
    pub sill_height: f64,
}

/// Shape of a cut outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutShape {
    Rectangle,
    Circle,
    Polygon,
}

impl CutShape {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Polygon => "Polygon",
        }
    }

    /// Next shape in the cycle (Rectangle → Circle → Polygon → Rectangle)
    pub fn next(&self) -> Self {
        match self {
            Self::Rectangle => Self::Circle,
            Self::Circle => Self::Polygon,
            Self::Polygon => Self::Rectangle,
        }
    }
}

/// Type-specific properties of a building element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementProperties {
    Wall {
        /// Distance between the wall endpoints
        length: f64,
        thickness: f64,
        height: f64,
        /// Openings cut into this wall, keyed by the door/window element id
        openings: Vec<Opening>,
    },
    Floor {
        /// Outline polygon on the ground plane (y = 0)
        points: Vec<[f64; 3]>,
        /// Hole polygons subtracted from the outline area
        holes: Vec<Vec<[f64; 3]>>,
        thickness: f64,
        /// Net area: outline area minus the sum of hole areas
        area: f64,
    },
    Door {
        width: f64,
        height: f64,
        /// Thickness of the wall the door sits in
        thickness: f64,
        wall_id: Option<ElementId>,
    },
    Window {
        width: f64,
        height: f64,
        sill_height: f64,
        thickness: f64,
        wall_id: Option<ElementId>,
    },
    Cut {
        shape: CutShape,
        /// Element the cut subtracts from (wall or floor)
        target_id: ElementId,
        /// Outline points of the cut in world space
        points: Vec<[f64; 3]>,
        depth: f64,
    },
    Custom {
        data: serde_json::Value,
    },
}

impl ElementProperties {
    /// Openings list of a wall (None for non-walls)
    pub fn openings(&self) -> Option<&[Opening]> {
        match self {
            Self::Wall { openings, .. } => Some(openings),
            _ => None,
        }
    }

    /// Wall id referenced by a door or window
    pub fn wall_id(&self) -> Option<&ElementId> {
        match self {
            Self::Door { wall_id, .. } | Self::Window { wall_id, .. } => wall_id.as_ref(),
            _ => None,
        }
    }
}

/// A single building element owned by the shared model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingElement {
    pub id: ElementId,
    pub kind: ElementKind,
    pub name: String,
    pub transform: Transform,
    pub properties: ElementProperties,
    pub visible: bool,
    pub locked: bool,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
    pub modified_at: u64,
}

impl BuildingElement {
    /// True if this element can be the target of a cut
    pub fn is_cuttable(&self) -> bool {
        matches!(self.kind, ElementKind::Wall | ElementKind::Floor)
    }
}

/// Tool identifiers known to the tool manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    #[default]
    Select,
    Wall,
    Floor,
    Door,
    Window,
    Cut,
    Move,
    Rotate,
    Scale,
}

impl ToolType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::Wall => "Wall",
            Self::Floor => "Floor",
            Self::Door => "Door",
            Self::Window => "Window",
            Self::Cut => "Cut",
            Self::Move => "Move",
            Self::Rotate => "Rotate",
            Self::Scale => "Scale",
        }
    }

    /// Lowercase name used in generated element ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Wall => "wall",
            Self::Floor => "floor",
            Self::Door => "door",
            Self::Window => "window",
            Self::Cut => "cut",
            Self::Move => "move",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
        }
    }

    /// All tools, in toolbar order
    pub fn all() -> &'static [ToolType] {
        &[
            Self::Select,
            Self::Wall,
            Self::Floor,
            Self::Door,
            Self::Window,
            Self::Cut,
            Self::Move,
            Self::Rotate,
            Self::Scale,
        ]
    }
}

/// Per-project settings read by the tools on every event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Grid cell size in meters
    pub grid_size: f64,
    /// Quantize construction points to the grid
    pub snap_to_grid: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            grid_size: 0.5,
            snap_to_grid: true,
        }
    }
}
