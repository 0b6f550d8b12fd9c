//! Per-tool numeric constraints and snapping increments.
//!
//! Mutable at runtime and read on every validation; persisted as JSON in the
//! platform config directory.

use serde::{Deserialize, Serialize};

/// Wall construction constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallConstraints {
    /// Minimum segment length
    pub min_length: f64,
    /// Maximum segment length
    pub max_length: f64,
    /// Default wall thickness
    pub thickness: f64,
    /// Default wall height
    pub height: f64,
    /// Pull clicked points onto nearby wall endpoints/corners
    pub snap_to_endpoints: bool,
    /// Search radius for endpoint snapping
    pub endpoint_snap_radius: f64,
}

impl Default for WallConstraints {
    fn default() -> Self {
        Self {
            min_length: 0.1,
            max_length: 50.0,
            thickness: 0.2,
            height: 3.0,
            snap_to_endpoints: true,
            endpoint_snap_radius: 0.5,
        }
    }
}

/// Floor construction constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorConstraints {
    /// Minimum net area (outline minus holes)
    pub min_area: f64,
    /// Maximum net area
    pub max_area: f64,
    /// Default slab thickness
    pub thickness: f64,
    /// Maximum number of outline points
    pub max_points: usize,
    /// Allow the hole sub-mode
    pub allow_holes: bool,
}

impl Default for FloorConstraints {
    fn default() -> Self {
        Self {
            min_area: 0.5,
            max_area: 1000.0,
            thickness: 0.3,
            max_points: 50,
            allow_holes: true,
        }
    }
}

/// Constraints shared by door and window placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningConstraints {
    pub default_width: f64,
    pub default_height: f64,
    pub default_sill: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub min_sill: f64,
    pub max_sill: f64,
    /// Maximum distance from the click point to the wall centerline
    pub wall_distance_tolerance: f64,
    /// Minimum distance between the opening edge and a wall end
    pub min_end_clearance: f64,
    /// Minimum gap between neighboring openings
    pub min_separation: f64,
}

impl OpeningConstraints {
    /// Defaults for doors (floor level, 0.9 x 2.1)
    pub fn door() -> Self {
        Self {
            default_width: 0.9,
            default_height: 2.1,
            default_sill: 0.0,
            min_width: 0.5,
            max_width: 3.0,
            min_height: 1.8,
            max_height: 3.0,
            min_sill: 0.0,
            max_sill: 0.0,
            wall_distance_tolerance: 0.5,
            min_end_clearance: 0.1,
            min_separation: 0.1,
        }
    }

    /// Defaults for windows (sill 0.9, 1.2 x 1.4)
    pub fn window() -> Self {
        Self {
            default_width: 1.2,
            default_height: 1.4,
            default_sill: 0.9,
            min_width: 0.3,
            max_width: 4.0,
            min_height: 0.3,
            max_height: 2.5,
            min_sill: 0.0,
            max_sill: 2.0,
            wall_distance_tolerance: 0.5,
            min_end_clearance: 0.1,
            min_separation: 0.1,
        }
    }
}

/// Cut tool constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutConstraints {
    /// Minimum extent of the cut outline
    pub min_size: f64,
    /// Maximum extent of the cut outline
    pub max_size: f64,
    /// Maximum distance from the first click to the target element
    pub target_tolerance: f64,
    /// Default cut depth
    pub depth: f64,
}

impl Default for CutConstraints {
    fn default() -> Self {
        Self {
            min_size: 0.05,
            max_size: 20.0,
            target_tolerance: 0.5,
            depth: 0.5,
        }
    }
}

/// Snapping increments for the transform tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapIncrements {
    /// Rotation snap step in degrees
    pub rotate_step_deg: f64,
    /// Scale factor snap step
    pub scale_step: f64,
    /// Multiplier applied to the step while the fine modifier is held
    pub fine_factor: f64,
    /// Minimum scale factor a drag may reach
    pub min_scale_factor: f64,
}

impl Default for SnapIncrements {
    fn default() -> Self {
        Self {
            rotate_step_deg: 15.0,
            scale_step: 0.1,
            fine_factor: 0.1,
            min_scale_factor: 0.01,
        }
    }
}

/// Scale clamps for size-bearing element properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeLimits {
    pub min_wall_thickness: f64,
    pub max_wall_thickness: f64,
    pub min_wall_height: f64,
    pub max_wall_height: f64,
    pub min_opening_size: f64,
    pub max_opening_size: f64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_wall_thickness: 0.05,
            max_wall_thickness: 1.0,
            min_wall_height: 0.5,
            max_wall_height: 10.0,
            min_opening_size: 0.2,
            max_opening_size: 5.0,
        }
    }
}

/// All tool constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    pub wall: WallConstraints,
    pub floor: FloorConstraints,
    pub door: OpeningConstraints,
    pub window: OpeningConstraints,
    pub cut: CutConstraints,
    pub snap: SnapIncrements,
    pub limits: SizeLimits,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            wall: WallConstraints::default(),
            floor: FloorConstraints::default(),
            door: OpeningConstraints::door(),
            window: OpeningConstraints::window(),
            cut: CutConstraints::default(),
            snap: SnapIncrements::default(),
            limits: SizeLimits::default(),
        }
    }
}

impl ToolConfig {
    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "archcad", "archcad") {
            let config_path = dirs.config_dir().join("tools.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                if let Ok(config) = serde_json::from_str(&json) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "archcad", "archcad") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("tools.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }
}
