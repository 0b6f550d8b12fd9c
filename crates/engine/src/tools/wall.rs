//! Wall construction tool: two-point segments with endpoint snapping and
//! an optional chain mode.

use glam::DVec3;
use shared::{ElementKind, ElementProperties, ToolType};

use crate::events::InputEvent;
use crate::snap::snap_wall_point;

use super::common::{base_element, generate_id, ground_point, preview_id};
use super::{Tool, ToolCtx, ToolResult};

/// Two-point wall segments. A first click seeds the start point, a second
/// commits the segment; in chain mode the committed end becomes the next
/// start until Escape ends the chain.
pub struct WallTool {
    start: Option<DVec3>,
    chain_mode: bool,
}

impl WallTool {
    pub fn new() -> Self {
        Self {
            start: None,
            chain_mode: false,
        }
    }

    fn snap(&self, point: DVec3, ctx: &ToolCtx) -> DVec3 {
        snap_wall_point(point, ctx.model.walls(), &ctx.config.wall, &ctx.model.settings).point
    }

    fn cancel(&mut self, ctx: &mut ToolCtx) {
        self.start = None;
        self.chain_mode = false;
        ctx.model.clear_preview();
    }

    /// Build the committed (or preview) wall element between two points
    fn build_wall(&self, id: String, a: DVec3, b: DVec3, ctx: &ToolCtx) -> shared::BuildingElement {
        let cfg = &ctx.config.wall;
        let mid = (a + b) / 2.0;
        let d = b - a;
        let length = d.length();
        let ry = (-d.z).atan2(d.x);

        let mut e = base_element(
            id,
            ElementKind::Wall,
            "Wall",
            ElementProperties::Wall {
                length,
                thickness: cfg.thickness,
                height: cfg.height,
                openings: Vec::new(),
            },
        );
        e.transform.position = [mid.x, cfg.height / 2.0, mid.z];
        e.transform.rotation = [0.0, ry, 0.0];
        e
    }

    fn commit(&mut self, end: DVec3, ctx: &mut ToolCtx) -> ToolResult {
        let Some(start) = self.start else {
            return ToolResult::fail("No start point");
        };
        let cfg = &ctx.config.wall;
        let length = (end - start).length();

        if length < cfg.min_length {
            return ToolResult::fail(format!(
                "Wall too short: {:.2} m (minimum {:.2} m)",
                length, cfg.min_length
            ));
        }
        if length > cfg.max_length {
            return ToolResult::fail(format!(
                "Wall too long: {:.2} m (maximum {:.2} m)",
                length, cfg.max_length
            ));
        }

        let element = self.build_wall(generate_id(ToolType::Wall), start, end, ctx);
        ctx.model.clear_preview();

        // Chain mode continues from the committed end point
        self.start = if self.chain_mode { Some(end) } else { None };

        tracing::info!("Committed wall segment ({length:.2} m)");
        ToolResult::ok_element(element, format!("Created wall ({length:.2} m)"))
    }
}

impl Default for WallTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for WallTool {
    fn tool_type(&self) -> ToolType {
        ToolType::Wall
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        self.cancel(ctx);
    }

    fn on_pointer_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let point = ground_point(event, ctx)?;
        let point = self.snap(point, ctx);

        if self.start.is_none() {
            self.start = Some(point);
            return Some(ToolResult::ok("Wall started"));
        }
        Some(self.commit(point, ctx))
    }

    fn on_pointer_move(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let start = self.start?;
        let point = ground_point(event, ctx)?;
        let point = self.snap(point, ctx);
        let preview = self.build_wall(preview_id(ToolType::Wall), start, point, ctx);
        ctx.model.set_preview(preview);
        None
    }

    fn on_key_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        match event.key_lower().as_str() {
            "escape" => {
                if self.start.is_none() && !self.chain_mode {
                    return None;
                }
                self.cancel(ctx);
                Some(ToolResult::ok("Wall cancelled"))
            }
            "backspace" => {
                // Popping the only point cancels the segment
                if self.start.take().is_some() {
                    ctx.model.clear_preview();
                    Some(ToolResult::ok("Point removed"))
                } else {
                    None
                }
            }
            "c" => {
                self.chain_mode = !self.chain_mode;
                Some(ToolResult::ok(if self.chain_mode {
                    "Chain mode on"
                } else {
                    "Chain mode off"
                }))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::constraints::ToolConfig;
    use crate::model::ModelStore;

    fn ctx_parts() -> (ModelStore, OrbitCamera, ToolConfig) {
        (ModelStore::new(), OrbitCamera::new(), ToolConfig::default())
    }

    #[test]
    fn test_commit_requires_min_length() {
        let (mut model, camera, config) = ctx_parts();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };
        let mut tool = WallTool::new();
        tool.start = Some(DVec3::ZERO);
        let r = tool.commit(DVec3::new(0.05, 0.0, 0.0), &mut ctx);
        assert!(!r.success);
        assert!(r.error.unwrap().contains("too short"));
        // Pending state survives the failure
        assert!(tool.start.is_some());
    }

    #[test]
    fn test_commit_builds_centered_wall() {
        let (mut model, camera, config) = ctx_parts();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };
        let mut tool = WallTool::new();
        tool.start = Some(DVec3::ZERO);
        let r = tool.commit(DVec3::new(5.0, 0.0, 0.0), &mut ctx);
        assert!(r.success);
        let e = r.element.unwrap();
        assert_eq!(e.kind, ElementKind::Wall);
        assert_eq!(e.transform.position, [2.5, 1.5, 0.0]);
        assert_eq!(e.transform.rotation[1], 0.0);
        let ElementProperties::Wall { length, .. } = e.properties else {
            panic!("not a wall");
        };
        assert!((length - 5.0).abs() < 1e-9);
        // One-shot mode: start is consumed
        assert!(tool.start.is_none());
    }

    #[test]
    fn test_chain_mode_keeps_endpoint() {
        let (mut model, camera, config) = ctx_parts();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };
        let mut tool = WallTool::new();
        tool.chain_mode = true;
        tool.start = Some(DVec3::ZERO);
        let end = DVec3::new(3.0, 0.0, 0.0);
        let r = tool.commit(end, &mut ctx);
        assert!(r.success);
        assert_eq!(tool.start, Some(end));
    }
}
