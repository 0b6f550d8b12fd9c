//! Window placement tool: single click on a wall, raised to sill height.

use shared::{ElementKind, ToolType};

use crate::events::InputEvent;

use super::opening::{place_opening, preview_opening};
use super::{Tool, ToolCtx, ToolResult};

/// Places a window with the configured default size and sill height at the
/// clicked point on the nearest wall. Shares all placement logic with the
/// door tool through [`super::opening`].
#[derive(Default)]
pub struct WindowTool;

impl WindowTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for WindowTool {
    fn tool_type(&self) -> ToolType {
        ToolType::Window
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        ctx.model.clear_preview();
    }

    fn on_pointer_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        place_opening(ToolType::Window, ElementKind::Window, event, ctx)
    }

    fn on_pointer_move(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        preview_opening(ToolType::Window, ElementKind::Window, event, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::constraints::ToolConfig;
    use crate::fixtures;
    use crate::model::ModelStore;
    use glam::DVec3;
    use shared::ElementProperties;

    #[test]
    fn test_window_sits_at_sill_height() {
        let mut model = ModelStore::new();
        model.add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
        let camera = OrbitCamera::new();
        let config = ToolConfig::default();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };

        let mut tool = WindowTool::new();
        let ndc = ctx.camera.project(DVec3::new(2.0, 0.0, 0.3)).unwrap();
        let event = InputEvent::pointer_down(DVec3::new(ndc.x, ndc.y, 0.0), 0.0);
        let r = tool.on_pointer_down(&event, &mut ctx).unwrap();
        assert!(r.success, "{:?}", r.error);

        // Center = sill 0.9 + height 1.4 / 2
        let window = r.element.unwrap();
        let pos = DVec3::from_array(window.transform.position);
        assert!((pos - DVec3::new(2.0, 1.6, 0.0)).length() < 1e-6);
        let ElementProperties::Window {
            sill_height,
            wall_id,
            ..
        } = &window.properties
        else {
            panic!("not a window");
        };
        assert_eq!(*sill_height, 0.9);
        assert_eq!(wall_id.as_deref(), Some("wall_1"));
    }

    #[test]
    fn test_second_window_too_close_is_rejected() {
        let mut model = ModelStore::new();
        model.add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
        let camera = OrbitCamera::new();
        let config = ToolConfig::default();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };

        let mut tool = WindowTool::new();
        for (x, expect_ok) in [(2.0, true), (2.3, false)] {
            let ndc = ctx.camera.project(DVec3::new(x, 0.0, 0.3)).unwrap();
            let event = InputEvent::pointer_down(DVec3::new(ndc.x, ndc.y, 0.0), 0.0);
            let r = tool.on_pointer_down(&event, &mut ctx).unwrap();
            assert_eq!(r.success, expect_ok, "{:?}", r.error);
        }

        // Only the first opening made it onto the wall
        let wall = model.get_element("wall_1").unwrap();
        assert_eq!(wall.properties.openings().unwrap().len(), 1);
    }
}
