//! Rotate tool: ring-constrained rotation of the selection around its pivot.

use std::f64::consts::PI;

use glam::{DQuat, DVec2, DVec3};
use shared::{ToolType, Transform};

use crate::events::InputEvent;
use crate::gizmo::{pointer_angle, ring_hit_test, snap_step, GizmoAxis, GizmoDescriptor};
use crate::tools::{Tool, ToolCtx, ToolResult};

use super::{axis_from_key, effective_step, toggle_axis, DragSession};

/// Rotates the selected elements around the selection pivot. Grabbing a
/// rotation ring (or holding an x/y/z axis lock) constrains the rotation to
/// that axis; anywhere else rotates around the vertical axis. The drag angle
/// is the pointer's angular sweep around the projected pivot.
#[derive(Default)]
pub struct RotateTool {
    session: Option<DragSession>,
    axis_lock: Option<GizmoAxis>,
    start_angle: f64,
}

impl RotateTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an angle into (-PI, PI]
    fn normalize_angle(a: f64) -> f64 {
        let mut a = a % (2.0 * PI);
        if a > PI {
            a -= 2.0 * PI;
        } else if a <= -PI {
            a += 2.0 * PI;
        }
        a
    }

    /// Rotate every snapshotted element by `angle` around the pivot
    fn apply_angle(&self, session: &DragSession, angle: f64, ctx: &mut ToolCtx) {
        let axis = session.axis.unwrap_or(GizmoAxis::Y);
        let axis_dir = axis.unit(ctx.camera);
        let rotation = DQuat::from_axis_angle(axis_dir, angle);

        for (id, (transform, _)) in session.iter() {
            let rel = DVec3::from_array(transform.position) - session.pivot;
            let pos = session.pivot + rotation * rel;
            let rot = DVec3::from_array(transform.rotation) + axis_dir * angle;
            ctx.model.update_transform(
                id,
                Transform {
                    position: pos.to_array(),
                    rotation: rot.to_array(),
                    scale: transform.scale,
                },
            );
        }
    }

    fn cancel(&mut self, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let session = self.session.take()?;
        session.restore(ctx.model);
        Some(ToolResult::ok("Rotate cancelled"))
    }

    fn commit(&mut self, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let session = self.session.take()?;
        let ids = session.ids();
        let n = ids.len();
        ctx.model
            .push_history(format!("Rotated {n} element(s)"), ids);
        tracing::info!("Rotate committed ({n} element(s))");
        Some(ToolResult::ok(format!("Rotated {n} element(s)")))
    }
}

impl Tool for RotateTool {
    fn tool_type(&self) -> ToolType {
        ToolType::Rotate
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        self.cancel(ctx);
        self.axis_lock = None;
    }

    fn on_pointer_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let ndc = DVec2::new(event.position.x, event.position.y);
        if ctx.model.selection.count() == 0 {
            return Some(ToolResult::fail("Nothing selected to rotate"));
        }

        let selected = ctx
            .model
            .elements()
            .iter()
            .filter(|e| ctx.model.selection.is_selected(&e.id));
        let pivot = GizmoDescriptor::from_elements(selected).pivot;
        let axis = self
            .axis_lock
            .or_else(|| ring_hit_test(&ctx.camera.ndc_ray(ndc), pivot));

        match DragSession::begin(ctx.model, ndc, axis) {
            Some(session) => {
                self.start_angle = pointer_angle(ctx.camera, session.pivot, ndc);
                let label = axis.map_or("vertical", |a| a.label());
                self.session = Some(session);
                Some(ToolResult::ok(format!("Rotate started ({label})")))
            }
            None => Some(ToolResult::fail("Selection is locked")),
        }
    }

    fn on_pointer_move(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let session = self.session.take()?;
        let ndc = DVec2::new(event.position.x, event.position.y);

        let swept = pointer_angle(ctx.camera, session.pivot, ndc) - self.start_angle;
        let step = effective_step(
            ctx.config.snap.rotate_step_deg.to_radians(),
            event.modifiers.shift,
            ctx.config.snap.fine_factor,
        );
        let angle = snap_step(Self::normalize_angle(swept), step);

        self.apply_angle(&session, angle, ctx);
        self.session = Some(session);
        None
    }

    fn on_pointer_up(&mut self, _event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        self.commit(ctx)
    }

    fn on_key_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let key = event.key_lower();
        if let Some(axis) = axis_from_key(&key) {
            let lock = toggle_axis(&mut self.axis_lock, axis);
            if let Some(session) = &mut self.session {
                session.axis = lock;
            }
            return Some(match lock {
                Some(a) => ToolResult::ok(format!("Rotation constrained to {}", a.label())),
                None => ToolResult::ok("Rotation constraint cleared"),
            });
        }
        match key.as_str() {
            "enter" => self.commit(ctx),
            "escape" => self.cancel(ctx),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::constraints::ToolConfig;
    use crate::fixtures;
    use crate::model::ModelStore;

    fn setup_two_walls() -> (ModelStore, OrbitCamera, ToolConfig) {
        let mut model = ModelStore::new();
        model.add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
        model.add_element(fixtures::wall_element(
            "wall_2",
            [0.0, 0.0, 4.0],
            [4.0, 0.0, 4.0],
        ));
        model.selection.select("wall_1".to_string());
        model.selection.add("wall_2".to_string());
        (model, OrbitCamera::new(), ToolConfig::default())
    }

    #[test]
    fn test_normalize_angle() {
        assert!((RotateTool::normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((RotateTool::normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert_eq!(RotateTool::normalize_angle(0.5), 0.5);
    }

    #[test]
    fn test_apply_angle_revolves_positions_around_pivot() {
        let (mut model, camera, config) = setup_two_walls();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };
        let tool = RotateTool::new();
        let session = DragSession::begin(ctx.model, DVec2::ZERO, None).unwrap();
        // Pivot is (2, 1.5, 2); a half turn swaps the walls
        assert!((session.pivot - DVec3::new(2.0, 1.5, 2.0)).length() < 1e-9);

        tool.apply_angle(&session, PI, &mut ctx);

        let p1 = DVec3::from_array(model.get_element("wall_1").unwrap().transform.position);
        assert!((p1 - DVec3::new(2.0, 1.5, 4.0)).length() < 1e-9, "{p1:?}");
        let r1 = model.get_element("wall_1").unwrap().transform.rotation;
        assert!((r1[1] - PI).abs() < 1e-9);
    }

    #[test]
    fn test_single_element_rotates_in_place() {
        let mut model = ModelStore::new();
        model.add_element(fixtures::wall_element("wall_1", [0.0; 3], [4.0, 0.0, 0.0]));
        model.selection.select("wall_1".to_string());
        let before = model.get_element("wall_1").unwrap().transform.position;
        let camera = OrbitCamera::new();
        let config = ToolConfig::default();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };
        let tool = RotateTool::new();
        let session = DragSession::begin(ctx.model, DVec2::ZERO, None).unwrap();

        tool.apply_angle(&session, PI / 2.0, &mut ctx);

        let after = &model.get_element("wall_1").unwrap().transform;
        assert_eq!(after.position, before);
        assert!((after.rotation[1] - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_lock_overrides_ring_pick() {
        let (mut model, camera, config) = setup_two_walls();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };
        let mut tool = RotateTool::new();

        let e = InputEvent::key_down("x", 0.0);
        let r = tool.on_key_down(&e, &mut ctx).unwrap();
        assert!(r.success);

        let e = InputEvent::pointer_down(DVec3::ZERO, 1.0);
        tool.on_pointer_down(&e, &mut ctx);
        assert_eq!(tool.session.as_ref().unwrap().axis, Some(GizmoAxis::X));
    }

    #[test]
    fn test_enter_commits_rotation() {
        let (mut model, camera, config) = setup_two_walls();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };
        let mut tool = RotateTool::new();
        let session = DragSession::begin(ctx.model, DVec2::ZERO, None).unwrap();
        tool.apply_angle(&session, PI / 2.0, &mut ctx);
        tool.session = Some(session);

        let e = InputEvent::key_down("Enter", 1.0);
        let r = tool.on_key_down(&e, &mut ctx).unwrap();
        assert!(r.success);
        assert!(tool.session.is_none());
        assert_eq!(
            model.history().last().unwrap().element_ids,
            vec!["wall_1", "wall_2"]
        );
    }

    #[test]
    fn test_escape_restores_rotation() {
        let (mut model, camera, config) = setup_two_walls();
        let before: Vec<_> = model
            .elements()
            .iter()
            .map(|e| e.transform.clone())
            .collect();
        let mut ctx = ToolCtx {
            model: &mut model,
            camera: &camera,
            config: &config,
        };
        let mut tool = RotateTool::new();
        let session = DragSession::begin(ctx.model, DVec2::ZERO, None).unwrap();
        tool.apply_angle(&session, PI / 3.0, &mut ctx);
        tool.session = Some(session);

        let e = InputEvent::key_down("Escape", 1.0);
        let r = tool.on_key_down(&e, &mut ctx).unwrap();
        assert!(r.success);

        let after: Vec<_> = model
            .elements()
            .iter()
            .map(|e| e.transform.clone())
            .collect();
        assert_eq!(before, after);
    }
}
