//! Move tool: axis-constrained or ground-plane dragging of the selection.

use glam::{DVec2, DVec3};
use shared::{ToolType, Transform};

use crate::events::InputEvent;
use crate::gizmo::{axis_drag_delta, axis_hit_test, plane_drag_delta, GizmoAxis, GizmoDescriptor};
use crate::tools::{Tool, ToolCtx, ToolResult};

use super::{axis_from_key, effective_step, toggle_axis, DragSession};

/// Drags the selected elements. Grabbing a gizmo arrow (or holding an x/y/z
/// axis lock) constrains the motion to that axis; anywhere else drags freely
/// on the horizontal plane through the pivot.
#[derive(Default)]
pub struct MoveTool {
    session: Option<DragSession>,
    axis_lock: Option<GizmoAxis>,
}

impl MoveTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total world-space delta for the current pointer position
    fn drag_delta(&self, session: &DragSession, ndc: DVec2, ctx: &ToolCtx) -> DVec3 {
        match session.axis {
            Some(axis) => axis_drag_delta(ctx.camera, session.pivot, axis, session.start_ndc, ndc),
            None => plane_drag_delta(ctx.camera, session.pivot, DVec3::Y, session.start_ndc, ndc),
        }
    }

    /// Reposition every snapshotted element by `delta` from its snapshot
    fn apply_delta(&self, session: &DragSession, delta: DVec3, ctx: &mut ToolCtx) {
        for (id, (transform, _)) in session.iter() {
            let pos = DVec3::from_array(transform.position) + delta;
            ctx.model.update_transform(
                id,
                Transform {
                    position: pos.to_array(),
                    ..transform.clone()
                },
            );
        }
    }

    fn cancel(&mut self, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let session = self.session.take()?;
        session.restore(ctx.model);
        Some(ToolResult::ok("Move cancelled"))
    }

    fn commit(&mut self, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let session = self.session.take()?;
        let ids = session.ids();
        let n = ids.len();
        ctx.model
            .push_history(format!("Moved {n} element(s)"), ids);
        tracing::info!("Move committed ({n} element(s))");
        Some(ToolResult::ok(format!("Moved {n} element(s)")))
    }
}

impl Tool for MoveTool {
    fn tool_type(&self) -> ToolType {
        ToolType::Move
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        self.cancel(ctx);
        self.axis_lock = None;
    }

    fn on_pointer_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let ndc = DVec2::new(event.position.x, event.position.y);
        if ctx.model.selection.count() == 0 {
            return Some(ToolResult::fail("Nothing selected to move"));
        }

        let selected = ctx
            .model
            .elements()
            .iter()
            .filter(|e| ctx.model.selection.is_selected(&e.id));
        let pivot = GizmoDescriptor::from_elements(selected).pivot;
        let axis = self
            .axis_lock
            .or_else(|| axis_hit_test(&ctx.camera.ndc_ray(ndc), pivot));

        match DragSession::begin(ctx.model, ndc, axis) {
            Some(session) => {
                let label = axis.map_or("free", |a| a.label());
                self.session = Some(session);
                Some(ToolResult::ok(format!("Move started ({label})")))
            }
            None => Some(ToolResult::fail("Selection is locked")),
        }
    }

    fn on_pointer_move(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let session = self.session.take()?;
        let ndc = DVec2::new(event.position.x, event.position.y);

        let mut delta = self.drag_delta(&session, ndc, ctx);
        if ctx.model.settings.snap_to_grid {
            let step = effective_step(
                ctx.model.settings.grid_size,
                event.modifiers.shift,
                ctx.config.snap.fine_factor,
            );
            delta = delta.to_array().map(|c| crate::gizmo::snap_step(c, step)).into();
        }

        self.apply_delta(&session, delta, ctx);
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
                Some(a) => ToolResult::ok(format!("Move constrained to {}", a.label())),
                None => ToolResult::ok("Move constraint cleared"),
            });
        }
        match key.as_str() {
            "enter" => self.commit(ctx),
            "escape" => self.cancel(ctx),
            _ => None,
        }
    }
}
