//! Scale tool: uniform or per-axis scaling around the selection pivot.

use glam::{DVec2, DVec3};
use shared::{ElementProperties, ToolType, Transform};

use crate::constraints::SizeLimits;
use crate::events::InputEvent;
use crate::gizmo::{axis_hit_test, snap_step, GizmoAxis, GizmoDescriptor};
use crate::tools::{Tool, ToolCtx, ToolResult};

use super::{axis_from_key, effective_step, toggle_axis, DragSession};

/// Pointer-motion-to-factor sensitivity
const SCALE_SENSITIVITY: f64 = 2.0;

/// Scales the selected elements around the pivot. Grabbing a gizmo arrow (or
/// holding an x/y/z axis lock) scales along that axis only; anywhere else
/// scales uniformly. The factor grows with the pointer's NDC motion and never
/// drops below the configured minimum.
#[derive(Default)]
pub struct ScaleTool {
    session: Option<DragSession>,
    axis_lock: Option<GizmoAxis>,
}

impl ScaleTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-axis factors for a drag factor and the session's axis constraint
    fn axis_factors(axis: Option<GizmoAxis>, f: f64) -> DVec3 {
        match axis {
            Some(GizmoAxis::X) => DVec3::new(f, 1.0, 1.0),
            Some(GizmoAxis::Y) => DVec3::new(1.0, f, 1.0),
            Some(GizmoAxis::Z) => DVec3::new(1.0, 1.0, f),
            Some(GizmoAxis::Screen) | None => DVec3::splat(f),
        }
    }

    /// Shrink scale components so size-bearing dimensions stay inside the
    /// configured limits.
    fn clamp_scale_for(
        properties: &ElementProperties,
        scale: DVec3,
        limits: &SizeLimits,
    ) -> DVec3 {
        let clamp_component = |s: f64, dim: f64, min: f64, max: f64| {
            if dim <= 0.0 {
                return s;
            }
            s.clamp(min / dim, max / dim)
        };

        let mut out = scale;
        match properties {
            ElementProperties::Wall {
                thickness, height, ..
            } => {
                out.y = clamp_component(
                    out.y,
                    *height,
                    limits.min_wall_height,
                    limits.max_wall_height,
                );
                out.z = clamp_component(
                    out.z,
                    *thickness,
                    limits.min_wall_thickness,
                    limits.max_wall_thickness,
                );
            }
            ElementProperties::Door { width, height, .. }
            | ElementProperties::Window { width, height, .. } => {
                out.x = clamp_component(
                    out.x,
                    *width,
                    limits.min_opening_size,
                    limits.max_opening_size,
                );
                out.y = clamp_component(
                    out.y,
                    *height,
                    limits.min_opening_size,
                    limits.max_opening_size,
                );
            }
            _ => {}
        }
        out
    }

    /// Rescale every snapshotted element by `factors` around the pivot
    fn apply_factors(&self, session: &DragSession, factors: DVec3, ctx: &mut ToolCtx) {
        let min = ctx.config.snap.min_scale_factor;
        let limits = ctx.config.limits.clone();

        for (id, (transform, properties)) in session.iter() {
            let base = DVec3::from_array(transform.scale);
            let scaled = (base * factors).max(DVec3::splat(min));
            let scale = Self::clamp_scale_for(properties, scaled, &limits);

            let rel = DVec3::from_array(transform.position) - session.pivot;
            let pos = session.pivot + rel * factors;

            ctx.model.update_transform(
                id,
                Transform {
                    position: pos.to_array(),
                    rotation: transform.rotation,
                    scale: scale.to_array(),
                },
            );
        }
    }

    fn cancel(&mut self, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let session = self.session.take()?;
        session.restore(ctx.model);
        Some(ToolResult::ok("Scale cancelled"))
    }

    fn commit(&mut self, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let session = self.session.take()?;
        let ids = session.ids();
        let n = ids.len();
        ctx.model
            .push_history(format!("Scaled {n} element(s)"), ids);
        tracing::info!("Scale committed ({n} element(s))");
        Some(ToolResult::ok(format!("Scaled {n} element(s)")))
    }
}

impl Tool for ScaleTool {
    fn tool_type(&self) -> ToolType {
        ToolType::Scale
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        self.cancel(ctx);
        self.axis_lock = None;
    }

    fn on_pointer_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let ndc = DVec2::new(event.position.x, event.position.y);
        if ctx.model.selection.count() == 0 {
            return Some(ToolResult::fail("Nothing selected to scale"));
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
                let label = axis.map_or("uniform", |a| a.label());
                self.session = Some(session);
                Some(ToolResult::ok(format!("Scale started ({label})")))
            }
            None => Some(ToolResult::fail("Selection is locked")),
        }
    }

    fn on_pointer_move(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let session = self.session.take()?;
        let ndc = DVec2::new(event.position.x, event.position.y);

        let d = ndc - session.start_ndc;
        let raw = 1.0 + (d.x + d.y) * SCALE_SENSITIVITY;
        let step = effective_step(
            ctx.config.snap.scale_step,
            event.modifiers.shift,
            ctx.config.snap.fine_factor,
        );
        let f = snap_step(raw, step).max(ctx.config.snap.min_scale_factor);

        self.apply_factors(&session, Self::axis_factors(session.axis, f), ctx);
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
                Some(a) => ToolResult::ok(format!("Scale constrained to {}", a.label())),
                None => ToolResult::ok("Scale constraint cleared"),
            });
        }
        match key.as_str() {
            "enter" => self.commit(ctx),
            "escape" => self.cancel(ctx),
            _ => None,
        }
    }
}
