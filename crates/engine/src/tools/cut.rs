//! Cut tool: two-phase subtraction outlines on walls and floors.

use glam::DVec3;
use shared::{CutShape, ElementId, ElementKind, ElementProperties, ToolType};

use crate::events::InputEvent;
use crate::geometry::Aabb;
use crate::model::element_aabb;

use super::common::{base_element, generate_id, is_double_click, preview_id, world_point};
use super::{Tool, ToolCtx, ToolResult};

/// Cut outline construction. The first click picks a cuttable target (wall or
/// floor); further clicks collect the outline for the active shape. Rectangle
/// and circle need two points, polygon closes on double click or Enter.
pub struct CutTool {
    shape: CutShape,
    target: Option<ElementId>,
    points: Vec<DVec3>,
    last_click_time: Option<f64>,
}

impl CutTool {
    pub fn new() -> Self {
        Self {
            shape: CutShape::Rectangle,
            target: None,
            points: Vec::new(),
            last_click_time: None,
        }
    }

    fn cancel(&mut self, ctx: &mut ToolCtx) {
        self.target = None;
        self.points.clear();
        self.last_click_time = None;
        ctx.model.clear_preview();
    }

    /// Distance from a point to an element's bounding box (0 inside)
    fn aabb_distance(point: DVec3, aabb: &Aabb) -> f64 {
        let clamped = point.clamp(aabb.min, aabb.max);
        (point - clamped).length()
    }

    /// Pick the nearest cuttable element within the target tolerance
    fn pick_target(&self, click: DVec3, ctx: &ToolCtx) -> Option<ElementId> {
        let tolerance = ctx.config.cut.target_tolerance;
        ctx.model
            .elements()
            .iter()
            .filter(|e| e.is_cuttable() && e.visible)
            .map(|e| (e.id.clone(), Self::aabb_distance(click, &element_aabb(e))))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Number of points the active shape needs before it can commit
    fn points_needed(&self) -> usize {
        match self.shape {
            CutShape::Rectangle | CutShape::Circle => 2,
            CutShape::Polygon => 3,
        }
    }

    fn build_cut(&self, id: String, points: &[DVec3], target: &str, ctx: &ToolCtx) -> shared::BuildingElement {
        let center = points.iter().copied().sum::<DVec3>() / points.len() as f64;
        let mut e = base_element(
            id,
            ElementKind::Cut,
            format!("{} cut", self.shape.label()),
            ElementProperties::Cut {
                shape: self.shape,
                target_id: target.to_string(),
                points: points.iter().map(|p| p.to_array()).collect(),
                depth: ctx.config.cut.depth,
            },
        );
        e.transform.position = center.to_array();
        e
    }

    fn finish(&mut self, ctx: &mut ToolCtx) -> ToolResult {
        let Some(target_id) = self.target.clone() else {
            return ToolResult::fail("No cut target");
        };
        if self.points.len() < self.points_needed() {
            return ToolResult::fail(format!(
                "{} cut needs {} points ({} given)",
                self.shape.label(),
                self.points_needed(),
                self.points.len()
            ));
        }

        let cfg = &ctx.config.cut;
        let outline = Aabb::from_points(&self.points).map(|b| b.max - b.min);
        let extent = outline.map(|s| s.x.max(s.y).max(s.z)).unwrap_or(0.0);
        if extent < cfg.min_size {
            return ToolResult::fail(format!(
                "Cut too small: {:.2} m (minimum {:.2} m)",
                extent, cfg.min_size
            ));
        }
        if extent > cfg.max_size {
            return ToolResult::fail(format!(
                "Cut too large: {:.2} m (maximum {:.2} m)",
                extent, cfg.max_size
            ));
        }

        let Some(target) = ctx.model.get_element(&target_id) else {
            return ToolResult::fail(format!("Cut target {target_id} no longer exists"));
        };
        let bounds = element_aabb(target).expanded(cfg.target_tolerance);
        if self
            .points
            .iter()
            .any(|p| Self::aabb_distance(*p, &bounds) > 0.0)
        {
            return ToolResult::fail("Cut outline leaves the target element");
        }

        let element = self.build_cut(generate_id(ToolType::Cut), &self.points, &target_id, ctx);
        let shape = self.shape;
        self.cancel(ctx);

        tracing::info!("Committed {} cut on {target_id}", shape.label().to_lowercase());
        ToolResult::ok_element(
            element,
            format!("Created {} cut", shape.label().to_lowercase()),
        )
    }

    fn push_preview(&self, hover: Option<DVec3>, ctx: &mut ToolCtx) {
        let Some(target) = &self.target else {
            return;
        };
        let mut points = self.points.clone();
        if let Some(p) = hover {
            points.push(p);
        }
        if points.is_empty() {
            return;
        }
        let preview = self.build_cut(preview_id(ToolType::Cut), &points, target, ctx);
        ctx.model.set_preview(preview);
    }
}

impl Default for CutTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CutTool {
    fn tool_type(&self) -> ToolType {
        ToolType::Cut
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        self.cancel(ctx);
    }

    fn on_pointer_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let click = world_point(event, ctx)?;

        // Phase 1: pick the target
        if self.target.is_none() {
            return match self.pick_target(click, ctx) {
                Some(id) => {
                    self.target = Some(id.clone());
                    Some(ToolResult::ok(format!("Cut target: {id}")))
                }
                None => Some(ToolResult::fail("No cuttable element under the pointer")),
            };
        }

        // Phase 2: collect outline points
        let double = is_double_click(self.last_click_time, event.time);
        self.last_click_time = Some(event.time);

        if double && self.shape == CutShape::Polygon && self.points.len() >= 3 {
            return Some(self.finish(ctx));
        }

        self.points.push(click);
        if self.shape != CutShape::Polygon && self.points.len() >= 2 {
            return Some(self.finish(ctx));
        }
        Some(ToolResult::ok(format!("Cut point {}", self.points.len())))
    }

    fn on_pointer_move(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        if self.target.is_none() {
            return None;
        }
        let point = world_point(event, ctx)?;
        self.push_preview(Some(point), ctx);
        None
    }

    fn on_key_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        match event.key_lower().as_str() {
            "enter" => {
                if self.target.is_some() && self.shape == CutShape::Polygon {
                    Some(self.finish(ctx))
                } else {
                    None
                }
            }
            "escape" => {
                if self.target.is_none() {
                    return None;
                }
                self.cancel(ctx);
                Some(ToolResult::ok("Cut cancelled"))
            }
            "backspace" => {
                if self.points.pop().is_some() {
                    self.push_preview(None, ctx);
                    Some(ToolResult::ok("Point removed"))
                } else if self.target.take().is_some() {
                    ctx.model.clear_preview();
                    Some(ToolResult::ok("Target cleared"))
                } else {
                    None
                }
            }
            "s" => {
                self.shape = self.shape.next();
                self.points.clear();
                ctx.model.clear_preview();
                Some(ToolResult::ok(format!("Cut shape: {}", self.shape.label())))
            }
            _ => None,
        }
    }
}
