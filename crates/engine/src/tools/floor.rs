//! Floor construction tool: arbitrary polygon outline with a hole sub-mode.

use glam::DVec3;
use shared::{ElementKind, ElementProperties, ToolType};

use crate::events::InputEvent;
use crate::geometry::{centroid, polygon_area};
use crate::snap::snap_construction_point;

use super::common::{base_element, generate_id, ground_point, is_double_click, preview_id};
use super::{Tool, ToolCtx, ToolResult};

/// Polygon floor construction. Clicks accumulate outline points; the `h` key
/// toggles a hole sub-mode that accumulates a secondary point list. A double
/// click or Enter attempts the commit.
pub struct FloorTool {
    points: Vec<DVec3>,
    holes: Vec<Vec<DVec3>>,
    /// Secondary point list while the hole sub-mode is active
    current_hole: Option<Vec<DVec3>>,
    last_click_time: Option<f64>,
}

impl FloorTool {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            holes: Vec::new(),
            current_hole: None,
            last_click_time: None,
        }
    }

    fn collecting(&self) -> bool {
        !self.points.is_empty() || self.current_hole.is_some()
    }

    fn cancel(&mut self, ctx: &mut ToolCtx) {
        self.points.clear();
        self.holes.clear();
        self.current_hole = None;
        self.last_click_time = None;
        ctx.model.clear_preview();
    }

    /// Close the hole sub-mode, keeping the hole only if it is a polygon
    fn close_hole(&mut self) {
        if let Some(hole) = self.current_hole.take() {
            if hole.len() >= 3 {
                self.holes.push(hole);
            }
        }
    }

    fn net_area(points: &[DVec3], holes: &[Vec<DVec3>]) -> f64 {
        polygon_area(points) - holes.iter().map(|h| polygon_area(h)).sum::<f64>()
    }

    fn build_floor(
        &self,
        id: String,
        points: &[DVec3],
        holes: &[Vec<DVec3>],
        ctx: &ToolCtx,
    ) -> shared::BuildingElement {
        let c = centroid(points);
        let area = Self::net_area(points, holes);

        let mut e = base_element(
            id,
            ElementKind::Floor,
            "Floor",
            ElementProperties::Floor {
                points: points.iter().map(|p| (*p - c).to_array()).collect(),
                holes: holes
                    .iter()
                    .map(|h| h.iter().map(|p| (*p - c).to_array()).collect())
                    .collect(),
                thickness: ctx.config.floor.thickness,
                area,
            },
        );
        e.transform.position = [c.x, 0.0, c.z];
        e
    }

    fn finish(&mut self, ctx: &mut ToolCtx) -> ToolResult {
        let cfg = &ctx.config.floor;

        if self.points.len() < 3 {
            return ToolResult::fail(format!(
                "Floor needs at least 3 points ({} given)",
                self.points.len()
            ));
        }

        // Validate against the prospective hole list; the in-progress state
        // is only consumed once the commit is certain
        let mut holes = self.holes.clone();
        if let Some(hole) = &self.current_hole {
            if hole.len() >= 3 {
                holes.push(hole.clone());
            }
        }

        let area = Self::net_area(&self.points, &holes);
        if area < cfg.min_area {
            return ToolResult::fail(format!(
                "Floor area too small: {:.2} m² (minimum {:.2} m²)",
                area, cfg.min_area
            ));
        }
        if area > cfg.max_area {
            return ToolResult::fail(format!(
                "Floor area too large: {:.2} m² (maximum {:.2} m²)",
                area, cfg.max_area
            ));
        }

        let element = self.build_floor(generate_id(ToolType::Floor), &self.points, &holes, ctx);
        let holes = holes.len();
        self.cancel(ctx);

        tracing::info!("Committed floor ({area:.2} m², {holes} hole(s))");
        ToolResult::ok_element(element, format!("Created floor ({area:.2} m²)"))
    }

    fn push_preview(&self, hover: Option<DVec3>, ctx: &mut ToolCtx) {
        if self.points.is_empty() {
            return;
        }
        let mut points = self.points.clone();
        if let Some(p) = hover {
            points.push(p);
        }
        if points.len() < 3 {
            return;
        }
        let preview = self.build_floor(preview_id(ToolType::Floor), &points, &self.holes, ctx);
        ctx.model.set_preview(preview);
    }
}

impl Default for FloorTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for FloorTool {
    fn tool_type(&self) -> ToolType {
        ToolType::Floor
    }

    fn on_deactivate(&mut self, ctx: &mut ToolCtx) {
        self.cancel(ctx);
    }

    fn on_pointer_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let point = ground_point(event, ctx)?;
        let point = snap_construction_point(point, &ctx.model.settings);

        let double = is_double_click(self.last_click_time, event.time);
        self.last_click_time = Some(event.time);

        if double && self.current_hole.is_none() && self.points.len() >= 3 {
            return Some(self.finish(ctx));
        }

        if let Some(hole) = &mut self.current_hole {
            hole.push(point);
            return Some(ToolResult::ok(format!("Hole point {}", hole.len())));
        }

        if self.points.len() >= ctx.config.floor.max_points {
            return Some(ToolResult::fail(format!(
                "Floor outline limited to {} points",
                ctx.config.floor.max_points
            )));
        }
        self.points.push(point);
        Some(ToolResult::ok(format!("Point {}", self.points.len())))
    }

    fn on_pointer_move(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        if !self.collecting() {
            return None;
        }
        let point = ground_point(event, ctx)?;
        let point = snap_construction_point(point, &ctx.model.settings);
        self.push_preview(Some(point), ctx);
        None
    }

    fn on_key_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        match event.key_lower().as_str() {
            "enter" => {
                if self.collecting() {
                    Some(self.finish(ctx))
                } else {
                    None
                }
            }
            "escape" => {
                if !self.collecting() {
                    return None;
                }
                self.cancel(ctx);
                Some(ToolResult::ok("Floor cancelled"))
            }
            "backspace" => {
                if let Some(hole) = &mut self.current_hole {
                    if hole.pop().is_none() {
                        self.current_hole = None;
                    }
                    return Some(ToolResult::ok("Hole point removed"));
                }
                if self.points.pop().is_some() {
                    if self.points.is_empty() {
                        self.cancel(ctx);
                        return Some(ToolResult::ok("Floor cancelled"));
                    }
                    self.push_preview(None, ctx);
                    return Some(ToolResult::ok("Point removed"));
                }
                None
            }
            "h" => {
                if !ctx.config.floor.allow_holes {
                    return Some(ToolResult::fail("Holes are disabled"));
                }
                if self.points.len() < 3 {
                    return Some(ToolResult::fail("Outline needs 3 points before adding holes"));
                }
                if self.current_hole.is_some() {
                    self.close_hole();
                    Some(ToolResult::ok("Hole closed"))
                } else {
                    self.current_hole = Some(Vec::new());
                    Some(ToolResult::ok("Hole mode"))
                }
            }
            _ => None,
        }
    }
}
