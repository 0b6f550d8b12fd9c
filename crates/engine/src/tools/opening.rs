//! Shared placement and validation logic for the door and window tools.

use glam::DVec3;
use shared::{BuildingElement, ElementId, ElementKind, ElementProperties, Opening, ToolType};

use crate::constraints::OpeningConstraints;
use crate::events::InputEvent;
use crate::geometry::project_point_to_segment;
use crate::model::wall_endpoints;

use super::common::{base_element, generate_id, preview_id, world_point};
use super::{ToolCtx, ToolResult};

/// A click resolved onto a wall centerline
#[derive(Debug, Clone)]
pub struct WallPlacement {
    pub wall_id: ElementId,
    /// Ground-level start of the wall segment
    pub start: DVec3,
    /// Unit direction from start to end
    pub dir: DVec3,
    /// Projected point on the centerline, at ground level
    pub center: DVec3,
    /// Distance of `center` from the wall start
    pub along: f64,
    pub wall_length: f64,
    pub wall_height: f64,
    pub wall_thickness: f64,
    pub rotation_y: f64,
}

impl WallPlacement {
    /// Distance of a world point from the wall start, measured along the wall
    pub fn along_of(&self, position: [f64; 3]) -> f64 {
        let p = DVec3::new(position[0], 0.0, position[2]);
        (p - self.start).dot(self.dir)
    }
}

/// Resolve a click onto the nearest wall centerline within `tolerance`.
pub fn find_wall_placement(
    click: DVec3,
    ctx: &ToolCtx,
    tolerance: f64,
) -> Result<WallPlacement, String> {
    let flat = DVec3::new(click.x, 0.0, click.z);
    let mut best: Option<(WallPlacement, f64)> = None;

    for wall in ctx.model.walls() {
        let Some((a, b)) = wall_endpoints(wall) else {
            continue;
        };
        let ElementProperties::Wall {
            length,
            thickness,
            height,
            ..
        } = &wall.properties
        else {
            continue;
        };

        let (closest, t) = project_point_to_segment(flat, a, b);
        let dist = (flat - closest).length();
        if dist > tolerance {
            continue;
        }
        if best.as_ref().is_some_and(|(_, d)| dist >= *d) {
            continue;
        }

        let scaled_length = length * wall.transform.scale[0];
        best = Some((
            WallPlacement {
                wall_id: wall.id.clone(),
                start: a,
                dir: (b - a).normalize_or_zero(),
                center: closest,
                along: t * scaled_length,
                wall_length: scaled_length,
                wall_height: height * wall.transform.scale[1],
                wall_thickness: thickness * wall.transform.scale[2],
                rotation_y: wall.transform.rotation[1],
            },
            dist,
        ));
    }

    best.map(|(p, _)| p)
        .ok_or_else(|| format!("No wall within {tolerance:.2} m of the click point"))
}

/// Validate an opening against the constraints, the wall geometry and the
/// wall's existing openings. Runs strictly before any model mutation.
pub fn validate_opening(
    placement: &WallPlacement,
    width: f64,
    height: f64,
    sill: f64,
    cfg: &OpeningConstraints,
    existing: &[Opening],
) -> Result<(), String> {
    if width < cfg.min_width || width > cfg.max_width {
        return Err(format!(
            "Opening width {:.2} m out of bounds [{:.2}, {:.2}]",
            width, cfg.min_width, cfg.max_width
        ));
    }
    if height < cfg.min_height || height > cfg.max_height {
        return Err(format!(
            "Opening height {:.2} m out of bounds [{:.2}, {:.2}]",
            height, cfg.min_height, cfg.max_height
        ));
    }
    if sill < cfg.min_sill || sill > cfg.max_sill {
        return Err(format!(
            "Sill height {:.2} m out of bounds [{:.2}, {:.2}]",
            sill, cfg.min_sill, cfg.max_sill
        ));
    }
    if placement.wall_thickness <= 0.0 {
        return Err("Target wall has no thickness".to_string());
    }
    if sill + height > placement.wall_height {
        return Err(format!(
            "Opening top {:.2} m exceeds wall height {:.2} m",
            sill + height,
            placement.wall_height
        ));
    }

    let half = width / 2.0;
    if placement.along - half < cfg.min_end_clearance
        || placement.wall_length - placement.along - half < cfg.min_end_clearance
    {
        return Err(format!(
            "Opening too close to a wall end (clearance {:.2} m required)",
            cfg.min_end_clearance
        ));
    }

    for other in existing {
        let other_along = placement.along_of(other.position);
        let min_gap = (width + other.width) / 2.0 + cfg.min_separation;
        if (placement.along - other_along).abs() < min_gap {
            return Err(format!(
                "Opening overlaps existing opening {}",
                other.id
            ));
        }
    }

    Ok(())
}

/// Build the door/window element and its opening record for a placement
pub fn build_opening_element(
    id: String,
    kind: ElementKind,
    placement: &WallPlacement,
    width: f64,
    height: f64,
    sill: f64,
) -> (BuildingElement, Opening) {
    let position = [
        placement.center.x,
        sill + height / 2.0,
        placement.center.z,
    ];

    let properties = match kind {
        ElementKind::Window => ElementProperties::Window {
            width,
            height,
            sill_height: sill,
            thickness: placement.wall_thickness,
            wall_id: Some(placement.wall_id.clone()),
        },
        _ => ElementProperties::Door {
            width,
            height,
            thickness: placement.wall_thickness,
            wall_id: Some(placement.wall_id.clone()),
        },
    };

    let mut element = base_element(id, kind, kind.label(), properties);
    element.transform.position = position;
    element.transform.rotation = [0.0, placement.rotation_y, 0.0];

    let opening = Opening {
        id: element.id.clone(),
        position,
        width,
        height,
        sill_height: sill,
    };

    (element, opening)
}

/// Shared pointer-down behavior of the door and window tools: resolve the
/// wall, validate, build the element, and register the opening on the wall.
pub fn place_opening(
    tool: ToolType,
    kind: ElementKind,
    event: &InputEvent,
    ctx: &mut ToolCtx,
) -> Option<ToolResult> {
    let click = world_point(event, ctx)?;
    let cfg = match kind {
        ElementKind::Window => ctx.config.window.clone(),
        _ => ctx.config.door.clone(),
    };

    let placement = match find_wall_placement(click, ctx, cfg.wall_distance_tolerance) {
        Ok(p) => p,
        Err(e) => return Some(ToolResult::fail(e)),
    };

    let existing: Vec<Opening> = ctx
        .model
        .get_element(&placement.wall_id)
        .and_then(|w| w.properties.openings().map(|o| o.to_vec()))
        .unwrap_or_default();

    if let Err(e) = validate_opening(
        &placement,
        cfg.default_width,
        cfg.default_height,
        cfg.default_sill,
        &cfg,
        &existing,
    ) {
        return Some(ToolResult::fail(e));
    }

    let (element, opening) = build_opening_element(
        generate_id(tool),
        kind,
        &placement,
        cfg.default_width,
        cfg.default_height,
        cfg.default_sill,
    );

    // Validation passed: register the opening on the wall. The element itself
    // is committed by the manager.
    if let Some(wall) = ctx.model.get_element_mut(&placement.wall_id) {
        if let ElementProperties::Wall { openings, .. } = &mut wall.properties {
            openings.push(opening);
        }
    }
    ctx.model.clear_preview();

    tracing::info!(
        "Placed {} on wall {} at {:.2} m",
        kind.label().to_lowercase(),
        placement.wall_id,
        placement.along
    );
    Some(ToolResult::ok_element(
        element,
        format!("Created {}", kind.label().to_lowercase()),
    ))
}

/// Shared pointer-move behavior: write a placement preview, or clear the
/// preview when no wall is under the pointer.
pub fn preview_opening(
    tool: ToolType,
    kind: ElementKind,
    event: &InputEvent,
    ctx: &mut ToolCtx,
) -> Option<ToolResult> {
    let Some(click) = world_point(event, ctx) else {
        ctx.model.clear_preview();
        return None;
    };
    let cfg = match kind {
        ElementKind::Window => &ctx.config.window,
        _ => &ctx.config.door,
    };
    let (width, height, sill, tolerance) = (
        cfg.default_width,
        cfg.default_height,
        cfg.default_sill,
        cfg.wall_distance_tolerance,
    );

    match find_wall_placement(click, ctx, tolerance) {
        Ok(placement) => {
            let (element, _) =
                build_opening_element(preview_id(tool), kind, &placement, width, height, sill);
            ctx.model.set_preview(element);
        }
        Err(_) => ctx.model.clear_preview(),
    }
    None
}
