//! Helpers shared by every tool: world-space lookup, ids, element factory

use glam::{DVec2, DVec3};
use shared::{BuildingElement, ElementKind, ElementProperties, ToolType, Transform};

use crate::events::InputEvent;
use crate::geometry::{pick_nearest, ray_aabb, ray_ground_plane};
use crate::model::now_ms;

use super::ToolCtx;

/// Two pointer-downs within this interval count as a double click
pub const DOUBLE_CLICK_SECS: f64 = 0.3;

/// World-space point under the pointer: nearest scene element hit, falling
/// back to the ground-plane intersection when nothing is hit.
pub fn world_point(event: &InputEvent, ctx: &ToolCtx) -> Option<DVec3> {
    let ray = ctx.camera.ndc_ray(DVec2::new(event.position.x, event.position.y));
    let boxes = ctx.model.element_aabbs();
    if let Some(id) = pick_nearest(&ray, &boxes) {
        if let Some((_, aabb)) = boxes.iter().find(|(b, _)| *b == id) {
            if let Some(dist) = ray_aabb(&ray, aabb) {
                return Some(ray.origin + ray.direction * dist);
            }
        }
    }
    ray_ground_plane(&ray)
}

/// Ground-plane point under the pointer, ignoring scene geometry.
/// Construction points for walls and floors always live on the ground.
pub fn ground_point(event: &InputEvent, ctx: &ToolCtx) -> Option<DVec3> {
    let ray = ctx.camera.ndc_ray(DVec2::new(event.position.x, event.position.y));
    ray_ground_plane(&ray)
}

/// Unique element id: `{tool}_{timestamp_ms}_{random}`
pub fn generate_id(tool: ToolType) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
    format!("{}_{}_{}", tool.id_prefix(), now_ms(), suffix)
}

/// Reserved id of the preview slot element for a tool
pub fn preview_id(tool: ToolType) -> String {
    format!("preview-{}", tool.id_prefix())
}

/// Base element with identity, default transform and timestamps stamped
pub fn base_element(
    id: String,
    kind: ElementKind,
    name: impl Into<String>,
    properties: ElementProperties,
) -> BuildingElement {
    let now = now_ms();
    BuildingElement {
        id,
        kind,
        name: name.into(),
        transform: Transform::new(),
        properties,
        visible: true,
        locked: false,
        created_at: now,
        modified_at: now,
    }
}

/// True when a click at `now` forms a double click with a previous one
pub fn is_double_click(last: Option<f64>, now: f64) -> bool {
    last.is_some_and(|t| now - t <= DOUBLE_CLICK_SECS)
}
