//! Transform gizmo: handle hit-testing and drag deltas.
//!
//! All hit-testing is ray-based; drag deltas are derived from the pointer's
//! NDC motion projected through the camera, so the tools never touch the
//! renderer directly.

use glam::{DVec2, DVec3};
use shared::BuildingElement;

use crate::camera::OrbitCamera;
use crate::geometry::{ray_plane, ray_segment_distance, Ray};

/// Length of the gizmo axis handles in world units
pub const GIZMO_AXIS_LENGTH: f64 = 1.5;
/// Ray distance threshold for hitting an axis handle
pub const GIZMO_HIT_THRESHOLD: f64 = 0.18;
/// Radius of the rotation rings in world units
pub const GIZMO_RING_RADIUS: f64 = 1.2;

/// Which handle of a gizmo a drag is constrained to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
    /// Camera-facing axis (free rotation / screen-plane drag)
    Screen,
}

impl GizmoAxis {
    /// World-space unit vector of the axis; Screen resolves to the camera forward
    pub fn unit(&self, camera: &OrbitCamera) -> DVec3 {
        match self {
            Self::X => DVec3::X,
            Self::Y => DVec3::Y,
            Self::Z => DVec3::Z,
            Self::Screen => camera.forward(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::Screen => "screen",
        }
    }
}

/// On-screen handle descriptor recomputed from the current selection
#[derive(Debug, Clone, Default)]
pub struct GizmoDescriptor {
    pub visible: bool,
    /// Mean position of the selected elements (the drag pivot)
    pub pivot: DVec3,
    /// Mean rotation, used only for handle placement
    pub mean_rotation: DVec3,
    /// Mean scale, used only for handle placement
    pub mean_scale: DVec3,
}

impl GizmoDescriptor {
    /// Descriptor for a selection; hidden when the selection is empty
    pub fn from_elements<'a>(elements: impl Iterator<Item = &'a BuildingElement>) -> Self {
        let mut count = 0usize;
        let mut pivot = DVec3::ZERO;
        let mut rotation = DVec3::ZERO;
        let mut scale = DVec3::ZERO;

        for e in elements {
            pivot += DVec3::from_array(e.transform.position);
            rotation += DVec3::from_array(e.transform.rotation);
            scale += DVec3::from_array(e.transform.scale);
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        let n = count as f64;
        Self {
            visible: true,
            pivot: pivot / n,
            mean_rotation: rotation / n,
            mean_scale: scale / n,
        }
    }
}

/// Test if a ray hits one of the three axis arrow handles.
/// Returns the axis whose handle line passes closest within the threshold.
pub fn axis_hit_test(ray: &Ray, pivot: DVec3) -> Option<GizmoAxis> {
    let axes = [
        (GizmoAxis::X, DVec3::X),
        (GizmoAxis::Y, DVec3::Y),
        (GizmoAxis::Z, DVec3::Z),
    ];

    let mut best: Option<(GizmoAxis, f64)> = None;

    for (axis_id, axis_dir) in &axes {
        let line_start = pivot;
        let line_end = pivot + *axis_dir * GIZMO_AXIS_LENGTH;

        let dist = ray_segment_distance(ray, line_start, line_end);

        if dist < GIZMO_HIT_THRESHOLD && best.as_ref().is_none_or(|(_, d)| dist < *d) {
            best = Some((*axis_id, dist));
        }
    }

    best.map(|(axis, _)| axis)
}

/// Test if a ray hits one of the rotation rings around the pivot.
/// Each ring lies in the plane perpendicular to its axis.
pub fn ring_hit_test(ray: &Ray, pivot: DVec3) -> Option<GizmoAxis> {
    let axes = [
        (GizmoAxis::X, DVec3::X),
        (GizmoAxis::Y, DVec3::Y),
        (GizmoAxis::Z, DVec3::Z),
    ];

    let mut best: Option<(GizmoAxis, f64)> = None;

    for (axis_id, normal) in &axes {
        let Some(hit) = ray_plane(ray, pivot, *normal) else {
            continue;
        };
        // Distance from the ring circle in its plane
        let dist = ((hit - pivot).length() - GIZMO_RING_RADIUS).abs();
        if dist < GIZMO_HIT_THRESHOLD && best.as_ref().is_none_or(|(_, d)| dist < *d) {
            best = Some((*axis_id, dist));
        }
    }

    best.map(|(axis, _)| axis)
}

/// World-space translation delta for an axis-constrained drag.
/// Projects the NDC drag delta along the axis direction in NDC space.
pub fn axis_drag_delta(
    camera: &OrbitCamera,
    pivot: DVec3,
    axis: GizmoAxis,
    ndc_from: DVec2,
    ndc_to: DVec2,
) -> DVec3 {
    let axis_dir = axis.unit(camera);

    // Project axis direction to NDC
    let p0 = camera.project(pivot);
    let p1 = camera.project(pivot + axis_dir);

    let (Some(ndc_p0), Some(ndc_p1)) = (p0, p1) else {
        return DVec3::ZERO;
    };

    let ndc_axis = ndc_p1 - ndc_p0;
    let ndc_axis_len = ndc_axis.length();

    if ndc_axis_len < 1e-6 {
        return DVec3::ZERO;
    }

    let ndc_axis_norm = ndc_axis / ndc_axis_len;

    // Dot product of the NDC drag delta with the NDC axis direction
    let projected = (ndc_to - ndc_from).dot(ndc_axis_norm);

    // Convert back to world units: 1 world unit spans ndc_axis_len in NDC
    let world_delta = projected / ndc_axis_len;

    axis_dir * world_delta
}

/// World-space translation delta for a free drag on the plane with the given
/// normal through the pivot.
pub fn plane_drag_delta(
    camera: &OrbitCamera,
    pivot: DVec3,
    normal: DVec3,
    ndc_from: DVec2,
    ndc_to: DVec2,
) -> DVec3 {
    let from = ray_plane(&camera.ndc_ray(ndc_from), pivot, normal);
    let to = ray_plane(&camera.ndc_ray(ndc_to), pivot, normal);
    match (from, to) {
        (Some(a), Some(b)) => b - a,
        _ => DVec3::ZERO,
    }
}

/// Signed screen-space angle of the pointer around the projected pivot
pub fn pointer_angle(camera: &OrbitCamera, pivot: DVec3, ndc: DVec2) -> f64 {
    let center = camera.project(pivot).unwrap_or(DVec2::ZERO);
    let v = ndc - center;
    v.y.atan2(v.x)
}

/// Quantize a value to the nearest multiple of `step` (no-op for step <= 0)
pub fn snap_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}
