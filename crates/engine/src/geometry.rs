//! Leaf geometry utilities: grid snapping, polygon area, ray queries

use glam::DVec3;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Box centered at `center` with full extents `size`
    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing all `points`, or None if empty
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;
        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Self { min, max })
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Grow the box by `margin` in every direction
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: self.min - DVec3::splat(margin),
            max: self.max + DVec3::splat(margin),
        }
    }
}

/// Round each coordinate to the nearest multiple of `grid`
pub fn snap_to_grid(p: DVec3, grid: f64) -> DVec3 {
    if grid <= 0.0 {
        return p;
    }
    DVec3::new(
        (p.x / grid).round() * grid,
        (p.y / grid).round() * grid,
        (p.z / grid).round() * grid,
    )
}

/// Euclidean distance between two points
pub fn distance(a: DVec3, b: DVec3) -> f64 {
    (b - a).length()
}

/// Area of a polygon on the ground (XZ) plane.
///
/// Signed shoelace sum over the x/z coordinates, reported as its absolute
/// value divided by two. Fewer than three points have zero area.
pub fn polygon_area(points: &[DVec3]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.z - b.x * a.z;
    }
    sum.abs() / 2.0
}

/// Centroid (vertex mean) of a point set
pub fn centroid(points: &[DVec3]) -> DVec3 {
    if points.is_empty() {
        return DVec3::ZERO;
    }
    points.iter().copied().sum::<DVec3>() / points.len() as f64
}

/// Intersect a ray with the ground plane (y = 0).
/// Returns None when the ray is parallel to the plane or points away from it.
pub fn ray_ground_plane(ray: &Ray) -> Option<DVec3> {
    ray_plane(ray, DVec3::ZERO, DVec3::Y)
}

/// Intersect a ray with an arbitrary plane given by a point and a normal
pub fn ray_plane(ray: &Ray, plane_point: DVec3, normal: DVec3) -> Option<DVec3> {
    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (plane_point - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray.origin + ray.direction * t)
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let inv_dir = DVec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Pick the id of the nearest box intersected by the ray
pub fn pick_nearest(ray: &Ray, boxes: &[(String, Aabb)]) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;

    for (id, aabb) in boxes {
        if let Some(dist) = ray_aabb(ray, aabb) {
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((id, dist));
            }
        }
    }

    best.map(|(id, _)| id.to_string())
}

/// Project `p` onto the segment `a`..`b`.
/// Returns the closest point and the clamped parameter t in [0, 1].
pub fn project_point_to_segment(p: DVec3, a: DVec3, b: DVec3) -> (DVec3, f64) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return (a, 0.0);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Distance from `p` to the segment `a`..`b`
pub fn point_segment_distance(p: DVec3, a: DVec3, b: DVec3) -> f64 {
    let (closest, _) = project_point_to_segment(p, a, b);
    (p - closest).length()
}

/// Minimum distance between a ray and a line segment
pub fn ray_segment_distance(ray: &Ray, line_start: DVec3, line_end: DVec3) -> f64 {
    let u = ray.direction;
    let v = line_end - line_start;
    let w = ray.origin - line_start;

    let a = u.dot(u);
    let b = u.dot(v);
    let c = v.dot(v);
    let d = u.dot(w);
    let e = v.dot(w);

    let denom = a * c - b * b;

    let (sc, tc);

    if denom < 1e-9 {
        // Nearly parallel
        sc = 0.0;
        tc = if b > c { d / b } else { e / c };
    } else {
        sc = (b * e - c * d) / denom;
        tc = (a * e - b * d) / denom;
    }

    let tc = tc.clamp(0.0, 1.0);
    let sc = sc.max(0.0);

    let closest_ray = ray.origin + u * sc;
    let closest_line = line_start + v * tc;

    (closest_ray - closest_line).length()
}
