//! Orbit camera: the ray/projection provider consumed by the tools

use glam::{DMat4, DVec2, DVec3, DVec4};

use crate::geometry::Ray;

/// Orbit camera around a target point.
///
/// Provides the two queries the tools need from the host renderer: projecting
/// a world point to normalized device coordinates (gizmo hit-testing) and
/// unprojecting an NDC position into a world-space ray (picking).
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f64,
    /// Vertical rotation angle (radians)
    pub pitch: f64,
    /// Distance from target
    pub distance: f64,
    /// Camera target point
    pub target: DVec3,
    /// Vertical field of view (radians)
    pub fov: f64,
    /// Viewport width / height
    pub aspect: f64,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 12.0,
            target: DVec3::ZERO,
            fov: 45.0_f64.to_radians(),
            aspect: 16.0 / 9.0,
        }
    }

    pub fn rotate(&mut self, dx_deg: f64, dy_deg: f64) {
        self.yaw += dx_deg.to_radians();
        self.pitch = (self.pitch + dy_deg.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f64) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 200.0);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> DVec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + DVec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// Unit vector from the eye toward the target
    pub fn forward(&self) -> DVec3 {
        (self.target - self.eye_position()).normalize_or_zero()
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye_position(), self.target, DVec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov, self.aspect, 0.1, 500.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to normalized device coordinates.
    /// Returns None for points behind the camera.
    pub fn project(&self, point: DVec3) -> Option<DVec2> {
        let p = self.view_projection() * DVec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        Some(DVec2::new(ndc.x, ndc.y))
    }

    /// Cast a ray through a normalized device coordinate position
    pub fn ndc_ray(&self, ndc: DVec2) -> Ray {
        let vp_inv = self.view_projection().inverse();

        // Unproject near and far points
        let near_ndc = DVec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_ndc = DVec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near_world = vp_inv * near_ndc;
        let far_world = vp_inv * far_ndc;

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        let direction = (far - near).normalize_or_zero();

        Ray {
            origin: self.eye_position(),
            direction,
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
