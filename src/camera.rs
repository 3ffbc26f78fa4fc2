//! Fixed viewpoint facing the sphere.

use glam::{Mat4, Vec3};

use crate::params::RenderConfig;

/// Camera looking at the origin from a fixed distance on +Z.
///
/// Sized to the drawable region once at construction; resize is handled as
/// a reconstruction, not a camera concern.
pub struct Camera {
    distance_m: f32,
}

impl Camera {
    pub fn new(distance_m: f32) -> Self {
        Self { distance_m }
    }

    /// Create view-projection matrix for rendering
    pub fn view_proj(&self, config: &RenderConfig) -> Mat4 {
        let eye = Vec3::new(0.0, 0.0, self.distance_m);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(
            config.fov_degrees.to_radians(),
            config.aspect_ratio(),
            config.near_plane_m,
            config.far_plane_m,
        );

        proj * view
    }
}
