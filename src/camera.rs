//! Perspective camera looking down -Z at the origin.

use glam::{Mat4, Vec3};

/// Fixed-position perspective camera whose aspect follows its container.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z.
    pub distance: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(distance: f32, width: u32, height: u32) -> Self {
        let mut camera = Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            distance,
            aspect: 1.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Recompute the aspect ratio for a new viewport. A zero-height viewport
    /// (collapsed container) keeps the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
