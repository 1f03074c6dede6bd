//! Full-page background particle field.
//!
//! A static point cloud generated once. Each frame it slowly spins around Y
//! and eases toward a tilt that follows the pointer.

use glam::Vec3;
use rand::Rng;

use crate::camera::Camera;
use crate::color::Rgb;
use crate::config::FieldConfig;
use crate::frame::{Blend, Layer, RenderableFrame, Scene, Shade};

/// Pointer offset from the viewport center, each axis in `[-0.5, 0.5]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    /// Normalize client coordinates against the viewport size.
    pub fn from_client(client_x: f64, client_y: f64, width: f64, height: f64) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::default();
        }
        Self {
            x: (client_x / width - 0.5) as f32,
            y: (client_y / height - 0.5) as f32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    positions: Vec<f32>,
    colors: Vec<f32>,
    rotation: Vec3,
    elapsed: f32,
    pointer: Pointer,
    camera: Camera,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(config: FieldConfig, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(config.count * 3);
        let mut colors = Vec::with_capacity(config.count * 3);

        for _ in 0..config.count {
            for _ in 0..3 {
                positions.push((rng.gen::<f32>() - 0.5) * config.extent);
            }
            let color = match config.palette.len() {
                0 => Rgb::BLUE,
                n => config.palette[rng.gen_range(0..n)],
            };
            colors.extend_from_slice(&color.to_array());
        }

        let camera = Camera::new(config.camera_distance, 1, 1);
        Self {
            config,
            positions,
            colors,
            rotation: Vec3::ZERO,
            elapsed: 0.0,
            pointer: Pointer::default(),
            camera,
        }
    }

    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    /// Set the rotation for `elapsed` seconds since start.
    ///
    /// Y is first reset to the time-based drift, then both axes ease toward
    /// the pointer target, so the tilt lags the cursor.
    pub fn update(&mut self, elapsed: f32) {
        let FieldConfig {
            drift,
            parallax,
            easing,
            ..
        } = self.config;

        self.elapsed = elapsed;
        self.rotation.y = elapsed * drift;
        self.rotation.x += (self.pointer.y * parallax - self.rotation.x) * easing;
        self.rotation.y += (self.pointer.x * parallax - self.rotation.y) * easing;
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }
}

impl Scene for ParticleField {
    fn advance(&mut self, dt: f32) -> RenderableFrame<'_> {
        self.update(self.elapsed + dt);
        RenderableFrame {
            layers: vec![Layer::points(&self.positions, Shade::PerVertex(&self.colors))
                .with_point_size(self.config.point_size)
                .with_opacity(self.config.opacity)
                .with_rotation(self.rotation)
                .with_blend(Blend::Additive)],
        }
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}
