//! The contract between scenes and whatever draws them.
//!
//! A scene is advanced once per display frame and hands back a
//! [`RenderableFrame`]: flat position buffers plus how to shade them. The
//! drawing surface is injected, so scenes never touch WebGL directly and can
//! be stepped headless in tests.

use glam::Vec3;

use crate::camera::Camera;
use crate::color::Rgb;
use crate::error::Result;

/// How a layer's vertices are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// One sprite per vertex.
    Points,
    /// Every two vertices form an independent segment.
    Lines,
}

/// How a layer is composited over what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    #[default]
    Normal,
    Additive,
}

/// Vertex coloring for a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shade<'a> {
    Uniform(Rgb),
    /// Flat `[r, g, b, ...]`, one triple per vertex.
    PerVertex(&'a [f32]),
}

/// One drawable batch of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer<'a> {
    pub primitive: Primitive,
    /// Flat `[x, y, z, ...]` in the layer's local space.
    pub positions: &'a [f32],
    pub shade: Shade<'a>,
    pub opacity: f32,
    /// Point diameter in world units. Ignored for lines.
    pub point_size: f32,
    /// Euler rotation (XYZ order) applied to the whole layer.
    pub rotation: Vec3,
    pub blend: Blend,
}

impl<'a> Layer<'a> {
    pub fn points(positions: &'a [f32], shade: Shade<'a>) -> Self {
        Self {
            primitive: Primitive::Points,
            positions,
            shade,
            opacity: 1.0,
            point_size: 1.0,
            rotation: Vec3::ZERO,
            blend: Blend::Normal,
        }
    }

    pub fn lines(positions: &'a [f32], shade: Shade<'a>) -> Self {
        Self {
            primitive: Primitive::Lines,
            ..Self::points(positions, shade)
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Everything needed to draw one frame of one scene, borrowed from the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderableFrame<'a> {
    pub layers: Vec<Layer<'a>>,
}

/// A self-contained animated scene.
pub trait Scene {
    /// Step the scene by one display frame. `dt` is the time since the last
    /// frame in seconds; scenes that step by whole frames may ignore it.
    fn advance(&mut self, dt: f32) -> RenderableFrame<'_>;

    fn camera(&self) -> &Camera;

    fn camera_mut(&mut self) -> &mut Camera;
}

/// A target that can rasterize [`RenderableFrame`]s.
pub trait RenderSurface {
    /// Match the drawing buffer to the container size in CSS pixels.
    fn resize(&mut self, width: u32, height: u32);

    fn draw(&mut self, camera: &Camera, frame: &RenderableFrame<'_>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_fields() {
        let positions = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let layer = Layer::lines(&positions, Shade::Uniform(Rgb::BLUE))
            .with_opacity(0.15)
            .with_rotation(Vec3::Y)
            .with_blend(Blend::Additive);

        assert_eq!(layer.primitive, Primitive::Lines);
        assert_eq!(layer.vertex_count(), 2);
        assert_eq!(layer.opacity, 0.15);
        assert_eq!(layer.rotation, Vec3::Y);
        assert_eq!(layer.blend, Blend::Additive);
    }
}
