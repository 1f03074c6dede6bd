//! Connected-particle network.
//!
//! A fixed set of points drifts at constant velocity inside a cube, bouncing
//! off its faces. Every frame, each pair of points closer than the link
//! distance is joined by a line segment.
//!
//! Stepping is per display frame, not per second: each [`ParticleNetwork::step`]
//! adds the velocity once, so the apparent speed follows the refresh rate.
//!
//! # Boundary behavior
//!
//! The boundary test runs *after* integration and only flips the velocity
//! component; the position is never clamped. A point therefore overshoots
//! the half-extent for the frame the crossing is detected, and if it is
//! still outside on the next frame that component flips again. This matches
//! the shipped animation and is kept as is.

use glam::Vec3;
use rand::Rng;

use crate::camera::Camera;
use crate::config::NetworkConfig;
use crate::frame::{Layer, RenderableFrame, Scene, Shade};

/// A moving point of the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Vec3,
    /// Constant speed; only the sign of each component changes.
    pub velocity: Vec3,
}

impl Point {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, spawn_extent: f32, max_speed: f32) -> Self {
        let mut centered = |scale: f32| (rng.gen::<f32>() - 0.5) * scale;
        let position = Vec3::new(
            centered(spawn_extent),
            centered(spawn_extent),
            centered(spawn_extent),
        );
        let velocity = Vec3::new(centered(max_speed), centered(max_speed), centered(max_speed));
        Self { position, velocity }
    }

    fn integrate(&mut self, half_extent: f32) {
        self.position += self.velocity;

        if self.position.x.abs() > half_extent {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y.abs() > half_extent {
            self.velocity.y = -self.velocity.y;
        }
        if self.position.z.abs() > half_extent {
            self.velocity.z = -self.velocity.z;
        }
    }
}

/// Point set, its current links and the buffers handed to the renderer.
#[derive(Debug, Clone)]
pub struct ParticleNetwork {
    config: NetworkConfig,
    points: Vec<Point>,
    links: Vec<(usize, usize)>,
    /// Flat point positions, `[x, y, z, ...]`.
    positions: Vec<f32>,
    /// Flat segment endpoints, six floats per link.
    segments: Vec<f32>,
    rotation: f32,
    camera: Camera,
}

impl ParticleNetwork {
    /// Spawn `config.count` points at random positions and velocities.
    pub fn new<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> Self {
        let points = (0..config.count)
            .map(|_| Point::random(rng, config.spawn_extent, config.max_speed))
            .collect();
        Self::from_points(config, points)
    }

    /// Build a network from explicit points. `config.count` is ignored in
    /// favor of `points.len()`.
    pub fn from_points(config: NetworkConfig, points: Vec<Point>) -> Self {
        let camera = Camera::new(config.camera_distance, 1, 1);
        let mut network = Self {
            positions: Vec::with_capacity(points.len() * 3),
            links: Vec::new(),
            segments: Vec::new(),
            rotation: 0.0,
            config,
            points,
            camera,
        };
        network.sync_positions();
        network
    }

    /// Advance every point by one frame and rebuild the links.
    pub fn step(&mut self) {
        let half_extent = self.config.half_extent;
        for point in &mut self.points {
            point.integrate(half_extent);
        }
        self.sync_positions();
        self.rebuild_links();
        self.rotation += self.config.spin;
    }

    /// All-pairs scan; the point count is small and fixed.
    ///
    /// Positions are stored as f32 but distances are measured in f64, so a
    /// pair just under the link distance is not rounded up onto it.
    fn rebuild_links(&mut self) {
        let link_distance = f64::from(self.config.link_distance);
        self.links.clear();
        self.segments.clear();

        for (i, a) in self.points.iter().enumerate() {
            for (j, b) in self.points.iter().enumerate().skip(i + 1) {
                if a.position.as_dvec3().distance(b.position.as_dvec3()) < link_distance {
                    self.links.push((i, j));
                    self.segments.extend_from_slice(&a.position.to_array());
                    self.segments.extend_from_slice(&b.position.to_array());
                }
            }
        }
    }

    fn sync_positions(&mut self) {
        self.positions.clear();
        self.positions
            .extend(self.points.iter().flat_map(|p| p.position.to_array()));
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Index pairs `(i, j)` with `i < j` linked during the last step.
    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn segments(&self) -> &[f32] {
        &self.segments
    }

    /// Accumulated Y rotation of the whole group. Display only; stored
    /// positions are never rotated.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Upper bound on the number of links for this point count.
    pub fn max_links(&self) -> usize {
        let n = self.points.len();
        n * n.saturating_sub(1) / 2
    }
}

impl Scene for ParticleNetwork {
    fn advance(&mut self, _dt: f32) -> RenderableFrame<'_> {
        self.step();

        let shade = Shade::Uniform(self.config.color);
        let rotation = Vec3::new(0.0, self.rotation, 0.0);
        RenderableFrame {
            layers: vec![
                Layer::points(&self.positions, shade)
                    .with_point_size(self.config.point_size)
                    .with_opacity(self.config.point_opacity)
                    .with_rotation(rotation),
                Layer::lines(&self.segments, shade)
                    .with_opacity(self.config.line_opacity)
                    .with_rotation(rotation),
            ],
        }
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Primitive;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(x: f32, y: f32, z: f32) -> Point {
        Point::new(Vec3::new(x, y, z), Vec3::ZERO)
    }

    #[test]
    fn random_points_respect_spawn_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let network = ParticleNetwork::new(NetworkConfig::default(), &mut rng);

        assert_eq!(network.points().len(), 60);
        assert_eq!(network.positions().len(), 180);
        for p in network.points() {
            assert!(p.position.abs().max_element() <= 5.0);
            assert!(p.velocity.abs().max_element() <= 0.01);
        }
    }

    #[test]
    fn integration_adds_velocity() {
        let velocity = Vec3::new(0.01, -0.02, 0.005);
        let mut network = ParticleNetwork::from_points(
            NetworkConfig::default(),
            vec![Point::new(Vec3::new(1.0, 2.0, 3.0), velocity)],
        );
        network.step();

        let p = network.points()[0];
        assert_eq!(p.position, Vec3::new(1.0, 2.0, 3.0) + velocity);
        assert_eq!(p.velocity, velocity);
        assert_eq!(network.positions(), &p.position.to_array());
    }

    #[test]
    fn crossing_the_boundary_flips_only_that_axis() {
        let mut network = ParticleNetwork::from_points(
            NetworkConfig::default(),
            vec![Point::new(Vec3::new(4.99, 0.0, -1.0), Vec3::new(0.02, 0.01, -0.01))],
        );
        network.step();

        let p = network.points()[0];
        assert!((p.position.x - 5.01).abs() < 1e-5);
        assert_eq!(p.velocity, Vec3::new(-0.02, 0.01, -0.01));

        network.step();
        let p = network.points()[0];
        assert!((p.position.x - 4.99).abs() < 1e-5);
        assert_eq!(p.velocity.x, -0.02);
    }

    #[test]
    fn negative_boundary_reflects_too() {
        let mut network = ParticleNetwork::from_points(
            NetworkConfig::default(),
            vec![Point::new(Vec3::new(0.0, -4.995, 0.0), Vec3::new(0.0, -0.01, 0.0))],
        );
        network.step();
        assert_eq!(network.points()[0].velocity.y, 0.01);
    }

    #[test]
    fn link_threshold_is_strict() {
        let config = NetworkConfig::default();

        let mut near = ParticleNetwork::from_points(
            config.clone(),
            vec![still(0.0, 0.0, 0.0), still(2.0, 0.0, 0.0)],
        );
        near.step();
        assert_eq!(near.links(), &[(0, 1)]);
        assert_eq!(near.segments(), &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0]);

        let mut exact =
            ParticleNetwork::from_points(config, vec![still(0.0, 0.0, 0.0), still(2.5, 0.0, 0.0)]);
        exact.step();
        assert!(exact.links().is_empty());
        assert!(exact.segments().is_empty());
    }

    #[test]
    fn pairs_just_under_the_threshold_are_linked() {
        let a = still(-3.4415388, -1.1450052, 0.40168762);
        let b = still(-4.8293114, -1.5571575, -1.636502);
        let exact = a.position.as_dvec3().distance(b.position.as_dvec3());
        assert!(exact < 2.5);

        let mut network = ParticleNetwork::from_points(NetworkConfig::default(), vec![a, b]);
        network.step();
        assert_eq!(network.links(), &[(0, 1)]);
    }

    #[test]
    fn segments_follow_post_step_positions() {
        let mut network = ParticleNetwork::from_points(
            NetworkConfig::default(),
            vec![
                Point::new(Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0)),
                still(2.0, 0.0, 0.0),
            ],
        );
        network.step();
        assert_eq!(network.segments(), &[0.5, 0.0, 0.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn links_are_rebuilt_each_step() {
        let mut network = ParticleNetwork::from_points(
            NetworkConfig::default(),
            vec![
                Point::new(Vec3::ZERO, Vec3::new(-0.3, 0.0, 0.0)),
                still(2.0, 0.0, 0.0),
            ],
        );
        network.step();
        assert_eq!(network.links(), &[(0, 1)]);
        network.step();
        assert!(network.links().is_empty(), "2.6 apart after two steps");
        assert!(network.segments().is_empty());

        let mut grouped = ParticleNetwork::from_points(
            NetworkConfig::default(),
            vec![still(0.0, 0.0, 0.0), still(1.0, 0.0, 0.0), still(0.0, 1.0, 0.0)],
        );
        grouped.step();
        grouped.step();
        assert_eq!(grouped.links(), &[(0, 1), (0, 2), (1, 2)]);
        assert_eq!(grouped.segments().len(), 18);
    }

    #[test]
    fn rotation_accumulates_without_touching_positions() {
        let mut network =
            ParticleNetwork::from_points(NetworkConfig::default(), vec![still(1.0, 1.0, 1.0)]);
        for _ in 0..10 {
            network.step();
        }
        assert!((network.rotation() - 0.01).abs() < 1e-6);
        assert_eq!(network.points()[0].position, Vec3::ONE);
    }

    #[test]
    fn advance_emits_points_then_lines() {
        let mut network = ParticleNetwork::from_points(
            NetworkConfig::default(),
            vec![still(0.0, 0.0, 0.0), still(1.0, 0.0, 0.0)],
        );
        let frame = network.advance(0.016);

        assert_eq!(frame.layers.len(), 2);
        assert_eq!(frame.layers[0].primitive, Primitive::Points);
        assert_eq!(frame.layers[0].vertex_count(), 2);
        assert_eq!(frame.layers[1].primitive, Primitive::Lines);
        assert_eq!(frame.layers[1].vertex_count(), 2);
        assert_eq!(frame.layers[1].opacity, 0.15);
    }

    #[test]
    fn max_links_handles_small_sets() {
        let empty = ParticleNetwork::from_points(NetworkConfig::default(), Vec::new());
        assert_eq!(empty.max_links(), 0);

        let mut rng = StdRng::seed_from_u64(1);
        let full = ParticleNetwork::new(NetworkConfig::default(), &mut rng);
        assert_eq!(full.max_links(), 60 * 59 / 2);
    }
}
