//! Rotating wireframe globe built from subdivided icosahedra.

use std::collections::{BTreeSet, HashMap};

use glam::Vec3;

use crate::camera::Camera;
use crate::config::{GlobeConfig, ShellConfig};
use crate::frame::{Layer, RenderableFrame, Scene, Shade};

const PHI: f32 = 1.618_034;

#[rustfmt::skip]
const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0], [1.0, PHI, 0.0], [-1.0, -PHI, 0.0], [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI], [0.0, 1.0, PHI], [0.0, -1.0, -PHI], [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0], [PHI, 0.0, 1.0], [-PHI, 0.0, -1.0], [-PHI, 0.0, 1.0],
];

#[rustfmt::skip]
const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// A sphere approximated by a subdivided icosahedron, kept as unique edges.
#[derive(Debug, Clone)]
pub struct WireSphere {
    pub vertices: Vec<Vec3>,
    /// Vertex index pairs, lower index first, no duplicates.
    pub edges: Vec<(u32, u32)>,
}

impl WireSphere {
    /// Subdivide every icosahedron face into `(detail + 1)^2` triangles and
    /// push the vertices out to `radius`.
    ///
    /// Grid points are keyed by their barycentric weights over the original
    /// corners, so points on a shared face edge are welded exactly.
    pub fn icosahedron(radius: f32, detail: u32) -> Self {
        let f = detail + 1;
        let mut index_of: HashMap<Vec<(u32, u32)>, u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut edges = BTreeSet::new();

        let mut vertex = |weights: [(u32, u32); 3]| -> u32 {
            let mut key: Vec<(u32, u32)> = weights.into_iter().filter(|&(_, w)| w > 0).collect();
            key.sort_unstable();
            *index_of.entry(key).or_insert_with(|| {
                let sum = weights.iter().fold(Vec3::ZERO, |acc, &(corner, w)| {
                    acc + Vec3::from_array(ICOSAHEDRON_VERTICES[corner as usize]) * w as f32
                });
                vertices.push(sum.normalize() * radius);
                (vertices.len() - 1) as u32
            })
        };

        for [a, b, c] in ICOSAHEDRON_FACES {
            let mut point = |i: u32, j: u32| vertex([(a, f - i - j), (b, i), (c, j)]);
            let mut triangles = Vec::new();
            for i in 0..f {
                for j in 0..f - i {
                    triangles.push([point(i, j), point(i + 1, j), point(i, j + 1)]);
                    if i + j + 2 <= f {
                        triangles.push([point(i + 1, j), point(i + 1, j + 1), point(i, j + 1)]);
                    }
                }
            }
            for [p, q, r] in triangles {
                for (u, v) in [(p, q), (q, r), (r, p)] {
                    edges.insert((u.min(v), u.max(v)));
                }
            }
        }

        Self {
            vertices,
            edges: edges.into_iter().collect(),
        }
    }

    /// Flat segment endpoints, six floats per edge.
    pub fn segments(&self) -> Vec<f32> {
        self.edges
            .iter()
            .flat_map(|&(u, v)| {
                let a = self.vertices[u as usize];
                let b = self.vertices[v as usize];
                [a.x, a.y, a.z, b.x, b.y, b.z]
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Shell {
    config: ShellConfig,
    segments: Vec<f32>,
    rotation: Vec3,
}

/// Concentric wireframe shells, each spinning at its own constant rate.
#[derive(Debug, Clone)]
pub struct Globe {
    shells: Vec<Shell>,
    camera: Camera,
}

impl Globe {
    pub fn new(config: GlobeConfig) -> Self {
        let shells = config
            .shells
            .into_iter()
            .map(|shell| Shell {
                segments: WireSphere::icosahedron(shell.radius, shell.detail).segments(),
                rotation: Vec3::ZERO,
                config: shell,
            })
            .collect();
        Self {
            shells,
            camera: Camera::new(config.camera_distance, 1, 1),
        }
    }

    /// Apply one frame of spin to every shell.
    pub fn step(&mut self) {
        for shell in &mut self.shells {
            shell.rotation += Vec3::from_array(shell.config.spin);
        }
    }

    pub fn rotations(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.shells.iter().map(|s| s.rotation)
    }
}

impl Scene for Globe {
    fn advance(&mut self, _dt: f32) -> RenderableFrame<'_> {
        self.step();
        let layers = self
            .shells
            .iter()
            .map(|shell| {
                Layer::lines(&shell.segments, Shade::Uniform(shell.config.color))
                    .with_opacity(shell.config.opacity)
                    .with_rotation(shell.rotation)
            })
            .collect();
        RenderableFrame { layers }
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}
