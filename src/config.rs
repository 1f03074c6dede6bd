//! Tunables for every scene and page behavior.
//!
//! Defaults reproduce the shipped look of the site. A page may override any
//! subset by embedding JSON, e.g.
//!
//! ```json
//! { "network": { "count": 80, "link_distance": 2.0 } }
//! ```

use serde::Deserialize;

use crate::color::Rgb;
use crate::error::{Result, VizError};

/// Top-level configuration, one section per scene plus page behaviors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub network: NetworkConfig,
    pub field: FieldConfig,
    pub globe: GlobeConfig,
    pub page: PageConfig,
}

impl SiteConfig {
    /// Parse and validate a JSON override document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.field.validate()?;
        self.globe.validate()?;
        self.page.validate()
    }
}

/// Connected-particle network (the "suite" section of the page).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Number of points, fixed for the scene's lifetime.
    pub count: usize,
    /// Edge length of the cube points are spawned in.
    pub spawn_extent: f32,
    /// Width of the uniform range each velocity component is drawn from.
    pub max_speed: f32,
    /// Distance from the origin at which a velocity component reverses.
    pub half_extent: f32,
    /// Points strictly closer than this are linked.
    pub link_distance: f32,
    /// Y rotation added to the whole group per frame, in radians.
    pub spin: f32,
    pub camera_distance: f32,
    pub point_size: f32,
    pub point_opacity: f32,
    pub line_opacity: f32,
    pub color: Rgb,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            count: 60,
            spawn_extent: 10.0,
            max_speed: 0.02,
            half_extent: 5.0,
            link_distance: 2.5,
            spin: 0.001,
            camera_distance: 5.0,
            point_size: 0.1,
            point_opacity: 0.8,
            line_opacity: 0.15,
            color: Rgb::BLUE,
        }
    }
}

impl NetworkConfig {
    fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(VizError::invalid("network.count", "must be at least 1"));
        }
        positive("network.spawn_extent", self.spawn_extent)?;
        positive("network.half_extent", self.half_extent)?;
        positive("network.link_distance", self.link_distance)?;
        non_negative("network.max_speed", self.max_speed)?;
        positive("network.camera_distance", self.camera_distance)
    }
}

/// Full-page background point cloud.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub count: usize,
    pub extent: f32,
    pub point_size: f32,
    pub opacity: f32,
    pub palette: Vec<Rgb>,
    /// Y rotation per second of elapsed time.
    pub drift: f32,
    /// How far (radians per unit of pointer offset) the cloud leans toward the cursor.
    pub parallax: f32,
    /// Fraction of the remaining distance to the parallax target covered per frame.
    pub easing: f32,
    pub camera_distance: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 1200,
            extent: 25.0,
            point_size: 0.04,
            opacity: 0.6,
            palette: vec![Rgb::SAFFRON, Rgb::BLUE],
            drift: 0.05,
            parallax: 0.5,
            easing: 0.05,
            camera_distance: 5.0,
        }
    }
}

impl FieldConfig {
    fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(VizError::invalid("field.count", "must be at least 1"));
        }
        if self.palette.is_empty() {
            return Err(VizError::invalid("field.palette", "needs at least one color"));
        }
        positive("field.extent", self.extent)?;
        if !(0.0..=1.0).contains(&self.easing) {
            return Err(VizError::invalid("field.easing", "must be within [0, 1]"));
        }
        positive("field.camera_distance", self.camera_distance)
    }
}

/// One wireframe icosahedron shell of the globe.
#[derive(Debug, Clone, Deserialize)]
pub struct ShellConfig {
    pub radius: f32,
    pub detail: u32,
    pub color: Rgb,
    pub opacity: f32,
    /// Per-frame rotation increment around X, Y and Z.
    pub spin: [f32; 3],
}

/// Rotating wireframe globe (the "mission" section).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub shells: Vec<ShellConfig>,
    pub camera_distance: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            shells: vec![
                ShellConfig {
                    radius: 4.5,
                    detail: 2,
                    color: Rgb::BLUE,
                    opacity: 0.3,
                    spin: [0.001, 0.002, 0.0],
                },
                ShellConfig {
                    radius: 5.0,
                    detail: 1,
                    color: Rgb::SAFFRON,
                    opacity: 0.1,
                    spin: [0.0, -0.002, 0.0],
                },
            ],
            camera_distance: 8.0,
        }
    }
}

impl GlobeConfig {
    fn validate(&self) -> Result<()> {
        for shell in &self.shells {
            positive("globe.shells.radius", shell.radius)?;
            if shell.detail > 6 {
                return Err(VizError::invalid("globe.shells.detail", "must be at most 6"));
            }
        }
        positive("globe.camera_distance", self.camera_distance)
    }
}

/// Non-canvas page behaviors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Scroll offset in CSS pixels past which the navbar is styled as scrolled.
    pub navbar_threshold: f64,
    /// Visible fraction of an element that triggers its reveal.
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            navbar_threshold: 50.0,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

impl PageConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(VizError::invalid("page.reveal_threshold", "must be within [0, 1]"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(VizError::invalid(field, "must be a positive number"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(VizError::invalid(field, "must not be negative"))
    }
}
