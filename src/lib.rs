//! Decorative canvas visuals and page behaviors for the marketing site.
//!
//! The scenes ([`ParticleField`], [`Globe`], [`ParticleNetwork`]) are plain
//! Rust state advanced one frame at a time and compile on any target. The
//! browser glue that mounts them on WebGL2 canvases lives in the wasm32-only
//! `wasm` module.

pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod frame;
pub mod globe;
pub mod network;
pub mod page;
pub mod theme;

pub use config::SiteConfig;
pub use error::{Result, VizError};
pub use field::ParticleField;
pub use frame::{RenderSurface, RenderableFrame, Scene};
pub use globe::Globe;
pub use network::{ParticleNetwork, Point};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::SiteConfig;
    use crate::error::VizError;

    mod host;
    mod page;
    mod render;

    /// Id of an optional `<script type="application/json">` holding config overrides.
    const CONFIG_ELEMENT: &str = "visuals-config";

    impl From<VizError> for JsValue {
        fn from(err: VizError) -> Self {
            JsValue::from_str(&err.to_string())
        }
    }

    pub(crate) fn js_err(value: JsValue) -> VizError {
        VizError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // A second init (e.g. hot reload) just keeps the existing logger.
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let config = load_config(&document)?;

        page::install(&window, &document, &config.page)?;
        host::start_all(&window, &document, &config)?;
        Ok(())
    }

    fn load_config(document: &web_sys::Document) -> Result<SiteConfig, VizError> {
        match document
            .get_element_by_id(CONFIG_ELEMENT)
            .and_then(|el| el.text_content())
        {
            Some(json) if !json.trim().is_empty() => {
                log::info!("using config overrides from #{CONFIG_ELEMENT}");
                SiteConfig::from_json(&json)
            }
            _ => Ok(SiteConfig::default()),
        }
    }
}
