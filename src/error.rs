//! Error types for the site visuals.
//!
//! Only configuration loading and browser/WebGL setup can fail. Once a scene is
//! running, stepping it is infallible. A missing container element is not an
//! error: the scene is simply skipped.

use thiserror::Error;

/// Everything that can go wrong while configuring or starting the visuals.
#[derive(Debug, Error)]
pub enum VizError {
    /// The JSON configuration could not be parsed.
    #[error("failed to parse visuals config: {0}")]
    Config(#[from] serde_json::Error),
    /// A configuration value is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    /// A browser API call failed or returned something unexpected.
    #[error("browser error: {0}")]
    Js(String),
    /// WebGL context, shader or buffer setup failed.
    #[error("WebGL error: {0}")]
    Gl(String),
}

impl VizError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        VizError::Invalid { field, reason }
    }
}

pub type Result<T> = std::result::Result<T, VizError>;

/// Logs the first error of a long-running loop and drops the rest, so a
/// failure that repeats every frame does not flood the console.
#[derive(Debug, Default)]
pub struct ReportOnce {
    reported: bool,
}

impl ReportOnce {
    /// Returns whether `err` was logged.
    pub fn report(&mut self, err: &VizError) -> bool {
        if self.reported {
            return false;
        }
        log::error!("{err}");
        self.reported = true;
        true
    }
}
