//! Light/dark theme preference.
//!
//! The preference is a single string under the `theme` key of some
//! key-value store (`localStorage` in the browser). Anything missing or
//! unrecognized reads as [`Theme::Light`].

use std::fmt;

/// Storage key holding the theme preference.
pub const STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistent string storage for the preference.
pub trait ThemeStore {
    fn load(&self, key: &str) -> Option<String>;

    fn save(&mut self, key: &str, value: &str);
}

/// The active theme backed by a store.
///
/// The stored string is kept verbatim for the `data-theme` attribute, even
/// when it is not a known theme. Toggling follows the page's rule: `light`
/// becomes `dark`, anything else becomes `light`.
#[derive(Debug)]
pub struct ThemeSwitch<S> {
    store: S,
    value: String,
}

impl<S: ThemeStore> ThemeSwitch<S> {
    /// Read the saved preference, falling back to light.
    pub fn load(store: S) -> Self {
        let value = store
            .load(STORAGE_KEY)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| Theme::Light.as_str().to_string());
        Self { store, value }
    }

    /// The theme styling should apply; unknown values read as light.
    pub fn current(&self) -> Theme {
        Theme::parse(&self.value).unwrap_or_default()
    }

    /// Value for the root `data-theme` attribute.
    pub fn attribute(&self) -> &str {
        &self.value
    }

    /// Flip the theme and persist the new value.
    pub fn toggle(&mut self) -> Theme {
        let next = match Theme::parse(&self.value) {
            Some(Theme::Light) => Theme::Dark,
            _ => Theme::Light,
        };
        self.value = next.as_str().to_string();
        self.store.save(STORAGE_KEY, next.as_str());
        log::debug!("theme switched to {next}");
        next
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
