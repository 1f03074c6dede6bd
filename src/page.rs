//! Scroll-driven page styling: the sticky navbar and reveal-on-scroll.

use crate::config::PageConfig;

/// Class added to the navbar once the page is scrolled.
pub const NAVBAR_SCROLLED_CLASS: &str = "scrolled";
/// Elements carrying this class are revealed on first sight.
pub const REVEAL_SELECTOR: &str = ".fade-up";
/// Class that plays the reveal transition.
pub const REVEAL_VISIBLE_CLASS: &str = "visible";

/// Whether the navbar should use its scrolled style at `scroll_y`.
pub fn navbar_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Tracks which reveal targets have already fired.
///
/// Reveals are one-shot: once an element has become visible it is dropped
/// from observation and never animates again.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    revealed: Vec<bool>,
}

impl RevealTracker {
    pub fn new(targets: usize) -> Self {
        Self {
            revealed: vec![false; targets],
        }
    }

    /// Record a visibility report for `target`. Returns `true` exactly once
    /// per target: on its first intersecting report.
    pub fn observe(&mut self, target: usize, intersecting: bool) -> bool {
        match self.revealed.get_mut(target) {
            Some(seen) if intersecting && !*seen => {
                *seen = true;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.revealed.iter().filter(|seen| !**seen).count()
    }
}

/// Observer options for reveal, from the page config.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl From<&PageConfig> for RevealOptions {
    fn from(config: &PageConfig) -> Self {
        Self {
            threshold: config.reveal_threshold,
            root_margin: config.reveal_root_margin.clone(),
        }
    }
}
