//! Frame timing driven by `requestAnimationFrame` timestamps.
//!
//! The browser hands every animation callback a high resolution timestamp in
//! milliseconds. `FrameClock` turns those into elapsed/delta seconds and a
//! frame counter, so scenes never read a wall clock themselves.

/// Accumulates frame timestamps into elapsed and delta time.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    start_ms: Option<f64>,
    last_ms: f64,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_ms`. Returns `(elapsed, delta)` in seconds.
    ///
    /// The first tick starts the clock and reports a zero delta. Timestamps
    /// that go backwards also yield a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> (f32, f32) {
        let start = *self.start_ms.get_or_insert(now_ms);
        if self.frame_count == 0 {
            self.last_ms = now_ms;
        }

        self.delta_secs = ((now_ms - self.last_ms).max(0.0) / 1000.0) as f32;
        self.elapsed_secs = ((now_ms - start).max(0.0) / 1000.0) as f32;
        self.last_ms = self.last_ms.max(now_ms);
        self.frame_count += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }
}
