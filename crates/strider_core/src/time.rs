//! Frame timing utilities.
//!
//! The host loop owns a [`TimeClock`] and calls `tick()` once per frame; the
//! resulting [`Time`] snapshot carries the delta the controls integrate with.
//!
//! # Example
//! ```rust,ignore
//! let mut clock = TimeClock::new();
//! loop {
//!     let time = clock.tick();
//!     controls.update(&mut camera, time.delta);
//! }
//! ```

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Upper bound on a single frame delta, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// A snapshot of timing information for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    /// Seconds elapsed since the previous frame, clamped to the clock's
    /// maximum so a stalled window does not teleport the camera.
    pub delta: f32,

    /// Total seconds elapsed since the clock started.
    pub elapsed: f64,

    /// Number of frames ticked so far (0 for the first frame).
    pub frame_count: u64,
}

impl Time {
    /// Instantaneous frames-per-second derived from `delta`.
    pub fn fps(&self) -> f32 {
        if self.delta > 0.0 {
            1.0 / self.delta
        } else {
            0.0
        }
    }
}

// ─── Clock ─────────────────────────────────────────────────────────────────

/// Stateful timer that produces [`Time`] snapshots.
pub struct TimeClock {
    start: Instant,
    last_tick: Instant,
    frame_count: u64,
    max_delta: f32,
}

impl TimeClock {
    /// Create a new clock, starting the epoch now.
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA)
    }

    /// Create a clock whose deltas never exceed `max_delta` seconds.
    pub fn with_max_delta(max_delta: f32) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_count: 0,
            max_delta,
        }
    }

    /// Advance by one frame.
    pub fn tick(&mut self) -> Time {
        let now = Instant::now();
        let time = Time {
            delta: (now - self.last_tick).as_secs_f32().min(self.max_delta),
            elapsed: (now - self.start).as_secs_f64(),
            frame_count: self.frame_count,
        };
        self.last_tick = now;
        self.frame_count += 1;
        time
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_counts_frames_and_clamps() {
        let mut clock = TimeClock::with_max_delta(0.0);
        let first = clock.tick();
        let second = clock.tick();
        assert_eq!(first.frame_count, 0);
        assert_eq!(second.frame_count, 1);
        assert_eq!(second.delta, 0.0);
        assert!(second.elapsed >= first.elapsed);
    }

    #[test]
    fn fps_of_zero_delta_is_zero() {
        assert_eq!(Time::default().fps(), 0.0);
        let t = Time { delta: 0.5, ..Default::default() };
        assert_eq!(t.fps(), 2.0);
    }
}
