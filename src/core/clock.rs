//! Converts host frame timestamps into simulation deltas.
//!
//! The simulation never reads the wall clock; the host samples `Instant::now()`
//! once per frame and feeds it through a [`FrameClock`].

use std::time::Instant;

/// Clamp a raw delta to `[0, max_dt]`.
///
/// NaN and negative values become 0 so a stalled or misbehaving host cannot
/// push the physics backwards or blow it up.
pub fn sanitize_dt(dt: f64, max_dt: f64) -> f64 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(max_dt)
    }
}

/// Tracks the previous frame timestamp.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_dt: f64,
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        Self { last: None, max_dt }
    }

    /// Seconds since the previous call, clamped. The first call returns 0.
    pub fn delta(&mut self, now: Instant) -> f64 {
        let dt = match self.last {
            // saturating: a non-monotonic `now` yields zero rather than panicking
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(now);
        sanitize_dt(dt, self.max_dt)
    }

    /// Re-anchor at `now` so the next delta starts from here.
    pub fn restart(&mut self, now: Instant) {
        self.last = Some(now);
    }
}
