use std::time::{Duration, Instant};

use log::warn;

/// Per-frame elapsed time source.
///
/// Each call to [`FrameClock::delta`] returns the seconds since the previous
/// call (or since construction for the first frame).
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_tick: Instant,
    elapsed: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_tick: now,
            elapsed: Duration::ZERO,
        }
    }

    pub fn delta(&mut self) -> f32 {
        self.delta_at(Instant::now())
    }

    /// Like [`FrameClock::delta`] with an explicit timestamp. A timestamp older
    /// than the previous tick yields zero instead of going backwards.
    pub fn delta_at(&mut self, now: Instant) -> f32 {
        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = self.last_tick.max(now);
        self.elapsed += delta;
        delta.as_secs_f32()
    }

    /// Total time handed out through `delta` so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamps a frame delta to a usable value: negative, NaN and infinite deltas
/// become zero.
pub fn sanitize_delta(delta_seconds: f32) -> f32 {
    if delta_seconds.is_finite() && delta_seconds >= 0.0 {
        delta_seconds
    } else {
        warn!("Ignoring invalid frame delta: {}", delta_seconds);
        0.0
    }
}
