use std::time::Duration;

/// One interpolation run of a single edge indicator.
///
/// A session is created by every effective target change and dropped once the
/// indicator reaches its target. Replacing a running session starts the new
/// one from the indicator's current width, never from either endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSession {
    /// Clock offset at which the session started
    pub started_at: Duration,
    /// Fixed run length
    pub duration: Duration,
    pub start_width: f32,
    pub end_width: f32,
    /// Time consumed by ticks so far
    pub elapsed: Duration,
}

impl AnimationSession {
    pub fn new(started_at: Duration, duration: Duration, start_width: f32, end_width: f32) -> Self {
        Self {
            started_at,
            duration,
            start_width,
            end_width,
            elapsed: Duration::ZERO,
        }
    }

    /// Clock offset of the last applied tick
    pub fn last_tick(&self) -> Duration {
        self.started_at + self.elapsed
    }

    /// Clock offset at which the session is due to finish
    pub fn ends_at(&self) -> Duration {
        self.started_at + self.duration
    }

    /// Whether the ticks applied so far cover the whole run
    pub fn is_due(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Fraction of the run consumed, in `0.0..=1.0`
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}
