use std::time::Duration;

use edgeline_types::Edge;

use super::session::AnimationSession;

/// Convert a duration to fractional milliseconds without going through
/// `as_secs_f32` (keeps whole-millisecond ticks exact).
#[inline]
fn millis_f32(d: Duration) -> f32 {
    d.as_micros() as f32 / 1000.0
}

/// Animated width of the indicator at one screen edge.
///
/// The width approaches its target linearly. Every effective target change
/// recomputes `rate_per_ms` from the *current* width so that each run takes
/// the configured duration no matter how far it has to travel.
#[derive(Debug, Clone)]
pub struct EdgeIndicator {
    edge: Edge,
    current_width: f32,
    target_width: f32,
    rate_per_ms: f32,
    duration: Duration,
    session: Option<AnimationSession>,
}

impl EdgeIndicator {
    pub fn new(edge: Edge, duration: Duration) -> Self {
        Self {
            edge,
            current_width: 0.0,
            target_width: 0.0,
            rate_per_ms: 0.0,
            duration,
            session: None,
        }
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn is_mirrored(&self) -> bool {
        self.edge.is_mirrored()
    }

    pub fn current_width(&self) -> f32 {
        self.current_width
    }

    pub fn target_width(&self) -> f32 {
        self.target_width
    }

    pub fn rate_per_ms(&self) -> f32 {
        self.rate_per_ms
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn session(&self) -> Option<&AnimationSession> {
        self.session.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    /// Start animating toward `width`.
    ///
    /// Negative and non-finite widths clamp to 0. Setting the target that is
    /// already in effect is a no-op and keeps any running session intact.
    /// Returns `true` if a new session was started.
    pub fn set_target(&mut self, width: f32, now: Duration) -> bool {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        if width == self.target_width {
            return false;
        }

        self.target_width = width;

        if self.duration.is_zero() {
            self.snap_to(width);
            return false;
        }

        self.rate_per_ms = (self.current_width - width).abs() / millis_f32(self.duration);
        self.session = Some(AnimationSession::new(
            now,
            self.duration,
            self.current_width,
            width,
        ));
        true
    }

    /// Advance the width by `rate_per_ms * elapsed`, never crossing the target.
    ///
    /// Returns `true` if the width changed. Once the target is reached the
    /// session ends and further ticks are no-ops until a new target is set.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if elapsed.is_zero() {
            return false;
        }

        let before = self.current_width;
        session.elapsed += elapsed;

        if session.is_due() {
            // Snap on the final frame so float drift never stretches the run
            self.current_width = self.target_width;
        } else {
            let step = self.rate_per_ms * millis_f32(elapsed);
            self.current_width = if self.current_width < self.target_width {
                (self.current_width + step).min(self.target_width)
            } else {
                (self.current_width - step).max(self.target_width)
            };
        }

        if self.current_width == self.target_width {
            self.session = None;
        }

        self.current_width != before
    }

    /// Tick by however much time passed since the last applied tick.
    pub fn advance_to(&mut self, now: Duration) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let elapsed = now.saturating_sub(session.last_tick());
        self.tick(elapsed)
    }

    /// Limit both widths to `max_width`, e.g. after the surface shrank.
    ///
    /// Only values above the limit change. A running session keeps its end
    /// time and continues from the clamped width toward the clamped target.
    /// Returns `true` if anything changed.
    pub fn clamp_to(&mut self, max_width: f32, now: Duration) -> bool {
        let max_width = if max_width.is_finite() { max_width.max(0.0) } else { 0.0 };
        if self.current_width <= max_width && self.target_width <= max_width {
            return false;
        }

        self.current_width = self.current_width.min(max_width);
        self.target_width = self.target_width.min(max_width);

        let remaining = self
            .session
            .map(|session| session.ends_at().saturating_sub(now))
            .unwrap_or_default();
        if self.current_width == self.target_width || remaining.is_zero() {
            self.current_width = self.target_width;
            self.rate_per_ms = 0.0;
            self.session = None;
        } else {
            self.rate_per_ms =
                (self.current_width - self.target_width).abs() / millis_f32(remaining);
            self.session = Some(AnimationSession::new(
                now,
                remaining,
                self.current_width,
                self.target_width,
            ));
        }
        true
    }

    /// Jump to `width` without animating.
    pub fn snap_to(&mut self, width: f32) {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.current_width = width;
        self.target_width = width;
        self.rate_per_ms = 0.0;
        self.session = None;
    }
}
