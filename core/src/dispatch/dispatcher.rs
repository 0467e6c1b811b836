//! Single-writer owner of both edge indicators
//!
//! The dispatcher is the only place indicator state is mutated. It lives on
//! one thread, consumes [`Envelope`]s in arrival order, runs delayed commands
//! from its [`TimerQueue`], and advances animations once per frame.

use std::time::Duration;

use edgeline_types::{Edge, IndicatorConfig};

use super::command::{Envelope, PendingCommand};
use super::timers::TimerQueue;
use crate::indicator::EdgeIndicator;

/// Per-edge position in the `Idle → Animating → HideScheduled → Idle` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePhase {
    Idle,
    Animating,
    HideScheduled,
}

impl EdgePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgePhase::Idle => "idle",
            EdgePhase::Animating => "animating",
            EdgePhase::HideScheduled => "hide-scheduled",
        }
    }
}

/// Point-in-time view of one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSnapshot {
    pub edge: Edge,
    pub current_width: f32,
    pub target_width: f32,
    pub phase: EdgePhase,
    /// Fraction of the running animation consumed, None when settled
    pub progress: Option<f32>,
    /// Clock offset at which the pending hide fires
    pub hide_at: Option<Duration>,
}

/// Point-in-time view of both edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub taken_at: Duration,
    pub left: EdgeSnapshot,
    pub right: EdgeSnapshot,
}

impl IndicatorSnapshot {
    pub fn edge(&self, edge: Edge) -> &EdgeSnapshot {
        match edge {
            Edge::Left => &self.left,
            Edge::Right => &self.right,
        }
    }

    /// True when neither edge has any visible width
    pub fn is_blank(&self) -> bool {
        self.left.current_width == 0.0 && self.right.current_width == 0.0
    }
}

pub struct Dispatcher {
    indicators: [EdgeIndicator; 2],
    timers: TimerQueue,
    hide_delay: Duration,
    /// Latest clock offset observed; execution time never moves backwards
    now: Duration,
}

impl Dispatcher {
    pub fn new(config: &IndicatorConfig) -> Self {
        Self::with_timing(config.animation_duration(), config.hide_delay())
    }

    pub fn with_timing(animation: Duration, hide_delay: Duration) -> Self {
        Self {
            indicators: Edge::ALL.map(|edge| EdgeIndicator::new(edge, animation)),
            timers: TimerQueue::new(),
            hide_delay,
            now: Duration::ZERO,
        }
    }

    pub fn indicator(&self, edge: Edge) -> &EdgeIndicator {
        &self.indicators[edge.index()]
    }

    pub fn indicators(&self) -> &[EdgeIndicator; 2] {
        &self.indicators
    }

    pub fn hide_delay(&self) -> Duration {
        self.hide_delay
    }

    /// Consume one envelope from the command channel.
    ///
    /// Delayed commands that were already due when this envelope was posted
    /// run first, so a hide is never cancelled by a command posted after it
    /// should have fired.
    pub fn accept(&mut self, envelope: Envelope) {
        self.run_due(envelope.posted_at);

        match envelope.deadline {
            None => self.execute(envelope.command, envelope.posted_at),
            Some(deadline) => {
                if let PendingCommand::Hide { edge } = envelope.command {
                    // at most one pending hide per edge
                    self.timers.cancel_hide(edge);
                }
                tracing::trace!(
                    command = ?envelope.command,
                    deadline_ms = deadline.as_millis() as u64,
                    "Delayed command scheduled"
                );
                self.timers.schedule(deadline, envelope.command);
            }
        }
    }

    /// Run every delayed command due at or before `now`, in deadline order.
    /// Returns how many ran.
    pub fn run_due(&mut self, now: Duration) -> usize {
        let mut ran = 0;
        while let Some((deadline, command)) = self.timers.pop_due(now) {
            self.execute(command, deadline);
            ran += 1;
        }
        ran
    }

    /// Advance both animations to `now`. Returns `true` if either width
    /// changed and the overlay needs a redraw.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        let now = self.observe(now);
        let mut changed = false;
        for indicator in &mut self.indicators {
            changed |= indicator.advance_to(now);
        }
        changed
    }

    pub fn is_animating(&self) -> bool {
        self.indicators.iter().any(EdgeIndicator::is_animating)
    }

    /// Earliest pending delayed command
    pub fn next_wakeup(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn phase(&self, edge: Edge) -> EdgePhase {
        if self.indicator(edge).is_animating() {
            EdgePhase::Animating
        } else if self.timers.hide_deadline(edge).is_some() {
            EdgePhase::HideScheduled
        } else {
            EdgePhase::Idle
        }
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        let edge_snapshot = |edge: Edge| {
            let indicator = self.indicator(edge);
            EdgeSnapshot {
                edge,
                current_width: indicator.current_width(),
                target_width: indicator.target_width(),
                phase: self.phase(edge),
                progress: indicator.session().map(|session| session.progress()),
                hide_at: self.timers.hide_deadline(edge),
            }
        };
        IndicatorSnapshot {
            taken_at: self.now,
            left: edge_snapshot(Edge::Left),
            right: edge_snapshot(Edge::Right),
        }
    }

    /// Keep both widths within `max_width`, e.g. after the surface shrank.
    /// Pending hides and running animations are left in place.
    pub fn clamp_widths(&mut self, max_width: f32) -> bool {
        let now = self.now;
        let mut changed = false;
        for indicator in &mut self.indicators {
            changed |= indicator.clamp_to(max_width, now);
        }
        if changed {
            tracing::debug!(max_width, "Indicator widths clamped to surface");
        }
        changed
    }

    fn observe(&mut self, at: Duration) -> Duration {
        self.now = self.now.max(at);
        self.now
    }

    fn execute(&mut self, command: PendingCommand, at: Duration) {
        let now = self.observe(at);
        let hide_delay = self.hide_delay;

        match command {
            PendingCommand::SetWidth { edge, width } => {
                let indicator = &mut self.indicators[edge.index()];
                indicator.advance_to(now);
                let started = indicator.set_target(width, now);

                self.timers.cancel_hide(edge);
                self.timers
                    .schedule(now + hide_delay, PendingCommand::hide(edge));

                tracing::debug!(
                    %edge,
                    width,
                    from = indicator.current_width(),
                    started,
                    "Indicator width set"
                );
            }
            PendingCommand::Hide { edge } => {
                self.timers.cancel_hide(edge);

                let indicator = &mut self.indicators[edge.index()];
                indicator.advance_to(now);
                let started = indicator.set_target(0.0, now);

                tracing::debug!(%edge, from = indicator.current_width(), started, "Indicator hidden");
            }
        }
    }
}
