use std::time::Duration;

use edgeline_types::Edge;

/// A request to change one edge indicator.
///
/// Commands are immutable values; the dispatcher consumes each exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingCommand {
    /// Animate the edge toward `width` pixels (0 hides it)
    SetWidth { edge: Edge, width: f32 },
    /// Animate the edge back to zero width
    Hide { edge: Edge },
}

impl PendingCommand {
    /// Build a `SetWidth` from an integer pixel width, clamping negatives to 0.
    pub fn set_width(edge: Edge, width_px: i32) -> Self {
        Self::SetWidth {
            edge,
            width: width_px.max(0) as f32,
        }
    }

    pub fn hide(edge: Edge) -> Self {
        Self::Hide { edge }
    }

    pub fn edge(&self) -> Edge {
        match *self {
            Self::SetWidth { edge, .. } | Self::Hide { edge } => edge,
        }
    }

    pub fn is_hide_for(&self, edge: Edge) -> bool {
        matches!(*self, Self::Hide { edge: e } if e == edge)
    }
}

/// A command stamped with the producer-side clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub command: PendingCommand,
    /// Clock offset at which the producer posted the command
    pub posted_at: Duration,
    /// Set for delayed posts: the command must not run before this offset
    pub deadline: Option<Duration>,
}

impl Envelope {
    pub fn immediate(command: PendingCommand, posted_at: Duration) -> Self {
        Self {
            command,
            posted_at,
            deadline: None,
        }
    }

    pub fn delayed(command: PendingCommand, posted_at: Duration, delay: Duration) -> Self {
        Self {
            command,
            posted_at,
            deadline: Some(posted_at + delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_width_clamps_negative_pixels() {
        assert_eq!(
            PendingCommand::set_width(Edge::Left, -20),
            PendingCommand::SetWidth {
                edge: Edge::Left,
                width: 0.0
            }
        );
    }

    #[test]
    fn hide_matches_only_its_edge() {
        let hide = PendingCommand::hide(Edge::Right);
        assert!(hide.is_hide_for(Edge::Right));
        assert!(!hide.is_hide_for(Edge::Left));
        assert!(!PendingCommand::set_width(Edge::Right, 4).is_hide_for(Edge::Right));
    }

    #[test]
    fn delayed_envelope_deadline() {
        let env = Envelope::delayed(
            PendingCommand::hide(Edge::Left),
            Duration::from_millis(30),
            Duration::from_millis(700),
        );
        assert_eq!(env.deadline, Some(Duration::from_millis(730)));
    }
}
