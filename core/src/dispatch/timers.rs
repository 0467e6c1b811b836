use std::collections::BTreeMap;
use std::time::Duration;

use edgeline_types::Edge;

use super::command::PendingCommand;

/// Delayed commands ordered by `(deadline, sequence)`.
///
/// Entries with equal deadlines fire in the order they were scheduled.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: BTreeMap<(Duration, u64), PendingCommand>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Duration, command: PendingCommand) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((deadline, seq), command);
    }

    /// Remove every pending command matching `predicate`. Returns how many
    /// were removed.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&PendingCommand) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, command| !predicate(command));
        before - self.entries.len()
    }

    /// Remove the pending hide for `edge`, if any.
    pub fn cancel_hide(&mut self, edge: Edge) -> bool {
        self.cancel_where(|command| command.is_hide_for(edge)) > 0
    }

    /// Pop the earliest command whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, PendingCommand)> {
        let entry = self.entries.first_entry()?;
        if entry.key().0 > now {
            return None;
        }
        let ((deadline, _), command) = entry.remove_entry();
        Some((deadline, command))
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Deadline of the pending hide for `edge`
    pub fn hide_deadline(&self, edge: Edge) -> Option<Duration> {
        self.entries
            .iter()
            .find(|(_, command)| command.is_hide_for(edge))
            .map(|((deadline, _), _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
