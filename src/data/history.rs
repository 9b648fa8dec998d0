//! Disconnection history for watched tools.

use std::collections::{HashMap, VecDeque};

use super::liveness::Evaluation;
use super::tool::{ToolId, ToolStatus};

/// Maximum number of transitions kept per tool.
const MAX_HISTORY_SIZE: usize = 60;

/// A single status change of one tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub at: f64,
    pub from: ToolStatus,
    pub to: ToolStatus,
}

/// Tracks status transitions over time.
///
/// Disconnections stay visible here after the tool recovers, so the user
/// can tell a flaky marker from a steady one.
#[derive(Debug, Clone, Default)]
pub struct History {
    transitions: HashMap<ToolId, VecDeque<Transition>>,
    disconnects: HashMap<ToolId, u64>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transition for one tool.
    pub fn record(&mut self, id: ToolId, at: f64, from: ToolStatus, to: ToolStatus) {
        if from == to {
            return;
        }

        let entries = self.transitions.entry(id).or_default();
        entries.push_back(Transition { at, from, to });
        if entries.len() > MAX_HISTORY_SIZE {
            entries.pop_front();
        }

        if to == ToolStatus::Disconnected {
            *self.disconnects.entry(id).or_default() += 1;
        }
    }

    /// Record every transition found in a tick's evaluations.
    pub fn record_tick(&mut self, now: f64, evaluations: &[Evaluation]) {
        for eval in evaluations {
            self.record(eval.id, now, eval.previous, eval.status);
        }
    }

    /// Most recent transitions for a tool, oldest first.
    pub fn transitions(&self, id: ToolId) -> impl Iterator<Item = &Transition> {
        self.transitions.get(&id).into_iter().flatten()
    }

    /// Lifetime number of disconnections seen for a tool.
    pub fn disconnect_count(&self, id: ToolId) -> u64 {
        self.disconnects.get(&id).copied().unwrap_or(0)
    }

    /// Time the tool last went down, if it ever did.
    pub fn last_disconnect(&self, id: ToolId) -> Option<f64> {
        self.transitions
            .get(&id)?
            .iter()
            .rev()
            .find(|t| t.to == ToolStatus::Disconnected)
            .map(|t| t.at)
    }

    /// Drop everything recorded for a tool.
    pub fn forget(&mut self, id: ToolId) {
        self.transitions.remove(&id);
        self.disconnects.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_only_changes() {
        let mut history = History::new();
        let id = ToolId(1);
        history.record(id, 1.0, ToolStatus::Connected, ToolStatus::Connected);
        history.record(id, 2.0, ToolStatus::Connected, ToolStatus::Disconnected);
        history.record(id, 3.0, ToolStatus::Disconnected, ToolStatus::Connected);
        history.record(id, 4.0, ToolStatus::Connected, ToolStatus::Disconnected);

        assert_eq!(history.transitions(id).count(), 3);
        assert_eq!(history.disconnect_count(id), 2);
        assert_eq!(history.last_disconnect(id), Some(4.0));
    }

    #[test]
    fn test_buffer_is_bounded() {
        let mut history = History::new();
        let id = ToolId(7);
        for i in 0..(MAX_HISTORY_SIZE * 2) {
            let (from, to) = if i % 2 == 0 {
                (ToolStatus::Connected, ToolStatus::Disconnected)
            } else {
                (ToolStatus::Disconnected, ToolStatus::Connected)
            };
            history.record(id, i as f64, from, to);
        }
        assert_eq!(history.transitions(id).count(), MAX_HISTORY_SIZE);
        // The counter is not truncated with the buffer.
        assert_eq!(history.disconnect_count(id), MAX_HISTORY_SIZE as u64);
    }

    #[test]
    fn test_forget() {
        let mut history = History::new();
        let id = ToolId(2);
        history.record(id, 1.0, ToolStatus::Connected, ToolStatus::Disconnected);
        history.forget(id);
        assert_eq!(history.transitions(id).count(), 0);
        assert_eq!(history.disconnect_count(id), 0);
        assert!(history.last_disconnect(id).is_none());
    }
}
