//! Liveness evaluation.
//!
//! A tool is CONNECTED while `now - last_seen < threshold` and its tracked
//! object still exists. Evaluation rewrites only the derived status and
//! elapsed fields; `last_seen` is owned by the update path.

use tracing::debug;

use super::registry::Registry;
use super::tool::{ToolId, ToolStatus};
use crate::source::ToolDirectory;

/// Outcome of evaluating one tool on a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub id: ToolId,
    /// Row of the tool at the time of the tick.
    pub index: usize,
    pub previous: ToolStatus,
    pub status: ToolStatus,
    /// Seconds since the last update, only when disconnected.
    pub elapsed: Option<f64>,
    /// The tracked object is gone rather than merely silent.
    pub invalidated: bool,
}

impl Evaluation {
    /// CONNECTED -> DISCONNECTED on this tick.
    pub fn went_down(&self) -> bool {
        self.previous == ToolStatus::Connected && self.status == ToolStatus::Disconnected
    }

    /// DISCONNECTED -> CONNECTED on this tick.
    pub fn came_back(&self) -> bool {
        self.previous == ToolStatus::Disconnected && self.status == ToolStatus::Connected
    }
}

/// Classify a single timestamp against the staleness threshold.
pub fn classify(last_seen: f64, now: f64, threshold: f64) -> (ToolStatus, Option<f64>) {
    let elapsed = (now - last_seen).max(0.0);
    if elapsed >= threshold {
        (ToolStatus::Disconnected, Some(elapsed))
    } else {
        (ToolStatus::Connected, None)
    }
}

/// Recompute status for every tool in registry order.
pub fn evaluate(
    registry: &mut Registry,
    now: f64,
    threshold: f64,
    directory: &dyn ToolDirectory,
) -> Vec<Evaluation> {
    registry
        .iter_mut()
        .enumerate()
        .map(|(index, tool)| {
            let previous = tool.status;
            let invalidated = !tool.valid || !directory.is_valid(tool.tool());

            let (status, elapsed) = if invalidated {
                (ToolStatus::Disconnected, Some((now - tool.last_seen).max(0.0)))
            } else {
                classify(tool.last_seen, now, threshold)
            };

            tool.status = status;
            tool.elapsed = elapsed;

            if previous != status {
                debug!(tool = %tool.tool(), ?previous, ?status, invalidated, "status changed");
            }

            Evaluation {
                id: tool.id(),
                index,
                previous,
                status,
                elapsed,
                invalidated,
            }
        })
        .collect()
}
