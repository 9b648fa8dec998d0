//! Error types for watchdog operations.
//!
//! Every variant is recoverable: callers surface it to the user (or ignore
//! it) and monitoring of the remaining tools carries on.

use thiserror::Error;

/// Errors reported by the registry, monitors and the monitor set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchdogError {
    /// The tracked object is already watched by this monitor.
    #[error("tool already watched: {0}")]
    DuplicateTool(String),

    /// An index-based accessor was given a row that does not exist.
    #[error("index {index} out of range for {len} tools")]
    IndexOutOfRange { index: usize, len: usize },

    /// No watched tool matches the given stable id or identity.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The external tracked object no longer exists.
    #[error("tracked object no longer available: {0}")]
    InvalidatedReference(String),

    /// An operation was requested while no monitor is selected.
    #[error("no active monitor")]
    NoActiveMonitor,

    /// A refresh interval of zero was requested.
    #[error("refresh interval must be positive")]
    InvalidInterval,
}

pub type Result<T> = std::result::Result<T, WatchdogError>;
