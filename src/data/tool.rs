//! Watched tool model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an external tracked object (transform, marker, sensor).
///
/// The core never looks inside the object; it only compares identities and
/// asks a [`ToolDirectory`](crate::source::ToolDirectory) for its name and
/// validity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolRef(String);

impl ToolRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Stable id of a registry entry. Unlike a row index it survives reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ToolId(pub(crate) u64);

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Liveness of a watched tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ToolStatus {
    Connected,
    Disconnected,
}

impl ToolStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            ToolStatus::Connected => "OK",
            ToolStatus::Disconnected => "LOST",
        }
    }
}

/// One monitored object and its last known liveness.
#[derive(Debug, Clone)]
pub struct WatchedTool {
    id: ToolId,
    tool: ToolRef,
    name: String,
    pub(crate) label: String,
    pub(crate) alert_enabled: bool,
    pub(crate) last_seen: f64,
    pub(crate) status: ToolStatus,
    pub(crate) elapsed: Option<f64>,
    pub(crate) valid: bool,
}

impl WatchedTool {
    pub(crate) fn new(id: ToolId, tool: ToolRef, name: String, label: String, now: f64) -> Self {
        Self {
            id,
            tool,
            name,
            label,
            alert_enabled: true,
            last_seen: now,
            status: ToolStatus::Connected,
            elapsed: None,
            valid: true,
        }
    }

    pub fn id(&self) -> ToolId {
        self.id
    }

    pub fn tool(&self) -> &ToolRef {
        &self.tool
    }

    /// Display name of the underlying object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// User-editable label, independent of the object's name.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn alert_enabled(&self) -> bool {
        self.alert_enabled
    }

    /// Time of the last update notification, in monitor clock seconds.
    pub fn last_seen(&self) -> f64 {
        self.last_seen
    }

    pub fn status(&self) -> ToolStatus {
        self.status
    }

    /// Seconds since the last update, set only while disconnected.
    pub fn elapsed(&self) -> Option<f64> {
        self.elapsed
    }

    /// False once the tracked object has been reported as gone.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Record an update notification: optimistic flip to connected.
    pub(crate) fn mark_seen(&mut self, now: f64) {
        self.last_seen = now;
        self.valid = true;
        self.status = ToolStatus::Connected;
        self.elapsed = None;
    }
}
