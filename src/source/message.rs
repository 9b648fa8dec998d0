//! Wire types for tracker feeds.
//!
//! Stream feeds carry one [`TrackerMessage`] per line:
//!
//! ```text
//! {"event":"updated","id":"StylusToTracker","name":"Stylus"}
//! {"event":"removed","id":"StylusToTracker"}
//! ```
//!
//! File feeds hold a whole [`TrackerSnapshot`] that the tracker rewrites.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single change reported by a tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackerMessage {
    /// The object produced new data.
    Updated {
        id: String,
        /// Display name, if different from the id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// The object was deleted.
    Removed { id: String },
}

impl TrackerMessage {
    pub fn updated(id: impl Into<String>) -> Self {
        TrackerMessage::Updated {
            id: id.into(),
            name: None,
        }
    }

    pub fn removed(id: impl Into<String>) -> Self {
        TrackerMessage::Removed { id: id.into() }
    }

    pub fn id(&self) -> &str {
        match self {
            TrackerMessage::Updated { id, .. } | TrackerMessage::Removed { id } => id,
        }
    }
}

/// Full tracker state keyed by object id.
pub type TrackerSnapshot = BTreeMap<String, SerializedToolState>;

/// State of one object in a [`TrackerSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedToolState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tracker-side time (or sequence number) of the latest data.
    /// Only increases are significant.
    pub updated: f64,
}
