//! Tracked-object sources.
//!
//! The watchdog core never talks to tracking hardware directly. A
//! [`ToolSource`] turns some external feed (an in-process channel, a TCP
//! stream, a polled file) into [`ToolUpdate`]s, and answers the two questions
//! liveness evaluation needs through [`ToolDirectory`]: what is this object
//! called, and does it still exist.

mod catalog;
mod channel;
mod file;
mod message;
mod stream;

pub use catalog::Catalog;
pub use channel::ChannelSource;
pub use file::FileSource;
pub use message::{SerializedToolState, TrackerMessage, TrackerSnapshot};
pub use stream::StreamSource;

use std::fmt::Debug;

use crate::data::ToolRef;

/// Name and validity lookup for tracked objects.
pub trait ToolDirectory {
    /// Current display name, if the object is known.
    fn display_name(&self, tool: &ToolRef) -> Option<String>;

    /// False once the object has been removed from the feed.
    fn is_valid(&self, tool: &ToolRef) -> bool;
}

/// What happened to a tracked object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// The object reported new data.
    Modified,
    /// The object no longer exists.
    Removed,
}

/// A notification for one watched object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolUpdate {
    pub tool: ToolRef,
    pub kind: UpdateKind,
}

impl ToolUpdate {
    pub fn modified(tool: impl Into<String>) -> Self {
        Self {
            tool: ToolRef::new(tool),
            kind: UpdateKind::Modified,
        }
    }

    pub fn removed(tool: impl Into<String>) -> Self {
        Self {
            tool: ToolRef::new(tool),
            kind: UpdateKind::Removed,
        }
    }
}

/// Trait for receiving tracked-object updates from various feeds.
///
/// Updates are only reported for objects that are currently watched; see
/// [`ToolSource::watch`].
///
/// # Example
///
/// ```
/// use tool_watchdog::{ChannelSource, ToolRef, ToolSource, TrackerMessage};
///
/// let (tx, mut source) = ChannelSource::create("example");
/// source.watch(&ToolRef::new("Stylus"));
/// tx.send(TrackerMessage::updated("Stylus")).unwrap();
/// assert_eq!(source.poll().len(), 1);
/// ```
pub trait ToolSource: Send + Debug {
    /// Drain pending updates for watched objects. Never blocks.
    fn poll(&mut self) -> Vec<ToolUpdate>;

    /// Everything the source has learned about tracked objects so far.
    fn catalog(&self) -> &Catalog;

    fn catalog_mut(&mut self) -> &mut Catalog;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the last error the source ran into, if any.
    fn error(&self) -> Option<String>;

    /// Name and validity lookups backed by the catalog.
    fn directory(&self) -> &dyn ToolDirectory {
        self.catalog()
    }

    /// Objects that could be watched, for the add-tool picker.
    fn candidates(&self) -> Vec<(ToolRef, String)> {
        self.catalog().candidates()
    }

    /// Subscribe to updates for `tool`. Subscriptions are counted, so two
    /// monitors watching the same object each hold one.
    fn watch(&mut self, tool: &ToolRef) {
        self.catalog_mut().watch(tool);
    }

    /// Release one subscription for `tool`.
    fn unwatch(&mut self, tool: &ToolRef) {
        self.catalog_mut().unwatch(tool);
    }
}
