//! Channel-based tool source.
//!
//! Receives tracker messages via a tokio mpsc channel. This is the way to
//! feed the watchdog from another part of the same process, such as a
//! tracking SDK callback or the built-in demo generator.

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::warn;

use super::{Catalog, ToolSource, ToolUpdate, TrackerMessage};

/// A tool source that receives tracker messages via a channel.
///
/// # Example
///
/// ```
/// use tool_watchdog::ChannelSource;
///
/// // Create a channel pair
/// let (tx, source) = ChannelSource::create("optical tracker");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<TrackerMessage>,
    catalog: Catalog,
    description: String,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of an unbounded channel
    /// * `source_description` - A description of where messages come from
    pub fn new(receiver: mpsc::UnboundedReceiver<TrackerMessage>, source_description: &str) -> Self {
        Self {
            receiver,
            catalog: Catalog::new(),
            description: format!("channel: {}", source_description),
            disconnected: false,
        }
    }

    /// Create a channel pair. Returns (sender, source).
    pub fn create(source_description: &str) -> (mpsc::UnboundedSender<TrackerMessage>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, source_description))
    }
}

impl ToolSource for ChannelSource {
    fn poll(&mut self) -> Vec<ToolUpdate> {
        let mut updates = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => updates.extend(self.catalog.apply(message)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        warn!(source = %self.description, "sender dropped");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }
        updates
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.disconnected.then(|| "Channel closed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ToolRef;
    use crate::source::ToolDirectory;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");
        assert!(source.poll().is_empty());

        source.watch(&ToolRef::new("Stylus"));
        tx.send(TrackerMessage::updated("Stylus")).unwrap();
        tx.send(TrackerMessage::updated("Reference")).unwrap();
        tx.send(TrackerMessage::updated("Stylus")).unwrap();

        // Reference is unwatched, so only the two Stylus updates come through.
        let updates = source.poll();
        assert_eq!(
            updates,
            vec![ToolUpdate::modified("Stylus"), ToolUpdate::modified("Stylus")]
        );
        assert!(source.poll().is_empty());

        // Both objects are offered in the picker.
        assert_eq!(source.candidates().len(), 2);
    }

    #[test]
    fn test_channel_source_removal() {
        let (tx, mut source) = ChannelSource::create("test");
        let stylus = ToolRef::new("Stylus");
        source.watch(&stylus);
        tx.send(TrackerMessage::updated("Stylus")).unwrap();
        tx.send(TrackerMessage::removed("Stylus")).unwrap();

        let updates = source.poll();
        assert_eq!(updates.last(), Some(&ToolUpdate::removed("Stylus")));
        assert!(!source.directory().is_valid(&stylus));
    }

    #[test]
    fn test_channel_source_closed() {
        let (tx, mut source) = ChannelSource::create("test");
        assert_eq!(source.description(), "channel: test");
        assert!(source.error().is_none());

        drop(tx);
        assert!(source.poll().is_empty());
        assert_eq!(source.error().as_deref(), Some("Channel closed"));
    }
}
