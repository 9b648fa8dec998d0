//! Stream-based tool source.
//!
//! Receives tracker messages from an async byte stream. This is useful for
//! network feeds such as a TCP connection to a tracking server.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{Catalog, ToolSource, ToolUpdate, TrackerMessage};

/// A tool source that reads newline-delimited [`TrackerMessage`]s.
///
/// A background task parses the stream and hands messages over a bounded
/// channel; `poll()` drains it without blocking.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use tool_watchdog::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"event\":\"updated\",\"id\":\"Stylus\"}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<TrackerMessage>,
    catalog: Catalog,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(256);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        *error_handle.lock() = Some("Connection closed".to_string());
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<TrackerMessage>(trimmed) {
                            Ok(message) => {
                                *error_handle.lock() = None;
                                if tx.send(message).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                debug!(error = %e, "skipping malformed line");
                                *error_handle.lock() = Some(format!("Parse error: {}", e));
                            }
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "tracker stream read failed");
                        *error_handle.lock() = Some(format!("Read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            catalog: Catalog::new(),
            description: format!("stream: {}", description),
            last_error,
        }
    }

    /// Create a StreamSource from a channel of raw JSON payloads, one
    /// message per payload.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, message_rx) = mpsc::channel(256);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<TrackerMessage>(&bytes) {
                    Ok(message) => {
                        *error_handle.lock() = None;
                        if tx.send(message).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        *error_handle.lock() = Some(format!("Parse error: {}", e));
                    }
                }
            }
        });

        Self {
            receiver: message_rx,
            catalog: Catalog::new(),
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl ToolSource for StreamSource {
    fn poll(&mut self) -> Vec<ToolUpdate> {
        let mut updates = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => updates.extend(self.catalog.apply(message)),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    let mut error = self.last_error.lock();
                    if error.is_none() {
                        *error = Some("Stream disconnected".to_string());
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
        self.last_error.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ToolRef;
    use std::io::Cursor;

    const STYLUS: &str = r#"{"event":"updated","id":"Stylus","name":"Stylus tip"}"#;

    async fn settle() {
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_stream_source_spawn() {
        let data = format!("{}\n", STYLUS);
        let mut source = StreamSource::spawn(Cursor::new(data), "test");
        source.watch(&ToolRef::new("Stylus"));

        settle().await;

        assert_eq!(source.poll(), vec![ToolUpdate::modified("Stylus")]);
        assert_eq!(
            source.candidates(),
            vec![(ToolRef::new("Stylus"), "Stylus tip".to_string())]
        );
    }

    #[tokio::test]
    async fn test_stream_source_unwatched_are_catalogued_only() {
        let data = format!("{}\n{}\n", STYLUS, r#"{"event":"removed","id":"Needle"}"#);
        let mut source = StreamSource::spawn(Cursor::new(data), "test");

        settle().await;

        assert!(source.poll().is_empty());
        assert_eq!(source.catalog().len(), 2);
    }

    #[tokio::test]
    async fn test_stream_source_description() {
        let source = StreamSource::spawn(Cursor::new(""), "tcp://localhost:9090");
        assert_eq!(source.description(), "stream: tcp://localhost:9090");
    }

    #[tokio::test]
    async fn test_stream_source_from_bytes_channel() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
        let mut source = StreamSource::from_bytes_channel(rx, "test-channel");
        source.watch(&ToolRef::new("Stylus"));

        tx.send(STYLUS.as_bytes().to_vec()).await.unwrap();
        tx.send(b"garbage".to_vec()).await.unwrap();

        settle().await;

        assert_eq!(source.poll().len(), 1);
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[tokio::test]
    async fn test_stream_source_invalid_json() {
        let mut source = StreamSource::spawn(Cursor::new("not valid json\n"), "test");
        source.watch(&ToolRef::new("Stylus"));

        settle().await;

        assert!(source.poll().is_empty());
        // EOF follows the bad line, so either message may be the last one.
        assert!(source.error().is_some());
    }

    #[tokio::test]
    async fn test_stream_source_closed() {
        let mut source = StreamSource::spawn(Cursor::new(""), "test");

        settle().await;

        assert!(source.poll().is_empty());
        assert_eq!(source.error().as_deref(), Some("Connection closed"));
    }
}
