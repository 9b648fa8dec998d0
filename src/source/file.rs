//! File-based tool source.
//!
//! Polls a JSON [`TrackerSnapshot`] that the tracker rewrites periodically,
//! and turns differences between consecutive snapshots into updates.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use super::{Catalog, ToolSource, ToolUpdate, TrackerMessage, TrackerSnapshot};

/// A tool source that reads tracker snapshots from a JSON file.
///
/// An object produces an update when it first appears or when its `updated`
/// stamp increases; it is reported removed when it drops out of the file.
/// The file is only re-read when its modification time moves forward.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    catalog: Catalog,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    previous: TrackerSnapshot,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            catalog: Catalog::new(),
            last_error: None,
            last_modified: None,
            previous: TrackerSnapshot::new(),
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<TrackerSnapshot> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(snapshot) => {
                    self.last_error = None;
                    Some(snapshot)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }

    /// Diff `snapshot` against the previous one and fold the result into the
    /// catalog. Returns updates for watched objects.
    pub fn apply_snapshot(&mut self, snapshot: TrackerSnapshot) -> Vec<ToolUpdate> {
        let mut messages = Vec::new();

        for (id, state) in &snapshot {
            let advanced = self
                .previous
                .get(id)
                .map_or(true, |previous| state.updated > previous.updated);
            if advanced {
                messages.push(TrackerMessage::Updated {
                    id: id.clone(),
                    name: state.name.clone(),
                });
            }
        }
        for id in self.previous.keys() {
            if !snapshot.contains_key(id) {
                messages.push(TrackerMessage::removed(id.clone()));
            }
        }

        debug!(path = %self.path.display(), changes = messages.len(), "snapshot diffed");
        self.previous = snapshot;
        messages
            .into_iter()
            .filter_map(|message| self.catalog.apply(message))
            .collect()
    }
}

impl ToolSource for FileSource {
    fn poll(&mut self) -> Vec<ToolUpdate> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(snapshot) = self.read_file() {
                self.last_modified = current_modified;
                return self.apply_snapshot(snapshot);
            }
        }

        Vec::new()
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
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ToolRef;
    use crate::source::{SerializedToolState, ToolDirectory};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn state(updated: f64) -> SerializedToolState {
        SerializedToolState { name: None, updated }
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/tools.json");
        assert_eq!(source.path(), Path::new("/tmp/tools.json"));
        assert_eq!(source.description(), "file: /tmp/tools.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{ "Stylus": {{ "name": "Stylus tip", "updated": 1.0 }}, "Reference": {{ "updated": 1.0 }} }}"#
        )
        .unwrap();

        let mut source = FileSource::new(file.path());
        source.watch(&ToolRef::new("Stylus"));

        assert_eq!(source.poll(), vec![ToolUpdate::modified("Stylus")]);
        assert_eq!(
            source.directory().display_name(&ToolRef::new("Stylus")).as_deref(),
            Some("Stylus tip")
        );
        assert_eq!(source.candidates().len(), 2);

        // Unchanged mtime, nothing new.
        assert!(source.poll().is_empty());
    }

    #[test]
    fn test_snapshot_diff() {
        let mut source = FileSource::new("/unused");
        let stylus = ToolRef::new("Stylus");
        source.watch(&stylus);
        source.watch(&ToolRef::new("Needle"));

        let mut snapshot = TrackerSnapshot::new();
        snapshot.insert("Stylus".to_string(), state(1.0));
        snapshot.insert("Needle".to_string(), state(1.0));
        assert_eq!(source.apply_snapshot(snapshot.clone()).len(), 2);

        // Same stamps: no updates.
        assert!(source.apply_snapshot(snapshot.clone()).is_empty());

        // Stylus advances, Needle disappears.
        let mut next = TrackerSnapshot::new();
        next.insert("Stylus".to_string(), state(2.0));
        let updates = source.apply_snapshot(next);
        assert_eq!(
            updates,
            vec![ToolUpdate::modified("Stylus"), ToolUpdate::removed("Needle")]
        );
        assert!(!source.directory().is_valid(&ToolRef::new("Needle")));
        assert!(source.directory().is_valid(&stylus));
    }

    #[test]
    fn test_stamp_going_backwards_is_ignored() {
        let mut source = FileSource::new("/unused");
        source.watch(&ToolRef::new("Stylus"));

        let mut snapshot = TrackerSnapshot::new();
        snapshot.insert("Stylus".to_string(), state(5.0));
        source.apply_snapshot(snapshot);

        let mut older = TrackerSnapshot::new();
        older.insert("Stylus".to_string(), state(4.0));
        assert!(source.apply_snapshot(older).is_empty());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/tools.json");

        assert!(source.poll().is_empty());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_empty());
        assert!(source.error().unwrap().contains("Parse error"));
    }
}
