//! Known tracked objects and watch subscriptions.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::message::TrackerMessage;
use super::{ToolDirectory, ToolUpdate, UpdateKind};
use crate::data::ToolRef;

#[derive(Debug, Clone)]
struct KnownTool {
    name: String,
    valid: bool,
}

/// Objects a source has heard about, plus who is watching them.
///
/// Objects that were never seen count as valid: a tool configured before its
/// tracker comes up simply goes stale until data arrives.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    known: BTreeMap<ToolRef, KnownTool>,
    watches: HashMap<ToolRef, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a tracker message into the catalog.
    ///
    /// Returns an update only if the object is currently watched.
    pub fn apply(&mut self, message: TrackerMessage) -> Option<ToolUpdate> {
        let (tool, kind) = match message {
            TrackerMessage::Updated { id, name } => {
                let tool = ToolRef::new(id);
                let name = name.unwrap_or_else(|| tool.to_string());
                self.known.insert(tool.clone(), KnownTool { name, valid: true });
                (tool, UpdateKind::Modified)
            }
            TrackerMessage::Removed { id } => {
                let tool = ToolRef::new(id);
                match self.known.get_mut(&tool) {
                    Some(known) => known.valid = false,
                    None => {
                        self.known.insert(
                            tool.clone(),
                            KnownTool {
                                name: tool.to_string(),
                                valid: false,
                            },
                        );
                    }
                }
                (tool, UpdateKind::Removed)
            }
        };

        if self.is_watched(&tool) {
            Some(ToolUpdate { tool, kind })
        } else {
            None
        }
    }

    /// Valid objects with their display names, ordered by id.
    pub fn candidates(&self) -> Vec<(ToolRef, String)> {
        self.known
            .iter()
            .filter(|(_, known)| known.valid)
            .map(|(tool, known)| (tool.clone(), known.name.clone()))
            .collect()
    }

    pub fn watch(&mut self, tool: &ToolRef) {
        let count = self.watches.entry(tool.clone()).or_default();
        *count += 1;
        debug!(%tool, watchers = *count, "watch");
    }

    pub fn unwatch(&mut self, tool: &ToolRef) {
        if let Some(count) = self.watches.get_mut(tool) {
            *count -= 1;
            if *count == 0 {
                self.watches.remove(tool);
                debug!(%tool, "subscription released");
            }
        }
    }

    pub fn is_watched(&self, tool: &ToolRef) -> bool {
        self.watches.contains_key(tool)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl ToolDirectory for Catalog {
    fn display_name(&self, tool: &ToolRef) -> Option<String> {
        self.known.get(tool).map(|known| known.name.clone())
    }

    fn is_valid(&self, tool: &ToolRef) -> bool {
        self.known.get(tool).map_or(true, |known| known.valid)
    }
}
