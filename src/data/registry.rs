//! Ordered registry of watched tools.
//!
//! Insertion order is the display order. It only changes through
//! [`Registry::swap`] and removals, which shift later rows down by one.

use tracing::info;

use super::tool::{ToolId, ToolRef, WatchedTool};
use crate::error::{Result, WatchdogError};

/// Ordered collection of [`WatchedTool`]s with unique identities.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tools: Vec<WatchedTool>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tool and return its row index.
    ///
    /// The new entry starts CONNECTED with `last_seen = now`. Fails with
    /// [`WatchdogError::DuplicateTool`] if the identity is already present,
    /// leaving the registry untouched.
    pub fn add(
        &mut self,
        tool: ToolRef,
        name: impl Into<String>,
        label: impl Into<String>,
        now: f64,
    ) -> Result<usize> {
        if self.find(&tool).is_some() {
            return Err(WatchdogError::DuplicateTool(tool.to_string()));
        }

        self.next_id += 1;
        let id = ToolId(self.next_id);
        let label = label.into();
        info!(tool = %tool, %id, %label, "watching tool");
        self.tools.push(WatchedTool::new(id, tool, name.into(), label, now));
        Ok(self.tools.len() - 1)
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Result<WatchedTool> {
        self.check_index(index)?;
        let removed = self.tools.remove(index);
        info!(tool = %removed.tool(), id = %removed.id(), "stopped watching tool");
        Ok(removed)
    }

    /// Remove the entry with the given stable id.
    pub fn remove_by_id(&mut self, id: ToolId) -> Result<WatchedTool> {
        let index = self.position(id).ok_or_else(|| WatchdogError::UnknownTool(id.to_string()))?;
        self.remove(index)
    }

    /// Exchange rows `i` and `j`. A no-op when `i == j`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        self.tools.swap(i, j);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<&WatchedTool> {
        self.tools.get(index).ok_or(WatchdogError::IndexOutOfRange {
            index,
            len: self.tools.len(),
        })
    }

    pub fn get_by_id(&self, id: ToolId) -> Option<&WatchedTool> {
        self.tools.iter().find(|t| t.id() == id)
    }

    pub(crate) fn get_mut_by_tool(&mut self, tool: &ToolRef) -> Option<&mut WatchedTool> {
        self.tools.iter_mut().find(|t| t.tool() == tool)
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, WatchedTool> {
        self.tools.iter_mut()
    }

    /// Current row of the entry with the given stable id.
    pub fn position(&self, id: ToolId) -> Option<usize> {
        self.tools.iter().position(|t| t.id() == id)
    }

    /// Current row of the entry watching `tool`.
    pub fn find(&self, tool: &ToolRef) -> Option<usize> {
        self.tools.iter().position(|t| t.tool() == tool)
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WatchedTool> {
        self.tools.iter()
    }

    /// Membership test by the external object's display name.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// Membership test by identity.
    pub fn contains_tool(&self, tool: &ToolRef) -> bool {
        self.find(tool).is_some()
    }

    pub fn set_label(&mut self, id: ToolId, label: impl Into<String>) -> Result<()> {
        let tool = self.entry_mut(id)?;
        tool.label = label.into();
        Ok(())
    }

    pub fn set_alert_enabled(&mut self, id: ToolId, enabled: bool) -> Result<()> {
        let tool = self.entry_mut(id)?;
        tool.alert_enabled = enabled;
        Ok(())
    }

    fn entry_mut(&mut self, id: ToolId) -> Result<&mut WatchedTool> {
        self.tools
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| WatchdogError::UnknownTool(id.to_string()))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.tools.len() {
            Ok(())
        } else {
            Err(WatchdogError::IndexOutOfRange {
                index,
                len: self.tools.len(),
            })
        }
    }
}
