//! Watchdog monitor instances.
//!
//! A [`Monitor`] owns one ordered [`Registry`], its tick [`Scheduler`] and
//! the observers that want to hear about ticks and alerts. Monitors are fully
//! independent: several can live in a [`MonitorSet`], each with its own tools
//! and cadence.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::history::History;
use super::liveness::{evaluate, Evaluation};
use super::registry::Registry;
use super::scheduler::Scheduler;
use super::tool::{ToolId, ToolRef, ToolStatus, WatchedTool};
use crate::error::{Result, WatchdogError};
use crate::source::{ToolDirectory, ToolUpdate, UpdateKind};

/// Default tick period (4 Hz).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Per-monitor timing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Tick period.
    pub refresh_interval: Duration,
    /// Time without updates before a tool is disconnected.
    /// Follows the refresh interval when unset.
    pub staleness: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            staleness: None,
        }
    }
}

impl MonitorConfig {
    /// Effective staleness threshold.
    pub fn threshold(&self) -> Duration {
        self.staleness.unwrap_or(self.refresh_interval)
    }

    /// A zero tick period or a zero staleness threshold is refused; the
    /// latter would report every tool disconnected on the tick it was added.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() || self.staleness.is_some_and(|s| s.is_zero()) {
            return Err(WatchdogError::InvalidInterval);
        }
        Ok(())
    }
}

/// Stable id of a monitor inside a [`MonitorSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonitorId(pub u64);

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "monitor-{}", self.0)
    }
}

/// Edge-triggered disconnection alert.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub monitor: MonitorId,
    pub tool: ToolId,
    /// Row of the tool when the alert fired.
    pub index: usize,
    pub label: String,
    pub elapsed: Option<f64>,
    pub invalidated: bool,
}

/// Notifications delivered to observers, synchronously within a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchdogEvent {
    /// The monitor re-evaluated its table.
    TableUpdated { monitor: MonitorId },
    /// A tool with alerts enabled just went down.
    Alert(Alert),
}

/// Handle returned by [`Monitor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&WatchdogEvent) + Send>;

/// Result of one tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub monitor: MonitorId,
    pub at: f64,
    pub evaluations: Vec<Evaluation>,
    pub alerts: Vec<Alert>,
}

impl TickReport {
    pub fn disconnected(&self) -> usize {
        self.evaluations.iter().filter(|e| e.status == ToolStatus::Disconnected).count()
    }
}

/// One watchdog: an ordered set of watched tools and its tick cadence.
pub struct Monitor {
    id: MonitorId,
    name: String,
    config: MonitorConfig,
    registry: Registry,
    scheduler: Scheduler,
    history: History,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl Monitor {
    pub fn new(id: MonitorId, name: impl Into<String>, config: MonitorConfig, now: f64) -> Result<Self> {
        config.validate()?;
        let scheduler = Scheduler::new(config.refresh_interval, now)?;
        Ok(Self {
            id,
            name: name.into(),
            config,
            registry: Registry::new(),
            scheduler,
            history: History::new(),
            observers: Vec::new(),
            next_observer: 0,
        })
    }

    pub fn id(&self) -> MonitorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Ordered, read-only view of the watched tools.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Start watching `tool`. The label defaults to the object's display name.
    ///
    /// Objects the directory already reports as removed are refused.
    pub fn add_tool(
        &mut self,
        tool: ToolRef,
        label: Option<String>,
        now: f64,
        directory: &dyn ToolDirectory,
    ) -> Result<usize> {
        if !directory.is_valid(&tool) {
            return Err(WatchdogError::InvalidatedReference(tool.to_string()));
        }
        let name = directory.display_name(&tool).unwrap_or_else(|| tool.to_string());
        let label = label.unwrap_or_else(|| name.clone());
        self.registry.add(tool, name, label, now)
    }

    pub fn remove_tool(&mut self, index: usize) -> Result<WatchedTool> {
        let removed = self.registry.remove(index)?;
        self.history.forget(removed.id());
        Ok(removed)
    }

    pub fn remove_tool_by_id(&mut self, id: ToolId) -> Result<WatchedTool> {
        let removed = self.registry.remove_by_id(id)?;
        self.history.forget(removed.id());
        Ok(removed)
    }

    pub fn swap_tools(&mut self, i: usize, j: usize) -> Result<()> {
        self.registry.swap(i, j)
    }

    pub fn set_label(&mut self, id: ToolId, label: impl Into<String>) -> Result<()> {
        self.registry.set_label(id, label)
    }

    pub fn set_alert_enabled(&mut self, id: ToolId, enabled: bool) -> Result<()> {
        self.registry.set_alert_enabled(id, enabled)
    }

    /// Flip the alert flag and return the new value.
    pub fn toggle_alert(&mut self, id: ToolId) -> Result<bool> {
        let enabled = !self
            .registry
            .get_by_id(id)
            .ok_or_else(|| WatchdogError::UnknownTool(id.to_string()))?
            .alert_enabled();
        self.registry.set_alert_enabled(id, enabled)?;
        Ok(enabled)
    }

    /// Record an update notification for `tool` at `now`.
    ///
    /// The tool flips to CONNECTED immediately instead of waiting for the
    /// next tick. Returns false if the tool is not watched here.
    pub fn on_updated(&mut self, tool: &ToolRef, now: f64) -> bool {
        let Some(entry) = self.registry.get_mut_by_tool(tool) else {
            return false;
        };
        let previous = entry.status();
        entry.mark_seen(now);
        let id = entry.id();
        if previous == ToolStatus::Disconnected {
            info!(monitor = %self.name, %tool, "tool reconnected");
            self.history.record(id, now, previous, ToolStatus::Connected);
        }
        true
    }

    /// Record that the tracked object behind `tool` disappeared.
    ///
    /// The entry is kept and reads DISCONNECTED from the next tick on.
    pub fn on_invalidated(&mut self, tool: &ToolRef) -> bool {
        let Some(entry) = self.registry.get_mut_by_tool(tool) else {
            return false;
        };
        warn!(monitor = %self.name, %tool, "tracked object removed");
        entry.valid = false;
        true
    }

    /// Route a source update to [`Monitor::on_updated`] or [`Monitor::on_invalidated`].
    pub fn apply(&mut self, update: &ToolUpdate, now: f64) -> bool {
        match update.kind {
            UpdateKind::Modified => self.on_updated(&update.tool, now),
            UpdateKind::Removed => self.on_invalidated(&update.tool),
        }
    }

    /// Change the tick period; affects future cadence only.
    pub fn set_refresh_interval(&mut self, interval: Duration, now: f64) -> Result<()> {
        self.scheduler.set_interval(interval, now)?;
        self.config.refresh_interval = interval;
        info!(monitor = %self.name, ?interval, "refresh interval changed");
        Ok(())
    }

    pub fn set_staleness(&mut self, staleness: Option<Duration>) -> Result<()> {
        if staleness.is_some_and(|s| s.is_zero()) {
            return Err(WatchdogError::InvalidInterval);
        }
        self.config.staleness = staleness;
        Ok(())
    }

    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&WatchdogEvent) + Send + 'static,
    {
        self.next_observer += 1;
        let id = ObserverId(self.next_observer);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Tick if the scheduler says one is due at `now`.
    pub fn poll(&mut self, now: f64, directory: &dyn ToolDirectory) -> Option<TickReport> {
        if self.scheduler.poll(now) {
            Some(self.run_tick(now, directory))
        } else {
            None
        }
    }

    /// Tick immediately, outside the regular cadence.
    pub fn tick(&mut self, now: f64, directory: &dyn ToolDirectory) -> TickReport {
        self.scheduler.mark_ticked(now);
        self.run_tick(now, directory)
    }

    fn run_tick(&mut self, now: f64, directory: &dyn ToolDirectory) -> TickReport {
        let threshold = self.config.threshold().as_secs_f64();
        let evaluations = evaluate(&mut self.registry, now, threshold, directory);

        for tool in self.registry.iter_mut() {
            if let Some(name) = directory.display_name(tool.tool()) {
                if name != tool.name() {
                    tool.set_name(name);
                }
            }
        }
        self.history.record_tick(now, &evaluations);

        let alerts: Vec<Alert> = evaluations
            .iter()
            .filter(|e| e.went_down())
            .filter_map(|e| {
                let tool = self.registry.get(e.index).ok()?;
                tool.alert_enabled().then(|| Alert {
                    monitor: self.id,
                    tool: e.id,
                    index: e.index,
                    label: tool.label().to_string(),
                    elapsed: e.elapsed,
                    invalidated: e.invalidated,
                })
            })
            .collect();

        debug!(
            monitor = %self.name,
            tools = evaluations.len(),
            alerts = alerts.len(),
            "tick"
        );
        for alert in &alerts {
            warn!(monitor = %self.name, tool = %alert.label, "tool disconnected");
        }

        self.notify(&WatchdogEvent::TableUpdated { monitor: self.id });
        for alert in &alerts {
            self.notify(&WatchdogEvent::Alert(alert.clone()));
        }

        TickReport {
            monitor: self.id,
            at: now,
            evaluations,
            alerts,
        }
    }

    fn notify(&mut self, event: &WatchdogEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("config", &self.config)
            .field("tools", &self.registry.count())
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Independent monitors addressed by stable [`MonitorId`].
#[derive(Debug, Default)]
pub struct MonitorSet {
    monitors: Vec<Monitor>,
    next_id: u64,
}

impl MonitorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, name: impl Into<String>, config: MonitorConfig, now: f64) -> Result<MonitorId> {
        self.next_id += 1;
        let id = MonitorId(self.next_id);
        let monitor = Monitor::new(id, name, config, now)?;
        info!(monitor = %monitor.name(), %id, "monitor created");
        self.monitors.push(monitor);
        Ok(id)
    }

    pub fn remove(&mut self, id: MonitorId) -> Result<Monitor> {
        let index = self.position(id).ok_or(WatchdogError::NoActiveMonitor)?;
        Ok(self.monitors.remove(index))
    }

    pub fn get(&self, id: MonitorId) -> Result<&Monitor> {
        self.monitors.iter().find(|m| m.id() == id).ok_or(WatchdogError::NoActiveMonitor)
    }

    pub fn get_mut(&mut self, id: MonitorId) -> Result<&mut Monitor> {
        self.monitors.iter_mut().find(|m| m.id() == id).ok_or(WatchdogError::NoActiveMonitor)
    }

    pub fn position(&self, id: MonitorId) -> Option<usize> {
        self.monitors.iter().position(|m| m.id() == id)
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Monitor> {
        self.monitors.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Monitor> {
        self.monitors.iter_mut()
    }

    /// Monitor at a display position (tab order).
    pub fn nth(&self, index: usize) -> Option<&Monitor> {
        self.monitors.get(index)
    }

    /// Number of monitors watching `tool`.
    pub fn watchers(&self, tool: &ToolRef) -> usize {
        self.monitors.iter().filter(|m| m.registry().contains_tool(tool)).count()
    }

    /// Deliver one source update to every monitor that watches the tool.
    pub fn route(&mut self, update: &ToolUpdate, now: f64) -> usize {
        self.monitors.iter_mut().map(|m| m.apply(update, now)).filter(|&applied| applied).count()
    }

    /// Give every monitor a chance to tick on its own cadence.
    pub fn poll_all(&mut self, now: f64, directory: &dyn ToolDirectory) -> Vec<TickReport> {
        self.monitors.iter_mut().filter_map(|m| m.poll(now, directory)).collect()
    }
}
