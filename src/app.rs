//! Application state and user actions.
//!
//! The [`App`] owns the monitors, the tool source and the clock, and is the
//! only place where the three meet: it drains source updates, stamps them with
//! the clock, routes them to monitors and lets each monitor tick on its own
//! cadence. Every action that targets "the current monitor" resolves it
//! explicitly and fails with [`WatchdogError::NoActiveMonitor`] when there is
//! none.

use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::data::{
    Alert, Monitor, MonitorConfig, MonitorId, MonitorSet, TickReport, ToolId, ToolRef, ToolStatus,
    WatchdogEvent, WatchedTool,
};
use crate::error::{Result, WatchdogError};
use crate::source::ToolSource;
use crate::ui::Theme;

/// Step used by the `+`/`-` interval keys.
pub const INTERVAL_STEP: Duration = Duration::from_millis(50);

const MAX_ALERT_LOG: usize = 50;

/// An alert as kept in the on-screen log.
#[derive(Debug, Clone)]
pub struct LoggedAlert {
    pub at: f64,
    pub monitor: String,
    pub alert: Alert,
}

/// A row of the add-tool picker.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerEntry {
    pub tool: ToolRef,
    pub name: String,
    /// Already watched by the active monitor; shown but not selectable.
    pub disabled: bool,
}

/// Label being typed for a watched tool.
#[derive(Debug, Clone)]
pub struct LabelEdit {
    pub tool: ToolId,
    pub text: String,
}

/// Where the tool table was last drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TableView {
    /// Outer area including the border.
    pub area: Rect,
    /// Index of the first visible row.
    pub offset: usize,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub show_detail_overlay: bool,
    /// Selected row of the add-tool picker, when open.
    pub picker: Option<usize>,
    pub label_edit: Option<LabelEdit>,

    monitors: MonitorSet,
    active: Option<MonitorId>,
    /// Template for monitors created at runtime.
    monitor_config: MonitorConfig,
    source: Box<dyn ToolSource>,
    clock: Box<dyn Clock>,
    events_tx: mpsc::UnboundedSender<WatchdogEvent>,
    events_rx: mpsc::UnboundedReceiver<WatchdogEvent>,

    pub alert_log: VecDeque<LoggedAlert>,
    pub load_error: Option<String>,
    pub selected_index: usize,

    // UI
    pub theme: Theme,
    pub table_view: TableView,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create an App with no monitors; see [`App::create_monitor`].
    pub fn new(source: Box<dyn ToolSource>, clock: Box<dyn Clock>, monitor_config: MonitorConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            show_help: false,
            show_detail_overlay: false,
            picker: None,
            label_edit: None,
            monitors: MonitorSet::new(),
            active: None,
            monitor_config,
            source,
            clock,
            events_tx,
            events_rx,
            alert_log: VecDeque::new(),
            load_error: None,
            selected_index: 0,
            theme: Theme::auto_detect(),
            table_view: TableView::default(),
            status_message: None,
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn source(&self) -> &dyn ToolSource {
        self.source.as_ref()
    }

    /// Returns a description of the current tool source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn monitors(&self) -> &MonitorSet {
        &self.monitors
    }

    pub fn active_id(&self) -> Option<MonitorId> {
        self.active
    }

    pub fn active_monitor(&self) -> Result<&Monitor> {
        let id = self.active.ok_or(WatchdogError::NoActiveMonitor)?;
        self.monitors.get(id)
    }

    pub fn active_monitor_mut(&mut self) -> Result<&mut Monitor> {
        let id = self.active.ok_or(WatchdogError::NoActiveMonitor)?;
        self.monitors.get_mut(id)
    }

    /// The tool under the cursor in the active monitor.
    pub fn selected_tool(&self) -> Option<&WatchedTool> {
        self.active_monitor().ok()?.registry().get(self.selected_index).ok()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Report the outcome of an action in the status bar.
    pub fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.set_status_message(format!("Error: {}", e));
                None
            }
        }
    }

    /// Drain the source, route updates and run whatever ticks are due.
    ///
    /// Returns true if anything changed on screen.
    pub fn update(&mut self) -> bool {
        self.load_error = self.source.error();

        let now = self.clock.now();
        let updates = self.source.poll();
        for update in &updates {
            let routed = self.monitors.route(update, now);
            debug!(tool = %update.tool, kind = ?update.kind, routed, "update");
        }

        let reports = self.monitors.poll_all(now, self.source.directory());
        self.drain_events(now);
        self.clamp_selection();

        !updates.is_empty() || !reports.is_empty()
    }

    /// Tick the active monitor right away (`r`).
    pub fn tick_now(&mut self) -> Result<TickReport> {
        let now = self.clock.now();
        let id = self.active.ok_or(WatchdogError::NoActiveMonitor)?;
        let report = self.monitors.get_mut(id)?.tick(now, self.source.directory());
        self.drain_events(now);
        Ok(report)
    }

    fn drain_events(&mut self, now: f64) {
        while let Ok(event) = self.events_rx.try_recv() {
            let WatchdogEvent::Alert(alert) = event else {
                continue;
            };
            let monitor = self
                .monitors
                .get(alert.monitor)
                .map(|m| m.name().to_string())
                .unwrap_or_else(|_| alert.monitor.to_string());
            self.set_status_message(format!("ALERT: {} disconnected ({})", alert.label, monitor));
            self.alert_log.push_front(LoggedAlert { at: now, monitor, alert });
            self.alert_log.truncate(MAX_ALERT_LOG);
        }
    }

    // Monitors

    /// Create a monitor with the default timing and make it active.
    pub fn create_monitor(&mut self, name: impl Into<String>) -> Result<MonitorId> {
        let config = self.monitor_config.clone();
        self.create_monitor_with(name, config)
    }

    pub fn create_monitor_with(&mut self, name: impl Into<String>, config: MonitorConfig) -> Result<MonitorId> {
        let now = self.clock.now();
        let id = self.monitors.create(name, config, now)?;
        let tx = self.events_tx.clone();
        self.monitors.get_mut(id)?.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });
        self.activate(id);
        Ok(id)
    }

    /// Create a monitor named after its position (`n`).
    pub fn new_monitor(&mut self) -> Result<MonitorId> {
        let name = format!("Watchdog {}", self.monitors.len() + 1);
        self.create_monitor(name)
    }

    /// Delete the active monitor and release its subscriptions (`X`).
    pub fn delete_active_monitor(&mut self) -> Result<()> {
        let id = self.active.ok_or(WatchdogError::NoActiveMonitor)?;
        let position = self.monitors.position(id).unwrap_or(0);
        let monitor = self.monitors.remove(id)?;
        for tool in monitor.registry().iter() {
            self.source.unwatch(tool.tool());
        }
        info!(monitor = %monitor.name(), "monitor deleted");

        let next = position.min(self.monitors.len().saturating_sub(1));
        self.active = self.monitors.nth(next).map(Monitor::id);
        self.selected_index = 0;
        Ok(())
    }

    pub fn activate(&mut self, id: MonitorId) {
        if self.active != Some(id) {
            self.active = Some(id);
            self.selected_index = 0;
            self.show_detail_overlay = false;
        }
    }

    fn cycle_monitor(&mut self, forward: bool) {
        let len = self.monitors.len();
        if len == 0 {
            return;
        }
        let current = self.active.and_then(|id| self.monitors.position(id)).unwrap_or(0);
        let next = if forward { (current + 1) % len } else { (current + len - 1) % len };
        if let Some(id) = self.monitors.nth(next).map(Monitor::id) {
            self.activate(id);
        }
    }

    pub fn next_monitor(&mut self) {
        self.cycle_monitor(true);
    }

    pub fn prev_monitor(&mut self) {
        self.cycle_monitor(false);
    }

    // Tools

    /// Watch `tool` in the active monitor and select it.
    pub fn add_tool(&mut self, tool: ToolRef, label: Option<String>) -> Result<usize> {
        let now = self.clock.now();
        let id = self.active.ok_or(WatchdogError::NoActiveMonitor)?;
        let index = self
            .monitors
            .get_mut(id)?
            .add_tool(tool.clone(), label, now, self.source.directory())?;
        self.source.watch(&tool);
        self.selected_index = index;
        Ok(index)
    }

    /// Stop watching the selected tool (`d`).
    pub fn remove_selected(&mut self) -> Result<WatchedTool> {
        let id = self.selected_id()?;
        let removed = self.active_monitor_mut()?.remove_tool_by_id(id)?;
        self.source.unwatch(removed.tool());
        self.clamp_selection();
        Ok(removed)
    }

    /// Swap the selected tool with its upper neighbour (`K`).
    pub fn move_selected_up(&mut self) -> Result<()> {
        let index = self.selected_index;
        if index == 0 {
            return Ok(());
        }
        self.active_monitor_mut()?.swap_tools(index, index - 1)?;
        self.selected_index = index - 1;
        Ok(())
    }

    /// Swap the selected tool with its lower neighbour (`J`).
    pub fn move_selected_down(&mut self) -> Result<()> {
        let index = self.selected_index;
        let monitor = self.active_monitor_mut()?;
        if index + 1 >= monitor.registry().count() {
            return Ok(());
        }
        monitor.swap_tools(index, index + 1)?;
        self.selected_index = index + 1;
        Ok(())
    }

    fn selected_id(&self) -> Result<ToolId> {
        let monitor = self.active_monitor()?;
        Ok(monitor.registry().get(self.selected_index)?.id())
    }

    /// Flip the alert flag of the selected tool (`space`).
    pub fn toggle_selected_alert(&mut self) -> Result<bool> {
        let id = self.selected_id()?;
        self.active_monitor_mut()?.toggle_alert(id)
    }

    /// Adjust the active monitor's refresh interval by `step` (`+`/`-`).
    pub fn change_interval(&mut self, increase: bool) -> Result<Duration> {
        let now = self.clock.now();
        let monitor = self.active_monitor_mut()?;
        let current = monitor.config().refresh_interval;
        let interval = if increase {
            current + INTERVAL_STEP
        } else {
            current.saturating_sub(INTERVAL_STEP)
        };
        monitor.set_refresh_interval(interval, now)?;
        Ok(interval)
    }

    // Label editing

    pub fn start_label_edit(&mut self) -> Result<()> {
        let tool = self.selected_id()?;
        let text = self
            .selected_tool()
            .map(|t| t.label().to_string())
            .unwrap_or_default();
        self.label_edit = Some(LabelEdit { tool, text });
        Ok(())
    }

    pub fn label_push(&mut self, c: char) {
        if let Some(edit) = self.label_edit.as_mut() {
            edit.text.push(c);
        }
    }

    pub fn label_pop(&mut self) {
        if let Some(edit) = self.label_edit.as_mut() {
            edit.text.pop();
        }
    }

    pub fn cancel_label_edit(&mut self) {
        self.label_edit = None;
    }

    /// Apply the typed label. Empty input keeps the old label.
    pub fn commit_label(&mut self) -> Result<()> {
        let Some(edit) = self.label_edit.take() else {
            return Ok(());
        };
        let text = edit.text.trim();
        if text.is_empty() {
            return Ok(());
        }
        self.active_monitor_mut()?.set_label(edit.tool, text)
    }

    // Picker

    /// Objects offered by the source, with the ones this monitor already
    /// watches disabled.
    pub fn picker_entries(&self) -> Vec<PickerEntry> {
        let monitor = self.active_monitor().ok();
        self.source
            .candidates()
            .into_iter()
            .map(|(tool, name)| {
                let disabled = monitor.is_some_and(|m| {
                    m.registry().contains(&name) || m.registry().contains_tool(&tool)
                });
                PickerEntry { tool, name, disabled }
            })
            .collect()
    }

    pub fn open_picker(&mut self) -> Result<()> {
        self.active_monitor()?;
        self.picker = Some(0);
        Ok(())
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    pub fn picker_move(&mut self, down: bool) {
        let len = self.picker_entries().len();
        if let Some(index) = self.picker.as_mut() {
            *index = if down {
                (*index + 1).min(len.saturating_sub(1))
            } else {
                index.saturating_sub(1)
            };
        }
    }

    /// Add the highlighted picker entry. Disabled entries are ignored.
    pub fn picker_confirm(&mut self) -> Result<Option<usize>> {
        let Some(index) = self.picker else {
            return Ok(None);
        };
        let Some(entry) = self.picker_entries().into_iter().nth(index) else {
            return Ok(None);
        };
        if entry.disabled {
            self.set_status_message(format!("{} is already watched", entry.name));
            return Ok(None);
        }
        self.picker = None;
        self.add_tool(entry.tool, None).map(Some)
    }

    // Navigation

    fn tool_count(&self) -> usize {
        self.active_monitor().map(|m| m.registry().count()).unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        let count = self.tool_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Tool row under a screen cell of the last drawn table, if any.
    pub fn tool_row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.table_view.area;
        // Data rows start below the top border and the header row.
        let first = area.y.saturating_add(2);
        let end = area.bottom().saturating_sub(1);
        if column < area.x || column >= area.right() || row < first || row >= end {
            return None;
        }
        let index = self.table_view.offset + usize::from(row - first);
        (index < self.tool_count()).then_some(index)
    }

    pub fn select_next(&mut self) {
        let max = self.tool_count().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max);
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.tool_count().saturating_sub(1);
    }

    pub fn enter_detail(&mut self) {
        if self.selected_tool().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Close overlays (Esc).
    pub fn go_back(&mut self) {
        self.show_detail_overlay = false;
        self.picker = None;
        self.label_edit = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the active monitor's table to a JSON file.
    pub fn export_state(&self, path: &Path) -> anyhow::Result<()> {
        let monitor = self.active_monitor()?;

        let tools: Vec<serde_json::Value> = monitor
            .registry()
            .iter()
            .map(|tool| {
                serde_json::json!({
                    "id": tool.id().to_string(),
                    "tool": tool.tool(),
                    "label": tool.label(),
                    "name": tool.name(),
                    "alert": tool.alert_enabled(),
                    "status": match tool.status() {
                        ToolStatus::Connected => "connected",
                        ToolStatus::Disconnected => "disconnected",
                    },
                    "elapsed": tool.elapsed(),
                    "disconnects": monitor.history().disconnect_count(tool.id()),
                })
            })
            .collect();

        let export = serde_json::json!({
            "monitor": monitor.name(),
            "refresh_interval_ms": monitor.config().refresh_interval.as_millis() as u64,
            "staleness_ms": monitor.config().threshold().as_millis() as u64,
            "tools": tools,
        });

        std::fs::write(path, serde_json::to_string_pretty(&export)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::source::{ChannelSource, TrackerMessage};
    use tokio::sync::mpsc::UnboundedSender;

    fn setup() -> (App, UnboundedSender<TrackerMessage>, ManualClock) {
        let (tx, source) = ChannelSource::create("test");
        let clock = ManualClock::new(0.0);
        let config = MonitorConfig {
            refresh_interval: Duration::from_secs(1),
            staleness: Some(Duration::from_secs(2)),
        };
        let app = App::new(Box::new(source), Box::new(clock.clone()), config);
        (app, tx, clock)
    }

    #[test]
    fn test_operations_need_active_monitor() {
        let (mut app, _tx, _clock) = setup();
        assert_eq!(
            app.add_tool(ToolRef::new("Stylus"), None),
            Err(WatchdogError::NoActiveMonitor)
        );
        assert_eq!(app.remove_selected().unwrap_err(), WatchdogError::NoActiveMonitor);
        assert_eq!(app.tick_now().unwrap_err(), WatchdogError::NoActiveMonitor);
        assert_eq!(app.change_interval(true), Err(WatchdogError::NoActiveMonitor));
        assert_eq!(app.delete_active_monitor(), Err(WatchdogError::NoActiveMonitor));
        assert_eq!(app.open_picker(), Err(WatchdogError::NoActiveMonitor));
        assert!(app.picker.is_none());
        // Nothing was subscribed along the way.
        assert!(!app.source().catalog().is_watched(&ToolRef::new("Stylus")));
    }

    #[test]
    fn test_alert_reaches_status_bar() {
        let (mut app, tx, clock) = setup();
        app.create_monitor("Navigation").unwrap();

        tx.send(TrackerMessage::updated("Stylus")).unwrap();
        app.update();
        app.add_tool(ToolRef::new("Stylus"), None).unwrap();

        clock.set(1.0);
        tx.send(TrackerMessage::updated("Stylus")).unwrap();
        assert!(app.update());
        assert_eq!(app.selected_tool().unwrap().status(), ToolStatus::Connected);
        assert!(app.alert_log.is_empty());

        // No data for three seconds; the late poll ticks once.
        clock.set(4.0);
        app.update();
        let tool = app.selected_tool().unwrap();
        assert_eq!(tool.status(), ToolStatus::Disconnected);
        assert_eq!(tool.elapsed(), Some(3.0));
        assert_eq!(app.alert_log.len(), 1);
        assert_eq!(app.alert_log[0].monitor, "Navigation");
        assert!(app.get_status_message().unwrap().contains("Stylus"));

        // Still down: no second alert.
        clock.set(5.0);
        app.update();
        assert_eq!(app.alert_log.len(), 1);
    }

    #[test]
    fn test_tick_now_ignores_cadence() {
        let (mut app, _tx, clock) = setup();
        app.create_monitor("Navigation").unwrap();
        app.add_tool(ToolRef::new("Stylus"), None).unwrap();

        clock.set(2.5);
        let report = app.tick_now().unwrap();
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(app.alert_log.len(), 1);
    }

    #[test]
    fn test_subscriptions_follow_watchers() {
        let (mut app, _tx, _clock) = setup();
        let stylus = ToolRef::new("Stylus");

        let first = app.create_monitor("A").unwrap();
        app.add_tool(stylus.clone(), None).unwrap();
        app.create_monitor("B").unwrap();
        app.add_tool(stylus.clone(), None).unwrap();
        assert!(app.source().catalog().is_watched(&stylus));

        app.delete_active_monitor().unwrap();
        assert_eq!(app.active_id(), Some(first));
        assert!(app.source().catalog().is_watched(&stylus));

        app.remove_selected().unwrap();
        assert!(!app.source().catalog().is_watched(&stylus));
        assert!(app.active_monitor().unwrap().registry().is_empty());
    }

    #[test]
    fn test_remove_selected_takes_the_selected_tool() {
        let (mut app, _tx, _clock) = setup();
        app.create_monitor("Navigation").unwrap();
        for id in ["A", "B", "C"] {
            app.add_tool(ToolRef::new(id), None).unwrap();
        }
        app.selected_index = 0;
        app.move_selected_down().unwrap();
        assert_eq!(app.selected_index, 1);

        let removed = app.remove_selected().unwrap();
        assert_eq!(removed.tool(), &ToolRef::new("A"));
        assert!(!app.source().catalog().is_watched(&ToolRef::new("A")));
        assert!(app.source().catalog().is_watched(&ToolRef::new("B")));

        let labels: Vec<_> = app
            .active_monitor()
            .unwrap()
            .registry()
            .iter()
            .map(|t| t.label().to_string())
            .collect();
        assert_eq!(labels, ["B", "C"]);
        assert_eq!(app.selected_tool().unwrap().label(), "C");
    }

    #[test]
    fn test_tool_row_at_follows_table_scroll() {
        let (mut app, _tx, _clock) = setup();
        app.create_monitor("Navigation").unwrap();
        for i in 0..10 {
            app.add_tool(ToolRef::new(format!("T{i}")), None).unwrap();
        }
        app.table_view = TableView {
            area: Rect::new(0, 2, 40, 6),
            offset: 4,
        };

        // Border at row 2, header at row 3, data rows 4..7, border at row 7.
        assert_eq!(app.tool_row_at(5, 4), Some(4));
        assert_eq!(app.tool_row_at(5, 6), Some(6));
        assert_eq!(app.tool_row_at(5, 3), None);
        assert_eq!(app.tool_row_at(5, 7), None);
        assert_eq!(app.tool_row_at(5, 12), None);
        assert_eq!(app.tool_row_at(45, 4), None);

        app.table_view.offset = 8;
        assert_eq!(app.tool_row_at(5, 5), Some(9));
        assert_eq!(app.tool_row_at(5, 6), None);
    }

    #[test]
    fn test_delete_last_monitor_leaves_none_active() {
        let (mut app, _tx, _clock) = setup();
        app.create_monitor("Only").unwrap();
        app.delete_active_monitor().unwrap();
        assert!(app.active_id().is_none());
        assert!(app.selected_tool().is_none());
    }

    #[test]
    fn test_monitor_switching() {
        let (mut app, _tx, _clock) = setup();
        let a = app.create_monitor("A").unwrap();
        let b = app.new_monitor().unwrap();
        assert_eq!(app.active_monitor().unwrap().name(), "Watchdog 2");

        app.next_monitor();
        assert_eq!(app.active_id(), Some(a));
        app.prev_monitor();
        assert_eq!(app.active_id(), Some(b));
    }

    #[test]
    fn test_reorder_keeps_selection_on_tool() {
        let (mut app, _tx, _clock) = setup();
        app.create_monitor("Navigation").unwrap();
        app.add_tool(ToolRef::new("A"), None).unwrap();
        app.add_tool(ToolRef::new("B"), None).unwrap();
        assert_eq!(app.selected_index, 1);

        app.move_selected_up().unwrap();
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.selected_tool().unwrap().label(), "B");

        // Already at the top.
        app.move_selected_up().unwrap();
        assert_eq!(app.selected_index, 0);

        app.move_selected_down().unwrap();
        app.move_selected_down().unwrap();
        assert_eq!(app.selected_index, 1);
        assert_eq!(app.selected_tool().unwrap().label(), "B");
    }

    #[test]
    fn test_label_edit_and_alert_toggle() {
        let (mut app, _tx, _clock) = setup();
        app.create_monitor("Navigation").unwrap();
        app.add_tool(ToolRef::new("StylusToReference"), None).unwrap();

        app.start_label_edit().unwrap();
        app.label_edit.as_mut().unwrap().text.clear();
        for c in "Stylus".chars() {
            app.label_push(c);
        }
        app.commit_label().unwrap();
        assert_eq!(app.selected_tool().unwrap().label(), "Stylus");

        assert!(!app.toggle_selected_alert().unwrap());
        assert!(!app.selected_tool().unwrap().alert_enabled());
    }

    #[test]
    fn test_interval_steps() {
        let (mut app, _tx, _clock) = setup();
        app.create_monitor_with(
            "Fast",
            MonitorConfig {
                refresh_interval: Duration::from_millis(50),
                staleness: None,
            },
        )
        .unwrap();

        assert_eq!(app.change_interval(true).unwrap(), Duration::from_millis(100));
        app.change_interval(false).unwrap();
        assert_eq!(app.change_interval(false), Err(WatchdogError::InvalidInterval));
        assert_eq!(
            app.active_monitor().unwrap().config().refresh_interval,
            Duration::from_millis(50)
        );
    }

    #[test]
    fn test_picker_disables_watched_entries() {
        let (mut app, tx, _clock) = setup();
        app.create_monitor("Navigation").unwrap();
        tx.send(TrackerMessage::updated("Needle")).unwrap();
        tx.send(TrackerMessage::updated("Stylus")).unwrap();
        app.update();

        app.open_picker().unwrap();
        // Entries are ordered by id: Needle, Stylus.
        app.picker_move(true);
        assert_eq!(app.picker_confirm().unwrap(), Some(0));
        assert!(app.picker.is_none());

        let entries = app.picker_entries();
        assert!(!entries[0].disabled);
        assert!(entries[1].disabled);

        app.open_picker().unwrap();
        app.picker_move(true);
        assert_eq!(app.picker_confirm().unwrap(), None);
        assert_eq!(app.active_monitor().unwrap().registry().count(), 1);
    }

    #[test]
    fn test_export_state() {
        let (mut app, _tx, _clock) = setup();
        app.create_monitor("Navigation").unwrap();
        app.add_tool(ToolRef::new("Stylus"), Some("Pointer".to_string())).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["monitor"], "Navigation");
        assert_eq!(json["refresh_interval_ms"], 1000);
        assert_eq!(json["staleness_ms"], 2000);
        assert_eq!(json["tools"][0]["label"], "Pointer");
        assert_eq!(json["tools"][0]["status"], "connected");
    }
}
