//! # tool-watchdog
//!
//! A liveness watchdog for tracked navigation tools.
//!
//! A watchdog keeps an ordered list of tracked objects (tool markers,
//! reference frames) and checks at a fixed cadence whether each one is still
//! producing data. A tool that has been silent for longer than the staleness
//! threshold, or whose object was removed, is shown as disconnected, and the
//! moment it goes down an alert is raised for it (once per disconnection, and
//! only if the tool's alert is switched on).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │    │   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ monitors │    │(ratatui)│    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource | ChannelSource  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: the UI-free core. [`Registry`], liveness evaluation,
//!   [`Scheduler`], and [`Monitor`] which ties them together with observers
//! - **[`source`]**: where updates come from ([`ToolSource`]) and how names
//!   and validity are looked up ([`ToolDirectory`])
//! - **[`app`]**: presentation state and user actions over a [`MonitorSet`]
//! - **[`ui`]**: terminal rendering
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a tracker snapshot file
//! watchdog --file tools.json
//!
//! # Watch a TCP feed of newline-delimited tracker messages
//! watchdog --connect localhost:9090
//!
//! # Try it against a simulated tracker
//! watchdog --demo --refresh 100ms --staleness 500ms
//! ```
//!
//! ### Driving a monitor directly
//!
//! ```
//! use std::time::Duration;
//! use tool_watchdog::{Monitor, MonitorConfig, MonitorId, ToolDirectory, ToolRef, ToolStatus};
//!
//! struct Tracker;
//!
//! impl ToolDirectory for Tracker {
//!     fn display_name(&self, tool: &ToolRef) -> Option<String> {
//!         Some(tool.to_string())
//!     }
//!
//!     fn is_valid(&self, _tool: &ToolRef) -> bool {
//!         true
//!     }
//! }
//!
//! let config = MonitorConfig {
//!     refresh_interval: Duration::from_secs(1),
//!     staleness: None,
//! };
//! let mut monitor = Monitor::new(MonitorId(1), "Navigation", config, 0.0).unwrap();
//! monitor.subscribe(|event| println!("{:?}", event));
//! monitor.add_tool(ToolRef::new("Stylus"), None, 0.0, &Tracker).unwrap();
//!
//! let report = monitor.poll(1.0, &Tracker).unwrap();
//! assert_eq!(report.alerts.len(), 1);
//! assert_eq!(monitor.registry().get(0).unwrap().status(), ToolStatus::Disconnected);
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use tool_watchdog::{App, ChannelSource, MonitorConfig, MonotonicClock, ToolRef};
//!
//! let (tx, source) = ChannelSource::create("tracker");
//! let mut app = App::new(Box::new(source), Box::new(MonotonicClock::new()), MonitorConfig::default());
//! app.create_monitor("Navigation").unwrap();
//! app.add_tool(ToolRef::new("StylusToReference"), Some("Stylus".to_string())).unwrap();
//! ```
//!
//! ### As a library with stream source (TCP, etc.)
//!
//! ```no_run
//! use std::io::Cursor;
//! use tool_watchdog::{App, MonitorConfig, MonotonicClock, StreamSource};
//!
//! # tokio_test::block_on(async {
//! // Example with a cursor (in practice, use TcpStream)
//! let data = b"{\"event\":\"updated\",\"id\":\"Stylus\"}\n";
//! let source = StreamSource::spawn(Cursor::new(data.to_vec()), "example");
//! let app = App::new(Box::new(source), Box::new(MonotonicClock::new()), MonitorConfig::default());
//! # });
//! ```

pub mod app;
pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::WatchdogConfig;
pub use data::{
    Alert, Monitor, MonitorConfig, MonitorId, MonitorSet, Registry, Scheduler, TickReport, ToolId,
    ToolRef, ToolStatus, WatchdogEvent, WatchedTool,
};
pub use error::{Result, WatchdogError};
pub use source::{
    Catalog, ChannelSource, FileSource, SerializedToolState, StreamSource, ToolDirectory, ToolSource,
    ToolUpdate, TrackerMessage, TrackerSnapshot, UpdateKind,
};
