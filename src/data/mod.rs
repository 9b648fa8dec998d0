//! Watchdog core: tools, registries, liveness and scheduling.
//!
//! Nothing in here touches the terminal or the tracking hardware. Time is
//! passed in as seconds from a [`crate::Clock`], and object names and
//! validity come through [`crate::ToolDirectory`].
//!
//! ## Submodules
//!
//! - [`tool`]: identities ([`ToolRef`], [`ToolId`]) and the [`WatchedTool`] entry
//! - [`registry`]: the ordered list of watched tools
//! - [`liveness`]: stale-or-not classification of every entry
//! - [`scheduler`]: when the next tick is due
//! - [`monitor`]: a registry with its cadence and observers ([`Monitor`], [`MonitorSet`])
//! - [`history`]: per-tool status transitions for the detail view
//! - [`duration`]: parsing and formatting of durations ("250ms", "Disconnected 3 [s]")
//!
//! ## Data Flow
//!
//! ```text
//! ToolUpdate (from a source)
//!        │
//!        ▼
//! MonitorSet::route() ──▶ Monitor::on_updated() / on_invalidated()
//!
//! Scheduler due
//!        │
//!        ▼
//! Monitor::tick() ──▶ liveness::evaluate() ──▶ History::record_tick()
//!        │
//!        └──▶ observers: TableUpdated, then one Alert per tool that went down
//! ```

pub mod duration;
pub mod history;
pub mod liveness;
pub mod monitor;
pub mod registry;
pub mod scheduler;
pub mod tool;

pub use history::{History, Transition};
pub use liveness::Evaluation;
pub use monitor::{
    Alert, Monitor, MonitorConfig, MonitorId, MonitorSet, ObserverId, TickReport, WatchdogEvent,
    DEFAULT_REFRESH_INTERVAL,
};
pub use registry::Registry;
pub use scheduler::Scheduler;
pub use tool::{ToolId, ToolRef, ToolStatus, WatchedTool};
