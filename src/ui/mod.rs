//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`tools`]: the tool table of the active monitor and the alert log
//! - [`picker`]: overlay for adding a tool the source has reported
//! - [`detail`]: overlay with one tool's status and transition history
//! - [`common`]: header, monitor tabs, status bar and help overlay
//! - [`theme`]: light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Monitor tabs (common::render_tabs)   │
//! ├──────────────────────────────────────┤
//! │ Tool table (tools::render)           │
//! ├──────────────────────────────────────┤
//! │ Alerts (tools::render_alerts)        │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - picker::render_overlay
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod picker;
pub mod theme;
pub mod tools;

use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;

pub use theme::Theme;

use crate::app::App;

/// Draw one full frame.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(7),
        Constraint::Length(1),
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);
    tools::render(frame, app, chunks[2]);
    tools::render_alerts(frame, app, chunks[3]);
    common::render_status_bar(frame, app, chunks[4]);

    if app.show_detail_overlay {
        detail::render_overlay(frame, app, area);
    }
    if app.picker.is_some() {
        picker::render_overlay(frame, app, area);
    }
    if app.show_help {
        common::render_help(frame, app, area);
    }
}
