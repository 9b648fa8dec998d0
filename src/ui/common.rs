//! Common UI components shared across views.
//!
//! This module contains the header bar, monitor tabs, status bar, and help
//! overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::data::ToolStatus;

/// Render the header bar with liveness counts for the active monitor.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Ok(monitor) = app.active_monitor() else {
        let line = Line::from(vec![
            Span::styled(" WATCHDOG ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("│ no active monitor │ "),
            Span::raw(app.source_description().to_string()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let registry = monitor.registry();
    let disconnected = registry
        .iter()
        .filter(|t| t.status() == ToolStatus::Disconnected)
        .count();
    let connected = registry.count() - disconnected;

    let status_icon_style = if disconnected > 0 {
        app.theme.status_style(ToolStatus::Disconnected)
    } else {
        app.theme.status_style(ToolStatus::Connected)
    };

    let line = Line::from(vec![
        Span::styled(" ● ", status_icon_style),
        Span::styled("WATCHDOG ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", connected), Style::default().fg(app.theme.connected)),
        Span::raw(" ok "),
        if disconnected > 0 {
            Span::styled(
                format!("{}", disconnected),
                Style::default().fg(app.theme.disconnected).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" lost │ "),
        Span::styled(format!("{}", registry.count()), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" tools │ "),
        Span::raw(app.source_description().to_string()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render one tab per monitor, highlighting the active one.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .monitors()
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let lost = m
                .registry()
                .iter()
                .filter(|t| t.status() == ToolStatus::Disconnected)
                .count();
            if lost > 0 {
                Line::from(vec![
                    Span::raw(format!(" {}:{} ", i + 1, m.name())),
                    Span::styled(format!("!{} ", lost), Style::default().fg(app.theme.disconnected)),
                ])
            } else {
                Line::from(format!(" {}:{} ", i + 1, m.name()))
            }
        })
        .collect();

    let selected = app.active_id().and_then(|id| app.monitors().position(id));

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Temporary messages (alerts, action results) win over the key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let color = if msg.starts_with("ALERT") || msg.starts_with("Error") {
            app.theme.disconnected
        } else {
            app.theme.highlight
        };
        let paragraph = Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(color));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.label_edit.is_some() {
        "Type label | Enter:save Esc:cancel"
    } else if app.picker.is_some() {
        "↑↓:select Enter:add Esc:cancel"
    } else {
        "a:add d:remove space:alert l:label K/J:move +/-:rate Tab:monitor ?:help q:quit"
    };

    let status = match app.load_error {
        Some(ref err) => format!(" Source: {} | {}", err, controls),
        None => format!(" t={:.1}s | {}", app.now(), controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Tools"),
        Line::from("  ↑/↓ j/k     Select tool"),
        Line::from("  K/J         Move tool up/down"),
        Line::from("  a           Add tool"),
        Line::from("  d/Del       Remove tool"),
        Line::from("  space       Toggle alert"),
        Line::from("  l           Edit label"),
        Line::from("  Enter       Tool detail"),
        Line::from(""),
        section(" Monitors"),
        Line::from("  Tab [ ]     Switch monitor"),
        Line::from("  n           New monitor"),
        Line::from("  X           Delete monitor"),
        Line::from("  +/-         Refresh interval ±50ms"),
        Line::from("  r           Tick now"),
        Line::from(""),
        section(" General"),
        Line::from("  x           Export to JSON"),
        Line::from("  Esc         Close overlay"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 28u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
