//! Detail overlay rendering.
//!
//! Displays a modal overlay with everything known about the selected tool,
//! including its recent status transitions.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::ToolStatus;
use crate::ui::tools::status_text;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the selected tool as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Ok(monitor) = app.active_monitor() else {
        return;
    };
    let Some(tool) = app.selected_tool() else {
        return;
    };
    let history = monitor.history();

    let overlay_width = (area.width * 90 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 85 / 100).clamp(MIN_OVERLAY_HEIGHT, 40);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let last_disconnect = history
        .last_disconnect(tool.id())
        .map(|at| format!("{:.1}s", at))
        .unwrap_or_else(|| "never".to_string());

    let header_lines = vec![
        Line::from(vec![Span::styled(format!(" {} ", tool.label()), bold)]),
        Line::from(vec![
            Span::raw(" Object: "),
            Span::styled(tool.tool().to_string(), bold),
            Span::raw("    Name: "),
            Span::styled(tool.name().to_string(), bold),
            Span::raw(format!("    Id: {}", tool.id())),
        ]),
        Line::from(vec![
            Span::raw(" Status: "),
            Span::styled(
                status_text(tool),
                app.theme.status_style(tool.status()).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("    Last seen: {:.1}s", tool.last_seen())),
            Span::raw(if tool.is_valid() { "" } else { "    (object removed)" }),
        ]),
        Line::from(vec![
            Span::raw(" Alert: "),
            Span::styled(if tool.alert_enabled() { "on" } else { "off" }, bold),
            Span::raw("    Disconnections: "),
            Span::styled(history.disconnect_count(tool.id()).to_string(), bold),
            Span::raw(format!("    Last: {}", last_disconnect)),
        ]),
    ];

    let header_block = Block::default()
        .title(" Tool Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== TRANSITIONS =====
    let transitions: Vec<_> = history.transitions(tool.id()).collect();
    let rows: Vec<Row> = transitions
        .iter()
        .rev()
        .map(|t| {
            let to = match t.to {
                ToolStatus::Connected => "reconnected",
                ToolStatus::Disconnected => "disconnected",
            };
            Row::new(vec![
                Cell::from(format!("{:.1}s", t.at)),
                Cell::from(t.from.symbol()),
                Cell::from(to).style(app.theme.status_style(t.to)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![Cell::from("At"), Cell::from("From"), Cell::from("Event")])
                .style(app.theme.header),
        )
        .block(
            Block::default()
                .title(format!(" History ({}) ", transitions.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
    frame.render_widget(table, chunks[1]);

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}
