//! Tool table rendering.
//!
//! One row per watched tool of the active monitor, in registry order.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, TableView};
use crate::data::duration::{format_disconnected, format_duration};
use crate::data::{ToolStatus, WatchedTool};

/// Text of the status cell.
pub fn status_text(tool: &WatchedTool) -> String {
    match tool.status() {
        ToolStatus::Connected => tool.status().symbol().to_string(),
        ToolStatus::Disconnected => format_disconnected(tool.elapsed()),
    }
}

/// Render the tool table of the active monitor.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    app.table_view = TableView { area, offset: 0 };
    let Ok(monitor) = app.active_monitor() else {
        let hint = Paragraph::new(" No monitor. Press n to create one.")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(app.theme.border_type)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        frame.render_widget(hint, area);
        return;
    };
    let registry = monitor.registry();

    let header = Row::new(vec![
        Cell::from("Label"),
        Cell::from("Name"),
        Cell::from("Alert"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = registry
        .iter()
        .map(|tool| {
            let alert = if tool.alert_enabled() {
                Cell::from("[x]")
            } else {
                Cell::from("[ ]").style(Style::default().fg(app.theme.muted))
            };
            let label = match app.label_edit.as_ref() {
                Some(edit) if edit.tool == tool.id() => {
                    Cell::from(format!("{}_", edit.text)).style(Style::default().fg(app.theme.highlight))
                }
                _ => Cell::from(tool.label().to_string()),
            };

            Row::new(vec![
                label,
                Cell::from(tool.name().to_string()),
                alert,
                Cell::from(status_text(tool)).style(app.theme.status_style(tool.status())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(6),
        Constraint::Min(20),
    ];

    let selected = app.selected_index.min(registry.count().saturating_sub(1));
    let position_info = if registry.is_empty() {
        " [a:add]".to_string()
    } else {
        format!(" [{}/{}]", selected + 1, registry.count())
    };
    let title = format!(
        " {} | every {} | stale after {}{} ",
        monitor.name(),
        format_duration(monitor.config().refresh_interval),
        format_duration(monitor.config().threshold()),
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !registry.is_empty() {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
    app.table_view = TableView {
        area,
        offset: state.offset(),
    };
}

/// Render the most recent alerts, newest first.
pub fn render_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .alert_log
        .iter()
        .map(|entry| {
            let reason = if entry.alert.invalidated { "removed" } else { "stale" };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>9.1}s ", entry.at), Style::default().add_modifier(Modifier::DIM)),
                Span::styled(entry.alert.label.clone(), Style::default().fg(app.theme.disconnected)),
                Span::raw(format!(" ({}, {})", entry.monitor, reason)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Alerts ({}) ", app.alert_log.len()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Registry, ToolRef};

    #[test]
    fn test_status_text() {
        let mut registry = Registry::new();
        registry.add(ToolRef::new("Probe"), "Probe", "Probe", 0.0).unwrap();
        let tool = registry.get(0).unwrap();
        assert_eq!(status_text(tool), "OK");
    }
}
