//! Add-tool picker overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use crate::app::App;

/// Render the list of objects the source knows about.
///
/// Entries the active monitor already watches are dimmed and cannot be
/// picked.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let Some(selected) = app.picker else {
        return;
    };
    let entries = app.picker_entries();

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let mut spans = vec![Span::raw(entry.name.clone())];
            if entry.name != entry.tool.as_str() {
                spans.push(Span::styled(
                    format!("  {}", entry.tool),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
            let item = ListItem::new(Line::from(spans));
            if entry.disabled {
                item.style(Style::default().fg(app.theme.muted).add_modifier(Modifier::CROSSED_OUT))
            } else {
                item
            }
        })
        .collect();

    let title = if entries.is_empty() {
        " Add tool: nothing reported yet (Esc) ".to_string()
    } else {
        " Add tool (Enter:add Esc:cancel) ".to_string()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.highlight)),
        )
        .highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let width = 56u16.min(area.width.saturating_sub(4));
    let height = (entries.len() as u16 + 2).clamp(3, area.height.saturating_sub(2).max(3));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let picker_area = Rect::new(x, y, width, height.min(area.height));

    let mut state = ListState::default();
    if !entries.is_empty() {
        state.select(Some(selected.min(entries.len() - 1)));
    }

    frame.render_widget(Clear, picker_area);
    frame.render_stateful_widget(list, picker_area, &mut state);
}
