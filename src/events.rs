use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;
use crate::data::duration::format_duration;

/// File written by the export key.
pub const EXPORT_FILE: &str = "watchdog_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.label_edit.is_some() {
        handle_label_input(app, key);
        return;
    }

    if app.picker.is_some() {
        handle_picker_input(app, key);
        return;
    }

    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => app.go_back(),
            // Allow scrolling through tools while overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Selection
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Reordering
        KeyCode::Char('K') => {
            let result = app.move_selected_up();
            app.report(result);
        }
        KeyCode::Char('J') => {
            let result = app.move_selected_down();
            app.report(result);
        }

        // Registry edits
        KeyCode::Char('a') => {
            let result = app.open_picker();
            app.report(result);
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let result = app.remove_selected();
            if let Some(removed) = app.report(result) {
                app.set_status_message(format!("Removed {}", removed.label()));
            }
        }
        KeyCode::Char(' ') => {
            let result = app.toggle_selected_alert();
            if let Some(enabled) = app.report(result) {
                let state = if enabled { "on" } else { "off" };
                app.set_status_message(format!("Alert {}", state));
            }
        }
        KeyCode::Char('l') => {
            let result = app.start_label_edit();
            app.report(result);
        }

        // Timing
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let result = app.change_interval(true);
            if let Some(interval) = app.report(result) {
                app.set_status_message(format!("Refresh every {}", format_duration(interval)));
            }
        }
        KeyCode::Char('-') => {
            let result = app.change_interval(false);
            if let Some(interval) = app.report(result) {
                app.set_status_message(format!("Refresh every {}", format_duration(interval)));
            }
        }
        KeyCode::Char('r') => {
            let result = app.tick_now();
            if let Some(report) = app.report(result) {
                app.set_status_message(format!("{} disconnected", report.disconnected()));
            }
        }

        // Monitors
        KeyCode::Tab | KeyCode::Char(']') => app.next_monitor(),
        KeyCode::BackTab | KeyCode::Char('[') => app.prev_monitor(),
        KeyCode::Char('n') => {
            let result = app.new_monitor();
            app.report(result);
        }
        KeyCode::Char('X') => {
            let result = app.delete_active_monitor();
            app.report(result);
        }

        KeyCode::Enter => app.enter_detail(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('x') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

fn handle_picker_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_picker(),
        KeyCode::Up | KeyCode::Char('k') => app.picker_move(false),
        KeyCode::Down | KeyCode::Char('j') => app.picker_move(true),
        KeyCode::Enter => {
            let result = app.picker_confirm();
            app.report(result);
        }
        _ => {}
    }
}

fn handle_label_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let result = app.commit_label();
            app.report(result);
        }
        KeyCode::Esc => app.cancel_label_edit(),
        KeyCode::Backspace => app.label_pop(),
        KeyCode::Char(c) => app.label_push(c),
        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click to select a row of the tool table
        MouseEventKind::Down(MouseButton::Left) => {
            if app.picker.is_none() {
                if let Some(index) = app.tool_row_at(mouse.column, mouse.row) {
                    app.selected_index = index;
                }
            }
        }

        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TableView;
    use crate::clock::ManualClock;
    use crate::data::{MonitorConfig, ToolRef};
    use ratatui::layout::Rect;
    use crate::source::ChannelSource;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        App::new(Box::new(source), Box::new(ManualClock::new(0.0)), MonitorConfig::default())
    }

    #[test]
    fn test_keys_without_monitor_report_error() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('d')));
        assert_eq!(app.get_status_message(), Some("Error: no active monitor"));
        assert!(app.running);
    }

    #[test]
    fn test_label_edit_captures_keys() {
        let mut app = app();
        app.create_monitor("Navigation").unwrap();
        app.add_tool(ToolRef::new("Probe"), None).unwrap();

        handle_key_event(&mut app, key(KeyCode::Char('l')));
        assert!(app.label_edit.is_some());
        // 'q' is text here, not quit.
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        handle_key_event(&mut app, key(KeyCode::Enter));

        assert!(app.running);
        assert!(app.label_edit.is_none());
        assert_eq!(app.selected_tool().unwrap().label(), "Probeq");
    }

    #[test]
    fn test_interval_keys() {
        let mut app = app();
        app.create_monitor("Navigation").unwrap();
        handle_key_event(&mut app, key(KeyCode::Char('+')));
        assert_eq!(
            app.active_monitor().unwrap().config().refresh_interval,
            Duration::from_millis(300)
        );
        assert_eq!(app.get_status_message(), Some("Refresh every 300ms"));
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_click_selects_row_under_cursor() {
        let mut app = app();
        app.create_monitor("Navigation").unwrap();
        for i in 0..8 {
            app.add_tool(ToolRef::new(format!("T{i}")), None).unwrap();
        }
        app.table_view = TableView {
            area: Rect::new(0, 2, 40, 6),
            offset: 3,
        };

        handle_mouse_event(&mut app, click(10, 5));
        assert_eq!(app.selected_index, 4);

        // Below the table (alerts panel) nothing changes.
        handle_mouse_event(&mut app, click(10, 9));
        assert_eq!(app.selected_index, 4);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }
}
