use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::{info, warn};

use crate::app::{App, View};

/// File written by the `e` key.
pub const EXPORT_FILE: &str = "ticket_export.json";

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

    // Detail overlay keeps list navigation so tickets can be paged through
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::PageUp => app.select_prev_n(10),
            KeyCode::PageDown => app.select_next_n(10),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            _ => {}
        }
        return;
    }

    if app.show_filter_overlay {
        handle_filter_input(app, key);
        return;
    }

    if app.search_active {
        handle_search_input(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            app.set_view(View::ALL[idx]);
        }

        // Navigation (up/down for tickets, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.enter_detail(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        KeyCode::Char('r') => match app.reload_data() {
            Ok(true) => app.set_status_message("Reloaded".to_string()),
            Ok(false) => {
                if let Some(err) = app.load_error.clone() {
                    app.set_status_message(format!("Reload failed: {}", err));
                }
            }
            Err(e) => app.set_status_message(format!("Reload failed: {}", e)),
        },

        KeyCode::Char('?') => app.toggle_help(),

        // Sorting (Tickets view)
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('S') => app.toggle_sort_direction(),

        // Filters
        KeyCode::Char('f') => app.toggle_filter_overlay(),
        KeyCode::Char('[') => app.shift_start_date(-1),
        KeyCode::Char(']') => app.shift_start_date(1),
        KeyCode::Char('{') => app.shift_end_date(-1),
        KeyCode::Char('}') => app.shift_end_date(1),
        KeyCode::Char('x') => app.reset_dates(),

        // Search (Tickets view)
        KeyCode::Char('/') => {
            if app.current_view == View::Tickets {
                app.start_search();
            }
        }
        KeyCode::Char('c') => {
            if !app.search_text.is_empty() {
                app.clear_search();
            }
        }

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    info!(path = %export_path.display(), "Exported dashboard");
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    warn!(error = %e, "Export failed");
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while search is active
fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm search
        KeyCode::Enter => {
            app.search_active = false;
        }

        // Cancel search (keep text but exit input mode)
        KeyCode::Esc => app.cancel_search(),

        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_search();
        }

        KeyCode::Backspace => {
            app.search_pop();
            if app.search_text.is_empty() {
                app.search_active = false;
            }
        }

        KeyCode::Char(c) => app.search_push(c),

        _ => {}
    }
}

/// Handle key input while the filter overlay is open
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('f') | KeyCode::Char('q') => {
            app.toggle_filter_overlay();
        }
        KeyCode::Up | KeyCode::Char('k') => app.filter_cursor_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.filter_cursor_next(),
        KeyCode::Char(' ') => app.toggle_channel_at_cursor(),
        KeyCode::Char('a') => app.select_all_channels(),

        // Date keys work inside the overlay too
        KeyCode::Char('[') => app.shift_start_date(-1),
        KeyCode::Char(']') => app.shift_start_date(1),
        KeyCode::Char('{') => app.shift_end_date(-1),
        KeyCode::Char('}') => app.shift_end_date(1),
        KeyCode::Char('x') => app.reset_dates(),

        _ => {}
    }
}

/// Tab under `column` on the tab bar, matching the layout drawn by
/// `ui::common::render_tabs` (one space padding each side, `|` divider).
fn tab_at(column: u16) -> Option<View> {
    let mut start = 0u16;
    for view in View::ALL {
        let title = format!(" {}:{} ", view.index() + 1, view.label());
        let end = start + title.chars().count() as u16 + 2;
        if column < end {
            return Some(view);
        }
        // Divider column
        if column == end {
            return None;
        }
        start = end + 1;
    }
    None
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows below the ticket table header
            if clicked_row > content_start_row && app.current_view == View::Tickets {
                let item_row = (clicked_row - content_start_row - 1) as usize + app.ticket_offset;
                if item_row < app.visible_tickets().len() {
                    app.selected_index = item_row;
                }
            }

            // Tab bar sits on row 1, after the header
            if clicked_row == 1 {
                if let Some(view) = tab_at(mouse.column) {
                    app.set_view(view);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{columns, DashboardLimits, TicketFilter, TicketRecord, TicketTable};
    use crate::source::ChannelSource;
    use chrono::{NaiveDate, TimeZone, Utc};
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        let records = ["ana", "bruno"]
            .iter()
            .map(|agent| {
                TicketRecord {
                    closed: true,
                    ..Default::default()
                }
                .with_attribute(columns::AGENT_LOGIN, *agent)
            })
            .collect();
        let table = TicketTable::new(
            vec![columns::AGENT_LOGIN.to_string(), columns::CLOSED.to_string()],
            records,
        );
        let (tx, source) = ChannelSource::create("test");
        tx.send(table).unwrap();
        let mut app = App::new(
            Box::new(source),
            TicketFilter::default(),
            DashboardLimits::default(),
        );
        app.reload_data().unwrap();
        app
    }

    /// Three closed tickets on consecutive days, channels chat/email/chat.
    fn dated_app() -> App {
        let records = [(1, "chat"), (2, "email"), (3, "chat")]
            .iter()
            .map(|(day, channel)| {
                let created = Utc.with_ymd_and_hms(2024, 3, *day, 9, 0, 0).unwrap();
                TicketRecord {
                    created_at: Some(created),
                    closed_at: Some(created + chrono::Duration::minutes(30)),
                    closed: true,
                    ..Default::default()
                }
                .with_attribute(columns::CHANNEL_NAME, *channel)
            })
            .collect();
        let table = TicketTable::new(
            vec![
                columns::CREATED_AT.to_string(),
                columns::CLOSED_AT.to_string(),
                columns::CHANNEL_NAME.to_string(),
                columns::CLOSED.to_string(),
            ],
            records,
        );
        let (tx, source) = ChannelSource::create("test");
        tx.send(table).unwrap();
        let mut app = App::new(
            Box::new(source),
            TicketFilter::default(),
            DashboardLimits::default(),
        );
        app.reload_data().unwrap();
        app
    }

    fn closed_count(app: &App) -> usize {
        app.data.as_ref().unwrap().kpis.closed_tickets
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
    fn test_number_keys_switch_views() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('4')));
        assert_eq!(app.current_view, View::Tickets);
        handle_key_event(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.current_view, View::Tabulation);
    }

    #[test]
    fn test_search_captures_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('4')));
        handle_key_event(&mut app, key(KeyCode::Char('/')));
        assert!(app.search_active);

        // 'q' is search text, not quit
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.search_text, "q");

        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(!app.search_active);
        handle_key_event(&mut app, key(KeyCode::Char('c')));
        assert!(app.search_text.is_empty());
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_filter_overlay_toggles_channels() {
        let mut app = dated_app();
        handle_key_event(&mut app, key(KeyCode::Char('f')));
        assert!(app.show_filter_overlay);

        // Options are ["chat", "email"]; move to email and drop it
        handle_key_event(&mut app, key(KeyCode::Down));
        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        assert!(!app.filter.selects_channel("email"));
        assert_eq!(closed_count(&app), 2);

        // 'q' closes the overlay instead of quitting
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_filter_overlay);
        assert!(app.running);

        handle_key_event(&mut app, key(KeyCode::Char('f')));
        handle_key_event(&mut app, key(KeyCode::Char('a')));
        assert!(app.filter.channels.is_none());
        assert_eq!(closed_count(&app), 3);
    }

    #[test]
    fn test_date_keys_step_within_bounds() {
        let mut app = dated_app();
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();

        handle_key_event(&mut app, key(KeyCode::Char(']')));
        assert_eq!(app.filter.date_range, Some((day(2), day(3))));
        assert_eq!(closed_count(&app), 2);

        handle_key_event(&mut app, key(KeyCode::Char('{')));
        assert_eq!(app.filter.date_range, Some((day(2), day(2))));
        assert_eq!(closed_count(&app), 1);

        // Start cannot move before the first ticket date
        for _ in 0..3 {
            handle_key_event(&mut app, key(KeyCode::Char('[')));
        }
        assert_eq!(app.filter.date_range, Some((day(1), day(2))));

        // End cannot move past the last ticket date
        for _ in 0..3 {
            handle_key_event(&mut app, key(KeyCode::Char('}')));
        }
        assert_eq!(app.filter.date_range, Some((day(1), day(3))));

        handle_key_event(&mut app, key(KeyCode::Char('x')));
        assert!(app.filter.date_range.is_none());
        assert_eq!(closed_count(&app), 3);
    }

    #[test]
    fn test_click_selects_row_below_scroll_offset() {
        let mut app = dated_app();
        app.set_view(View::Tickets);

        // Content starts at row 3; row 4 is the first ticket on screen
        handle_mouse_event(&mut app, click(10, 4), 3);
        assert_eq!(app.selected_index, 0);

        app.ticket_offset = 2;
        handle_mouse_event(&mut app, click(10, 4), 3);
        assert_eq!(app.selected_index, 2);

        // Past the last ticket leaves the selection alone
        handle_mouse_event(&mut app, click(10, 5), 3);
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_tab_hit_testing() {
        assert_eq!(tab_at(0), Some(View::Overview));
        // " 1:Overview " plus padding spans columns 0..14, divider at 14
        assert_eq!(tab_at(13), Some(View::Overview));
        assert_eq!(tab_at(14), None);
        assert_eq!(tab_at(15), Some(View::Tabulation));
        assert_eq!(tab_at(500), None);
    }
}
