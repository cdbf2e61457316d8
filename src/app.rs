//! Application state and navigation logic.

use anyhow::Result;
use tracing::debug;

use crate::data::{DashboardData, DashboardLimits, TicketFilter, TicketRecord, TicketTable};
use crate::source::DataSource;
use crate::ui::tickets::{sort_tickets_by, TicketSortColumn};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Ticket detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// KPIs and the per-channel breakdown.
    Overview,
    /// Distribution of closed tickets by tabulation.
    Tabulation,
    /// Top customers and agents.
    Rankings,
    /// Table of closed tickets.
    Tickets,
}

impl View {
    pub const ALL: [View; 4] = [View::Overview, View::Tabulation, View::Rankings, View::Tickets];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Tabulation,
            View::Tabulation => View::Rankings,
            View::Rankings => View::Tickets,
            View::Tickets => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Tickets,
            View::Tabulation => View::Overview,
            View::Rankings => View::Tabulation,
            View::Tickets => View::Rankings,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Tabulation => "Tabulation",
            View::Rankings => "Rankings",
            View::Tickets => "Tickets",
        }
    }

    /// Position of this view in the tab bar.
    pub fn index(&self) -> usize {
        match self {
            View::Overview => 0,
            View::Tabulation => 1,
            View::Rankings => 2,
            View::Tickets => 3,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,
    pub show_filter_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    table: Option<TicketTable>,
    pub data: Option<DashboardData>,
    pub load_error: Option<String>,
    pub filter: TicketFilter,
    pub limits: DashboardLimits,

    // Navigation state (Tickets view)
    pub selected_index: usize,
    /// First ticket row on screen, as last rendered.
    pub ticket_offset: usize,

    // Channel list cursor in the filter overlay
    pub filter_cursor: usize,

    // Sorting (Tickets view)
    pub sort_column: TicketSortColumn,
    pub sort_ascending: bool,

    // Search
    pub search_text: String,
    pub search_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App reading from `source` with an explicit filter.
    pub fn new(source: Box<dyn DataSource>, filter: TicketFilter, limits: DashboardLimits) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_detail_overlay: false,
            show_filter_overlay: false,
            source,
            table: None,
            data: None,
            load_error: None,
            filter,
            limits,
            selected_index: 0,
            ticket_offset: 0,
            filter_cursor: 0,
            sort_column: TicketSortColumn::default(),
            sort_ascending: true,
            search_text: String::new(),
            search_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for a new table.
    ///
    /// Returns Ok(true) if new data was received, Ok(false) otherwise.
    pub fn reload_data(&mut self) -> Result<bool> {
        if let Some(table) = self.source.poll() {
            debug!(tickets = table.len(), "Rebuilding dashboard");
            self.table = Some(table);
            self.load_error = None;
            self.rebuild();
            return Ok(true);
        }

        // Keep showing the last good table but surface the error
        if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
        }
        Ok(false)
    }

    /// Recompute dashboard data from the current table and filter.
    pub fn rebuild(&mut self) {
        if let Some(ref table) = self.table {
            self.data = Some(DashboardData::build(table, &self.filter, &self.limits));
        }
        self.clamp_selection();
    }

    /// Replace the filter and recompute.
    pub fn set_filter(&mut self, filter: TicketFilter) {
        self.filter = filter;
        self.rebuild();
    }

    /// Channels that can be toggled in the filter overlay.
    pub fn channel_options(&self) -> &[String] {
        self.data.as_ref().map(|d| d.channel_options.as_slice()).unwrap_or_default()
    }

    /// Open or close the filter overlay.
    pub fn toggle_filter_overlay(&mut self) {
        self.show_filter_overlay = !self.show_filter_overlay;
        self.filter_cursor = self.filter_cursor.min(self.channel_options().len().saturating_sub(1));
    }

    pub fn filter_cursor_next(&mut self) {
        let max = self.channel_options().len().saturating_sub(1);
        self.filter_cursor = (self.filter_cursor + 1).min(max);
    }

    pub fn filter_cursor_prev(&mut self) {
        self.filter_cursor = self.filter_cursor.saturating_sub(1);
    }

    /// Toggle the channel under the filter cursor.
    pub fn toggle_channel_at_cursor(&mut self) {
        let options = self.channel_options();
        let Some(channel) = options.get(self.filter_cursor) else {
            return;
        };
        let filter = self.filter.with_channel_toggled(channel, options);
        self.set_filter(filter);
    }

    /// Select every channel again.
    pub fn select_all_channels(&mut self) {
        self.set_filter(self.filter.with_all_channels());
    }

    /// Move the start of the date range, clamped to the table's dates.
    pub fn shift_start_date(&mut self, days: i64) {
        if let Some(bounds) = self.data.as_ref().and_then(|d| d.date_bounds) {
            self.set_filter(self.filter.with_start_shifted(days, bounds));
        }
    }

    /// Move the end of the date range, clamped to the table's dates.
    pub fn shift_end_date(&mut self, days: i64) {
        if let Some(bounds) = self.data.as_ref().and_then(|d| d.date_bounds) {
            self.set_filter(self.filter.with_end_shifted(days, bounds));
        }
    }

    /// Drop the date range.
    pub fn reset_dates(&mut self) {
        self.set_filter(self.filter.without_date_range());
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_ticket_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        if self.current_view == View::Tickets {
            let max = self.visible_ticket_count().saturating_sub(1);
            self.selected_index = (self.selected_index + n).min(max);
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        if self.current_view == View::Tickets {
            self.selected_index = self.selected_index.saturating_sub(n);
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_index = self.visible_ticket_count().saturating_sub(1);
    }

    /// Ticket table rows after search and sort, as shown on screen.
    pub fn visible_tickets(&self) -> Vec<&TicketRecord> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };

        let mut tickets: Vec<&TicketRecord> =
            data.table_rows().iter().filter(|t| self.matches_search(t)).collect();
        sort_tickets_by(&mut tickets, self.sort_column, self.sort_ascending);
        tickets
    }

    fn visible_ticket_count(&self) -> usize {
        match self.data {
            Some(ref data) if self.search_text.is_empty() => data.table_rows().len(),
            Some(ref data) => data.table_rows().iter().filter(|t| self.matches_search(t)).count(),
            None => 0,
        }
    }

    /// The ticket under the cursor in the Tickets view.
    pub fn selected_ticket(&self) -> Option<&TicketRecord> {
        self.visible_tickets().get(self.selected_index).copied()
    }

    /// Open the detail overlay for the selected ticket.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Tickets && self.selected_ticket().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then go to Overview.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.current_view != View::Overview {
            self.current_view = View::Overview;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column (Tickets view).
    pub fn cycle_sort(&mut self) {
        if self.current_view == View::Tickets {
            self.sort_column = self.sort_column.next();
        }
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        if self.current_view == View::Tickets {
            self.sort_ascending = !self.sort_ascending;
        }
    }

    /// Enter search input mode.
    pub fn start_search(&mut self) {
        self.search_active = true;
    }

    /// Exit search input mode without clearing the search text.
    pub fn cancel_search(&mut self) {
        self.search_active = false;
    }

    /// Clear the search text and exit search mode.
    pub fn clear_search(&mut self) {
        self.search_text.clear();
        self.search_active = false;
    }

    /// Append a character to the search text.
    pub fn search_push(&mut self, c: char) {
        self.search_text.push(c);
        self.clamp_selection();
    }

    /// Remove the last character from the search text.
    pub fn search_pop(&mut self) {
        self.search_text.pop();
    }

    /// Check if a ticket matches the current search in any text column.
    pub fn matches_search(&self, ticket: &TicketRecord) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let search = self.search_text.to_lowercase();
        ticket.attributes.values().any(|v| v.to_lowercase().contains(&search))
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current dashboard to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };
        crate::export::write_export(data, path)
    }
}
