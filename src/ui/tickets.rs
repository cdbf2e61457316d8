//! Tickets view rendering.
//!
//! Displays the closed tickets in a sortable, searchable table with their
//! derived durations.

use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_duration;
use crate::data::{columns, DurationField, TicketRecord};

use super::common::{panel, render_placeholder};

/// Column to sort by in the Tickets view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketSortColumn {
    /// Sort by creation time.
    #[default]
    Created,
    /// Sort by channel name.
    Channel,
    /// Sort by agent login.
    Agent,
    /// Sort by wait time.
    Wait,
    /// Sort by handling time.
    Handling,
    /// Sort by cycle time.
    Cycle,
}

impl TicketSortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            TicketSortColumn::Created => TicketSortColumn::Channel,
            TicketSortColumn::Channel => TicketSortColumn::Agent,
            TicketSortColumn::Agent => TicketSortColumn::Wait,
            TicketSortColumn::Wait => TicketSortColumn::Handling,
            TicketSortColumn::Handling => TicketSortColumn::Cycle,
            TicketSortColumn::Cycle => TicketSortColumn::Created,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketSortColumn::Created => "created",
            TicketSortColumn::Channel => "channel",
            TicketSortColumn::Agent => "agent",
            TicketSortColumn::Wait => "wait",
            TicketSortColumn::Handling => "handling",
            TicketSortColumn::Cycle => "cycle",
        }
    }
}

/// Render the Tickets view.
///
/// The table's scroll offset is written back to `app.ticket_offset` so mouse
/// clicks can be mapped to the rows actually on screen.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    if data.closed.is_empty() {
        render_placeholder(frame, app, area, "Tickets", "No closed tickets to display");
        return;
    }

    let [table_area, caption_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    let tickets = app.visible_tickets();

    let header = Row::new(vec![
        Cell::from(format_header("Created", TicketSortColumn::Created, app)),
        Cell::from(format_header("Channel", TicketSortColumn::Channel, app)),
        Cell::from("Customer"),
        Cell::from(format_header("Agent", TicketSortColumn::Agent, app)),
        Cell::from("Tabulation"),
        Cell::from(format_header("Wait", TicketSortColumn::Wait, app)),
        Cell::from(format_header("Handling", TicketSortColumn::Handling, app)),
        Cell::from(format_header("Cycle", TicketSortColumn::Cycle, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = tickets
        .iter()
        .map(|t| {
            let text = |column: &str| t.attribute(column).unwrap_or("-").to_string();
            Row::new(vec![
                Cell::from(
                    t.created_at
                        .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(text(columns::CHANNEL_NAME)),
                Cell::from(text(columns::CUSTOMER_NAME)),
                Cell::from(text(columns::AGENT_LOGIN)),
                Cell::from(text(columns::TABULATION_COMMENT)),
                duration_cell(t, DurationField::WaitTime),
                duration_cell(t, DurationField::HandlingTime),
                duration_cell(t, DurationField::CycleTime),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
    ];

    let selected = app.selected_index.min(tickets.len().saturating_sub(1));

    let search_info = if app.search_active {
        format!(" /{}_", app.search_text)
    } else if !app.search_text.is_empty() {
        format!(" /{}/ [c:clear]", app.search_text)
    } else {
        String::new()
    };

    let position_info = if !tickets.is_empty() {
        format!(" [{}/{}]", selected + 1, tickets.len())
    } else {
        String::new()
    };

    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };
    let title = format!(
        " Closed tickets [s:sort {}{}]{}{} ",
        app.sort_column.label(),
        sort_dir,
        search_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(app, title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default()
        .with_offset(app.ticket_offset)
        .with_selected(Some(selected));

    frame.render_stateful_widget(table, table_area, &mut state);

    let caption = Paragraph::new(format!(" {}", data.table_caption()))
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(caption, caption_area);

    app.ticket_offset = state.offset();
}

fn duration_cell(ticket: &TicketRecord, field: DurationField) -> Cell<'static> {
    Cell::from(format_duration(ticket.durations.get(field)))
}

fn format_header(name: &str, col: TicketSortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort tickets by the given column and direction.
///
/// Missing values sort first when ascending. Ties fall back to creation time.
pub fn sort_tickets_by(tickets: &mut [&TicketRecord], column: TicketSortColumn, ascending: bool) {
    tickets.sort_by(|a, b| {
        let primary = match column {
            TicketSortColumn::Created => a.created_at.cmp(&b.created_at),
            TicketSortColumn::Channel => cmp_attr(a, b, columns::CHANNEL_NAME),
            TicketSortColumn::Agent => cmp_attr(a, b, columns::AGENT_LOGIN),
            TicketSortColumn::Wait => cmp_duration(a, b, DurationField::WaitTime),
            TicketSortColumn::Handling => cmp_duration(a, b, DurationField::HandlingTime),
            TicketSortColumn::Cycle => cmp_duration(a, b, DurationField::CycleTime),
        };

        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        if primary == Ordering::Equal {
            a.created_at.cmp(&b.created_at)
        } else {
            primary
        }
    });
}

fn cmp_attr(a: &TicketRecord, b: &TicketRecord, column: &str) -> Ordering {
    a.attribute(column).cmp(&b.attribute(column))
}

fn cmp_duration(a: &TicketRecord, b: &TicketRecord, field: DurationField) -> Ordering {
    a.durations.get(field).cmp(&b.durations.get(field))
}
