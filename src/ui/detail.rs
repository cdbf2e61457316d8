//! Detail overlay rendering.
//!
//! Displays a modal overlay with every field of the selected ticket.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::duration::{format_duration, format_hours};
use crate::data::{columns, DurationField};

use super::common::panel;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the ticket detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ticket) = app.selected_ticket() else {
        return;
    };

    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 40);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let [header_area, content_area, footer_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(10),
        Constraint::Length(1),
    ])
    .areas(overlay_area);

    // Header
    let customer = ticket.attribute(columns::CUSTOMER_NAME).unwrap_or("-");
    let agent = ticket.attribute(columns::AGENT_LOGIN).unwrap_or("-");
    let status = if ticket.closed { "Closed" } else { "Open" };

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", customer),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Channel: "),
            Span::styled(
                ticket.channel().unwrap_or("-").to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Agent: "),
            Span::styled(agent.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("    Status: "),
            Span::styled(
                status,
                app.theme.closed_style(ticket.closed).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let header_block = Block::default()
        .title(" Ticket Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(header_lines).block(header_block), header_area);

    let [timeline_area, fields_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(content_area);

    // Timestamps followed by the derived durations
    let timestamp = |ts: Option<DateTime<Utc>>| {
        ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let mut timeline_rows = vec![
        Row::new(vec![Cell::from("Created"), Cell::from(timestamp(ticket.created_at))]),
        Row::new(vec![Cell::from("Attended"), Cell::from(timestamp(ticket.attended_at))]),
        Row::new(vec![Cell::from("Closed"), Cell::from(timestamp(ticket.closed_at))]),
        Row::new(vec![Cell::from("Updated"), Cell::from(timestamp(ticket.updated_at))]),
        Row::new(vec![Cell::from("Last receive"), Cell::from(timestamp(ticket.last_receive))]),
        Row::new(vec![Cell::from("Last send"), Cell::from(timestamp(ticket.last_send))]),
        Row::new(vec![Cell::from(""), Cell::from("")]),
    ];
    for field in DurationField::ALL {
        let minutes = ticket.durations.get(field);
        timeline_rows.push(Row::new(vec![
            Cell::from(format!("{} time", field.label())),
            Cell::from(format!(
                "{} ({})",
                format_duration(minutes),
                format_hours(minutes.map(|m| m as f64))
            ))
            .style(app.theme.kpi_value),
        ]));
    }

    let timeline = Table::new(timeline_rows, [Constraint::Length(14), Constraint::Fill(1)])
        .block(panel(app, " Timeline "));
    frame.render_widget(timeline, timeline_area);

    // Remaining text columns
    let field_rows: Vec<Row> = ticket
        .attributes
        .iter()
        .map(|(key, value)| Row::new(vec![Cell::from(key.clone()), Cell::from(value.clone())]))
        .collect();
    let fields = Table::new(field_rows, [Constraint::Length(20), Constraint::Fill(1)])
        .header(
            Row::new(vec![Cell::from("Field"), Cell::from("Value")])
                .height(1)
                .style(app.theme.header),
        )
        .block(panel(app, format!(" Fields ({}) ", ticket.attributes.len())));
    frame.render_widget(fields, fields_area);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, footer_area);
}
