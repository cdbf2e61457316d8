//! Overview view rendering.
//!
//! Shows the headline KPIs and the per-channel breakdown of total versus
//! closed tickets.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_kpi;
use crate::data::{DashboardData, DurationField};

use super::common::{format_count, panel, render_placeholder};

/// Render the Overview view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let [counts_area, averages_area, channels_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Min(6),
    ])
    .areas(area);

    render_counts(frame, app, data, counts_area);
    render_averages(frame, app, data, averages_area);
    render_channels(frame, app, data, channels_area);
}

fn render_counts(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    let kpis = &data.kpis;
    let cards = [
        ("Tickets", kpis.total_tickets),
        ("Closed", kpis.closed_tickets),
        ("Companies", kpis.companies),
        ("Channel types", kpis.channel_types),
    ];
    let areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

    for ((title, value), card_area) in cards.into_iter().zip(areas.iter()) {
        render_card(frame, app, title, format_count(value as u64), *card_area);
    }
}

fn render_averages(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    let areas = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
    let fields = [
        DurationField::HandlingTime,
        DurationField::WaitTime,
        DurationField::CycleTime,
    ];

    for (field, card_area) in fields.into_iter().zip(areas.iter()) {
        let title = format!("Avg {} time", field.label().to_lowercase());
        render_card(frame, app, &title, format_kpi(data.kpis.average(field)), *card_area);
    }
}

fn render_card(frame: &mut Frame, app: &App, title: &str, value: String, area: Rect) {
    let paragraph = Paragraph::new(vec![Line::from(Span::styled(value, app.theme.kpi_value))])
        .alignment(Alignment::Center)
        .block(panel(app, format!(" {} ", title)));
    frame.render_widget(paragraph, area);
}

fn render_channels(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    if data.channels.is_empty() {
        render_placeholder(frame, app, area, "Channels", "No channel data available");
        return;
    }

    let groups: Vec<BarGroup> = data
        .channels
        .iter()
        .map(|c| {
            BarGroup::default()
                .label(Line::from(c.channel.as_str()))
                .bars(&[
                    Bar::default()
                        .value(c.total as u64)
                        .text_value(format!("{} total", format_count(c.total as u64)))
                        .style(Style::default().fg(app.theme.bar_total)),
                    Bar::default()
                        .value(c.closed as u64)
                        .text_value(format!("{} closed", format_count(c.closed as u64)))
                        .style(Style::default().fg(app.theme.bar_closed)),
                ])
        })
        .collect();

    let legend = Line::from(vec![
        Span::raw(" Channels "),
        Span::styled("■ total ", Style::default().fg(app.theme.bar_total)),
        Span::styled("■ closed ", Style::default().fg(app.theme.bar_closed)),
    ]);

    let mut chart = BarChart::default()
        .block(panel(app, legend))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(1)
        .value_style(Style::default().add_modifier(Modifier::BOLD));
    for group in groups {
        chart = chart.data(group);
    }

    frame.render_widget(chart, area);
}
