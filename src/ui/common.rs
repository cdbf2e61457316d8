//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay
//! and the bar chart used by the breakdown views.

use ratatui::{
    layout::{Direction, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with the headline counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(" TICKETWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let kpis = &data.kpis;
    let open = kpis.total_tickets.saturating_sub(kpis.closed_tickets);

    let line = Line::from(vec![
        Span::styled(" ● ", Style::default().fg(app.theme.highlight)),
        Span::styled("TICKETWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format_count(kpis.closed_tickets as u64),
            Style::default().fg(app.theme.closed),
        ),
        Span::raw(" closed "),
        if open > 0 {
            Span::styled(format_count(open as u64), Style::default().fg(app.theme.open))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" open │ "),
        Span::styled(
            format!("{}", kpis.total_tickets),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" tickets │ "),
        Span::raw(data.filter.describe()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|v| Line::from(format!(" {}:{} ", v.index() + 1, v.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let elapsed = data.last_updated.elapsed();

        let controls = match app.current_view {
            View::Tickets if app.search_active => "Type to search | Enter:apply Esc:cancel",
            View::Tickets => "/:search s:sort S:reverse Enter:detail ?:help q:quit",
            _ => "Tab:switch f:filter r:reload e:export ?:help q:quit",
        };

        let warning = app
            .load_error
            .as_ref()
            .map(|e| format!(" | ⚠ {}", e))
            .unwrap_or_default();

        format!(
            " {} | Updated {:.1}s ago | {}{}",
            app.source_description(),
            elapsed.as_secs_f64(),
            controls,
            warning,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Standard bordered block used by every panel.
pub fn panel<'a>(app: &App, title: impl Into<Line<'a>>) -> Block<'a> {
    let title: Line<'a> = title.into();
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

/// Render a message inside a bordered panel (used for empty states).
pub fn render_placeholder(frame: &mut Frame, app: &App, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(panel(app, format!(" {} ", title)));
    frame.render_widget(paragraph, area);
}

/// Bar chart of `(label, count)` entries.
///
/// Horizontal charts list one bar per row; vertical charts size bars to
/// fit the available width.
pub fn count_chart<'a>(
    app: &App,
    title: String,
    entries: &'a [(String, usize)],
    horizontal: bool,
    area: Rect,
) -> BarChart<'a> {
    let bars: Vec<Bar> = entries
        .iter()
        .map(|(label, count)| {
            Bar::default()
                .value(*count as u64)
                .label(Line::from(label.as_str()))
                .text_value(format_count(*count as u64))
                .style(Style::default().fg(app.theme.bar_total))
        })
        .collect();

    let chart = BarChart::default().block(panel(app, title)).data(BarGroup::default().bars(&bars));

    if horizontal {
        chart.direction(Direction::Horizontal).bar_width(1).bar_gap(0)
    } else {
        let inner = area.width.saturating_sub(2);
        let per_bar = inner / (entries.len().max(1) as u16);
        let width = per_bar.saturating_sub(1).clamp(1, 12);
        chart.bar_width(width).bar_gap(1)
    }
}

/// Render the help overlay with keyboard shortcuts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1-4         Jump to view"),
        Line::from("  ↑/↓ j/k     Navigate tickets"),
        Line::from("  PgUp/PgDn   Jump 10 tickets"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Ticket detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Tickets",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start search"),
        Line::from("  c         Clear search"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Filters",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  f         Channel filter"),
        Line::from("  [ / ]     Move start date"),
        Line::from("  { / }     Move end date"),
        Line::from("  x         Clear date range"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload file"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
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

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 33u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(2_500_000), "2.5M");
    }
}
