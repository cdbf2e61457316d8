//! Filter overlay: date range and channel checklist.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::App;

use super::common::panel;

const OVERLAY_WIDTH: u16 = 44;

/// Render the filter overlay centred in `area`.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let range = match app.filter.date_range {
        Some((start, end)) => format!("{} .. {}", start, end),
        None => "all dates".to_string(),
    };
    let bounds = app
        .data
        .as_ref()
        .and_then(|d| d.date_bounds)
        .map(|(lo, hi)| format!("data spans {} .. {}", lo, hi))
        .unwrap_or_else(|| "no dated tickets".to_string());

    let mut lines = vec![
        Line::from(Span::styled(" Dates", bold)),
        Line::from(format!("  {}", range)),
        Line::from(Span::styled(format!("  {}", bounds), dim)),
        Line::from(Span::styled("  [ ] start  { } end  x reset", dim)),
        Line::from(""),
        Line::from(Span::styled(" Channels", bold)),
    ];

    let options = app.channel_options();
    if options.is_empty() {
        lines.push(Line::from(Span::styled("  (no channel column)", dim)));
    }
    for (i, channel) in options.iter().enumerate() {
        let mark = if app.filter.selects_channel(channel) {
            "[x]"
        } else {
            "[ ]"
        };
        let style = if i == app.filter_cursor {
            app.theme.selected
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!("  {} {}", mark, channel), style)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Space:toggle a:all Esc:close", dim)));

    let width = OVERLAY_WIDTH.min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    let paragraph = Paragraph::new(lines).block(panel(app, " Filters "));

    frame.render_widget(Clear, overlay_area);
    frame.render_widget(paragraph, overlay_area);
}
