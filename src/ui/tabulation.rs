//! Tabulation view rendering.
//!
//! Distribution of closed tickets by tabulation comment. The chart switches
//! to horizontal bars when there are too many categories to label.

use ratatui::{layout::Rect, Frame};

use crate::app::App;

use super::common::{count_chart, render_placeholder};

/// Render the Tabulation view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let Some(ref tabulations) = data.tabulations else {
        render_placeholder(frame, app, area, "Tabulation", "Column tabulation_comment not found");
        return;
    };

    if tabulations.is_empty() {
        render_placeholder(frame, app, area, "Tabulation", "No closed tickets to display");
        return;
    }

    let title = format!(" Closed tickets by tabulation ({}) ", tabulations.len());
    let chart = count_chart(app, title, tabulations, data.tabulation_horizontal(), area);
    frame.render_widget(chart, area);
}
