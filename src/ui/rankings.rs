//! Rankings view rendering.
//!
//! Top customers and top agents by closed tickets, side by side.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

use crate::app::App;

use super::common::{count_chart, render_placeholder};

/// Render the Rankings view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let [customers_area, agents_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    let top_n = data.limits.top_n;
    render_ranking(
        frame,
        app,
        customers_area,
        &format!("Top {} customers", top_n),
        data.top_customers.as_deref(),
        "customer_name",
    );
    render_ranking(
        frame,
        app,
        agents_area,
        &format!("Top {} agents", top_n),
        data.top_agents.as_deref(),
        "agent_login",
    );
}

fn render_ranking(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    entries: Option<&[(String, usize)]>,
    column: &str,
) {
    match entries {
        None => {
            render_placeholder(frame, app, area, title, &format!("Column {} not found", column))
        }
        Some([]) => render_placeholder(frame, app, area, title, "No closed tickets to display"),
        Some(entries) => {
            let chart = count_chart(app, format!(" {} ", title), entries, true, area);
            frame.render_widget(chart, area);
        }
    }
}
