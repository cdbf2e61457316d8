use chrono::NaiveDate;

use anyhow::{bail, Result};

/// Accepted layouts for date arguments (order matters: ISO first)
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Parse date strings like "2024-03-01" or "01/03/2024"
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    bail!("Unknown date format: {}", s)
}

/// Format whole minutes as "{H}h {M}m", or "{M}m" below one hour.
///
/// Absent and zero both render as "0m".
pub fn format_duration(minutes: Option<u64>) -> String {
    let minutes = match minutes {
        None | Some(0) => return "0m".to_string(),
        Some(m) => m,
    };

    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format a mean in minutes, flooring to whole minutes first.
pub fn format_mean(minutes: Option<f64>) -> String {
    format_duration(minutes.filter(|m| m.is_finite() && *m >= 0.0).map(|m| m.floor() as u64))
}

/// Format a mean in minutes as hours with one decimal ("1.5h").
pub fn format_hours(minutes: Option<f64>) -> String {
    format!("{:.1}h", minutes.filter(|m| m.is_finite()).unwrap_or(0.0) / 60.0)
}

/// KPI label: "1h 30m (1.5h)".
pub fn format_kpi(minutes: Option<f64>) -> String {
    format!("{} ({})", format_mean(minutes), format_hours(minutes))
}
