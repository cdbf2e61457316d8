//! Raw sheet cells and their conversion into a [`TicketTable`].
//!
//! Spreadsheet engines produce loosely typed cells. This module keeps the
//! recognised columns, coerces timestamps and the closed flag, and derives
//! durations. Unparsable values become absent rather than errors.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::data::metrics::derive_durations;
use crate::data::ticket::{columns, TicketRecord, TicketTable};

/// Timestamp layouts carrying an offset.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Naive timestamp layouts, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date-only layouts, read as midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// A single loosely typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl RawCell {
    /// Text form of the cell, `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawCell::Empty => None,
            RawCell::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            RawCell::Number(n) => Some(n.to_string()),
            RawCell::Bool(b) => Some(b.to_string()),
            RawCell::DateTime(dt) => Some(dt.to_string()),
        }
    }

    /// Interpret the cell as a UTC timestamp.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            RawCell::DateTime(dt) => Some(Utc.from_utc_datetime(dt)),
            RawCell::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }

    /// Interpret the cell as the closed flag.
    pub fn as_flag(&self) -> bool {
        match self {
            RawCell::Bool(b) => *b,
            RawCell::Number(n) => *n == 1.0,
            RawCell::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "1.0" | "true" | "yes"
            ),
            _ => false,
        }
    }
}

/// Parse a timestamp string; offsets are converted to UTC, naive values
/// are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
        }
    }

    None
}

/// A sheet as read by a spreadsheet engine: header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawSheet {
    /// Keep the recognised columns and build typed records.
    pub fn into_table(self) -> TicketTable {
        // (column name, index in the sheet); first occurrence wins
        let kept: Vec<(&'static str, usize)> = columns::KEEP
            .iter()
            .filter_map(|name| {
                self.headers
                    .iter()
                    .position(|h| h.trim() == *name)
                    .map(|idx| (*name, idx))
            })
            .collect();

        debug!(
            kept = kept.len(),
            dropped = self.headers.len().saturating_sub(kept.len()),
            rows = self.rows.len(),
            "Selecting ticket columns"
        );

        let records = self.rows.iter().map(|row| {
            let mut record = TicketRecord::default();
            for &(name, idx) in &kept {
                let cell = row.get(idx).cloned().unwrap_or(RawCell::Empty);
                if name == columns::CLOSED {
                    record.closed = cell.as_flag();
                } else if let Some(slot) = record.timestamp_mut(name) {
                    *slot = cell.as_timestamp();
                } else if let Some(text) = cell.as_text() {
                    record.attributes.insert(name.to_string(), text);
                }
            }
            record
        });

        let columns = kept.iter().map(|(name, _)| name.to_string()).collect();
        TicketTable::new(columns, derive_durations(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        let dt = parse_timestamp("2024-03-01T12:00:00-03:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 09:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("01/03/2024 09:30"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unparsable_timestamp_is_absent() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(RawCell::Number(45000.0).as_timestamp(), None);
    }

    #[test]
    fn test_flag_coercion() {
        assert!(RawCell::Number(1.0).as_flag());
        assert!(RawCell::Bool(true).as_flag());
        assert!(text("1").as_flag());
        assert!(text(" TRUE ").as_flag());
        assert!(!RawCell::Number(0.0).as_flag());
        assert!(!text("closed").as_flag());
        assert!(!RawCell::Empty.as_flag());
    }

    #[test]
    fn test_number_text_drops_trailing_zero() {
        assert_eq!(RawCell::Number(42.0).as_text(), Some("42".to_string()));
        assert_eq!(RawCell::Number(1.5).as_text(), Some("1.5".to_string()));
        assert_eq!(text("   ").as_text(), None);
    }

    #[test]
    fn test_into_table_selects_and_coerces() {
        let sheet = RawSheet {
            headers: vec![
                "id".to_string(),
                "created_at".to_string(),
                "closed_at".to_string(),
                "channel_name".to_string(),
                "closed".to_string(),
            ],
            rows: vec![
                vec![
                    text("T-1"),
                    text("2024-03-01 09:00:00"),
                    text("2024-03-01 09:40:30"),
                    text("chat"),
                    RawCell::Number(1.0),
                ],
                vec![
                    text("T-2"),
                    text("garbage"),
                    RawCell::Empty,
                    RawCell::Empty,
                ],
            ],
        };

        let table = sheet.into_table();
        assert_eq!(
            table.columns,
            vec!["created_at", "closed_at", "channel_name", "closed"]
        );
        assert_eq!(table.len(), 2);

        let first = &table.records[0];
        assert!(first.closed);
        assert_eq!(first.channel(), Some("chat"));
        assert_eq!(first.attribute("id"), None);
        assert_eq!(first.durations.cycle_time_minutes, Some(40));

        let second = &table.records[1];
        assert!(!second.closed);
        assert_eq!(second.created_at, None);
        assert_eq!(second.channel(), None);
        assert_eq!(second.durations.cycle_time_minutes, None);
    }
}
