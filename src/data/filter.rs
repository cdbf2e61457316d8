//! Explicit ticket filters.
//!
//! Filters are plain values passed into the dashboard builder. They carry
//! the selected creation-date range and channel set; nothing is read from
//! UI state.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::metrics::derive_durations;
use super::ticket::TicketRecord;

/// Creation-date range and channel selection.
///
/// `None` means "no restriction" for either dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketFilter {
    /// Inclusive range on the UTC calendar date of `created_at`.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Channel names to keep.
    pub channels: Option<BTreeSet<String>>,
}

impl TicketFilter {
    /// Build a filter from optional bounds and a list of channels.
    ///
    /// A single bound is widened to an open-ended range; an inverted range
    /// is swapped. An empty channel list means all channels.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>, channels: Vec<String>) -> Self {
        let date_range = match (from, to) {
            (None, None) => None,
            (Some(from), None) => Some((from, NaiveDate::MAX)),
            (None, Some(to)) => Some((NaiveDate::MIN, to)),
            (Some(a), Some(b)) if a > b => Some((b, a)),
            (Some(a), Some(b)) => Some((a, b)),
        };
        let channels = if channels.is_empty() {
            None
        } else {
            Some(channels.into_iter().collect())
        };
        Self {
            date_range,
            channels,
        }
    }

    /// Returns true if the filter places no restriction.
    pub fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.channels.is_none()
    }

    /// Check if a record passes the filter.
    pub fn matches(&self, record: &TicketRecord) -> bool {
        if let Some((start, end)) = self.date_range {
            let Some(created) = record.created_at else {
                return false;
            };
            let date = created.date_naive();
            if date < start || date > end {
                return false;
            }
        }

        if let Some(ref channels) = self.channels {
            match record.channel() {
                Some(channel) if channels.contains(channel) => {}
                _ => return false,
            }
        }

        true
    }

    /// Whether `channel` passes the channel part of the filter.
    pub fn selects_channel(&self, channel: &str) -> bool {
        self.channels.as_ref().is_none_or(|c| c.contains(channel))
    }

    /// Flip one channel in or out of the selection.
    ///
    /// `options` is every channel available. Selecting all of them again
    /// lifts the channel restriction; deselecting the last one leaves an
    /// empty selection that matches nothing.
    pub fn with_channel_toggled(&self, channel: &str, options: &[String]) -> Self {
        let mut selected = self
            .channels
            .clone()
            .unwrap_or_else(|| options.iter().cloned().collect());
        if !selected.remove(channel) {
            selected.insert(channel.to_string());
        }

        let all: BTreeSet<String> = options.iter().cloned().collect();
        Self {
            date_range: self.date_range,
            channels: (selected != all).then_some(selected),
        }
    }

    /// Move the start date by `days`, staying within `bounds` and not past
    /// the end date.
    pub fn with_start_shifted(&self, days: i64, bounds: (NaiveDate, NaiveDate)) -> Self {
        let (start, end) = self.range_within(bounds);
        let start = shift(start, days).clamp(bounds.0, end);
        Self {
            date_range: Some((start, end)),
            channels: self.channels.clone(),
        }
    }

    /// Move the end date by `days`, staying within `bounds` and not before
    /// the start date.
    pub fn with_end_shifted(&self, days: i64, bounds: (NaiveDate, NaiveDate)) -> Self {
        let (start, end) = self.range_within(bounds);
        let end = shift(end, days).clamp(start, bounds.1);
        Self {
            date_range: Some((start, end)),
            channels: self.channels.clone(),
        }
    }

    /// Drop the date restriction.
    pub fn without_date_range(&self) -> Self {
        Self {
            date_range: None,
            channels: self.channels.clone(),
        }
    }

    /// Drop the channel restriction.
    pub fn with_all_channels(&self) -> Self {
        Self {
            date_range: self.date_range,
            channels: None,
        }
    }

    /// Current range narrowed to `bounds`; the full bounds when unset.
    fn range_within(&self, (lo, hi): (NaiveDate, NaiveDate)) -> (NaiveDate, NaiveDate) {
        let (start, end) = self.date_range.unwrap_or((lo, hi));
        let start = start.clamp(lo, hi);
        (start, end.clamp(start, hi))
    }

    /// Keep the matching records and re-derive their durations.
    pub fn apply(&self, records: &[TicketRecord]) -> Vec<TicketRecord> {
        derive_durations(records.iter().filter(|r| self.matches(r)).cloned())
    }

    /// Short description for status lines.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some((start, end)) = self.date_range {
            let start = if start == NaiveDate::MIN {
                "…".to_string()
            } else {
                start.to_string()
            };
            let end = if end == NaiveDate::MAX {
                "…".to_string()
            } else {
                end.to_string()
            };
            parts.push(format!("{} → {}", start, end));
        }
        match self.channels {
            Some(ref channels) if channels.is_empty() => parts.push("channels: none".to_string()),
            Some(ref channels) => {
                let names: Vec<&str> = channels.iter().map(String::as_str).collect();
                parts.push(format!("channels: {}", names.join(", ")));
            }
            None => {}
        }
        if parts.is_empty() {
            "all tickets".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ticket::columns;
    use chrono::{TimeZone, Utc};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn ticket(day: Option<u32>, channel: Option<&str>) -> TicketRecord {
        let mut record = TicketRecord {
            created_at: day.map(|d| Utc.with_ymd_and_hms(2024, 3, d, 23, 59, 0).unwrap()),
            ..Default::default()
        };
        if let Some(c) = channel {
            record = record.with_attribute(columns::CHANNEL_NAME, c);
        }
        record
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = TicketFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&ticket(None, None)));
        assert_eq!(filter.describe(), "all tickets");
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = TicketFilter::new(Some(date(2)), Some(date(4)), Vec::new());
        assert!(!filter.matches(&ticket(Some(1), None)));
        assert!(filter.matches(&ticket(Some(2), None)));
        assert!(filter.matches(&ticket(Some(4), None)));
        assert!(!filter.matches(&ticket(Some(5), None)));
        assert!(!filter.matches(&ticket(None, None)));
    }

    #[test]
    fn test_inverted_range_is_swapped() {
        let filter = TicketFilter::new(Some(date(4)), Some(date(2)), Vec::new());
        assert_eq!(filter.date_range, Some((date(2), date(4))));
    }

    #[test]
    fn test_open_ended_range() {
        let filter = TicketFilter::new(Some(date(3)), None, Vec::new());
        assert!(filter.matches(&ticket(Some(20), None)));
        assert!(!filter.matches(&ticket(Some(2), None)));
    }

    #[test]
    fn test_channel_filter() {
        let filter = TicketFilter::new(None, None, vec!["chat".to_string()]);
        assert!(filter.matches(&ticket(Some(1), Some("chat"))));
        assert!(!filter.matches(&ticket(Some(1), Some("email"))));
        assert!(!filter.matches(&ticket(Some(1), None)));
    }

    #[test]
    fn test_apply_rederives_durations() {
        let mut record = ticket(Some(2), Some("chat"));
        record.closed_at = record.created_at.map(|c| c + chrono::Duration::minutes(12));
        let filtered = TicketFilter::default().apply(&[record]);
        assert_eq!(filtered[0].durations.cycle_time_minutes, Some(12));
    }

    #[test]
    fn test_channel_toggle() {
        let options = vec!["chat".to_string(), "email".to_string()];
        let filter = TicketFilter::default().with_channel_toggled("chat", &options);
        assert!(!filter.selects_channel("chat"));
        assert!(filter.selects_channel("email"));
        assert!(!filter.matches(&ticket(Some(1), Some("chat"))));

        // Deselecting the last channel matches nothing
        let none = filter.with_channel_toggled("email", &options);
        assert!(!none.matches(&ticket(Some(1), Some("email"))));
        assert_eq!(none.describe(), "channels: none");

        // Selecting everything again lifts the restriction
        let all = none
            .with_channel_toggled("email", &options)
            .with_channel_toggled("chat", &options);
        assert!(all.is_empty());
    }

    #[test]
    fn test_date_shift_is_clamped_to_bounds() {
        let bounds = (date(1), date(10));

        let filter = TicketFilter::default().with_start_shifted(-3, bounds);
        assert_eq!(filter.date_range, Some((date(1), date(10))));

        let filter = filter.with_start_shifted(4, bounds).with_end_shifted(-2, bounds);
        assert_eq!(filter.date_range, Some((date(5), date(8))));

        // Start cannot pass the end, end cannot pass the upper bound
        let filter = filter.with_start_shifted(30, bounds).with_end_shifted(30, bounds);
        assert_eq!(filter.date_range, Some((date(8), date(10))));

        assert!(filter.without_date_range().is_empty());
    }

    #[test]
    fn test_open_ended_range_is_narrowed_before_shifting() {
        let filter = TicketFilter::new(Some(date(3)), None, Vec::new());
        let shifted = filter.with_end_shifted(-1, (date(1), date(10)));
        assert_eq!(shifted.date_range, Some((date(3), date(9))));
    }
}
