//! Ticket metrics: duration derivation and aggregation.
//!
//! Every function here is a pure transformation over an in-memory slice of
//! [`TicketRecord`]s. Nothing reads ambient state; callers pass the records
//! (already filtered) and get new values back.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::ticket::{DurationField, Durations, TicketRecord};

/// Whole minutes from `start` to `end`, floored and clamped at zero.
///
/// Returns `None` unless both endpoints are present.
pub fn minutes_between(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<u64> {
    let (start, end) = (start?, end?);
    let seconds = (end - start).num_seconds();
    Some(seconds.div_euclid(60).max(0) as u64)
}

/// Compute the derived durations for a single record.
pub fn durations_for(record: &TicketRecord) -> Durations {
    Durations {
        cycle_time_minutes: minutes_between(record.created_at, record.closed_at),
        wait_time_minutes: minutes_between(record.created_at, record.attended_at),
        handling_time_minutes: minutes_between(record.attended_at, record.closed_at),
    }
}

/// Attach derived durations to every record.
///
/// Each record is handled independently and the result depends only on its
/// timestamps, so applying this twice yields the same values.
pub fn derive_durations<I>(records: I) -> Vec<TicketRecord>
where
    I: IntoIterator<Item = TicketRecord>,
{
    records
        .into_iter()
        .map(|mut record| {
            record.durations = durations_for(&record);
            record
        })
        .collect()
}

/// Records whose `closed` flag is set, in their original order.
pub fn filter_closed(records: &[TicketRecord]) -> Vec<TicketRecord> {
    records.iter().filter(|r| r.closed).cloned().collect()
}

/// Mean of the present values of `field`.
///
/// Returns `None` when no record has the field; callers pick the fallback.
pub fn average_minutes(records: &[TicketRecord], field: DurationField) -> Option<f64> {
    let (sum, count) = records
        .iter()
        .filter_map(|r| r.durations.get(field))
        .fold((0u64, 0usize), |(sum, count), m| (sum + m, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Count records per distinct value of the attribute `key`.
///
/// Records without the attribute are not counted.
pub fn count_by_key(records: &[TicketRecord], key: &str) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in records.iter().filter_map(|r| r.attribute(key)) {
        *counts.entry(value.to_string()).or_default() += 1;
    }
    counts
}

/// Entries sorted by count descending (then key ascending), truncated to `n`.
pub fn top_n(counts: &BTreeMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> =
        counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

/// Number of distinct values of the attribute `key`.
pub fn distinct_count(records: &[TicketRecord], key: &str) -> usize {
    count_by_key(records, key).len()
}
