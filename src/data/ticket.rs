//! Ticket records and their derived duration fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Column names recognised in a ticket export.
pub mod columns {
    pub const CREATED_AT: &str = "created_at";
    pub const CLOSED_AT: &str = "closed_at";
    pub const ATTENDED_AT: &str = "attended_at";
    pub const UPDATED_AT: &str = "updated_at";
    pub const LAST_RECEIVE: &str = "last_receive";
    pub const LAST_SEND: &str = "last_send";
    pub const COMPANY_NAME: &str = "company_name";
    pub const CHANNEL_TYPENAME: &str = "channel_typename";
    pub const CHANNEL_NAME: &str = "channel_name";
    pub const TABULATION_COMMENT: &str = "tabulation_comment";
    pub const CUSTOMER_NAME: &str = "customer_name";
    pub const AGENT_LOGIN: &str = "agent_login";
    pub const CLOSED: &str = "closed";

    /// Columns kept from the source sheet, in display order.
    pub const KEEP: &[&str] = &[
        CREATED_AT,
        CLOSED_AT,
        ATTENDED_AT,
        UPDATED_AT,
        LAST_RECEIVE,
        LAST_SEND,
        COMPANY_NAME,
        CHANNEL_TYPENAME,
        CHANNEL_NAME,
        TABULATION_COMMENT,
        CUSTOMER_NAME,
        AGENT_LOGIN,
        CLOSED,
    ];

    /// Columns parsed as timestamps.
    pub const TIMESTAMPS: &[&str] =
        &[CREATED_AT, CLOSED_AT, UPDATED_AT, LAST_RECEIVE, LAST_SEND, ATTENDED_AT];

    pub fn is_timestamp(name: &str) -> bool {
        TIMESTAMPS.contains(&name)
    }
}

/// One of the three derived duration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationField {
    /// Creation to closure.
    CycleTime,
    /// Creation to first attendance.
    WaitTime,
    /// First attendance to closure.
    HandlingTime,
}

impl DurationField {
    pub const ALL: [DurationField; 3] =
        [DurationField::CycleTime, DurationField::WaitTime, DurationField::HandlingTime];

    /// Column name used in exports.
    pub fn column(&self) -> &'static str {
        match self {
            DurationField::CycleTime => "cycle_time_minutes",
            DurationField::WaitTime => "wait_time_minutes",
            DurationField::HandlingTime => "handling_time_minutes",
        }
    }

    /// Returns the display label for this field.
    pub fn label(&self) -> &'static str {
        match self {
            DurationField::CycleTime => "Cycle",
            DurationField::WaitTime => "Wait",
            DurationField::HandlingTime => "Handling",
        }
    }
}

/// Derived durations in whole minutes.
///
/// A field is `None` when either of its endpoint timestamps is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Durations {
    pub cycle_time_minutes: Option<u64>,
    pub wait_time_minutes: Option<u64>,
    pub handling_time_minutes: Option<u64>,
}

impl Durations {
    pub fn get(&self, field: DurationField) -> Option<u64> {
        match field {
            DurationField::CycleTime => self.cycle_time_minutes,
            DurationField::WaitTime => self.wait_time_minutes,
            DurationField::HandlingTime => self.handling_time_minutes,
        }
    }
}

/// A single customer-service ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketRecord {
    pub created_at: Option<DateTime<Utc>>,
    pub attended_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_receive: Option<DateTime<Utc>>,
    pub last_send: Option<DateTime<Utc>>,
    pub closed: bool,
    /// Passthrough text columns (channel, company, agent, ...).
    pub attributes: BTreeMap<String, String>,
    #[serde(flatten)]
    pub durations: Durations,
}

impl TicketRecord {
    /// Look up a passthrough attribute by column name.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn channel(&self) -> Option<&str> {
        self.attribute(columns::CHANNEL_NAME)
    }

    /// Mutable access to a timestamp column by name.
    pub fn timestamp_mut(&mut self, column: &str) -> Option<&mut Option<DateTime<Utc>>> {
        match column {
            columns::CREATED_AT => Some(&mut self.created_at),
            columns::ATTENDED_AT => Some(&mut self.attended_at),
            columns::CLOSED_AT => Some(&mut self.closed_at),
            columns::UPDATED_AT => Some(&mut self.updated_at),
            columns::LAST_RECEIVE => Some(&mut self.last_receive),
            columns::LAST_SEND => Some(&mut self.last_send),
            _ => None,
        }
    }
}

/// A parsed ticket export: the recognised columns present plus the rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketTable {
    pub columns: Vec<String>,
    pub records: Vec<TicketRecord>,
}

impl TicketTable {
    pub fn new(columns: Vec<String>, records: Vec<TicketRecord>) -> Self {
        Self { columns, records }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup() {
        let record = TicketRecord::default().with_attribute(columns::CHANNEL_NAME, "chat");
        assert_eq!(record.channel(), Some("chat"));
        assert_eq!(record.attribute(columns::AGENT_LOGIN), None);
    }

    #[test]
    fn test_timestamp_mut_only_for_timestamp_columns() {
        let mut record = TicketRecord::default();
        assert!(record.timestamp_mut(columns::CREATED_AT).is_some());
        assert!(record.timestamp_mut(columns::LAST_SEND).is_some());
        assert!(record.timestamp_mut(columns::CHANNEL_NAME).is_none());
        for name in columns::TIMESTAMPS {
            assert!(columns::is_timestamp(name));
        }
    }

    #[test]
    fn test_table_has_column() {
        let table = TicketTable::new(vec!["closed".to_string()], Vec::new());
        assert!(table.has_column(columns::CLOSED));
        assert!(!table.has_column(columns::COMPANY_NAME));
        assert!(table.is_empty());
    }

    #[test]
    fn test_serialized_record_flattens_durations() {
        let mut record = TicketRecord {
            closed: true,
            ..Default::default()
        }
        .with_attribute(columns::AGENT_LOGIN, "ana");
        record.durations.cycle_time_minutes = Some(90);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["cycle_time_minutes"], 90);
        assert!(json["wait_time_minutes"].is_null());
        assert_eq!(json["attributes"]["agent_login"], "ana");
        assert!(json.get("durations").is_none());
    }
}
