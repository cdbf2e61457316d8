//! Dashboard aggregation.
//!
//! This module turns a parsed [`TicketTable`] plus an explicit
//! [`TicketFilter`] into everything the dashboard displays: KPIs, the
//! per-channel breakdown, tabulation distribution and top-N rankings.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;

use super::filter::TicketFilter;
use super::metrics::{average_minutes, count_by_key, distinct_count, filter_closed, top_n};
use super::ticket::{columns, DurationField, TicketRecord, TicketTable};

/// Limits controlling how much of each breakdown is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLimits {
    /// Number of customers/agents in the rankings.
    pub top_n: usize,
    /// Maximum rows in the ticket table.
    pub table_rows: usize,
    /// Above this many categories the tabulation chart is drawn horizontally.
    pub tabulation_horizontal_threshold: usize,
}

impl Default for DashboardLimits {
    fn default() -> Self {
        Self {
            top_n: 10,
            table_rows: 500,
            tabulation_horizontal_threshold: 8,
        }
    }
}

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_tickets: usize,
    pub closed_tickets: usize,
    /// Distinct companies in the filtered table (0 when the column is missing).
    pub companies: usize,
    /// Distinct channel types in the filtered table (0 when the column is missing).
    pub channel_types: usize,
    pub avg_handling_minutes: Option<f64>,
    pub avg_wait_minutes: Option<f64>,
    pub avg_cycle_minutes: Option<f64>,
}

impl Kpis {
    pub fn average(&self, field: DurationField) -> Option<f64> {
        match field {
            DurationField::CycleTime => self.avg_cycle_minutes,
            DurationField::WaitTime => self.avg_wait_minutes,
            DurationField::HandlingTime => self.avg_handling_minutes,
        }
    }
}

/// Tickets per channel, total and closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelCount {
    pub channel: String,
    pub total: usize,
    pub closed: usize,
}

/// Complete dashboard data ready for display.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub filter: TicketFilter,
    pub limits: DashboardLimits,
    pub kpis: Kpis,
    /// Empty when the source has no channel column or no tickets match.
    pub channels: Vec<ChannelCount>,
    /// `None` when the source has no tabulation column.
    pub tabulations: Option<Vec<(String, usize)>>,
    pub top_customers: Option<Vec<(String, usize)>>,
    pub top_agents: Option<Vec<(String, usize)>>,
    /// Creation-date bounds of the unfiltered table.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Every channel in the unfiltered table, sorted, for filter selection.
    pub channel_options: Vec<String>,
    /// Filtered tickets.
    pub tickets: Vec<TicketRecord>,
    /// Filtered closed tickets.
    pub closed: Vec<TicketRecord>,
    pub last_updated: Instant,
}

impl DashboardData {
    /// Build the dashboard for `table` restricted by `filter`.
    pub fn build(table: &TicketTable, filter: &TicketFilter, limits: &DashboardLimits) -> Self {
        let tickets = filter.apply(&table.records);
        let closed = filter_closed(&tickets);

        let kpis = Kpis {
            total_tickets: tickets.len(),
            closed_tickets: closed.len(),
            companies: distinct_count(&tickets, columns::COMPANY_NAME),
            channel_types: distinct_count(&tickets, columns::CHANNEL_TYPENAME),
            avg_handling_minutes: average_minutes(&closed, DurationField::HandlingTime),
            avg_wait_minutes: average_minutes(&closed, DurationField::WaitTime),
            avg_cycle_minutes: average_minutes(&closed, DurationField::CycleTime),
        };

        let channels = if table.has_column(columns::CHANNEL_NAME) && !tickets.is_empty() {
            channel_breakdown(&tickets, &closed)
        } else {
            Vec::new()
        };

        let ranking = |column: &str, n: usize| {
            table
                .has_column(column)
                .then(|| top_n(&count_by_key(&closed, column), n))
        };
        let tabulations = ranking(columns::TABULATION_COMMENT, usize::MAX);
        let top_customers = ranking(columns::CUSTOMER_NAME, limits.top_n);
        let top_agents = ranking(columns::AGENT_LOGIN, limits.top_n);

        Self {
            filter: filter.clone(),
            limits: limits.clone(),
            kpis,
            channels,
            tabulations,
            top_customers,
            top_agents,
            date_bounds: date_bounds(&table.records),
            channel_options: count_by_key(&table.records, columns::CHANNEL_NAME)
                .into_keys()
                .collect(),
            tickets,
            closed,
            last_updated: Instant::now(),
        }
    }

    /// Whether the tabulation chart should be drawn with horizontal bars.
    pub fn tabulation_horizontal(&self) -> bool {
        self.tabulations
            .as_ref()
            .is_some_and(|t| t.len() > self.limits.tabulation_horizontal_threshold)
    }

    /// Closed tickets shown in the table, capped at `table_rows`.
    pub fn table_rows(&self) -> &[TicketRecord] {
        let n = self.closed.len().min(self.limits.table_rows);
        &self.closed[..n]
    }

    /// Caption under the ticket table.
    pub fn table_caption(&self) -> String {
        format!(
            "Showing {} of {} records",
            self.table_rows().len(),
            self.closed.len()
        )
    }
}

/// Per-channel totals, sorted by total descending then name.
fn channel_breakdown(tickets: &[TicketRecord], closed: &[TicketRecord]) -> Vec<ChannelCount> {
    let totals = count_by_key(tickets, columns::CHANNEL_NAME);
    let closed_counts: BTreeMap<String, usize> = count_by_key(closed, columns::CHANNEL_NAME);

    let mut result: Vec<ChannelCount> = totals
        .into_iter()
        .map(|(channel, total)| {
            let closed = closed_counts.get(&channel).copied().unwrap_or(0);
            ChannelCount {
                channel,
                total,
                closed,
            }
        })
        .collect();

    result.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.channel.cmp(&b.channel)));
    result
}

fn date_bounds(records: &[TicketRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = records.iter().filter_map(|r| r.created_at).map(|c| c.date_naive());
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn ticket(day: u32, channel: &str, closed: bool, cycle: Option<i64>) -> TicketRecord {
        let created = Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap();
        TicketRecord {
            created_at: Some(created),
            closed_at: cycle.map(|m| created + Duration::minutes(m)),
            closed,
            ..Default::default()
        }
        .with_attribute(columns::CHANNEL_NAME, channel)
    }

    fn table(records: Vec<TicketRecord>) -> TicketTable {
        let names = [
            columns::CREATED_AT,
            columns::CLOSED_AT,
            columns::CHANNEL_NAME,
            columns::CUSTOMER_NAME,
            columns::CLOSED,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        TicketTable::new(names, records)
    }

    #[test]
    fn test_kpis() {
        let t = table(vec![
            ticket(1, "chat", true, Some(40)),
            ticket(1, "chat", true, Some(5)),
            ticket(2, "email", false, None),
        ]);
        let data = DashboardData::build(&t, &TicketFilter::default(), &DashboardLimits::default());

        assert_eq!(data.kpis.total_tickets, 3);
        assert_eq!(data.kpis.closed_tickets, 2);
        assert_eq!(data.kpis.companies, 0);
        assert_eq!(data.kpis.avg_cycle_minutes, Some(22.5));
        assert_eq!(data.kpis.avg_wait_minutes, None);
        assert_eq!(data.kpis.average(DurationField::CycleTime), Some(22.5));
    }

    #[test]
    fn test_channel_breakdown_defaults_closed_to_zero() {
        let t = table(vec![
            ticket(1, "chat", true, Some(1)),
            ticket(1, "email", false, None),
            ticket(2, "email", false, None),
        ]);
        let data = DashboardData::build(&t, &TicketFilter::default(), &DashboardLimits::default());

        assert_eq!(
            data.channels,
            vec![
                ChannelCount {
                    channel: "email".to_string(),
                    total: 2,
                    closed: 0
                },
                ChannelCount {
                    channel: "chat".to_string(),
                    total: 1,
                    closed: 1
                },
            ]
        );
    }

    #[test]
    fn test_missing_columns_disable_breakdowns() {
        let t = table(vec![ticket(1, "chat", true, Some(1))]);
        let data = DashboardData::build(&t, &TicketFilter::default(), &DashboardLimits::default());

        assert!(data.tabulations.is_none());
        assert!(data.top_agents.is_none());
        assert_eq!(data.top_customers, Some(Vec::new()));
        assert!(!data.tabulation_horizontal());
    }

    #[test]
    fn test_filter_is_applied_to_both_sets() {
        let t = table(vec![
            ticket(1, "chat", true, Some(10)),
            ticket(5, "chat", true, Some(20)),
            ticket(5, "email", false, None),
        ]);
        let from = NaiveDate::from_ymd_opt(2024, 3, 4);
        let filter = TicketFilter::new(from, None, Vec::new());
        let data = DashboardData::build(&t, &filter, &DashboardLimits::default());

        assert_eq!(data.kpis.total_tickets, 2);
        assert_eq!(data.kpis.closed_tickets, 1);
        assert_eq!(data.kpis.avg_cycle_minutes, Some(20.0));
        assert_eq!(data.channel_options, vec!["chat".to_string(), "email".to_string()]);
        assert_eq!(
            data.date_bounds,
            Some((
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
            ))
        );
    }

    #[test]
    fn test_table_rows_are_capped() {
        let records: Vec<_> = (0..5).map(|_| ticket(1, "chat", true, Some(1))).collect();
        let limits = DashboardLimits {
            table_rows: 3,
            ..Default::default()
        };
        let data = DashboardData::build(&table(records), &TicketFilter::default(), &limits);

        assert_eq!(data.table_rows().len(), 3);
        assert_eq!(data.table_caption(), "Showing 3 of 5 records");
    }

    #[test]
    fn test_tabulation_orientation() {
        let names = vec![
            columns::TABULATION_COMMENT.to_string(),
            columns::CLOSED.to_string(),
        ];
        let records: Vec<_> = (0..10)
            .map(|i| TicketRecord {
                closed: true,
                ..Default::default()
            }
            .with_attribute(columns::TABULATION_COMMENT, format!("reason {}", i)))
            .collect();
        let t = TicketTable::new(names, records);

        let data = DashboardData::build(&t, &TicketFilter::default(), &DashboardLimits::default());
        assert_eq!(data.tabulations.as_ref().map(Vec::len), Some(10));
        assert!(data.tabulation_horizontal());
    }
}
