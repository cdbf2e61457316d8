//! Data models and processing for ticket exports.
//!
//! This module handles the transformation of parsed ticket tables into
//! derived metrics and aggregates suitable for display.
//!
//! ## Submodules
//!
//! - [`ticket`]: Core record types ([`TicketRecord`], [`TicketTable`], [`Durations`])
//! - [`metrics`]: Duration derivation and aggregation over records
//! - [`duration`]: "Hh Mm" formatting and date argument parsing
//! - [`filter`]: Explicit date-range and channel filters
//! - [`dashboard`]: KPIs, channel breakdown and rankings ([`DashboardData`])
//!
//! ## Data Flow
//!
//! ```text
//! TicketTable (parsed spreadsheet)
//!        │
//!        ▼
//! TicketFilter::apply()  ──▶ derive_durations()
//!        │
//!        ▼
//! DashboardData::build()
//!        │
//!        ├──▶ Kpis (averages over closed tickets)
//!        │
//!        └──▶ count_by_key() / top_n() (breakdowns)
//! ```

pub mod dashboard;
pub mod duration;
pub mod filter;
pub mod metrics;
pub mod ticket;

pub use dashboard::{ChannelCount, DashboardData, DashboardLimits, Kpis};
pub use filter::TicketFilter;
pub use metrics::{average_minutes, count_by_key, derive_durations, filter_closed, top_n};
pub use ticket::{columns, DurationField, Durations, TicketRecord, TicketTable};
