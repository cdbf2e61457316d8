//! # ticketwatch
//!
//! A terminal dashboard and library for customer-service ticket exports.
//!
//! This crate reads a ticket spreadsheet (xlsx, xls, ods or csv), derives
//! per-ticket durations from its timestamps, and summarises the result as
//! KPIs, channel breakdowns and rankings in an interactive terminal UI or
//! as a JSON export.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(metrics) │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | ChannelSource                  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Spreadsheet loading and the [`DataSource`] trait with
//!   file-polling and channel-based implementations
//! - **[`data`]**: Ticket records, duration derivation, filters and the
//!   aggregated [`DashboardData`]
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`export`]**: JSON export of the dashboard
//! - **[`settings`]**: Layered configuration (file plus `TICKETWATCH_*` env vars)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Dashboard for an export, closed tickets from March on the chat channel
//! ticketwatch --file tickets.xlsx --from 2024-03-01 --channel chat
//!
//! # Write the dashboard as JSON and exit
//! ticketwatch --file tickets.xlsx --export dashboard.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use ticketwatch::{average_minutes, filter_closed, DurationField, TicketTable};
//!
//! let table = TicketTable::default();
//! let closed = filter_closed(&table.records);
//! assert_eq!(average_minutes(&closed, DurationField::CycleTime), None);
//! ```
//!
//! ### Feeding tables from a host application
//!
//! ```
//! use ticketwatch::{App, ChannelSource, DashboardLimits, TicketFilter};
//!
//! let (tx, source) = ChannelSource::create("host");
//! let app = App::new(Box::new(source), TicketFilter::default(), DashboardLimits::default());
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod export;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use data::{
    average_minutes, count_by_key, derive_durations, filter_closed, top_n, DashboardData,
    DashboardLimits, DurationField, Durations, TicketFilter, TicketRecord, TicketTable,
};
pub use settings::Settings;
pub use source::{load_table, ChannelSource, DataSource, FileSource, SourceError};
