//! Data source abstraction for receiving ticket tables.
//!
//! This module provides a trait-based abstraction for receiving parsed
//! ticket tables from spreadsheet files or from a host application.

mod channel;
mod error;
mod file;
pub mod spreadsheet;
pub mod table;

pub use channel::ChannelSource;
pub use error::SourceError;
pub use file::FileSource;
pub use spreadsheet::load_table;
pub use table::{RawCell, RawSheet};

use std::fmt::Debug;

use crate::data::TicketTable;

/// Trait for receiving ticket tables from various sources.
///
/// # Example
///
/// ```
/// use ticketwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("tickets.xlsx");
/// if let Some(table) = source.poll() {
///     println!("Got {} tickets", table.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest table.
    ///
    /// Returns `Some(table)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<TicketTable>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the error message from the last poll, if any.
    fn error(&self) -> Option<&str>;
}
