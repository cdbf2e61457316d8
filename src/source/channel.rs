//! Channel-based data source.
//!
//! Receives already-parsed ticket tables via a tokio watch channel.
//! This is useful when the host application does its own parsing and
//! pushes tables rather than pointing the dashboard at a file.

use tokio::sync::watch;

use super::DataSource;
use crate::data::TicketTable;

/// A data source that receives ticket tables via a channel.
///
/// # Example
///
/// ```
/// use ticketwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("upload");
/// ```
///
/// Tables can be produced by async code, e.g. a parsing task. The sender
/// must outlive the source for updates to be seen.
///
/// ```
/// use ticketwatch::{ChannelSource, DataSource, TicketTable};
///
/// # tokio_test::block_on(async {
/// let (tx, mut source) = ChannelSource::create("upload");
/// let parsed = tokio::spawn(async {
///     TicketTable::new(vec!["closed".to_string()], Vec::new())
/// });
/// tx.send(parsed.await.unwrap()).unwrap();
///
/// let table = source.poll().unwrap();
/// assert!(table.has_column("closed"));
/// # });
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<TicketTable>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// `source_description` names where tables come from (e.g. "upload").
    pub fn new(receiver: watch::Receiver<TicketTable>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending tables to a ChannelSource.
    pub fn create(source_description: &str) -> (watch::Sender<TicketTable>, Self) {
        let (tx, rx) = watch::channel(TicketTable::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<TicketTable> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TicketRecord;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");
        assert_eq!(source.description(), "channel: test");

        // Initially returns the default (empty) table
        let table = source.poll();
        assert!(table.is_some());
        assert!(table.unwrap().is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        let table = TicketTable::new(
            vec!["closed".to_string()],
            vec![TicketRecord {
                closed: true,
                ..Default::default()
            }],
        );
        tx.send(table).unwrap();

        let table = source.poll().unwrap();
        assert_eq!(table.len(), 1);
        assert!(source.error().is_none());
    }
}
