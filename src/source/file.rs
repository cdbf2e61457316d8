//! File-based data source.
//!
//! Polls a ticket spreadsheet on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{info, warn};

use super::spreadsheet::load_table;
use super::DataSource;
use crate::data::TicketTable;

/// A data source that reads tickets from a spreadsheet file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated, so an export that is
/// overwritten in place is picked up on the next poll.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<TicketTable> {
        match load_table(&self.path) {
            Ok(table) => {
                info!(path = %self.path.display(), tickets = table.len(), "Loaded tickets");
                self.last_error = None;
                Some(table)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to load tickets");
                self.last_error = Some(e.to_string());
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<TicketTable> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll (or still failing), always read
            (Some(_), None) => false, // File disappeared, keep the last table
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(table) = self.read_file() {
                self.last_modified = current_modified;
                return Some(table);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn sample_csv() -> &'static str {
        "created_at,closed_at,channel_name,closed\n\
         2024-03-01 09:00:00,2024-03-01 09:30:00,chat,1\n\
         2024-03-01 10:00:00,,email,0\n"
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/tickets.xlsx");
        assert_eq!(source.path(), Path::new("/tmp/tickets.xlsx"));
        assert_eq!(source.description(), "file: /tmp/tickets.xlsx");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", sample_csv()).unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());

        // First poll should return data
        let table = source.poll().unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_column("channel_name"));

        // Second poll without file change should return None
        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/tickets.xlsx");

        assert!(source.poll().is_none());
        assert!(source.error().is_some());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_workbook() {
        let mut file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(file, "not a workbook").unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_file_source_unsupported_extension() {
        let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "hello").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Unsupported file type"));
    }
}
