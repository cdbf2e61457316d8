//! Spreadsheet reading.
//!
//! Reads the first sheet of an `.xlsx`, `.xls`, `.ods` or `.csv` file into a
//! [`RawSheet`]. Excel files are tried with the engine matching their
//! extension first and then with the other engine, since exports are often
//! mislabelled.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, Data, Ods, Reader, Xls, Xlsx};
use tracing::{debug, warn};

use super::error::SourceError;
use super::table::{RawCell, RawSheet};
use crate::data::ticket::TicketTable;

type XlsxBook = Xlsx<BufReader<File>>;
type XlsBook = Xls<BufReader<File>>;
type OdsBook = Ods<BufReader<File>>;

/// Supported input formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xlsx,
    Xls,
    Ods,
    Csv,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(Format::Xlsx),
            "xls" => Ok(Format::Xls),
            "ods" => Ok(Format::Ods),
            "csv" => Ok(Format::Csv),
            _ => Err(SourceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read and parse a ticket spreadsheet.
pub fn load_table(path: &Path) -> Result<TicketTable, SourceError> {
    let sheet = read_sheet(path)?;
    let table = sheet.into_table();
    debug!(path = %path.display(), rows = table.len(), "Loaded ticket table");
    Ok(table)
}

/// Read the first sheet of `path`.
pub fn read_sheet(path: &Path) -> Result<RawSheet, SourceError> {
    // Surface missing files as I/O errors rather than engine errors
    fs::metadata(path)?;

    match Format::from_path(path)? {
        Format::Xlsx => with_fallback(path, read_workbook::<XlsxBook>, read_workbook::<XlsBook>),
        Format::Xls => with_fallback(path, read_workbook::<XlsBook>, read_workbook::<XlsxBook>),
        Format::Ods => read_workbook::<OdsBook>(path).map_err(SourceError::Workbook),
        Format::Csv => read_csv(path),
    }
}

fn with_fallback(
    path: &Path,
    primary: fn(&Path) -> Result<RawSheet, String>,
    fallback: fn(&Path) -> Result<RawSheet, String>,
) -> Result<RawSheet, SourceError> {
    match primary(path) {
        Ok(sheet) => Ok(sheet),
        Err(primary_err) => {
            warn!(
                path = %path.display(),
                error = %primary_err,
                "Primary engine failed, trying fallback"
            );
            fallback(path).map_err(|fallback_err| SourceError::Spreadsheet {
                primary: primary_err,
                fallback: fallback_err,
            })
        }
    }
}

fn read_workbook<R>(path: &Path) -> Result<RawSheet, String>
where
    R: Reader<BufReader<File>>,
    R::Error: Display,
{
    let mut workbook = open_workbook::<R, _>(path).map_err(|e| e.to_string())?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook has no sheets".to_string())?
        .map_err(|e| e.to_string())?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
        None => return Err("sheet is empty".to_string()),
    };

    let rows = rows.map(|row| row.iter().map(convert_cell).collect()).collect();
    Ok(RawSheet { headers, rows })
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => dt.as_datetime().map(RawCell::DateTime).unwrap_or(RawCell::Empty),
        _ => RawCell::Empty,
    }
}

/// Guess the delimiter from the header line (`;` exports are common).
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

fn read_csv(path: &Path) -> Result<RawSheet, SourceError> {
    let content = fs::read_to_string(path)?;
    let content = content.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(String::is_empty) {
        return Err(SourceError::EmptySheet);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|v| {
                    if v.trim().is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(v.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawSheet { headers, rows })
}
