//! CSV export and import of the session log.
//!
//! Both directions use the same four columns:
//!
//! ```text
//! Timestamp,Duration (min),Task,Status
//! 2024-01-01 10:00:00,25,write report,success
//! ```
//!
//! Import goes through the duplicate-safe insert, so importing a file twice
//! (or importing an export of the same store) adds nothing the second time.

use crate::db::sessions::Sessions;
use crate::libs::legacy::{read_text, LineError};
use crate::libs::session::{format_timestamp, parse_timestamp, ImportReport, SessionRecord, SessionStatus, DEFAULT_DURATION_MINUTES};
use anyhow::Result;
use chrono::Local;
use csv::StringRecord;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CSV_HEADER: [&str; 4] = ["Timestamp", "Duration (min)", "Task", "Status"];
/// Written ahead of the header so spreadsheets detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct Exporter {
    output_path: PathBuf,
}

impl Exporter {
    /// Writes to `output_path`, or to `focus_sessions_<date>.csv` in the
    /// working directory.
    pub fn new(output_path: Option<PathBuf>) -> Self {
        let output_path =
            output_path.unwrap_or_else(|| PathBuf::from(format!("focus_sessions_{}.csv", Local::now().format("%Y%m%d"))));
        Self { output_path }
    }

    /// Where [`Exporter::export`] writes.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes every stored record, oldest first, as UTF-8 with a byte order
    /// mark. Returns the row count.
    pub fn export(&self, sessions: &Sessions) -> Result<usize> {
        let records = sessions.all_records()?;
        let mut file = File::create(&self.output_path)?;
        file.write_all(UTF8_BOM)?;
        let mut wtr = csv::Writer::from_writer(file);

        wtr.write_record(CSV_HEADER)?;
        for record in &records {
            wtr.write_record([
                format_timestamp(record.timestamp),
                record.duration_minutes.to_string(),
                record.task.clone().unwrap_or_default(),
                record.status.to_string(),
            ])?;
        }
        wtr.flush()?;
        info!(rows = records.len(), path = %self.output_path.display(), "sessions exported");

        Ok(records.len())
    }
}

/// Imports a CSV file written by [`Exporter`] or by a spreadsheet.
/// Unreadable rows are counted and skipped.
pub fn import_csv(sessions: &mut Sessions, path: &Path) -> Result<ImportReport> {
    let text = read_text(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut report = ImportReport::default();
    for row in reader.records() {
        let parsed = row
            .map_err(|e| LineError::Unrecognized(e.to_string()))
            .and_then(|row| parse_row(&row));
        match parsed {
            Ok(record) => {
                if sessions.insert(&record)? {
                    report.imported += 1;
                } else {
                    report.duplicates += 1;
                }
            }
            Err(e) => {
                debug!(error = %e, "skipping csv row");
                report.malformed += 1;
            }
        }
    }
    info!(
        imported = report.imported,
        duplicates = report.duplicates,
        malformed = report.malformed,
        "csv imported"
    );

    Ok(report)
}

/// Reads one `(timestamp, duration, task, status)` row. A blank duration
/// means the default interval; a blank status means success.
pub fn parse_row(row: &StringRecord) -> Result<SessionRecord, LineError> {
    let unrecognized = || LineError::Unrecognized(row.iter().collect::<Vec<_>>().join(","));

    let timestamp = row.get(0).and_then(parse_timestamp).ok_or_else(unrecognized)?;
    let duration = match row.get(1).map(str::trim).filter(|d| !d.is_empty()) {
        Some(value) => value.parse::<u32>().map_err(|_| unrecognized())?,
        None => DEFAULT_DURATION_MINUTES,
    };
    let status = row.get(3).map(SessionStatus::parse).unwrap_or_default();

    Ok(SessionRecord::new(timestamp, duration, row.get(2), status))
}
