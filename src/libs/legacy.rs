//! Import of the legacy flat session log.
//!
//! Older versions appended one line per completed session to a text file,
//! first as bracketed text and later as JSON:
//!
//! ```text
//! [2024-01-01 10:00:00] focus complete - write report
//! {"timestamp": "2024-01-02 09:30:00", "duration": 50, "task": "review", "status": "success"}
//! ```
//!
//! Each line is offered to the known formats in order and the first one
//! that reads it wins. After a complete pass the log is renamed to a backup,
//! never deleted. The session store ignores timestamps it already holds, so
//! a second pass over the same data imports nothing.

use crate::db::sessions::Sessions;
use crate::libs::data_storage::DataStorage;
use crate::libs::session::{parse_timestamp, ImportReport, SessionRecord, SessionStatus, DEFAULT_DURATION_MINUTES};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const LEGACY_LOG_FILE_NAME: &str = "focus_log.txt";
const BACKUP_EXTENSION: &str = "bak";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("empty line")]
    Empty,
    #[error("unrecognized log line: {0}")]
    Unrecognized(String),
}

/// A line reader for one legacy format; `None` means "not this format".
type LineFormat = fn(&str) -> Option<SessionRecord>;

const LINE_FORMATS: &[LineFormat] = &[parse_json_line, parse_bracketed_line];

#[derive(Debug, Deserialize)]
struct JsonLine {
    timestamp: String,
    #[serde(default)]
    duration: Option<serde_json::Value>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Reads one legacy log line into a record.
pub fn parse_line(line: &str) -> Result<SessionRecord, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(LineError::Empty);
    }
    LINE_FORMATS
        .iter()
        .find_map(|format| format(line))
        .ok_or_else(|| LineError::Unrecognized(line.to_string()))
}

fn parse_json_line(line: &str) -> Option<SessionRecord> {
    if !line.starts_with('{') {
        return None;
    }
    let entry: JsonLine = serde_json::from_str(line).ok()?;
    let timestamp = parse_timestamp(&entry.timestamp)?;
    let duration = entry.duration.as_ref().and_then(duration_minutes).unwrap_or(DEFAULT_DURATION_MINUTES);
    let status = entry.status.as_deref().map(SessionStatus::parse).unwrap_or_default();

    Some(SessionRecord::new(timestamp, duration, entry.task.as_deref(), status))
}

fn parse_bracketed_line(line: &str) -> Option<SessionRecord> {
    let (stamp, tail) = line.strip_prefix('[')?.split_once(']')?;
    let timestamp = parse_timestamp(stamp)?;
    let task = tail.split_once('-').map(|(_, task)| task);

    Some(SessionRecord::success(timestamp, DEFAULT_DURATION_MINUTES, task))
}

/// Durations were written as integers, occasionally as floats or strings.
fn duration_minutes(value: &serde_json::Value) -> Option<u32> {
    let minutes = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (minutes.is_finite() && minutes >= 0.0).then(|| minutes.round() as u32)
}

/// Reads a text file, honouring a UTF-8 or UTF-16 byte order mark.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        debug!(path = %path.display(), encoding = encoding.name(), "replaced undecodable bytes");
    }
    Ok(text.into_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub report: ImportReport,
    /// Where the legacy log was moved to.
    pub backup: PathBuf,
}

/// One-shot migration of the legacy log into the session store.
#[derive(Debug, Clone)]
pub struct LegacyMigration {
    source: PathBuf,
    attempted: bool,
}

impl LegacyMigration {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        LegacyMigration {
            source: source.into(),
            attempted: false,
        }
    }

    pub fn in_storage(storage: &DataStorage) -> Result<Self> {
        Ok(Self::new(storage.get_path(LEGACY_LOG_FILE_NAME)?))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_attempted(&self) -> bool {
        self.attempted
    }

    /// Imports the legacy log once per instance. Returns `None` when there
    /// is nothing to do. If reading or storing fails the log stays in place
    /// for the next launch.
    pub fn run(&mut self, sessions: &mut Sessions) -> Result<Option<MigrationOutcome>> {
        if self.attempted {
            return Ok(None);
        }
        self.attempted = true;

        if !self.source.exists() {
            return Ok(None);
        }

        let text = read_text(&self.source)?;
        let mut report = ImportReport::default();
        for line in text.lines() {
            match parse_line(line) {
                Ok(record) => {
                    if sessions.insert(&record)? {
                        report.imported += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
                Err(LineError::Empty) => {}
                Err(e) => {
                    debug!(error = %e, "skipping legacy log line");
                    report.malformed += 1;
                }
            }
        }

        let backup = backup_path(&self.source, Local::now().naive_local());
        fs::rename(&self.source, &backup)?;
        info!(
            imported = report.imported,
            duplicates = report.duplicates,
            malformed = report.malformed,
            backup = %backup.display(),
            "legacy log migrated"
        );

        Ok(Some(MigrationOutcome { report, backup }))
    }
}

/// `<name>.bak`, or `<name>.<stamp>.bak` when that backup already exists.
pub fn backup_path(source: &Path, now: NaiveDateTime) -> PathBuf {
    let name = source.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let plain = source.with_file_name(format!("{}.{}", name, BACKUP_EXTENSION));
    if !plain.exists() {
        return plain;
    }

    let stamp = now.format("%Y%m%d_%H%M%S");
    let mut candidate = source.with_file_name(format!("{}.{}.{}", name, stamp, BACKUP_EXTENSION));
    let mut counter = 1;
    while candidate.exists() {
        candidate = source.with_file_name(format!("{}.{}_{}.{}", name, stamp, counter, BACKUP_EXTENSION));
        counter += 1;
    }
    candidate
}
