//! Session records and the views derived from them.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text layout of a session timestamp, both in storage and in legacy logs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Display label of a session without a task.
pub const NO_TASK_LABEL: &str = "-";
/// Work interval length assumed for legacy entries that do not carry one.
pub const DEFAULT_DURATION_MINUTES: u32 = 25;

/// Outcome of a work interval.
///
/// Only [`SessionStatus::Success`] counts towards statistics. Statuses
/// written by a newer version are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    #[default]
    Success,
    Failed,
    Aborted,
    Other(String),
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Success => "success",
            SessionStatus::Failed => "failed",
            SessionStatus::Aborted => "aborted",
            SessionStatus::Other(value) => value,
        }
    }

    /// Blank input maps to `Success`, matching entries that never recorded a status.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "success" => SessionStatus::Success,
            "failed" => SessionStatus::Failed,
            "aborted" => SessionStatus::Aborted,
            _ => SessionStatus::Other(value.trim().to_string()),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SessionStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(SessionStatus::parse(&value))
    }
}

/// One completed (or aborted) work interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Completion instant, second precision, local time. Unique per record.
    pub timestamp: NaiveDateTime,
    pub duration_minutes: u32,
    /// `None` when no task was entered.
    pub task: Option<String>,
    pub status: SessionStatus,
}

impl SessionRecord {
    pub fn new(timestamp: NaiveDateTime, duration_minutes: u32, task: Option<&str>, status: SessionStatus) -> Self {
        SessionRecord {
            timestamp: truncate_to_second(timestamp),
            duration_minutes,
            task: normalize_task(task),
            status,
        }
    }

    pub fn success(timestamp: NaiveDateTime, duration_minutes: u32, task: Option<&str>) -> Self {
        Self::new(timestamp, duration_minutes, task, SessionStatus::Success)
    }

    pub fn task_label(&self) -> &str {
        self.task.as_deref().unwrap_or(NO_TASK_LABEL)
    }
}

/// A stored record expanded into the time range it covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_minutes: u32,
    pub task: Option<String>,
    pub status: SessionStatus,
}

impl SessionSpan {
    pub fn task_label(&self) -> &str {
        self.task.as_deref().unwrap_or(NO_TASK_LABEL)
    }
}

impl From<SessionRecord> for SessionSpan {
    fn from(record: SessionRecord) -> Self {
        SessionSpan {
            start: record.timestamp - Duration::minutes(i64::from(record.duration_minutes)),
            end: record.timestamp,
            duration_minutes: record.duration_minutes,
            task: record.task,
            status: record.status,
        }
    }
}

/// Successful sessions of one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyTotals {
    pub count: u32,
    pub duration_minutes: u32,
}

/// Successful sessions of one task label, with its share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTotals {
    pub task: String,
    pub duration_minutes: u32,
    /// 0.0..=100.0
    pub percentage: f64,
}

/// Counters reported by a batch import (legacy migration or CSV).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    /// Rows whose timestamp was already stored.
    pub duplicates: usize,
    /// Rows no known format could read.
    pub malformed: usize,
}

impl ImportReport {
    pub fn skipped(&self) -> usize {
        self.duplicates + self.malformed
    }
}

/// Empty, whitespace-only and sentinel task labels are stored as `None`.
pub fn normalize_task(task: Option<&str>) -> Option<String> {
    task.map(str::trim)
        .filter(|t| !t.is_empty() && *t != NO_TASK_LABEL)
        .map(str::to_string)
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn truncate_to_second(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}

/// First instant of the day `days` before `now`.
pub fn window_start(now: NaiveDateTime, days: u32) -> NaiveDateTime {
    day_start(now.date() - Duration::days(i64::from(days)))
}

pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}
