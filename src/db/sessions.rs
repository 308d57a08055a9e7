//! The session log store.
//!
//! Writes report failure through `Result` so the caller can surface it.
//! Queries never fail from the caller's point of view: a storage error is
//! logged and the query answers as if the store were empty.

use super::db::Db;
use crate::libs::data_storage::DataStorage;
use crate::libs::session::{
    day_start, format_timestamp, normalize_task, parse_timestamp, window_start, DailyTotals, SessionRecord, SessionSpan, SessionStatus, TaskTotals,
    NO_TASK_LABEL,
};
use anyhow::Result;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const INSERT_SESSION: &str = "INSERT OR IGNORE INTO sessions (timestamp, duration, task, status) VALUES (?1, ?2, ?3, ?4)";
const DELETE_SESSION: &str = "DELETE FROM sessions WHERE timestamp = ?1";
const UPDATE_TASK: &str = "UPDATE sessions SET task = ?2 WHERE timestamp = ?1";
const DELETE_ALL: &str = "DELETE FROM sessions";
const SELECT_SESSION: &str = "SELECT timestamp, duration, task, status FROM sessions WHERE timestamp = ?1";
const SELECT_ALL: &str = "SELECT timestamp, duration, task, status FROM sessions ORDER BY timestamp";
const SELECT_RECENT: &str = "SELECT timestamp, duration, task, status FROM sessions WHERE timestamp >= ?1 ORDER BY timestamp DESC";
const SELECT_OLDER_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM sessions WHERE timestamp < ?1)";
const COUNT_SESSIONS: &str = "SELECT COUNT(*) FROM sessions";
const SELECT_DAILY: &str = "SELECT date(timestamp) AS day, COUNT(*), COALESCE(SUM(duration), 0)
    FROM sessions
    WHERE status = 'success' AND timestamp >= ?1
    GROUP BY day";
const SELECT_TASKS: &str = "SELECT COALESCE(NULLIF(TRIM(task), ''), ?3) AS label, COALESCE(SUM(duration), 0) AS total
    FROM sessions
    WHERE status = 'success' AND timestamp >= ?1 AND (?2 IS NULL OR date(timestamp) = ?2)
    GROUP BY label
    ORDER BY total DESC, label ASC";
const SELECT_HOURLY: &str = "SELECT CAST(strftime('%H', timestamp) AS INTEGER) AS hour, COUNT(*), COALESCE(SUM(duration), 0)
    FROM sessions
    WHERE status = 'success' AND timestamp >= ?1 AND (?2 IS NULL OR date(timestamp) = ?2)
    GROUP BY hour";

#[derive(Debug, Error)]
#[error("stored timestamp `{0}` is not in YYYY-MM-DD HH:MM:SS form")]
struct StoredTimestampError(String);

pub struct Sessions {
    conn: Connection,
}

impl Sessions {
    /// Opens the store in the per-user data directory.
    pub fn new() -> Result<Sessions> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn in_storage(storage: &DataStorage) -> Result<Sessions> {
        Ok(Self::from_db(Db::in_storage(storage)?))
    }

    pub fn open(path: &Path) -> Result<Sessions> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Sessions {
        Sessions { conn: db.conn }
    }

    /// Appends a record. Returns `false` when a record with the same
    /// timestamp already exists; the stored one is left untouched.
    pub fn insert(&mut self, record: &SessionRecord) -> Result<bool> {
        let added = self.conn.execute(
            INSERT_SESSION,
            params![
                format_timestamp(record.timestamp),
                record.duration_minutes,
                record.task,
                record.status.as_str()
            ],
        )?;
        if added == 0 {
            debug!(timestamp = %record.timestamp, "duplicate session skipped");
        }

        Ok(added > 0)
    }

    /// Removes the record stored under `timestamp`. Returns whether a row was
    /// removed; a missing key is not an error.
    pub fn delete(&mut self, timestamp: NaiveDateTime) -> Result<bool> {
        let removed = self.conn.execute(DELETE_SESSION, params![format_timestamp(timestamp)])?;

        Ok(removed > 0)
    }

    /// Replaces the task of the record stored under `timestamp`. Returns
    /// whether such a record exists.
    pub fn update_task(&mut self, timestamp: NaiveDateTime, task: Option<&str>) -> Result<bool> {
        let task = normalize_task(task);
        let updated = self.conn.execute(UPDATE_TASK, params![format_timestamp(timestamp), task])?;

        Ok(updated > 0)
    }

    /// Removes every record and compacts the file.
    pub fn clear_all(&mut self) -> Result<()> {
        self.conn.execute(DELETE_ALL, [])?;
        self.conn.execute_batch("VACUUM")?;

        Ok(())
    }

    /// The record stored under `timestamp`, if any.
    pub fn get(&self, timestamp: NaiveDateTime) -> Result<Option<SessionRecord>> {
        Ok(self
            .conn
            .query_row(SELECT_SESSION, params![format_timestamp(timestamp)], record_from_row)
            .optional()?)
    }

    /// Number of stored records of any status.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(COUNT_SESSIONS, [], |row| row.get(0))?;

        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Every record, oldest first.
    /// Every stored record, oldest first.
    pub fn all_records(&self) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let records = stmt.query_map([], record_from_row)?.collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// [`Sessions::daily_summary_at`] relative to the current local time.
    pub fn daily_summary(&self, lookback_days: u32) -> BTreeMap<NaiveDate, DailyTotals> {
        self.daily_summary_at(lookback_days, now())
    }

    /// Successful sessions per calendar day since the start of the day
    /// `lookback_days` before `now`. Days without sessions are absent.
    pub fn daily_summary_at(&self, lookback_days: u32, now: NaiveDateTime) -> BTreeMap<NaiveDate, DailyTotals> {
        degrade("daily summary", self.query_daily(window_start(now, lookback_days)))
    }

    /// Successful sessions completed on `date`.
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        let since = day_start(date);
        degrade("daily count", self.query_daily(since))
            .get(&date)
            .map(|totals| totals.count)
            .unwrap_or(0)
    }

    /// [`Sessions::task_summary_at`] relative to the current local time.
    pub fn task_summary(&self, lookback_days: u32, date_filter: Option<NaiveDate>) -> Vec<TaskTotals> {
        self.task_summary_at(lookback_days, date_filter, now())
    }

    /// Minutes per task label, largest first, with each label's share of the
    /// filtered total. Records without a task are grouped under `-`.
    pub fn task_summary_at(&self, lookback_days: u32, date_filter: Option<NaiveDate>, now: NaiveDateTime) -> Vec<TaskTotals> {
        degrade("task summary", self.query_tasks(window_start(now, lookback_days), date_filter))
    }

    /// [`Sessions::hourly_summary_at`] relative to the current local time.
    pub fn hourly_summary(&self, lookback_days: u32, date_filter: Option<NaiveDate>) -> BTreeMap<u32, DailyTotals> {
        self.hourly_summary_at(lookback_days, date_filter, now())
    }

    /// Successful sessions grouped by the hour (0-23) they completed in.
    pub fn hourly_summary_at(&self, lookback_days: u32, date_filter: Option<NaiveDate>, now: NaiveDateTime) -> BTreeMap<u32, DailyTotals> {
        degrade("hourly summary", self.query_hourly(window_start(now, lookback_days), date_filter))
    }

    /// [`Sessions::recent_records_at`] relative to the current local time.
    pub fn recent_records(&self, lookback_days: u32) -> (Vec<SessionSpan>, bool) {
        self.recent_records_at(lookback_days, now())
    }

    /// Records completed in the last `lookback_days` days, newest first, and
    /// whether anything older exists.
    pub fn recent_records_at(&self, lookback_days: u32, now: NaiveDateTime) -> (Vec<SessionSpan>, bool) {
        let cutoff = now - Duration::days(i64::from(lookback_days));
        degrade("recent records", self.query_recent(cutoff))
    }

    fn query_daily(&self, since: NaiveDateTime) -> Result<BTreeMap<NaiveDate, DailyTotals>> {
        let mut stmt = self.conn.prepare(SELECT_DAILY)?;
        let rows = stmt.query_map(params![format_timestamp(since)], |row| {
            let day: String = row.get(0)?;
            Ok((day, totals_from_row(row, 1)?))
        })?;

        let mut summary = BTreeMap::new();
        for row in rows {
            let (day, totals) = row?;
            match NaiveDate::parse_from_str(&day, "%Y-%m-%d") {
                Ok(date) => {
                    summary.insert(date, totals);
                }
                Err(_) => warn!(day, "skipping session group with unreadable date"),
            }
        }

        Ok(summary)
    }

    fn query_tasks(&self, since: NaiveDateTime, date_filter: Option<NaiveDate>) -> Result<Vec<TaskTotals>> {
        let mut stmt = self.conn.prepare(SELECT_TASKS)?;
        let rows = stmt
            .query_map(params![format_timestamp(since), date_param(date_filter), NO_TASK_LABEL], |row| {
                Ok((row.get::<_, String>(0)?, minutes(row.get(1)?)))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let total: u64 = rows.iter().map(|(_, minutes)| u64::from(*minutes)).sum();
        Ok(rows
            .into_iter()
            .map(|(task, duration_minutes)| TaskTotals {
                task,
                duration_minutes,
                percentage: if total == 0 {
                    0.0
                } else {
                    f64::from(duration_minutes) * 100.0 / total as f64
                },
            })
            .collect())
    }

    fn query_hourly(&self, since: NaiveDateTime, date_filter: Option<NaiveDate>) -> Result<BTreeMap<u32, DailyTotals>> {
        let mut stmt = self.conn.prepare(SELECT_HOURLY)?;
        let rows = stmt
            .query_map(params![format_timestamp(since), date_param(date_filter)], |row| {
                Ok((row.get::<_, u32>(0)?, totals_from_row(row, 1)?))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(rows)
    }

    fn query_recent(&self, cutoff: NaiveDateTime) -> Result<(Vec<SessionSpan>, bool)> {
        let cutoff = format_timestamp(cutoff);
        let mut stmt = self.conn.prepare(SELECT_RECENT)?;
        let spans = stmt
            .query_map(params![cutoff], record_from_row)?
            .map(|record| record.map(SessionSpan::from))
            .collect::<Result<Vec<_>, _>>()?;
        let has_more: bool = self.conn.query_row(SELECT_OLDER_EXISTS, params![cutoff], |row| row.get(0))?;

        Ok((spans, has_more))
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn degrade<T: Default>(query: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(query, error = %e, "session query failed, reporting no data");
        T::default()
    })
}

fn date_param(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn minutes(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn totals_from_row(row: &Row, first: usize) -> rusqlite::Result<DailyTotals> {
    Ok(DailyTotals {
        count: minutes(row.get(first)?),
        duration_minutes: minutes(row.get(first + 1)?),
    })
}

fn record_from_row(row: &Row) -> rusqlite::Result<SessionRecord> {
    let raw: String = row.get(0)?;
    let timestamp = parse_timestamp(&raw)
        .ok_or_else(|| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(StoredTimestampError(raw.clone()))))?;
    let task: Option<String> = row.get(2)?;
    let status: String = row.get(3)?;

    Ok(SessionRecord::new(
        timestamp,
        minutes(row.get(1)?),
        task.as_deref(),
        SessionStatus::parse(&status),
    ))
}
