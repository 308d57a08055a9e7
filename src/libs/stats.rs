//! Chart-ready statistics over the session log.
//!
//! The store answers sparse questions ("which days had sessions"); this
//! module aligns the answers to fixed axes, so an empty store yields a full
//! set of zero buckets.

use crate::db::sessions::Sessions;
use crate::libs::session::{DailyTotals, TaskTotals};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use tracing::warn;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
pub const HOURS_PER_DAY: u32 = 24;
const OVERVIEW_CHART_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub totals: DailyTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyBucket {
    /// 0..=23, hour the sessions completed in.
    pub hour: u32,
    pub totals: DailyTotals,
}

/// Headline numbers for the statistics view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overview {
    pub today: DailyTotals,
    /// Current ISO week, Monday to today.
    pub this_week: DailyTotals,
    /// Every stored record, whatever its status.
    pub all_time_count: usize,
    pub last_week: Vec<DailyBucket>,
}

pub struct Statistics<'a> {
    sessions: &'a Sessions,
}

impl<'a> Statistics<'a> {
    pub fn new(sessions: &'a Sessions) -> Self {
        Statistics { sessions }
    }

    /// [`Statistics::daily_buckets_at`] relative to the current local time.
    pub fn daily_buckets(&self, days: u32) -> Vec<DailyBucket> {
        self.daily_buckets_at(days, Local::now().naive_local())
    }

    /// Exactly `days` consecutive days ending with the day of `now`, oldest
    /// first, including days without sessions.
    pub fn daily_buckets_at(&self, days: u32, now: NaiveDateTime) -> Vec<DailyBucket> {
        let summary = self.sessions.daily_summary_at(days, now);
        let today = now.date();

        (0..days)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(i64::from(offset));
                DailyBucket {
                    date,
                    totals: summary.get(&date).copied().unwrap_or_default(),
                }
            })
            .collect()
    }

    pub fn hourly_buckets(&self, days: u32, date_filter: Option<NaiveDate>) -> Vec<HourlyBucket> {
        self.hourly_buckets_at(days, date_filter, Local::now().naive_local())
    }

    /// Exactly 24 buckets, hour 0 through 23.
    pub fn hourly_buckets_at(&self, days: u32, date_filter: Option<NaiveDate>, now: NaiveDateTime) -> Vec<HourlyBucket> {
        let summary = self.sessions.hourly_summary_at(days, date_filter, now);

        (0..HOURS_PER_DAY)
            .map(|hour| HourlyBucket {
                hour,
                totals: summary.get(&hour).copied().unwrap_or_default(),
            })
            .collect()
    }

    /// Minutes per task over the last `days` days, or on `date_filter` only.
    pub fn task_breakdown(&self, days: u32, date_filter: Option<NaiveDate>) -> Vec<TaskTotals> {
        self.sessions.task_summary(days, date_filter)
    }

    /// [`Statistics::task_breakdown`] relative to `now`.
    pub fn task_breakdown_at(&self, days: u32, date_filter: Option<NaiveDate>, now: NaiveDateTime) -> Vec<TaskTotals> {
        self.sessions.task_summary_at(days, date_filter, now)
    }

    /// Headline numbers as of the current local time.
    pub fn overview(&self) -> Overview {
        self.overview_at(Local::now().naive_local())
    }

    pub fn overview_at(&self, now: NaiveDateTime) -> Overview {
        let today = now.date();
        let week = today.iso_week();
        let summary = self.sessions.daily_summary_at(today.weekday().num_days_from_monday(), now);

        let mut overview = Overview {
            all_time_count: self.sessions.count().unwrap_or_else(|e| {
                warn!(error = %e, "session count failed");
                0
            }),
            last_week: self.daily_buckets_at(OVERVIEW_CHART_DAYS, now),
            ..Overview::default()
        };
        for (date, totals) in &summary {
            if *date == today {
                add(&mut overview.today, totals);
            }
            if date.iso_week() == week {
                add(&mut overview.this_week, totals);
            }
        }
        overview
    }
}

fn add(into: &mut DailyTotals, totals: &DailyTotals) {
    into.count += totals.count;
    into.duration_minutes += totals.duration_minutes;
}
