use super::config::Settings;
use super::formatter::format_minutes;
use super::session::{format_timestamp, SessionSpan, TaskTotals};
use super::stats::{DailyBucket, HourlyBucket};
use anyhow::Result;
use prettytable::{row, Table};

const BAR_WIDTH: usize = 30;

pub struct View {}

impl View {
    pub fn records(spans: &[SessionSpan]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "STARTED", "COMPLETED", "MINUTES", "TASK", "STATUS"]);
        for (i, span) in spans.iter().enumerate() {
            table.add_row(row![
                i + 1,
                span.start.format("%H:%M"),
                format_timestamp(span.end),
                span.duration_minutes,
                span.task_label(),
                span.status
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn daily(buckets: &[DailyBucket]) -> Result<()> {
        let max = buckets.iter().map(|b| b.totals.duration_minutes).max().unwrap_or(0);
        let mut table = Table::new();

        table.add_row(row!["DATE", "SESSIONS", "FOCUS", ""]);
        for bucket in buckets {
            table.add_row(row![
                bucket.date.format("%a %m-%d"),
                bucket.totals.count,
                format_minutes(bucket.totals.duration_minutes),
                bar(bucket.totals.duration_minutes, max)
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Only hours with sessions get a row.
    pub fn hourly(buckets: &[HourlyBucket]) -> Result<()> {
        let max = buckets.iter().map(|b| b.totals.duration_minutes).max().unwrap_or(0);
        let mut table = Table::new();

        table.add_row(row!["HOUR", "SESSIONS", "FOCUS", ""]);
        for bucket in buckets.iter().filter(|b| b.totals.count > 0) {
            table.add_row(row![
                format!("{:02}:00", bucket.hour),
                bucket.totals.count,
                format_minutes(bucket.totals.duration_minutes),
                bar(bucket.totals.duration_minutes, max)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn tasks(totals: &[TaskTotals]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TASK", "FOCUS", "SHARE"]);
        for task in totals {
            table.add_row(row![task.task, format_minutes(task.duration_minutes), format!("{:.1}%", task.percentage)]);
        }
        table.printstd();

        Ok(())
    }

    pub fn settings(settings: &Settings) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["SETTING", "VALUE"]);
        table.add_row(row!["work_minutes", settings.timer.work_minutes]);
        table.add_row(row!["short_break_minutes", settings.timer.short_break_minutes]);
        table.add_row(row!["long_break_minutes", settings.timer.long_break_minutes]);
        table.add_row(row!["long_break_interval", settings.timer.long_break_interval]);
        table.add_row(row!["auto_start_next", settings.timer.auto_start_next]);
        table.add_row(row!["strict_mode", settings.strict_mode]);
        table.add_row(row!["sound", settings.sound]);
        table.printstd();

        Ok(())
    }
}

/// A bar of `value / max` of the full width, at least one cell for any
/// non-zero value.
fn bar(value: u32, max: u32) -> String {
    if value == 0 || max == 0 {
        return String::new();
    }
    let cells = (value as usize * BAR_WIDTH / max as usize).max(1);
    "█".repeat(cells)
}
