//! Wording for every [`Message`].

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TIMER MESSAGES ===
            Message::TimerHeader(task) => format!("Focus timer, task: {}", task),
            Message::TimerLocked => "Strict mode is on: a running work interval cannot be paused".to_string(),
            Message::WorkCompleted(minutes, today) => {
                format!("Work session of {} min completed ({} today)", minutes, today)
            }
            Message::LongBreakNext(minutes) => format!("Time for a long break: {} min", minutes),
            Message::ShortBreakNext(minutes) => format!("Time for a short break: {} min", minutes),
            Message::BreakCompleted => "Break is over, back to work".to_string(),
            Message::PressToStart => "Press Enter to start the next interval".to_string(),
            Message::TimerInterrupted => "Timer stopped".to_string(),
            Message::SessionNotSaved => "The session could not be saved to the log".to_string(),
            Message::SessionDuplicate => "A session with the same timestamp is already logged".to_string(),
            Message::DurationAdjusted(minutes) => format!("Interval set to {} min", minutes),

            // === LOG MESSAGES ===
            Message::NoRecords => "No sessions recorded yet".to_string(),
            Message::RecordsHeader(days) => format!("Sessions of the last {} days", days),
            Message::OlderRecordsExist => "Older sessions exist, widen the window with --days".to_string(),
            Message::RecordNotFound(timestamp) => format!("No session recorded at {}", timestamp),
            Message::RecordDeleted(timestamp) => format!("Session {} deleted", timestamp),
            Message::RecordUpdated(timestamp) => format!("Session {} updated", timestamp),
            Message::ConfirmDeleteRecord(timestamp) => format!("Delete the session recorded at {}?", timestamp),
            Message::PromptTask => "Task (empty for none)".to_string(),
            Message::InvalidTimestamp(value) => {
                format!("'{}' is not a timestamp, expected YYYY-MM-DD HH:MM:SS", value)
            }

            // === STATS MESSAGES ===
            Message::StatsHeader(days) => format!("Statistics for the last {} days", days),
            Message::TodayTotals(count, time) => format!("Today: {} sessions, {}", count, time),
            Message::WeekTotals(count, time) => format!("This week: {} sessions, {}", count, time),
            Message::AllTimeCount(count) => format!("All time: {} sessions", count),
            Message::DailyHeader => "Per day".to_string(),
            Message::HourlyHeader => "Per hour".to_string(),
            Message::TasksHeader => "Per task".to_string(),
            Message::NoTaskData => "No focus time recorded in this window".to_string(),

            // === EXPORT / IMPORT MESSAGES ===
            Message::ExportCompleted(rows, path) => format!("Exported {} sessions to {}", rows, path),
            Message::ImportCompleted(imported, duplicates, malformed) => format!(
                "Imported {} sessions ({} already present, {} unreadable rows skipped)",
                imported, duplicates, malformed
            ),
            Message::FileNotFound(path) => format!("File not found: {}", path),

            // === LEGACY LOG MESSAGES ===
            Message::LegacyMigrated(imported, duplicates, malformed, backup) => format!(
                "Moved {} sessions from the old log ({} already present, {} unreadable lines skipped), backup at {}",
                imported, duplicates, malformed, backup
            ),
            Message::LegacyNotFound(path) => format!("No old session log at {}", path),
            Message::LegacyMigrationFailed(error) => {
                format!("Could not import the old session log, it was left in place: {}", error)
            }

            // === CONFIG MESSAGES ===
            Message::ConfigHeader => "Timer settings".to_string(),
            Message::ConfigSaved => "Settings saved".to_string(),
            Message::ConfigCurrent => "Current settings".to_string(),
            Message::PromptWorkMinutes => "Work interval (minutes)".to_string(),
            Message::PromptShortBreakMinutes => "Short break (minutes)".to_string(),
            Message::PromptLongBreakMinutes => "Long break (minutes)".to_string(),
            Message::PromptLongBreakInterval => "Work sessions before a long break".to_string(),
            Message::PromptAutoStart => "Start the next interval automatically?".to_string(),
            Message::PromptStrictMode => "Strict mode (work intervals cannot be paused)?".to_string(),
            Message::PromptSound => "Ring the bell when an interval ends?".to_string(),
            Message::MinutesOutOfRange(min, max) => format!("Enter a value between {} and {} minutes", min, max),
            Message::IntervalOutOfRange(min, max) => format!("Enter a value between {} and {}", min, max),

            // === RESET MESSAGES ===
            Message::ConfirmReset(count) => format!("Delete all {} logged sessions? This cannot be undone", count),
            Message::ResetCompleted => "Session log cleared".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === MIGRATION MESSAGES ===
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
        };

        write!(f, "{}", text)
    }
}
