/// Everything the application can say to a user.
///
/// Grouped by the command or subsystem that emits it. Parameters carry the
/// values the text interpolates; the wording itself is in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === TIMER MESSAGES ===
    TimerHeader(String),  // current task label
    TimerLocked,
    WorkCompleted(u32, u32), // minutes, completed today
    LongBreakNext(u32),      // minutes
    ShortBreakNext(u32),     // minutes
    BreakCompleted,
    PressToStart,
    TimerInterrupted,
    SessionNotSaved,
    SessionDuplicate,
    DurationAdjusted(u32),

    // === LOG MESSAGES ===
    NoRecords,
    RecordsHeader(u32), // lookback days
    OlderRecordsExist,
    RecordNotFound(String),
    RecordDeleted(String),
    RecordUpdated(String),
    ConfirmDeleteRecord(String),
    PromptTask,
    InvalidTimestamp(String),

    // === STATS MESSAGES ===
    StatsHeader(u32), // lookback days
    TodayTotals(u32, String),
    WeekTotals(u32, String),
    AllTimeCount(usize),
    DailyHeader,
    HourlyHeader,
    TasksHeader,
    NoTaskData,

    // === EXPORT / IMPORT MESSAGES ===
    ExportCompleted(usize, String),
    ImportCompleted(usize, usize, usize), // imported, duplicates, malformed
    FileNotFound(String),

    // === LEGACY LOG MESSAGES ===
    LegacyMigrated(usize, usize, usize, String), // imported, duplicates, malformed, backup
    LegacyNotFound(String),
    LegacyMigrationFailed(String),

    // === CONFIG MESSAGES ===
    ConfigHeader,
    ConfigSaved,
    ConfigCurrent,
    PromptWorkMinutes,
    PromptShortBreakMinutes,
    PromptLongBreakMinutes,
    PromptLongBreakInterval,
    PromptAutoStart,
    PromptStrictMode,
    PromptSound,
    MinutesOutOfRange(u32, u32),
    IntervalOutOfRange(u32, u32),

    // === RESET MESSAGES ===
    ConfirmReset(usize),
    ResetCompleted,
    OperationCancelled,

    // === MIGRATION MESSAGES ===
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
}
