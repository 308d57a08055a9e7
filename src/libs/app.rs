//! Application controller.
//!
//! [`FocusApp`] owns everything a running timer needs: the engine, the
//! session store, the settings document and the legacy log migrator. The
//! host constructs one and drives it with [`FocusApp::tick_at`]; when an
//! interval finishes the controller logs it and moves the engine on.

use super::config::Settings;
use super::data_storage::DataStorage;
use super::legacy::{LegacyMigration, MigrationOutcome};
use super::session::{normalize_task, SessionRecord};
use super::timer::{TimerEngine, TimerMode, Toggle};
use crate::db::sessions::Sessions;
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use tracing::{info, warn};

/// What became of the legacy log when the app opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupMigration {
    /// No legacy log was found.
    Nothing,
    Migrated(MigrationOutcome),
    /// The log was left in place and will be retried on the next launch.
    Failed(String),
}

/// Whether a finished work interval made it into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// A record with the same timestamp already exists.
    Duplicate,
    Failed(String),
}

/// An interval that finished on this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    WorkCompleted {
        record: SessionRecord,
        saved: SaveOutcome,
        /// Successful sessions today, the one just logged included.
        today_count: u32,
        long_break: bool,
    },
    BreakCompleted,
}

pub struct FocusApp {
    storage: DataStorage,
    settings: Settings,
    engine: TimerEngine,
    sessions: Sessions,
    migration: LegacyMigration,
    startup: StartupMigration,
    current_task: Option<String>,
    today_count: u32,
}

impl FocusApp {
    /// Opens the store and settings in `storage` and imports the legacy log
    /// if one is present.
    pub fn open(storage: DataStorage) -> Result<FocusApp> {
        let settings = Settings::read_from(&storage)?;
        let sessions = Sessions::in_storage(&storage)?;
        let migration = LegacyMigration::in_storage(&storage)?;

        let mut engine = TimerEngine::new(settings.timer);
        engine.set_strict_mode(settings.strict_mode);

        let mut app = FocusApp {
            storage,
            settings,
            engine,
            sessions,
            migration,
            startup: StartupMigration::Nothing,
            current_task: None,
            today_count: 0,
        };
        app.startup = app.migrate_legacy();
        app.refresh_today_count(Local::now());

        Ok(app)
    }

    fn migrate_legacy(&mut self) -> StartupMigration {
        match self.migration.run(&mut self.sessions) {
            Ok(Some(outcome)) => StartupMigration::Migrated(outcome),
            Ok(None) => StartupMigration::Nothing,
            Err(e) => {
                warn!(source = %self.migration.source().display(), error = %e, "legacy log migration failed");
                StartupMigration::Failed(e.to_string())
            }
        }
    }

    pub fn startup_migration(&self) -> &StartupMigration {
        &self.startup
    }

    /// The timer engine, for rendering.
    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Task label attached to the next finished work session. It is kept across sessions until changed.
    pub fn current_task(&self) -> Option<&str> {
        self.current_task.as_deref()
    }

    /// Blank labels clear the task.
    pub fn set_current_task(&mut self, task: Option<&str>) {
        self.current_task = normalize_task(task);
    }

    /// Successful work sessions logged today.
    pub fn today_count(&self) -> u32 {
        self.today_count
    }

    pub fn toggle(&mut self) -> Toggle {
        self.engine.toggle_at(Utc::now())
    }

    pub fn toggle_at(&mut self, now: DateTime<Local>) -> Toggle {
        self.engine.toggle_at(now.with_timezone(&Utc))
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// [`FocusApp::tick_at`] at the current local time.
    pub fn tick(&mut self) -> Option<CycleEvent> {
        self.tick_at(Local::now())
    }

    /// Advances the engine and, when the interval finished, runs the
    /// completion flow.
    pub fn tick_at(&mut self, now: DateTime<Local>) -> Option<CycleEvent> {
        if !self.engine.tick_at(now.with_timezone(&Utc)) {
            return None;
        }
        Some(self.finish_cycle(now))
    }

    fn finish_cycle(&mut self, now: DateTime<Local>) -> CycleEvent {
        let event = match self.engine.mode() {
            TimerMode::Work => {
                let minutes = (self.engine.target_duration() / 60.0).round() as u32;
                let record = SessionRecord::success(now.naive_local(), minutes, self.current_task.as_deref());
                let saved = match self.sessions.insert(&record) {
                    Ok(true) => SaveOutcome::Saved,
                    Ok(false) => SaveOutcome::Duplicate,
                    Err(e) => {
                        warn!(error = %e, "finished session not saved");
                        SaveOutcome::Failed(e.to_string())
                    }
                };
                self.refresh_today_count(now);
                let long_break = self.engine.switch_to_break(self.today_count);
                info!(minutes, today_count = self.today_count, long_break, "work session completed");

                CycleEvent::WorkCompleted {
                    record,
                    saved,
                    today_count: self.today_count,
                    long_break,
                }
            }
            TimerMode::Break => {
                self.engine.switch_to_work();
                info!("break completed");
                CycleEvent::BreakCompleted
            }
        };

        if self.settings.timer.auto_start_next {
            self.engine.start_at(now.with_timezone(&Utc));
        }
        event
    }

    fn refresh_today_count(&mut self, now: DateTime<Local>) {
        self.today_count = self.sessions.count_on(now.date_naive());
    }

    /// Leaves a break for a stopped work interval. No-op during work.
    pub fn skip_break(&mut self) {
        self.engine.skip_break();
    }

    pub fn repeat_break(&mut self) {
        self.repeat_break_at(Local::now());
    }

    /// Starts another break straight away. No-op during a break.
    pub fn repeat_break_at(&mut self, now: DateTime<Local>) {
        self.refresh_today_count(now);
        self.engine.repeat_break_at(self.today_count, now.with_timezone(&Utc));
    }

    /// Sets the current interval length. A work length is also written to
    /// the settings file.
    pub fn set_duration(&mut self, minutes: u32) -> Result<()> {
        self.engine.set_duration(minutes);
        self.persist_work_minutes()
    }

    /// Moves the current interval by five-minute `steps`. Returns the new
    /// length if anything changed.
    pub fn adjust_duration(&mut self, steps: i32) -> Result<Option<u32>> {
        let adjusted = self.engine.adjust_duration(steps);
        if adjusted.is_some() {
            self.persist_work_minutes()?;
        }
        Ok(adjusted)
    }

    fn persist_work_minutes(&mut self) -> Result<()> {
        if self.engine.mode() != TimerMode::Work {
            return Ok(());
        }
        let minutes = self.engine.settings().work_minutes;
        if self.settings.timer.work_minutes != minutes {
            self.settings.timer.work_minutes = minutes;
            self.settings.save_to(&self.storage)?;
        }
        Ok(())
    }

    /// Validates, saves and applies a new settings document.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<()> {
        settings.timer.validate()?;
        settings.save_to(&self.storage)?;
        self.engine.update_settings(settings.timer);
        self.engine.set_strict_mode(settings.strict_mode);
        self.settings = settings;
        Ok(())
    }
}
