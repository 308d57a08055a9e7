#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Local};
    use focus_timer::libs::app::{CycleEvent, FocusApp, SaveOutcome, StartupMigration};
    use focus_timer::libs::config::Settings;
    use focus_timer::libs::data_storage::DataStorage;
    use focus_timer::libs::legacy::LEGACY_LOG_FILE_NAME;
    use focus_timer::libs::timer::{BreakKind, TimerMode, Toggle};
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct AppTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
        app: FocusApp,
        t0: DateTime<Local>,
    }

    impl TestContext for AppTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::at(temp_dir.path());
            let app = FocusApp::open(storage.clone()).unwrap();
            AppTestContext {
                _temp_dir: temp_dir,
                storage,
                app,
                // Mid-morning, so a few intervals never cross midnight.
                t0: Local::now()
                    .date_naive()
                    .and_hms_opt(10, 0, 0)
                    .unwrap()
                    .and_local_timezone(Local)
                    .earliest()
                    .unwrap(),
            }
        }
    }

    impl AppTestContext {
        fn settings(&mut self, edit: impl FnOnce(&mut Settings)) {
            let mut settings = self.app.settings().clone();
            edit(&mut settings);
            self.app.apply_settings(settings).unwrap();
        }

        /// Runs the current interval to completion, starting at `start`.
        fn finish(&mut self, start: DateTime<Local>) -> CycleEvent {
            if !self.app.engine().is_running() {
                assert_eq!(self.app.toggle_at(start), Toggle::Started);
            }
            let end = start + Duration::seconds(self.app.engine().target_duration() as i64);
            self.app.tick_at(end).unwrap()
        }
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_fresh_app_has_nothing_to_migrate(ctx: &mut AppTestContext) {
        assert_eq!(ctx.app.startup_migration(), &StartupMigration::Nothing);
        assert_eq!(ctx.app.today_count(), 0);
        assert_eq!(ctx.app.engine().mode(), TimerMode::Work);
        assert!(!ctx.app.engine().is_running());
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_finished_work_is_logged_and_starts_a_break(ctx: &mut AppTestContext) {
        ctx.app.set_current_task(Some("write report"));
        let t0 = ctx.t0;

        match ctx.finish(t0) {
            CycleEvent::WorkCompleted {
                record,
                saved,
                today_count,
                long_break,
            } => {
                assert_eq!(record.duration_minutes, 25);
                assert_eq!(record.task.as_deref(), Some("write report"));
                assert_eq!(saved, SaveOutcome::Saved);
                assert_eq!(today_count, 1);
                assert!(!long_break);
            }
            other => panic!("unexpected event {:?}", other),
        }

        assert_eq!(ctx.app.sessions().count().unwrap(), 1);
        assert_eq!(ctx.app.engine().mode(), TimerMode::Break);
        assert_eq!(ctx.app.engine().break_kind(), BreakKind::Short);
        assert!(!ctx.app.engine().is_running());
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_no_event_before_the_interval_ends(ctx: &mut AppTestContext) {
        let t0 = ctx.t0;
        ctx.app.toggle_at(t0);
        assert_eq!(ctx.app.tick_at(t0 + Duration::minutes(10)), None);
        assert_eq!(ctx.app.sessions().count().unwrap(), 0);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_finished_break_returns_to_work(ctx: &mut AppTestContext) {
        let t0 = ctx.t0;
        ctx.finish(t0);
        let event = ctx.finish(t0 + Duration::minutes(30));

        assert_eq!(event, CycleEvent::BreakCompleted);
        assert_eq!(ctx.app.engine().mode(), TimerMode::Work);
        assert_eq!(ctx.app.engine().current_time(), 1500.0);
        assert_eq!(ctx.app.sessions().count().unwrap(), 1);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_long_break_follows_the_daily_count(ctx: &mut AppTestContext) {
        ctx.settings(|s| {
            s.timer.work_minutes = 1;
            s.timer.short_break_minutes = 1;
            s.timer.long_break_interval = 2;
        });
        let t0 = ctx.t0;

        ctx.finish(t0);
        ctx.finish(t0 + Duration::minutes(1));
        let event = ctx.finish(t0 + Duration::minutes(2));

        match event {
            CycleEvent::WorkCompleted {
                today_count, long_break, ..
            } => {
                assert_eq!(today_count, 2);
                assert!(long_break);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(ctx.app.engine().break_kind(), BreakKind::Long);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_auto_start_runs_the_next_interval(ctx: &mut AppTestContext) {
        ctx.settings(|s| s.timer.auto_start_next = true);
        let t0 = ctx.t0;

        ctx.finish(t0);
        assert_eq!(ctx.app.engine().mode(), TimerMode::Break);
        assert!(ctx.app.engine().is_running());

        // The break counts from the moment work finished.
        let work_end = t0 + Duration::minutes(25);
        assert_eq!(ctx.app.tick_at(work_end + Duration::minutes(5)), Some(CycleEvent::BreakCompleted));
        assert!(ctx.app.engine().is_running());
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_work_length_changes_are_saved(ctx: &mut AppTestContext) {
        ctx.app.set_duration(40).unwrap();
        assert_eq!(Settings::read_from(&ctx.storage).unwrap().timer.work_minutes, 40);

        assert_eq!(ctx.app.adjust_duration(1).unwrap(), Some(45));
        assert_eq!(Settings::read_from(&ctx.storage).unwrap().timer.work_minutes, 45);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_break_length_changes_are_not_saved(ctx: &mut AppTestContext) {
        let t0 = ctx.t0;
        ctx.finish(t0);
        ctx.app.set_duration(12).unwrap();

        assert_eq!(ctx.app.engine().current_time(), 720.0);
        let saved = Settings::read_from(&ctx.storage).unwrap();
        assert_eq!(saved.timer.short_break_minutes, 5);
        assert_eq!(saved.timer.work_minutes, 25);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_invalid_settings_are_rejected(ctx: &mut AppTestContext) {
        let mut settings = ctx.app.settings().clone();
        settings.timer.work_minutes = 0;

        assert!(ctx.app.apply_settings(settings).is_err());
        assert_eq!(ctx.app.settings().timer.work_minutes, 25);
        assert_eq!(ctx.app.engine().current_time(), 1500.0);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_strict_mode_comes_from_settings(ctx: &mut AppTestContext) {
        ctx.settings(|s| s.strict_mode = true);
        let t0 = ctx.t0;

        assert_eq!(ctx.app.toggle_at(t0), Toggle::Started);
        assert_eq!(ctx.app.toggle_at(t0 + Duration::seconds(5)), Toggle::Locked);
        assert!(Settings::read_from(&ctx.storage).unwrap().strict_mode);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_blank_task_is_no_task(ctx: &mut AppTestContext) {
        ctx.app.set_current_task(Some("  "));
        assert_eq!(ctx.app.current_task(), None);
        ctx.app.set_current_task(Some(" review "));
        assert_eq!(ctx.app.current_task(), Some("review"));
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_repeat_break_only_from_work(ctx: &mut AppTestContext) {
        let t0 = ctx.t0;
        ctx.app.repeat_break_at(t0);
        assert_eq!(ctx.app.engine().mode(), TimerMode::Break);
        assert!(ctx.app.engine().is_running());

        ctx.app.skip_break();
        assert_eq!(ctx.app.engine().mode(), TimerMode::Work);
        assert!(!ctx.app.engine().is_running());
    }

    #[test]
    fn test_open_imports_the_legacy_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = DataStorage::at(temp_dir.path());
        fs::write(
            storage.get_path(LEGACY_LOG_FILE_NAME).unwrap(),
            "[2024-01-01 10:00:00] focus complete - old task\n",
        )
        .unwrap();

        let app = FocusApp::open(storage.clone()).unwrap();
        match app.startup_migration() {
            StartupMigration::Migrated(outcome) => assert_eq!(outcome.report.imported, 1),
            other => panic!("unexpected migration result {:?}", other),
        }
        assert_eq!(app.sessions().count().unwrap(), 1);
        assert!(!temp_dir.path().join(LEGACY_LOG_FILE_NAME).exists());

        // A second launch finds nothing left to import.
        let app = FocusApp::open(storage).unwrap();
        assert_eq!(app.startup_migration(), &StartupMigration::Nothing);
        assert_eq!(app.sessions().count().unwrap(), 1);
    }

    #[test]
    fn test_unreadable_legacy_log_does_not_stop_startup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = DataStorage::at(temp_dir.path());
        let log_path = storage.get_path(LEGACY_LOG_FILE_NAME).unwrap();
        // A directory where the log should be cannot be read as text.
        fs::create_dir(&log_path).unwrap();

        let mut app = FocusApp::open(storage).unwrap();
        assert!(matches!(app.startup_migration(), StartupMigration::Failed(_)));
        assert!(log_path.exists());

        let t0 = Local::now();
        assert_eq!(app.toggle_at(t0), Toggle::Started);
        assert_eq!(app.sessions().count().unwrap(), 0);
    }

    #[test_context(AppTestContext)]
    #[test]
    fn test_task_label_carries_over_to_the_next_session(ctx: &mut AppTestContext) {
        ctx.app.set_current_task(Some("write report"));
        let t0 = ctx.t0;

        ctx.finish(t0);
        assert_eq!(ctx.app.current_task(), Some("write report"));
        ctx.finish(t0 + Duration::minutes(25));
        match ctx.finish(t0 + Duration::minutes(30)) {
            CycleEvent::WorkCompleted { record, .. } => assert_eq!(record.task.as_deref(), Some("write report")),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
