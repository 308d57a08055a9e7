#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use focus_timer::db::sessions::Sessions;
    use focus_timer::libs::session::{parse_timestamp, DailyTotals, SessionRecord, SessionStatus};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SessionsTestContext {
        temp_dir: TempDir,
        sessions: Sessions,
        now: NaiveDateTime,
    }

    impl TestContext for SessionsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let sessions = Sessions::open(&temp_dir.path().join("sessions.db")).unwrap();
            SessionsTestContext {
                temp_dir,
                sessions,
                now: at("2024-01-10 12:00:00"),
            }
        }
    }

    fn at(value: &str) -> NaiveDateTime {
        parse_timestamp(value).unwrap()
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn add(ctx: &mut SessionsTestContext, timestamp: &str, minutes: u32, task: Option<&str>) {
        assert!(ctx.sessions.insert(&SessionRecord::success(at(timestamp), minutes, task)).unwrap());
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_duplicate_timestamps_are_stored_once(ctx: &mut SessionsTestContext) {
        let record = SessionRecord::success(at("2024-01-01 10:00:00"), 25, None);
        assert!(ctx.sessions.insert(&record).unwrap());
        assert!(!ctx.sessions.insert(&record).unwrap());
        assert_eq!(ctx.sessions.count().unwrap(), 1);

        let summary = ctx.sessions.daily_summary_at(30, at("2024-01-20 08:00:00"));
        assert_eq!(
            summary.get(&date("2024-01-01")),
            Some(&DailyTotals {
                count: 1,
                duration_minutes: 25
            })
        );
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_duplicate_keeps_the_first_record(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-09 10:00:00", 25, Some("first"));
        let second = SessionRecord::success(at("2024-01-09 10:00:00"), 50, Some("second"));
        assert!(!ctx.sessions.insert(&second).unwrap());

        let stored = ctx.sessions.get(at("2024-01-09 10:00:00")).unwrap().unwrap();
        assert_eq!(stored.duration_minutes, 25);
        assert_eq!(stored.task.as_deref(), Some("first"));
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_recent_records_round_trip(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-10 09:30:00", 25, Some("write report"));

        let (spans, has_more) = ctx.sessions.recent_records_at(7, ctx.now);
        assert!(!has_more);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end, at("2024-01-10 09:30:00"));
        assert_eq!(spans[0].start, at("2024-01-10 09:05:00"));
        assert_eq!(spans[0].task_label(), "write report");
        assert_eq!(spans[0].status, SessionStatus::Success);
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_recent_records_are_newest_first_and_flag_older_ones(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-01 09:00:00", 25, None);
        add(ctx, "2024-01-08 09:00:00", 25, None);
        add(ctx, "2024-01-09 09:00:00", 25, None);

        let (spans, has_more) = ctx.sessions.recent_records_at(3, ctx.now);
        assert!(has_more);
        let ends: Vec<_> = spans.iter().map(|s| s.end).collect();
        assert_eq!(ends, vec![at("2024-01-09 09:00:00"), at("2024-01-08 09:00:00")]);
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_recent_records_cutoff_is_exact(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-09 11:59:59", 25, None);
        add(ctx, "2024-01-09 12:00:00", 25, None);

        let (spans, has_more) = ctx.sessions.recent_records_at(1, ctx.now);
        assert_eq!(spans.len(), 1);
        assert!(has_more);
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_empty_store_answers_with_nothing(ctx: &mut SessionsTestContext) {
        assert!(ctx.sessions.daily_summary_at(30, ctx.now).is_empty());
        assert!(ctx.sessions.task_summary_at(30, None, ctx.now).is_empty());
        assert!(ctx.sessions.hourly_summary_at(30, None, ctx.now).is_empty());
        assert_eq!(ctx.sessions.recent_records_at(30, ctx.now), (vec![], false));
        assert_eq!(ctx.sessions.count_on(ctx.now.date()), 0);
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_daily_summary_window_starts_at_midnight(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-03 00:00:00", 25, None);
        add(ctx, "2024-01-02 23:59:59", 25, None);
        add(ctx, "2024-01-10 08:00:00", 50, None);
        add(ctx, "2024-01-10 09:00:00", 25, None);

        let summary = ctx.sessions.daily_summary_at(7, ctx.now);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[&date("2024-01-03")].count, 1);
        assert_eq!(
            summary[&date("2024-01-10")],
            DailyTotals {
                count: 2,
                duration_minutes: 75
            }
        );
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_only_successful_sessions_are_aggregated(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-10 08:00:00", 25, Some("a"));
        let aborted = SessionRecord::new(at("2024-01-10 09:00:00"), 10, Some("a"), SessionStatus::Aborted);
        assert!(ctx.sessions.insert(&aborted).unwrap());

        assert_eq!(ctx.sessions.daily_summary_at(1, ctx.now)[&date("2024-01-10")].count, 1);
        assert_eq!(ctx.sessions.count_on(date("2024-01-10")), 1);
        assert_eq!(ctx.sessions.task_summary_at(1, None, ctx.now)[0].duration_minutes, 25);
        assert_eq!(ctx.sessions.count().unwrap(), 2);

        // Still listed in the log.
        assert_eq!(ctx.sessions.recent_records_at(1, ctx.now).0.len(), 2);
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_task_summary_shares_and_untasked_label(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-09 08:00:00", 50, Some("write"));
        add(ctx, "2024-01-09 09:00:00", 25, None);
        add(ctx, "2024-01-10 10:00:00", 25, Some("review"));

        let tasks = ctx.sessions.task_summary_at(30, None, ctx.now);
        let labels: Vec<_> = tasks.iter().map(|t| t.task.as_str()).collect();
        assert_eq!(labels, vec!["write", "-", "review"]);
        assert_eq!(tasks[0].percentage, 50.0);
        assert_eq!(tasks[1].percentage, 25.0);
        let total: f64 = tasks.iter().map(|t| t.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);

        let today = ctx.sessions.task_summary_at(30, Some(date("2024-01-10")), ctx.now);
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].task, "review");
        assert_eq!(today[0].percentage, 100.0);
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_hourly_summary_groups_by_completion_hour(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-09 09:10:00", 25, None);
        add(ctx, "2024-01-10 09:50:00", 25, None);
        add(ctx, "2024-01-10 14:00:00", 50, None);

        let hours = ctx.sessions.hourly_summary_at(30, None, ctx.now);
        assert_eq!(hours[&9].count, 2);
        assert_eq!(hours[&14].duration_minutes, 50);
        assert_eq!(hours.len(), 2);

        let filtered = ctx.sessions.hourly_summary_at(30, Some(date("2024-01-09")), ctx.now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[&9].count, 1);
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_delete_reports_whether_a_row_went(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-10 08:00:00", 25, None);
        assert!(ctx.sessions.delete(at("2024-01-10 08:00:00")).unwrap());
        assert!(!ctx.sessions.delete(at("2024-01-10 08:00:00")).unwrap());
        assert_eq!(ctx.sessions.count().unwrap(), 0);
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_update_task_normalizes_labels(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-10 08:00:00", 25, Some("draft"));

        assert!(ctx.sessions.update_task(at("2024-01-10 08:00:00"), Some("  final  ")).unwrap());
        let stored = ctx.sessions.get(at("2024-01-10 08:00:00")).unwrap().unwrap();
        assert_eq!(stored.task.as_deref(), Some("final"));

        assert!(ctx.sessions.update_task(at("2024-01-10 08:00:00"), Some("")).unwrap());
        let stored = ctx.sessions.get(at("2024-01-10 08:00:00")).unwrap().unwrap();
        assert_eq!(stored.task, None);

        assert!(!ctx.sessions.update_task(at("2024-01-11 08:00:00"), Some("x")).unwrap());
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_clear_all_empties_the_store(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-09 08:00:00", 25, None);
        add(ctx, "2024-01-10 08:00:00", 25, None);
        ctx.sessions.clear_all().unwrap();

        assert_eq!(ctx.sessions.count().unwrap(), 0);
        assert!(ctx.sessions.all_records().unwrap().is_empty());
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_unknown_statuses_survive_storage(ctx: &mut SessionsTestContext) {
        let record = SessionRecord::new(at("2024-01-10 08:00:00"), 25, None, SessionStatus::parse("interrupted"));
        ctx.sessions.insert(&record).unwrap();

        let stored = ctx.sessions.get(at("2024-01-10 08:00:00")).unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::Other("interrupted".to_string()));
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_all_records_are_oldest_first(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-10 08:00:00", 25, None);
        add(ctx, "2024-01-02 08:00:00", 25, None);

        let records = ctx.sessions.all_records().unwrap();
        assert_eq!(records[0].timestamp, at("2024-01-02 08:00:00"));
        assert_eq!(records[1].timestamp, at("2024-01-10 08:00:00"));
    }

    #[test_context(SessionsTestContext)]
    #[test]
    fn test_queries_come_back_empty_when_storage_fails(ctx: &mut SessionsTestContext) {
        add(ctx, "2024-01-10 09:00:00", 25, Some("write"));
        let other = rusqlite::Connection::open(ctx.temp_dir.path().join("sessions.db")).unwrap();
        other.execute_batch("DROP TABLE sessions").unwrap();

        assert!(ctx.sessions.daily_summary_at(30, ctx.now).is_empty());
        assert!(ctx.sessions.task_summary_at(30, None, ctx.now).is_empty());
        assert!(ctx.sessions.hourly_summary_at(30, None, ctx.now).is_empty());
        assert_eq!(ctx.sessions.count_on(date("2024-01-10")), 0);
        let (records, older) = ctx.sessions.recent_records_at(30, ctx.now);
        assert!(records.is_empty());
        assert!(!older);

        // Writes report the failure instead.
        let record = SessionRecord::success(at("2024-01-10 10:00:00"), 25, None);
        assert!(ctx.sessions.insert(&record).is_err());
        assert!(ctx.sessions.delete(at("2024-01-10 09:00:00")).is_err());
        assert!(ctx.sessions.update_task(at("2024-01-10 09:00:00"), Some("edit")).is_err());
    }
}
