use crate::{
    db::sessions::Sessions,
    libs::{
        formatter::format_minutes,
        messages::Message,
        stats::{Statistics, DEFAULT_LOOKBACK_DAYS},
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Number of trailing days to chart
    #[arg(short, long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
    days: u32,

    /// Limit the hourly and task breakdowns to one date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub fn cmd(args: StatsArgs) -> Result<()> {
    let sessions = Sessions::new()?;
    let stats = Statistics::new(&sessions);
    let overview = stats.overview();

    msg_print!(Message::StatsHeader(args.days), true);
    msg_print!(Message::TodayTotals(overview.today.count, format_minutes(overview.today.duration_minutes)));
    msg_print!(Message::WeekTotals(overview.this_week.count, format_minutes(overview.this_week.duration_minutes)));
    msg_print!(Message::AllTimeCount(overview.all_time_count));

    msg_print!(Message::DailyHeader, true);
    View::daily(&stats.daily_buckets(args.days))?;

    let tasks = stats.task_breakdown(args.days, args.date);
    if tasks.is_empty() {
        msg_info!(Message::NoTaskData, true);
        return Ok(());
    }

    msg_print!(Message::HourlyHeader, true);
    View::hourly(&stats.hourly_buckets(args.days, args.date))?;

    msg_print!(Message::TasksHeader, true);
    View::tasks(&tasks)?;

    Ok(())
}
