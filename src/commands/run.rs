//! Terminal front end for the timer.
//!
//! The engine is ticked every 50 ms and the countdown is redrawn in place
//! whenever the displayed clock changes. Input is line based:
//!
//! | input   | action                                   |
//! |---------|------------------------------------------|
//! | Enter   | start / pause                            |
//! | `s`     | skip the current break                   |
//! | `b`     | take another break                       |
//! | `r`     | rewind the current interval              |
//! | `+`/`-` | lengthen / shorten a stopped interval    |
//! | `q`     | quit                                     |

use crate::{
    libs::{
        app::{CycleEvent, FocusApp, SaveOutcome, StartupMigration},
        config::MINUTES_RANGE,
        data_storage::DataStorage,
        messages::Message,
        timer::{TimerMode, Toggle},
    },
    msg_bail_anyhow, msg_debug, msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const TICK_MILLIS: u64 = 50;
const PROGRESS_WIDTH: usize = 24;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Task label recorded with each finished work session
    #[arg(short, long)]
    task: Option<String>,

    /// Work interval length in minutes, saved as the new default
    #[arg(short, long)]
    minutes: Option<u32>,

    /// Exit after this many work sessions; 0 runs until quit
    #[arg(short, long, default_value_t = 0)]
    cycles: u32,
}

pub async fn cmd(args: RunArgs) -> Result<()> {
    let mut app = FocusApp::open(DataStorage::new())?;
    report_startup(app.startup_migration());

    app.set_current_task(args.task.as_deref());
    if let Some(minutes) = args.minutes {
        if !MINUTES_RANGE.contains(&minutes) {
            msg_bail_anyhow!(Message::MinutesOutOfRange(*MINUTES_RANGE.start(), *MINUTES_RANGE.end()));
        }
        app.set_duration(minutes)?;
    }

    msg_print!(Message::TimerHeader(app.current_task().unwrap_or("-").to_string()), true);
    app.toggle();

    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MILLIS));
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut last_frame = String::new();
    let mut completed = 0;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(event) = app.tick() {
                    clear_line();
                    last_frame.clear();
                    if matches!(event, CycleEvent::WorkCompleted { .. }) {
                        completed += 1;
                    }
                    report_cycle(&app, &event);
                    if args.cycles > 0 && completed >= args.cycles {
                        break;
                    }
                }
                let frame = render(&app);
                if frame != last_frame {
                    print!("\r{}", frame);
                    std::io::stdout().flush()?;
                    last_frame = frame;
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_input(&mut app, line.trim())? {
                    break;
                }
                last_frame.clear();
            }
            _ = &mut ctrl_c => {
                break;
            }
        }
    }

    clear_line();
    msg_info!(Message::TimerInterrupted);
    Ok(())
}

/// Returns `false` when the user asked to quit.
fn handle_input(app: &mut FocusApp, command: &str) -> Result<bool> {
    match command {
        "" => match app.toggle() {
            Toggle::Locked => msg_warning!(Message::TimerLocked),
            Toggle::Started | Toggle::Stopped => {}
        },
        "s" => app.skip_break(),
        "b" => app.repeat_break(),
        "r" => app.reset(),
        "+" | "-" => {
            let steps = if command == "+" { 1 } else { -1 };
            if let Some(minutes) = app.adjust_duration(steps)? {
                msg_info!(Message::DurationAdjusted(minutes));
            }
        }
        "q" => return Ok(false),
        other => msg_debug!(format!("ignoring input {:?}", other)),
    }
    Ok(true)
}

fn render(app: &FocusApp) -> String {
    let engine = app.engine();
    let filled = (engine.progress() * PROGRESS_WIDTH as f64).round() as usize;
    let label = match engine.mode() {
        TimerMode::Work => "WORK ",
        TimerMode::Break => "BREAK",
    };
    let state = if engine.is_running() { "" } else { " (paused)" };

    format!(
        "{} {} [{}{}]{}",
        label,
        engine.remaining_clock(),
        "#".repeat(filled),
        ".".repeat(PROGRESS_WIDTH - filled.min(PROGRESS_WIDTH)),
        state
    )
}

fn clear_line() {
    print!("\r\x1b[2K");
}

fn report_cycle(app: &FocusApp, event: &CycleEvent) {
    if app.settings().sound {
        print!("\x07");
    }

    match event {
        CycleEvent::WorkCompleted {
            record,
            saved,
            today_count,
            long_break,
        } => {
            msg_success!(Message::WorkCompleted(record.duration_minutes, *today_count));
            match saved {
                SaveOutcome::Saved => {}
                SaveOutcome::Duplicate => msg_warning!(Message::SessionDuplicate),
                SaveOutcome::Failed(_) => msg_error!(Message::SessionNotSaved),
            }
            let timer = &app.settings().timer;
            if *long_break {
                msg_info!(Message::LongBreakNext(timer.long_break_minutes));
            } else {
                msg_info!(Message::ShortBreakNext(timer.short_break_minutes));
            }
        }
        CycleEvent::BreakCompleted => msg_info!(Message::BreakCompleted),
    }

    if !app.engine().is_running() {
        msg_print!(Message::PressToStart);
    }
}

fn report_startup(startup: &StartupMigration) {
    match startup {
        StartupMigration::Nothing => {}
        StartupMigration::Migrated(outcome) => msg_success!(Message::LegacyMigrated(
            outcome.report.imported,
            outcome.report.duplicates,
            outcome.report.malformed,
            outcome.backup.display().to_string()
        )),
        StartupMigration::Failed(error) => msg_warning!(Message::LegacyMigrationFailed(error.clone())),
    }
}
