//! Work/break timer engine.
//!
//! The engine is a wall-clock-based state machine with no thread of its own:
//! the host calls [`TimerEngine::tick`] on a short cadence and the engine
//! subtracts whatever time really elapsed since the previous tick. A delayed
//! or missed wakeup (suspend, a busy event loop) therefore produces one
//! larger subtraction instead of drift.
//!
//! ```text
//!            switch_to_break(n)              switch_to_work()
//!   Work ───────────────────────▶ Break-Short ───────────────▶ Work
//!     │   n % interval == 0                                     ▲
//!     └───────────────────────▶ Break-Long ─────────────────────┘
//! ```
//!
//! Running or stopped is a separate flag on top of the mode.
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use focus_timer::libs::config::TimerSettings;
//! use focus_timer::libs::timer::TimerEngine;
//!
//! let mut engine = TimerEngine::new(TimerSettings::default());
//! let t0 = Utc::now();
//! engine.start_at(t0);
//! assert!(engine.tick_at(t0 + Duration::minutes(25)));
//! assert_eq!(engine.current_time(), 0.0);
//! ```

use super::config::TimerSettings;
use super::formatter::format_clock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Smallest interval reachable through [`TimerEngine::adjust_duration`].
pub const ADJUST_MIN_MINUTES: u32 = 5;
/// Largest interval reachable through [`TimerEngine::adjust_duration`].
pub const ADJUST_MAX_MINUTES: u32 = 60;
/// Minutes added or removed per adjustment step.
pub const ADJUST_STEP_MINUTES: u32 = 5;

/// A stopped engine within this many seconds of its target counts as fresh.
const FRESH_TOLERANCE_SECONDS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Work,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    None,
    Short,
    Long,
}

/// What [`TimerEngine::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Started,
    Stopped,
    /// Strict mode kept a running work interval going.
    Locked,
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    mode: TimerMode,
    break_kind: BreakKind,
    is_running: bool,
    /// Seconds left in the current interval.
    current_time: f64,
    /// Full length of the current interval, in seconds.
    target_duration: f64,
    last_tick: Option<DateTime<Utc>>,
    settings: TimerSettings,
    strict_mode: bool,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

impl TimerEngine {
    /// A stopped engine at the start of a fresh work interval.
    pub fn new(settings: TimerSettings) -> Self {
        let target = minutes_to_seconds(settings.work_minutes);
        Self {
            mode: TimerMode::Work,
            break_kind: BreakKind::None,
            is_running: false,
            current_time: target,
            target_duration: target,
            last_tick: None,
            settings,
            strict_mode: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Whether the engine is in a work or a break interval.
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Kind of the current break, `None` during work.
    pub fn break_kind(&self) -> BreakKind {
        self.break_kind
    }

    /// True while the countdown advances on every tick.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Seconds left in the current interval.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Full length of the current interval in seconds.
    pub fn target_duration(&self) -> f64 {
        self.target_duration
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// While set, a running work interval cannot be stopped.
    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    pub fn set_strict_mode(&mut self, strict_mode: bool) {
        self.strict_mode = strict_mode;
    }

    /// 0.0 .. 1.0 elapsed share of the current interval.
    pub fn progress(&self) -> f64 {
        if self.target_duration <= 0.0 {
            return 0.0;
        }
        (1.0 - self.current_time / self.target_duration).clamp(0.0, 1.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn remaining_clock(&self) -> String {
        format_clock(self.current_time)
    }

    /// Stopped at the full length of the current interval.
    pub fn is_fresh(&self) -> bool {
        !self.is_running && (self.current_time - self.target_duration).abs() < FRESH_TOLERANCE_SECONDS
    }

    // ── Run control ──────────────────────────────────────────────────

    /// Starts the countdown from the current wall-clock time.
    pub fn start(&mut self) {
        self.start_at(Utc::now());
    }

    /// Starts the countdown from `now`. No-op while already running.
    pub fn start_at(&mut self, now: DateTime<Utc>) {
        if self.is_running {
            return;
        }
        self.is_running = true;
        self.last_tick = Some(now);
        debug!(mode = ?self.mode, remaining = self.current_time, "timer started");
    }

    /// Pauses the countdown, keeping the remaining time.
    pub fn stop(&mut self) {
        if self.is_running {
            debug!(mode = ?self.mode, remaining = self.current_time, "timer stopped");
        }
        self.is_running = false;
    }

    /// Stops a running interval or starts a stopped one.
    pub fn toggle(&mut self) -> Toggle {
        self.toggle_at(Utc::now())
    }

    pub fn toggle_at(&mut self, now: DateTime<Utc>) -> Toggle {
        if !self.is_running {
            self.start_at(now);
            return Toggle::Started;
        }
        if self.strict_mode && self.mode == TimerMode::Work {
            return Toggle::Locked;
        }
        self.stop();
        Toggle::Stopped
    }

    /// Stops and rewinds to the full length of the current mode, recomputed
    /// from the settings.
    pub fn reset(&mut self) {
        self.stop();
        self.target_duration = self.mode_duration();
        self.current_time = self.target_duration;
        self.check_invariants();
    }

    /// Advances the countdown to now. Returns `true` when the interval finished.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Utc::now())
    }

    /// Advances the countdown to `now`. Returns `true` exactly when this tick
    /// finished the interval; the engine is then stopped at zero.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_running {
            return false;
        }

        let last = self.last_tick.unwrap_or(now);
        // A clock stepping backwards counts as no time passing.
        let elapsed = (now - last).to_std().map(|d| d.as_secs_f64()).unwrap_or(0.0);
        self.last_tick = Some(now);
        self.current_time -= elapsed;

        if self.current_time <= 0.0 {
            self.current_time = 0.0;
            self.is_running = false;
            debug!(mode = ?self.mode, "interval finished");
            return true;
        }
        false
    }

    // ── Durations ────────────────────────────────────────────────────

    /// Restarts the current interval at `minutes`.
    ///
    /// In work mode the value also becomes the new work length setting. A
    /// break adjustment only lasts for this break.
    pub fn set_duration(&mut self, minutes: u32) {
        self.target_duration = minutes_to_seconds(minutes);
        self.current_time = self.target_duration;
        if self.mode == TimerMode::Work {
            self.settings.work_minutes = minutes;
        }
        self.check_invariants();
    }

    /// Moves the current interval by `steps` five-minute steps, clamped to
    /// 5..=60 minutes. Returns the new length when it changed; a running
    /// interval is never adjusted.
    pub fn adjust_duration(&mut self, steps: i32) -> Option<u32> {
        if self.is_running {
            return None;
        }
        let current = (self.target_duration / 60.0).round() as i64;
        let wanted = current + i64::from(steps) * i64::from(ADJUST_STEP_MINUTES);
        let next = wanted.clamp(i64::from(ADJUST_MIN_MINUTES), i64::from(ADJUST_MAX_MINUTES)) as u32;
        if i64::from(next) == current {
            return None;
        }
        self.set_duration(next);
        Some(next)
    }

    // ── Mode transitions ─────────────────────────────────────────────

    /// Enters a break after `completed_work_count` finished work sessions.
    /// Every `long_break_interval`-th session earns a long break; a count of
    /// zero never does. Returns whether the break is long.
    pub fn switch_to_break(&mut self, completed_work_count: u32) -> bool {
        let interval = self.settings.long_break_interval.max(1);
        let is_long = completed_work_count > 0 && completed_work_count % interval == 0;

        self.mode = TimerMode::Break;
        self.break_kind = if is_long { BreakKind::Long } else { BreakKind::Short };
        self.target_duration = self.mode_duration();
        self.current_time = self.target_duration;
        self.check_invariants();
        debug!(completed_work_count, is_long, "switched to break");

        is_long
    }

    pub fn switch_to_work(&mut self) {
        self.mode = TimerMode::Work;
        self.break_kind = BreakKind::None;
        self.target_duration = self.mode_duration();
        self.current_time = self.target_duration;
        self.check_invariants();
        debug!("switched to work");
    }

    /// Leaves a break for a stopped, fresh work interval. No-op outside a break.
    pub fn skip_break(&mut self) {
        if self.mode != TimerMode::Break {
            return;
        }
        self.switch_to_work();
        self.stop();
    }

    pub fn repeat_break(&mut self, completed_work_count: u32) {
        self.repeat_break_at(completed_work_count, Utc::now());
    }

    /// Goes back into a break and starts it at once. No-op outside work mode.
    pub fn repeat_break_at(&mut self, completed_work_count: u32, now: DateTime<Utc>) {
        if self.mode != TimerMode::Work {
            return;
        }
        self.switch_to_break(completed_work_count);
        self.start_at(now);
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Replaces the settings. A stopped, fresh interval picks up the new
    /// length immediately; a running or partly elapsed one keeps counting
    /// and sees the change on the next reset.
    pub fn update_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
        if self.is_fresh() {
            self.target_duration = self.mode_duration();
            self.current_time = self.target_duration;
        }
        self.check_invariants();
    }

    fn mode_duration(&self) -> f64 {
        let minutes = match (self.mode, self.break_kind) {
            (TimerMode::Work, _) => self.settings.work_minutes,
            (TimerMode::Break, BreakKind::Long) => self.settings.long_break_minutes,
            (TimerMode::Break, _) => self.settings.short_break_minutes,
        };
        minutes_to_seconds(minutes)
    }

    fn check_invariants(&self) {
        debug_assert!(self.current_time >= 0.0, "remaining time went negative");
        debug_assert!(
            self.current_time <= self.target_duration,
            "remaining time {} exceeds target {}",
            self.current_time,
            self.target_duration
        );
    }
}

/// Minutes selected by pointing at a dial, `degrees` measured clockwise from
/// 12 o'clock. Snaps to five-minute marks; the top of the dial is 60.
pub fn minutes_from_dial_angle(degrees: f64) -> u32 {
    let angle = degrees.rem_euclid(360.0);
    let minutes = ((angle / 6.0 / 5.0).round() * 5.0) as u32;
    if minutes == 0 {
        60
    } else {
        minutes.min(60)
    }
}

fn minutes_to_seconds(minutes: u32) -> f64 {
    f64::from(minutes) * 60.0
}
