//! Display formatting for countdowns and accumulated focus time.
//!
//! Internal bookkeeping keeps fractional seconds; only these functions
//! truncate, so rounding never accumulates across ticks.

/// Remaining seconds as `MM:SS`, truncated to whole seconds.
///
/// ```rust
/// use focus_timer::libs::formatter::format_clock;
///
/// assert_eq!(format_clock(1499.7), "24:59");
/// assert_eq!(format_clock(3600.0), "60:00");
/// ```
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let (minutes, seconds) = (total / 60, total % 60);
    format!("{:02}:{:02}", minutes, seconds)
}

/// Accumulated minutes as `2h 05m`, or `40m` below an hour.
pub fn format_minutes(total_minutes: u32) -> String {
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
