//! SQLite persistence for the session log.
//!
//! ```rust,no_run
//! use chrono::Local;
//! use focus_timer::db::sessions::Sessions;
//! use focus_timer::libs::session::SessionRecord;
//!
//! let mut sessions = Sessions::new()?;
//! sessions.insert(&SessionRecord::success(Local::now().naive_local(), 25, Some("review")))?;
//! let today = sessions.daily_summary(0);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup; opening a store applies pending migrations.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Session records and the aggregate queries over them.
pub mod sessions;
