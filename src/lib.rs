//! # Focus Timer
//!
//! A work/break interval timer with a durable session log.
//!
//! ## Features
//!
//! - **Timer Engine**: Wall-clock countdown that alternates work and breaks,
//!   with a long break every few sessions
//! - **Session Log**: SQLite store of completed sessions with daily, hourly
//!   and per-task aggregates
//! - **Legacy Import**: One-time migration of the old flat text log
//! - **Data Exchange**: CSV export and import
//!
//! ## Usage
//!
//! ```rust,no_run
//! use focus_timer::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
