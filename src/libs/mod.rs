//! Domain logic and infrastructure of the focus timer.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use focus_timer::libs::app::FocusApp;
//! use focus_timer::libs::data_storage::DataStorage;
//!
//! let mut app = FocusApp::open(DataStorage::new())?;
//! app.set_current_task(Some("write report"));
//! app.toggle();
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod app;
pub mod config;
pub mod data_storage;
pub mod export;
pub mod formatter;
pub mod legacy;
pub mod messages;
pub mod session;
pub mod stats;
pub mod timer;
pub mod view;
