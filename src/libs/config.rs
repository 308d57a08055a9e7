//! Settings document for the timer.
//!
//! The settings live in `settings.json` inside the data directory. Every
//! field is optional in the document and falls back to its default, so an
//! old or hand-edited file keeps working:
//!
//! | key                   | default | aliases            |
//! |-----------------------|---------|--------------------|
//! | `work_minutes`        | 25      | `work_min`         |
//! | `short_break_minutes` | 5       | `short_break_min`  |
//! | `long_break_minutes`  | 15      | `long_break_min`   |
//! | `long_break_interval` | 4       |                    |
//! | `auto_start_next`     | false   | `auto_start`       |
//! | `strict_mode`         | false   |                    |
//! | `sound`               | true    |                    |
//!
//! The document is validated once when it is read. A document that cannot
//! be read, parsed or validated is replaced by the defaults.
//!
//! ```rust,no_run
//! use focus_timer::libs::config::Settings;
//!
//! let mut settings = Settings::read()?;
//! settings.timer.work_minutes = 50;
//! settings.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::warn;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Accepted length of any interval, in minutes.
pub const MINUTES_RANGE: RangeInclusive<u32> = 1..=180;
/// Accepted number of work sessions between long breaks.
pub const INTERVAL_RANGE: RangeInclusive<u32> = 1..=12;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be between {min} and {max} minutes, got {value}")]
    MinutesOutOfRange { field: &'static str, value: u32, min: u32, max: u32 },
    #[error("long_break_interval must be between {min} and {max}, got {value}")]
    IntervalOutOfRange { value: u32, min: u32, max: u32 },
}

/// The settings the timer engine works from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TimerSettings {
    /// Length of a work interval.
    #[serde(alias = "work_min")]
    pub work_minutes: u32,
    #[serde(alias = "short_break_min")]
    pub short_break_minutes: u32,
    #[serde(alias = "long_break_min")]
    pub long_break_minutes: u32,
    /// Completed work sessions between long breaks.
    pub long_break_interval: u32,
    /// Start the next interval as soon as the current one completes.
    #[serde(alias = "auto_start")]
    pub auto_start_next: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        TimerSettings {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_interval: 4,
            auto_start_next: false,
        }
    }
}

impl TimerSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("work_minutes", self.work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ] {
            if !MINUTES_RANGE.contains(&value) {
                return Err(SettingsError::MinutesOutOfRange {
                    field,
                    value,
                    min: *MINUTES_RANGE.start(),
                    max: *MINUTES_RANGE.end(),
                });
            }
        }
        if !INTERVAL_RANGE.contains(&self.long_break_interval) {
            return Err(SettingsError::IntervalOutOfRange {
                value: self.long_break_interval,
                min: *INTERVAL_RANGE.start(),
                max: *INTERVAL_RANGE.end(),
            });
        }
        Ok(())
    }
}

/// Old key spellings paired with their current names.
const KEY_ALIASES: [(&str, &str); 4] = [
    ("work_min", "work_minutes"),
    ("short_break_min", "short_break_minutes"),
    ("long_break_min", "long_break_minutes"),
    ("auto_start", "auto_start_next"),
];

/// Parses a settings document. When a hand-edited file carries both the
/// old and the current spelling of a key, the current one wins.
pub fn parse_document(raw: &str) -> Result<Settings> {
    let mut value: serde_json::Value = serde_json::from_str(raw)?;
    if let Some(object) = value.as_object_mut() {
        for (alias, name) in KEY_ALIASES {
            if object.contains_key(name) {
                object.remove(alias);
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// The whole settings document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub timer: TimerSettings,
    /// Refuse to stop a running work interval.
    pub strict_mode: bool,
    /// Play a sound when an interval completes.
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            timer: TimerSettings::default(),
            strict_mode: false,
            sound: true,
        }
    }
}

impl Settings {
    /// Reads the settings from the per-user data directory.
    pub fn read() -> Result<Settings> {
        Self::read_from(&DataStorage::new())
    }

    /// Reads and validates the settings document in `storage`.
    ///
    /// A missing document is created with the defaults. A broken one is
    /// logged, replaced by the defaults and rewritten.
    pub fn read_from(storage: &DataStorage) -> Result<Settings> {
        let path = storage.get_path(SETTINGS_FILE_NAME)?;
        if !path.exists() {
            let settings = Settings::default();
            settings.save_to(storage)?;
            return Ok(settings);
        }

        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| parse_document(&raw))
            .and_then(|settings| settings.timer.validate().map(|_| settings).map_err(anyhow::Error::from));

        match parsed {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings rejected, restoring defaults");
                let settings = Settings::default();
                settings.save_to(storage)?;
                Ok(settings)
            }
        }
    }

    /// Writes the document to the per-user data directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let path = storage.get_path(SETTINGS_FILE_NAME)?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(&file, &self)?;
        Ok(())
    }

    /// Walks the user through every setting, using the current values as
    /// defaults. Values are re-validated before they are returned.
    pub fn init(current: &Settings) -> Result<Settings> {
        let theme = ColorfulTheme::default();
        msg_print!(Message::ConfigHeader);

        let minutes = |prompt: Message, default: u32| -> Result<u32> {
            Ok(Input::with_theme(&theme)
                .with_prompt(prompt.to_string())
                .default(default)
                .validate_with(|value: &u32| {
                    if MINUTES_RANGE.contains(value) {
                        Ok(())
                    } else {
                        Err(Message::MinutesOutOfRange(*MINUTES_RANGE.start(), *MINUTES_RANGE.end()).to_string())
                    }
                })
                .interact_text()?)
        };

        let timer = TimerSettings {
            work_minutes: minutes(Message::PromptWorkMinutes, current.timer.work_minutes)?,
            short_break_minutes: minutes(Message::PromptShortBreakMinutes, current.timer.short_break_minutes)?,
            long_break_minutes: minutes(Message::PromptLongBreakMinutes, current.timer.long_break_minutes)?,
            long_break_interval: Input::with_theme(&theme)
                .with_prompt(Message::PromptLongBreakInterval.to_string())
                .default(current.timer.long_break_interval)
                .validate_with(|value: &u32| {
                    if INTERVAL_RANGE.contains(value) {
                        Ok(())
                    } else {
                        Err(Message::IntervalOutOfRange(*INTERVAL_RANGE.start(), *INTERVAL_RANGE.end()).to_string())
                    }
                })
                .interact_text()?,
            auto_start_next: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptAutoStart.to_string())
                .default(current.timer.auto_start_next)
                .interact()?,
        };
        timer.validate()?;

        Ok(Settings {
            timer,
            strict_mode: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptStrictMode.to_string())
                .default(current.strict_mode)
                .interact()?,
            sound: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptSound.to_string())
                .default(current.sound)
                .interact()?,
        })
    }
}
