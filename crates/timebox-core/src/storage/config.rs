//! TOML-based application configuration.
//!
//! Stores the scheduler's tunables:
//! - Placement grid size
//! - Planning day window (local `HH:MM` bounds)
//! - UTC offset used to read local dates and times
//! - Minimum free gap the day optimizer considers
//!
//! Configuration is stored at `~/.config/timebox/config.toml`.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::scheduler::{parse_clock, SchedulerConfig};

/// Scheduler-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSection {
    #[serde(default = "default_grid_minutes")]
    pub grid_minutes: u32,
    #[serde(default = "default_day_start")]
    pub day_start: String,
    #[serde(default = "default_day_end")]
    pub day_end: String,
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_min_gap_minutes")]
    pub min_gap_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timebox/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerSection,
}

// Default functions
fn default_grid_minutes() -> u32 {
    15
}
fn default_day_start() -> String {
    "08:00".into()
}
fn default_day_end() -> String {
    "18:00".into()
}
fn default_min_gap_minutes() -> u32 {
    5
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            grid_minutes: default_grid_minutes(),
            day_start: default_day_start(),
            day_end: default_day_end(),
            utc_offset_minutes: 0,
            min_gap_minutes: default_min_gap_minutes(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<i64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.scheduler_config()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. The result must still
    /// convert into a valid [`SchedulerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let candidate: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        candidate.scheduler_config()?;
        *self = candidate;
        Ok(())
    }

    /// Typed scheduler settings.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero grid, a malformed `HH:MM` bound, or an
    /// offset outside +/-24h.
    pub fn scheduler_config(&self) -> Result<SchedulerConfig, ConfigError> {
        let s = &self.scheduler;
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: format!("scheduler.{key}"),
            message,
        };

        if s.grid_minutes == 0 {
            return Err(invalid("grid_minutes", "must be at least 1".into()));
        }
        let day_start = parse_clock(&s.day_start)
            .ok_or_else(|| invalid("day_start", format!("'{}' is not HH:MM", s.day_start)))?;
        let day_end = parse_clock(&s.day_end)
            .ok_or_else(|| invalid("day_end", format!("'{}' is not HH:MM", s.day_end)))?;
        let utc_offset = s
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                invalid(
                    "utc_offset_minutes",
                    format!("{} is out of range", s.utc_offset_minutes),
                )
            })?;

        Ok(SchedulerConfig {
            grid_minutes: s.grid_minutes,
            day_start,
            day_end,
            utc_offset,
            min_gap_minutes: s.min_gap_minutes,
        })
    }
}
