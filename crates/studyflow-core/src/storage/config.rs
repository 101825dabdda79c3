//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Defaults for new focus runs
//! - Board column layout and the column "complete" moves tasks to
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/studyflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::board::{default_columns, Column, ColumnId};
use crate::error::ConfigError;
use crate::focus::FocusSessionConfig;

/// Defaults applied when a focus run is started without explicit values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusDefaults {
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_total_sessions")]
    pub total_sessions: u32,
    #[serde(default = "default_session_minutes")]
    pub session_duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_done_column")]
    pub done_column: ColumnId,
    #[serde(default = "default_columns")]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub focus: FocusDefaults,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_topic() -> String {
    "General study".into()
}
fn default_total_sessions() -> u32 {
    4
}
fn default_session_minutes() -> u32 {
    25
}
fn default_done_column() -> ColumnId {
    ColumnId::new(ColumnId::DONE)
}
fn default_true() -> bool {
    true
}

impl Default for FocusDefaults {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            total_sessions: default_total_sessions(),
            session_duration_minutes: default_session_minutes(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            done_column: default_done_column(),
            columns: default_columns(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            focus: FocusDefaults::default(),
            board: BoardConfig::default(),
            notifications: NotificationsConfig::default(),
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        .into(),
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Set a value by dot-separated key without touching disk.
    ///
    /// The change is rejected, leaving `self` untouched, if the result
    /// would not validate.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_focus_config()
            .map_err(|e| ConfigError::InvalidValue {
                key: "focus".into(),
                message: e.to_string(),
            })?;
        if self.board.columns.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "board.columns".into(),
                message: "at least one column is required".into(),
            });
        }
        if !self
            .board
            .columns
            .iter()
            .any(|c| c.id == self.board.done_column)
        {
            return Err(ConfigError::InvalidValue {
                key: "board.done_column".into(),
                message: format!("'{}' is not a configured column", self.board.done_column),
            });
        }
        Ok(())
    }

    /// Focus config built from the stored defaults.
    pub fn default_focus_config(&self) -> Result<FocusSessionConfig, crate::error::ValidationError> {
        FocusSessionConfig::new(
            self.focus.topic.clone(),
            self.focus.total_sessions,
            self.focus.session_duration_minutes,
        )
    }
}
