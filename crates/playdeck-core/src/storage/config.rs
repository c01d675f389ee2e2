//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Path of the bookmark tree JSON file
//! - Playback behavior (auto-open, announcements)
//!
//! Configuration is stored at `~/.config/playdeck/config.toml`. The daily
//! reset boundary is deliberately not configurable.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

use super::data_dir;

/// Bookmark tree configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmarksConfig {
    /// Path to the bookmark tree JSON file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Open the next item in the browser on every advance.
    #[serde(default = "default_true")]
    pub auto_open: bool,
    /// Print opened item titles on advance.
    #[serde(default = "default_true")]
    pub announce: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            auto_open: true,
            announce: true,
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/playdeck/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bookmarks: BookmarksConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error. Never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// The configured bookmark file, or an error naming the missing key.
    pub fn bookmarks_file(&self) -> Result<PathBuf> {
        self.bookmarks
            .file
            .clone()
            .ok_or_else(|| ConfigError::MissingKey("bookmarks.file".to_string()).into())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// as the field's type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self).map_err(crate::error::CoreError::Json)?;
        set_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(crate::error::CoreError::Json)?;
        self.save()?;
        Ok(())
    }
}

fn set_by_path(root: &mut serde_json::Value, key: &str, raw: &str) -> Result<(), ConfigError> {
    let unknown = || ConfigError::MissingKey(key.to_string());
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
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
        let parsed = coerce_like(existing, key, raw)?;
        obj.insert(part.to_string(), parsed);
        return Ok(());
    }
    Err(unknown())
}

/// Parse `raw` to match the type the field currently holds.
fn coerce_like(
    existing: &serde_json::Value,
    key: &str,
    raw: &str,
) -> Result<serde_json::Value, ConfigError> {
    use serde_json::Value;
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    match existing {
        Value::Bool(_) => raw
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|e| invalid(e.to_string())),
        Value::Number(_) => {
            if let Ok(n) = raw.parse::<u64>() {
                Ok(Value::Number(n.into()))
            } else if let Ok(n) = raw.parse::<f64>() {
                serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{raw}' as number")))
            } else {
                Err(invalid(format!("cannot parse '{raw}' as number")))
            }
        }
        // Optional string fields serialize as null until first set.
        Value::String(_) | Value::Null => Ok(Value::String(raw.to_string())),
        Value::Object(_) | Value::Array(_) => {
            serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))
        }
    }
}
