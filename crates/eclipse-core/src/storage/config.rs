//! TOML-based application configuration.
//!
//! Stores operator preferences including:
//! - Catalog source overrides and demo mode
//! - Whether premium techniques join random draws
//! - Timer announcement override
//!
//! Configuration is stored at `~/.config/eclipse/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::catalog::{self, Catalog};
use crate::error::{ConfigError, CoreError};

/// Catalog source configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Replaces the bundled `techniques.json` when set.
    #[serde(default)]
    pub techniques_path: Option<String>,
    /// Replaces the bundled `categories.json` when set.
    #[serde(default)]
    pub categories_path: Option<String>,
    #[serde(default)]
    pub demo_mode: bool,
    #[serde(default)]
    pub include_premium: bool,
}

/// Timer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSection {
    /// When set, wins over the stored `timerAnnouncements` setting.
    #[serde(default)]
    pub announcements_override: Option<bool>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/eclipse/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub timer: TimerSection,
}

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: [&str; 5] = [
    "catalog.techniques_path",
    "catalog.categories_path",
    "catalog.demo_mode",
    "catalog.include_premium",
    "timer.announcements_override",
];

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
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        if !CONFIG_KEYS.contains(&key) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }
        let obj = root
            .get_mut(section)
            .and_then(|v| v.as_object_mut())
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        // Optional fields serialize as null, so the target type comes from
        // the key rather than the current value.
        let new_value = match key {
            "catalog.demo_mode" | "catalog.include_premium" => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            "timer.announcements_override" => match value {
                "" | "none" | "unset" => serde_json::Value::Null,
                other => serde_json::Value::Bool(
                    other.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
            },
            _ => match value {
                "" | "none" | "unset" => serde_json::Value::Null,
                other => serde_json::Value::String(other.to_string()),
            },
        };

        obj.insert(field.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
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

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
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
    ///
    /// Unset optional values read as `"none"`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some("none".to_string()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Demo mode from config, or from `ECLIPSE_DEMO_MODE`.
    pub fn demo_mode(&self) -> bool {
        self.catalog.demo_mode || catalog::demo_mode_from_env()
    }

    /// Build the effective catalog: overrides or bundled data, then demo mode.
    pub fn load_catalog(&self) -> Result<Catalog, CoreError> {
        let catalog = Catalog::load_with_overrides(
            self.catalog.techniques_path.as_deref().map(Path::new),
            self.catalog.categories_path.as_deref().map(Path::new),
        )?;
        Ok(catalog.with_demo_mode(self.demo_mode()))
    }

    /// Whether phase announcements are spoken, given the stored setting.
    pub fn announcements(&self, stored: bool) -> bool {
        self.timer.announcements_override.unwrap_or(stored)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert!(!parsed.catalog.demo_mode);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("catalog.demo_mode").as_deref(), Some("false"));
        assert_eq!(cfg.get("catalog.techniques_path").as_deref(), Some("none"));
        assert!(cfg.get("catalog.missing_key").is_none());
        assert!(cfg.get("catalog").is_none());
    }

    #[test]
    fn apply_updates_bool_and_string() {
        let mut cfg = Config::default();
        cfg.apply("catalog.include_premium", "true").unwrap();
        cfg.apply("catalog.techniques_path", "/tmp/t.json").unwrap();
        assert!(cfg.catalog.include_premium);
        assert_eq!(cfg.catalog.techniques_path.as_deref(), Some("/tmp/t.json"));

        cfg.apply("catalog.techniques_path", "none").unwrap();
        assert!(cfg.catalog.techniques_path.is_none());
    }

    #[test]
    fn announcements_override_wins_over_stored_setting() {
        let mut cfg = Config::default();
        assert!(cfg.announcements(true));
        cfg.apply("timer.announcements_override", "false").unwrap();
        assert!(!cfg.announcements(true));
        cfg.apply("timer.announcements_override", "unset").unwrap();
        assert!(!cfg.announcements(false));
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("catalog.nonexistent_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.apply("nodots", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        let result = cfg.apply("catalog.demo_mode", "not_a_bool");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_reads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog]\ndemo_mode = true\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert!(cfg.catalog.demo_mode);
        assert!(cfg.timer.announcements_override.is_none());
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
