use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{keys, KeyValueStore, UserStore};
use crate::error::{ConfigError, StorageError};

/// Order of the favorites list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoritesSort {
    /// Most recently used first.
    #[default]
    Recent,
    /// Alphabetical by title.
    Az,
}

impl FavoritesSort {
    pub fn as_str(self) -> &'static str {
        match self {
            FavoritesSort::Recent => "recent",
            FavoritesSort::Az => "az",
        }
    }
}

impl fmt::Display for FavoritesSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FavoritesSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recent" => Ok(FavoritesSort::Recent),
            "az" | "a-z" => Ok(FavoritesSort::Az),
            other => Err(format!("unknown sort '{other}' (expected recent or az)")),
        }
    }
}

/// User preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub immersive_mode: bool,
    pub timer_announcements: bool,
    pub default_favorites_sort: FavoritesSort,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            immersive_mode: true,
            timer_announcements: true,
            default_favorites_sort: FavoritesSort::Recent,
        }
    }
}

impl Settings {
    /// Overlay the recognised fields of a stored object onto the defaults.
    ///
    /// Missing or ill-typed fields keep their default; unknown fields are
    /// ignored.
    pub fn merged_from(stored: &serde_json::Map<String, serde_json::Value>) -> Self {
        fn field<T: serde::de::DeserializeOwned>(
            stored: &serde_json::Map<String, serde_json::Value>,
            name: &str,
        ) -> Option<T> {
            stored
                .get(name)
                .and_then(|v| serde_json::from_value(v.clone()).ok())
        }

        let defaults = Self::default();
        Self {
            immersive_mode: field(stored, "immersiveMode").unwrap_or(defaults.immersive_mode),
            timer_announcements: field(stored, "timerAnnouncements")
                .unwrap_or(defaults.timer_announcements),
            default_favorites_sort: field(stored, "defaultFavoritesSort")
                .unwrap_or(defaults.default_favorites_sort),
        }
    }

    pub fn apply(&mut self, update: SettingUpdate) {
        match update {
            SettingUpdate::ImmersiveMode(v) => self.immersive_mode = v,
            SettingUpdate::TimerAnnouncements(v) => self.timer_announcements = v,
            SettingUpdate::DefaultFavoritesSort(v) => self.default_favorites_sort = v,
        }
    }

    /// Look up a field by its stored or snake_case name.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "immersiveMode" | "immersive_mode" => Some(self.immersive_mode.to_string()),
            "timerAnnouncements" | "timer_announcements" => {
                Some(self.timer_announcements.to_string())
            }
            "defaultFavoritesSort" | "default_favorites_sort" => {
                Some(self.default_favorites_sort.to_string())
            }
            _ => None,
        }
    }
}

/// A single-field settings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingUpdate {
    ImmersiveMode(bool),
    TimerAnnouncements(bool),
    DefaultFavoritesSort(FavoritesSort),
}

impl SettingUpdate {
    /// Keys accepted by [`SettingUpdate::parse`].
    pub const KEYS: [&'static str; 3] =
        ["immersiveMode", "timerAnnouncements", "defaultFavoritesSort"];

    /// Build an update from a string key and value.
    pub fn parse(key: &str, value: &str) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let parse_bool = |v: &str| v.parse::<bool>().map_err(|e| invalid(e.to_string()));
        match key {
            "immersiveMode" | "immersive_mode" => Ok(Self::ImmersiveMode(parse_bool(value)?)),
            "timerAnnouncements" | "timer_announcements" => {
                Ok(Self::TimerAnnouncements(parse_bool(value)?))
            }
            "defaultFavoritesSort" | "default_favorites_sort" => Ok(Self::DefaultFavoritesSort(
                value.parse().map_err(invalid)?,
            )),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }
}

impl<S: KeyValueStore> UserStore<S> {
    /// Stored settings merged field by field over the defaults.
    pub fn settings(&self) -> Settings {
        self.read_json::<serde_json::Map<String, serde_json::Value>>(keys::SETTINGS)
            .map(|stored| Settings::merged_from(&stored))
            .unwrap_or_default()
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.write_json(keys::SETTINGS, settings)
    }

    pub fn update_setting(&mut self, update: SettingUpdate) -> Result<Settings, StorageError> {
        let mut settings = self.settings();
        settings.apply(update);
        self.save_settings(&settings)?;
        Ok(settings)
    }

    /// String-keyed variant of [`UserStore::update_setting`].
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<Settings, crate::CoreError> {
        let update = SettingUpdate::parse(key, value)?;
        Ok(self.update_setting(update)?)
    }

    pub fn reset_settings(&mut self) -> Result<Settings, StorageError> {
        let settings = Settings::default();
        self.save_settings(&settings)?;
        Ok(settings)
    }
}
