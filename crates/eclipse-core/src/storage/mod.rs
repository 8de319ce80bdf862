//! On-device persistence.
//!
//! User state (favorites, history, settings, one-shot flags) is stored as
//! JSON strings under fixed keys of a [`KeyValueStore`]. The SQLite
//! [`Database`] is the durable backend; [`MemoryStore`] backs tests and
//! dry runs. [`UserStore`] layers typed, corruption-tolerant access on top.

mod config;
mod database;
mod favorites;
mod history;
mod memory;
mod settings;
mod sort;
mod user_store;

pub use config::{CatalogConfig, Config, TimerSection, CONFIG_KEYS};
pub use database::Database;
pub use favorites::FavoriteToggle;
pub use history::{Feedback, HistoryEntry, HISTORY_LIMIT, PROMO_THRESHOLD};
pub use memory::MemoryStore;
pub use settings::{FavoritesSort, SettingUpdate, Settings};
pub use sort::{sort_alphabetical, sort_by_recency, sort_favorites, Collation, Sortable};
pub use user_store::UserStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Storage keys. Values are JSON documents.
pub mod keys {
    pub const FAVORITES: &str = "eclipse-favorites";
    pub const HISTORY: &str = "eclipse-history";
    pub const SETTINGS: &str = "eclipse-settings";
    pub const ONBOARDING_SEEN: &str = "eclipse-onboarding-seen";
    pub const PROMO_SEEN: &str = "eclipse-game-promo-shown";

    /// Keys whose presence counts as "the user has data".
    pub const USER_DATA: [&str; 3] = [FAVORITES, HISTORY, SETTINGS];

    /// Every key the app writes.
    pub const ALL: [&str; 5] = [FAVORITES, HISTORY, SETTINGS, ONBOARDING_SEEN, PROMO_SEEN];
}

/// String key-value store contract.
///
/// Reads report backend failures; interpreting missing or malformed values
/// is left to [`UserStore`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }

    /// Remove several keys. Backends that support it do so atomically.
    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Returns `~/.config/eclipse[-dev]/` based on ECLIPSE_ENV.
///
/// Set ECLIPSE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ECLIPSE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("eclipse-dev")
    } else {
        base_dir.join("eclipse")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
