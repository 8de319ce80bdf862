use serde::{Deserialize, Serialize};

use super::{keys, KeyValueStore, UserStore};
use crate::error::StorageError;

/// Outcome of [`UserStore::toggle_favorite`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub favorites: Vec<String>,
    pub is_favorite: bool,
}

impl<S: KeyValueStore> UserStore<S> {
    /// Favorite technique ids in insertion order.
    pub fn favorites(&self) -> Vec<String> {
        self.read_json(keys::FAVORITES).unwrap_or_default()
    }

    pub fn save_favorites(&mut self, favorites: &[String]) -> Result<(), StorageError> {
        self.write_json(keys::FAVORITES, favorites)
    }

    /// Append `id` unless already present.
    pub fn add_favorite(&mut self, id: &str) -> Result<Vec<String>, StorageError> {
        let mut favorites = self.favorites();
        if !favorites.iter().any(|f| f == id) {
            favorites.push(id.to_string());
            self.save_favorites(&favorites)?;
        }
        Ok(favorites)
    }

    /// Remove `id`; absent ids leave the list untouched.
    pub fn remove_favorite(&mut self, id: &str) -> Result<Vec<String>, StorageError> {
        let mut favorites = self.favorites();
        let before = favorites.len();
        favorites.retain(|f| f != id);
        if favorites.len() != before {
            self.save_favorites(&favorites)?;
        }
        Ok(favorites)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites().iter().any(|f| f == id)
    }

    pub fn toggle_favorite(&mut self, id: &str) -> Result<FavoriteToggle, StorageError> {
        if self.is_favorite(id) {
            let favorites = self.remove_favorite(id)?;
            Ok(FavoriteToggle {
                favorites,
                is_favorite: false,
            })
        } else {
            let favorites = self.add_favorite(id)?;
            Ok(FavoriteToggle {
                favorites,
                is_favorite: true,
            })
        }
    }
}
