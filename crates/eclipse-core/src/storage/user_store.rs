//! Typed access to persisted user state.
//!
//! Reads never fail: a missing key, undecodable JSON or a backend read
//! error all yield the default value. Writes overwrite the whole record and
//! report backend errors to the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{keys, KeyValueStore};
use crate::error::StorageError;

const FLAG_SET: &str = "true";

/// Favorites, history, settings and one-shot flags over a [`KeyValueStore`].
#[derive(Debug)]
pub struct UserStore<S> {
    store: S,
}

impl<S: KeyValueStore> UserStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Raw value for `key`, with backend failures logged and swallowed.
    pub(super) fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "store read failed, using default");
                None
            }
        }
    }

    /// Decode the JSON stored under `key`, or `None` when missing or malformed.
    pub(super) fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "discarding malformed stored value");
                None
            }
        }
    }

    pub(super) fn write_json<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|source| StorageError::EncodeFailed {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &encoded)
    }

    fn flag(&self, key: &str) -> bool {
        self.read_raw(key).is_some()
    }

    pub fn onboarding_seen(&self) -> bool {
        self.flag(keys::ONBOARDING_SEEN)
    }

    pub fn mark_onboarding_seen(&mut self) -> Result<(), StorageError> {
        self.store.set(keys::ONBOARDING_SEEN, FLAG_SET)
    }

    pub fn promo_seen(&self) -> bool {
        self.flag(keys::PROMO_SEEN)
    }

    pub fn mark_promo_seen(&mut self) -> Result<(), StorageError> {
        self.store.set(keys::PROMO_SEEN, FLAG_SET)
    }

    /// True once enough sessions are recorded and the promo was never shown.
    pub fn should_show_promo(&self) -> bool {
        !self.promo_seen() && self.completed_count() >= super::PROMO_THRESHOLD
    }

    /// Whether favorites, history or settings were ever written.
    pub fn has_any_user_data(&self) -> bool {
        keys::USER_DATA
            .iter()
            .any(|key| self.read_raw(key).is_some())
    }

    /// Remove every persisted record, flags included.
    pub fn reset_all(&mut self) -> Result<(), StorageError> {
        self.store.remove_all(&keys::ALL)?;
        tracing::info!("all user data cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{HistoryEntry, MemoryStore, Settings};

    fn store() -> UserStore<MemoryStore> {
        UserStore::new(MemoryStore::new())
    }

    #[test]
    fn fresh_store_has_no_user_data() {
        let s = store();
        assert!(!s.has_any_user_data());
        assert!(!s.onboarding_seen());
        assert!(!s.promo_seen());
        assert!(!s.should_show_promo());
    }

    #[test]
    fn flags_are_presence_markers() {
        let mut s = store();
        s.mark_onboarding_seen().unwrap();
        assert!(s.onboarding_seen());
        assert_eq!(
            s.store().get(keys::ONBOARDING_SEEN).unwrap().as_deref(),
            Some("true")
        );
        // Flags alone do not count as user data.
        assert!(!s.has_any_user_data());
    }

    #[test]
    fn promo_shows_after_five_sessions_until_seen() {
        let mut s = store();
        for i in 0..4 {
            s.append_history_at("souffle-478", i, None, None).unwrap();
        }
        assert!(!s.should_show_promo());
        s.append_history_at("souffle-478", 10, None, None).unwrap();
        assert!(s.should_show_promo());
        s.mark_promo_seen().unwrap();
        assert!(!s.should_show_promo());
    }

    #[test]
    fn reset_all_clears_data_and_flags() {
        let mut s = store();
        s.add_favorite("a").unwrap();
        s.append_history_at("a", 1, None, None).unwrap();
        s.save_settings(&Settings::default()).unwrap();
        s.mark_onboarding_seen().unwrap();
        s.mark_promo_seen().unwrap();
        assert!(s.has_any_user_data());

        s.reset_all().unwrap();
        assert!(!s.has_any_user_data());
        assert!(!s.onboarding_seen());
        assert!(!s.promo_seen());
        assert!(s.store().is_empty());
    }

    #[test]
    fn malformed_json_reads_as_none() {
        let s = UserStore::new(MemoryStore::with_values([(keys::HISTORY, "{not json")]));
        assert!(s.read_json::<Vec<HistoryEntry>>(keys::HISTORY).is_none());
        assert!(s.history().is_empty());
    }
}
