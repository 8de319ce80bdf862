use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{keys, KeyValueStore, UserStore};
use crate::catalog::Tier;
use crate::error::StorageError;

/// Maximum number of history entries kept, newest first.
pub const HISTORY_LIMIT: usize = 50;

/// Completed sessions needed before the promo is offered.
pub const PROMO_THRESHOLD: usize = 5;

/// How a session felt afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Helped,
    Meh,
    Nope,
}

impl Feedback {
    pub fn as_str(self) -> &'static str {
        match self {
            Feedback::Helped => "helped",
            Feedback::Meh => "meh",
            Feedback::Nope => "nope",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "helped" => Ok(Feedback::Helped),
            "meh" => Ok(Feedback::Meh),
            "nope" => Ok(Feedback::Nope),
            other => Err(format!("unknown feedback '{other}' (expected helped, meh or nope)")),
        }
    }
}

/// One completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub technique_id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Unrecognised tier names decode as `None` so the session still counts.
    #[serde(
        default,
        deserialize_with = "lenient_tier",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

fn lenient_tier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Tier>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}

impl<S: KeyValueStore> UserStore<S> {
    /// History, newest first.
    ///
    /// Entries that fail to decode are dropped individually.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let Some(raw) = self.read_json::<Vec<serde_json::Value>>(keys::HISTORY) else {
            return Vec::new();
        };
        let total = raw.len();
        let entries: Vec<HistoryEntry> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if entries.len() != total {
            tracing::debug!(
                dropped = total - entries.len(),
                "skipped malformed history entries"
            );
        }
        entries
    }

    pub fn save_history(&mut self, history: &[HistoryEntry]) -> Result<(), StorageError> {
        self.write_json(keys::HISTORY, history)
    }

    /// Record a session stamped with the current time.
    pub fn append_history(
        &mut self,
        technique_id: &str,
        level: Option<Tier>,
        feedback: Option<Feedback>,
    ) -> Result<HistoryEntry, StorageError> {
        let now = chrono::Utc::now().timestamp_millis();
        self.append_history_at(technique_id, now, level, feedback)
    }

    /// Record a session with an explicit timestamp. Keeps the newest
    /// [`HISTORY_LIMIT`] entries.
    pub fn append_history_at(
        &mut self,
        technique_id: &str,
        timestamp: i64,
        level: Option<Tier>,
        feedback: Option<Feedback>,
    ) -> Result<HistoryEntry, StorageError> {
        let entry = HistoryEntry {
            technique_id: technique_id.to_string(),
            timestamp,
            level,
            feedback,
        };
        let mut history = self.history();
        history.insert(0, entry.clone());
        history.truncate(HISTORY_LIMIT);
        self.save_history(&history)?;
        Ok(entry)
    }

    /// Timestamp of the most recent session of `technique_id`.
    pub fn last_used(&self, technique_id: &str) -> Option<i64> {
        self.history()
            .iter()
            .find(|e| e.technique_id == technique_id)
            .map(|e| e.timestamp)
    }

    /// Attach feedback to the latest session of `technique_id`.
    ///
    /// Returns the updated entry, or `None` if the technique has no history.
    pub fn record_feedback(
        &mut self,
        technique_id: &str,
        feedback: Feedback,
    ) -> Result<Option<HistoryEntry>, StorageError> {
        let mut history = self.history();
        let Some(entry) = history.iter_mut().find(|e| e.technique_id == technique_id) else {
            return Ok(None);
        };
        entry.feedback = Some(feedback);
        let updated = entry.clone();
        self.save_history(&history)?;
        Ok(Some(updated))
    }

    pub fn completed_count(&self) -> usize {
        self.history().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn newest_first_and_capped() {
        let mut s = UserStore::new(MemoryStore::new());
        for i in 0..60 {
            s.append_history_at(&format!("t{i}"), i, None, None).unwrap();
        }
        let history = s.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].technique_id, "t59");
        assert_eq!(history[HISTORY_LIMIT - 1].technique_id, "t10");
    }

    #[test]
    fn last_used_returns_most_recent() {
        let mut s = UserStore::new(MemoryStore::new());
        s.append_history_at("a", 100, None, None).unwrap();
        s.append_history_at("b", 200, None, None).unwrap();
        s.append_history_at("a", 300, None, None).unwrap();
        assert_eq!(s.last_used("a"), Some(300));
        assert_eq!(s.last_used("b"), Some(200));
        assert_eq!(s.last_used("c"), None);
    }

    #[test]
    fn persisted_shape_is_camel_case_without_nulls() {
        let mut s = UserStore::new(MemoryStore::new());
        s.append_history_at("souffle-478", 42, Some(Tier::PleineLune), None)
            .unwrap();
        let raw = s.store().get(keys::HISTORY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"techniqueId":"souffle-478","timestamp":42,"level":"pleine-lune"}]"#
        );
    }

    #[test]
    fn record_feedback_targets_latest_entry() {
        let mut s = UserStore::new(MemoryStore::new());
        s.append_history_at("a", 1, None, None).unwrap();
        s.append_history_at("a", 2, None, None).unwrap();
        let updated = s.record_feedback("a", Feedback::Helped).unwrap().unwrap();
        assert_eq!(updated.timestamp, 2);
        let history = s.history();
        assert_eq!(history[0].feedback, Some(Feedback::Helped));
        assert_eq!(history[1].feedback, None);
        assert!(s.record_feedback("missing", Feedback::Meh).unwrap().is_none());
    }

    #[test]
    fn malformed_entries_are_dropped_individually() {
        let raw = r#"[{"techniqueId":"a","timestamp":1},{"oops":true},{"techniqueId":"b","timestamp":"x"}]"#;
        let s = UserStore::new(MemoryStore::with_values([(keys::HISTORY, raw)]));
        let history = s.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].technique_id, "a");
    }

    #[test]
    fn unknown_level_keeps_the_entry() {
        let raw = r#"[{"techniqueId":"x","timestamp":5,"level":"short"},{"techniqueId":"y","timestamp":4,"level":"eclipse-totale"},{"techniqueId":"z","timestamp":3,"level":7}]"#;
        let mut s = UserStore::new(MemoryStore::with_values([(keys::HISTORY, raw)]));
        let history = s.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].level, Some(Tier::Croissant));
        assert_eq!(history[1].level, None);
        assert_eq!(history[2].level, None);
        assert_eq!(s.completed_count(), 3);

        s.append_history_at("w", 6, None, None).unwrap();
        assert_eq!(s.history().len(), 4);
        assert_eq!(s.last_used("y"), Some(4));
    }

    #[test]
    fn feedback_parses_case_insensitively() {
        assert_eq!("Helped".parse::<Feedback>().unwrap(), Feedback::Helped);
        assert!("great".parse::<Feedback>().is_err());
    }
}
