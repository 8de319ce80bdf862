//! Ordering helpers for technique lists.

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::{FavoritesSort, HistoryEntry};
use crate::catalog::Technique;

/// Anything that can be ordered by title and recency.
pub trait Sortable {
    fn sort_id(&self) -> &str;
    fn sort_title(&self) -> &str;
}

impl Sortable for Technique {
    fn sort_id(&self) -> &str {
        &self.id
    }

    fn sort_title(&self) -> &str {
        &self.title
    }
}

impl<T: Sortable + ?Sized> Sortable for &T {
    fn sort_id(&self) -> &str {
        (**self).sort_id()
    }

    fn sort_title(&self) -> &str {
        (**self).sort_title()
    }
}

/// Title comparison rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Collation {
    /// Accents fold to their base letter, case is ignored at first level.
    #[default]
    French,
    /// Plain code point order.
    Binary,
}

impl Collation {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Collation::Binary => a.cmp(b),
            Collation::French => french_key(a).cmp(&french_key(b)).then_with(|| a.cmp(b)),
        }
    }
}

fn french_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.nfd().filter(|c| !is_combining_mark(*c)) {
        match c {
            'œ' | 'Œ' => key.push_str("oe"),
            'æ' | 'Æ' => key.push_str("ae"),
            _ => key.extend(c.to_lowercase()),
        }
    }
    key
}

/// Sort by title. Equal titles keep their relative order.
pub fn sort_alphabetical<T: Sortable>(mut items: Vec<T>, collation: Collation) -> Vec<T> {
    items.sort_by(|a, b| collation.compare(a.sort_title(), b.sort_title()));
    items
}

/// Most recently used first; never-used items follow in their original order.
///
/// Each id is keyed by the timestamp of its first entry in `history`.
/// Equal timestamps keep their relative order.
pub fn sort_by_recency<T: Sortable>(mut items: Vec<T>, history: &[HistoryEntry]) -> Vec<T> {
    let mut last_used: HashMap<&str, i64> = HashMap::new();
    for entry in history {
        last_used
            .entry(entry.technique_id.as_str())
            .or_insert(entry.timestamp);
    }
    // Reverse(None) sorts after every Reverse(Some(_)).
    items.sort_by_key(|item| Reverse(last_used.get(item.sort_id()).copied()));
    items
}

pub fn sort_favorites<T: Sortable>(
    items: Vec<T>,
    history: &[HistoryEntry],
    sort: FavoritesSort,
) -> Vec<T> {
    match sort {
        FavoritesSort::Recent => sort_by_recency(items, history),
        FavoritesSort::Az => sort_alphabetical(items, Collation::French),
    }
}
