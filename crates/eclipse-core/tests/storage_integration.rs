//! User store behavior over both backends.

use eclipse_core::catalog::Tier;
use eclipse_core::storage::{
    keys, Database, Feedback, FavoritesSort, KeyValueStore, MemoryStore, SettingUpdate, Settings,
    UserStore, HISTORY_LIMIT,
};
use proptest::prelude::*;

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eclipse.db");
    {
        let mut store = UserStore::new(Database::open_at(&path).unwrap());
        store.add_favorite("souffle-478").unwrap();
        store
            .append_history_at("souffle-478", 1_700_000_000_000, Some(Tier::Quartier), None)
            .unwrap();
        store
            .update_setting(SettingUpdate::DefaultFavoritesSort(FavoritesSort::Az))
            .unwrap();
        store.mark_onboarding_seen().unwrap();
    }

    let mut store = UserStore::new(Database::open_at(&path).unwrap());
    assert_eq!(store.favorites(), vec!["souffle-478"]);
    assert_eq!(store.last_used("souffle-478"), Some(1_700_000_000_000));
    assert_eq!(store.history()[0].level, Some(Tier::Quartier));
    assert_eq!(store.settings().default_favorites_sort, FavoritesSort::Az);
    assert!(store.onboarding_seen());

    store.reset_all().unwrap();
    assert!(!store.has_any_user_data());
    assert!(!store.onboarding_seen());
    for key in keys::ALL {
        assert!(store.store().get(key).unwrap().is_none());
    }
}

#[test]
fn corrupted_values_degrade_to_defaults() {
    let store = UserStore::new(MemoryStore::with_values([
        (keys::FAVORITES, "not json"),
        (keys::HISTORY, "42"),
        (keys::SETTINGS, "\"oops\""),
    ]));
    assert!(store.favorites().is_empty());
    assert!(store.history().is_empty());
    assert_eq!(store.settings(), Settings::default());
    // Corrupted records still count as present.
    assert!(store.has_any_user_data());
}

#[test]
fn settings_round_trip() {
    let mut store = UserStore::new(MemoryStore::new());
    let custom = Settings {
        immersive_mode: false,
        timer_announcements: false,
        default_favorites_sort: FavoritesSort::Az,
    };
    store.save_settings(&custom).unwrap();
    assert_eq!(store.settings(), custom);
}

#[test]
fn feedback_survives_later_sessions_of_other_techniques() {
    let mut store = UserStore::new(MemoryStore::new());
    store.append_history_at("a", 1, None, None).unwrap();
    store.record_feedback("a", Feedback::Nope).unwrap();
    store.append_history_at("b", 2, None, None).unwrap();
    let history = store.history();
    assert_eq!(history[1].technique_id, "a");
    assert_eq!(history[1].feedback, Some(Feedback::Nope));
}

proptest! {
    #[test]
    fn history_never_exceeds_cap(ids in prop::collection::vec("[a-d]", 0..120)) {
        let mut store = UserStore::new(MemoryStore::new());
        for (i, id) in ids.iter().enumerate() {
            store.append_history_at(id, i as i64, None, None).unwrap();
        }
        let history = store.history();
        prop_assert_eq!(history.len(), ids.len().min(HISTORY_LIMIT));
        prop_assert!(history.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
        if let Some(last) = ids.last() {
            prop_assert_eq!(&history[0].technique_id, last);
        }
    }

    #[test]
    fn favorites_behave_as_ordered_set(ops in prop::collection::vec((any::<bool>(), "[a-e]"), 0..60)) {
        let mut store = UserStore::new(MemoryStore::new());
        let mut model: Vec<String> = Vec::new();
        for (add, id) in &ops {
            if *add {
                store.add_favorite(id).unwrap();
                if !model.contains(id) {
                    model.push(id.clone());
                }
            } else {
                store.remove_favorite(id).unwrap();
                model.retain(|m| m != id);
            }
        }
        prop_assert_eq!(store.favorites(), model);
    }

    #[test]
    fn toggle_is_an_involution(initial in prop::collection::vec("[a-e]", 0..5), id in "[a-e]") {
        let mut store = UserStore::new(MemoryStore::new());
        for f in &initial {
            store.add_favorite(f).unwrap();
        }
        let before = store.favorites();
        store.toggle_favorite(&id).unwrap();
        let after = store.toggle_favorite(&id).unwrap();
        prop_assert_eq!(store.is_favorite(&id), before.contains(&id));
        prop_assert_eq!(after.is_favorite, before.contains(&id));
    }
}
