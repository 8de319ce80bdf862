//! Demo (preview) mode allow-list.
//!
//! In demo mode the effective catalog shrinks to a hand-picked selection of
//! cards. The toggle is environment-level, never user-facing.

/// Technique ids kept in demo mode.
pub const DEMO_CARD_IDS: [&str; 18] = [
    // souffle
    "souffle-478",
    "souffle-carree",
    "souffle-soupir",
    // ancrage
    "ancrage-54321",
    "ancrage-pieds",
    "ancrage-main-coeur",
    "ancrage-reset-postural",
    // decharge
    "decharge-croises",
    "decharge-secoue",
    // paroles-fortes
    "paroles-encore-la",
    "paroles-droit",
    "paroles-repos",
    "paroles-bordel",
    "paroles-lacher",
    // chaos
    "chaos-mode-pnj",
    "chaos-machoire-molle",
    "chaos-slow-motion",
    // faire-le-point
    "faire-le-point-stop",
];

/// Environment variable that forces demo mode on.
pub const DEMO_MODE_ENV: &str = "ECLIPSE_DEMO_MODE";

pub fn is_demo_card(technique_id: &str) -> bool {
    DEMO_CARD_IDS.contains(&technique_id)
}

/// True when `ECLIPSE_DEMO_MODE=true` is set in the environment.
pub fn demo_mode_from_env() -> bool {
    std::env::var(DEMO_MODE_ENV)
        .map(|v| v == "true")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_has_no_duplicates() {
        let mut ids = DEMO_CARD_IDS.to_vec();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DEMO_CARD_IDS.len());
    }

    #[test]
    fn demo_card_lookup() {
        assert!(is_demo_card("souffle-478"));
        assert!(!is_demo_card("souffle-inconnu"));
    }
}
