//! Technique selection: filter the catalog, then draw one at random.
//!
//! ## Pipeline
//!
//! ```text
//! free (or all) -> preset -> category -> duration -> intensity -> discretion -> draw
//! ```
//!
//! Preset constraints come first because a preset implies duration and
//! discretion limits that narrow the pool before the explicit filters run.
//! Explicit filters compose with the preset by intersection.
//!
//! An empty pool is a normal outcome: [`Selector::draw`] returns `None` and
//! [`Selector::count`] returns zero.

mod filters;
mod random;

pub use filters::{
    filter_by_category, filter_by_discretion, filter_by_duration, filter_by_intensity,
    filter_by_preset, matches_duration, matches_preset, PresetPolicy,
};
pub use random::{PcgRandom, RandomSource, SequenceRandom, ThreadRandom};

use serde::{Deserialize, Serialize};

use crate::catalog::{
    Catalog, DiscretionLevel, DurationMinutes, Intensity, Preset, Technique, Tier,
};
use crate::format::format_duration_seconds;

/// Optional constraints for a draw. `Default` means "any free technique".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawFilters {
    pub preset: Option<Preset>,
    pub category: Option<String>,
    pub duration: Option<DurationMinutes>,
    pub intensity: Option<Intensity>,
    pub discretion: Option<DiscretionLevel>,
    #[serde(default)]
    pub include_premium: bool,
}

impl DrawFilters {
    /// True if `technique` satisfies every active predicate.
    pub fn accepts(&self, technique: &Technique) -> bool {
        (self.include_premium || !technique.premium)
            && self.preset.map_or(true, |p| matches_preset(technique, p))
            && self
                .category
                .as_deref()
                .map_or(true, |c| technique.category == c)
            && self.duration.map_or(true, |d| {
                technique
                    .duration()
                    .is_some_and(|raw| matches_duration(raw, d))
            })
            && self
                .intensity
                .map_or(true, |i| technique.intensity() == Some(i))
            && self
                .discretion
                .map_or(true, |d| technique.discretion_level == d)
    }
}

/// Uniform draw over `list`. `None` on an empty list.
pub fn draw_random<'a, R: RandomSource + ?Sized>(
    list: &[&'a Technique],
    rng: &mut R,
) -> Option<&'a Technique> {
    if list.is_empty() {
        return None;
    }
    let index = rng.next_index(list.len());
    list.get(index).copied()
}

/// Number of free techniques per preset, for context pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetCounts {
    pub all: usize,
    pub a: usize,
    pub b: usize,
}

/// Read-only view of a catalog that answers draw and count queries.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    catalog: &'a Catalog,
}

impl<'a> Selector<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Starting pool: free techniques, or everything with `include_premium`.
    fn base(&self, include_premium: bool) -> Vec<&'a Technique> {
        if include_premium {
            self.catalog.techniques().iter().collect()
        } else {
            self.catalog.free_techniques()
        }
    }

    /// The filtered pool a draw chooses from.
    pub fn pool(&self, filters: &DrawFilters) -> Vec<&'a Technique> {
        let list = self.base(filters.include_premium);
        let list = filter_by_preset(list, filters.preset);
        let list = filter_by_category(list, filters.category.as_deref());
        let list = filter_by_duration(list, filters.duration);
        let list = filter_by_intensity(list, filters.intensity);
        filter_by_discretion(list, filters.discretion)
    }

    /// Draw one technique satisfying `filters`.
    pub fn draw<R: RandomSource + ?Sized>(
        &self,
        filters: &DrawFilters,
        rng: &mut R,
    ) -> Option<&'a Technique> {
        let pool = self.pool(filters);
        let drawn = draw_random(&pool, rng);
        tracing::debug!(
            pool = pool.len(),
            drawn = drawn.map(|t| t.id.as_str()),
            "draw"
        );
        drawn
    }

    /// Size of the pool [`Selector::draw`] would choose from.
    pub fn count(&self, filters: &DrawFilters) -> usize {
        self.pool(filters).len()
    }

    /// Draw a technique other than `current`.
    ///
    /// Tries the filtered pool first, then the whole free pool. Returns
    /// `None` only when `current` is the sole candidate everywhere.
    pub fn draw_another<R: RandomSource + ?Sized>(
        &self,
        current: &str,
        filters: &DrawFilters,
        rng: &mut R,
    ) -> Option<&'a Technique> {
        let filtered: Vec<&Technique> = self
            .pool(filters)
            .into_iter()
            .filter(|t| t.id != current)
            .collect();
        if let Some(t) = draw_random(&filtered, rng) {
            return Some(t);
        }
        let fallback: Vec<&Technique> = self
            .base(filters.include_premium)
            .into_iter()
            .filter(|t| t.id != current)
            .collect();
        draw_random(&fallback, rng)
    }

    pub fn preset_counts(&self) -> PresetCounts {
        let free = self.catalog.free_techniques();
        PresetCounts {
            all: free.len(),
            a: free.iter().filter(|t| matches_preset(t, Preset::A)).count(),
            b: free.iter().filter(|t| matches_preset(t, Preset::B)).count(),
        }
    }
}

/// "20s - 2m 30s" style span over a leveled technique's tiers.
///
/// Flat techniques report their single duration.
pub fn duration_range(technique: &Technique) -> String {
    match technique.levels() {
        Some(levels) => {
            let secs: Vec<u32> = Tier::ALL
                .iter()
                .map(|tier| levels.get(*tier).duration_seconds)
                .collect();
            let min = secs.iter().copied().min().unwrap_or(0);
            let max = secs.iter().copied().max().unwrap_or(0);
            format!(
                "{} - {}",
                format_duration_seconds(min),
                format_duration_seconds(max)
            )
        }
        None => format_duration_seconds(technique.duration_seconds().unwrap_or(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const CATEGORIES: &str = indoc! {r##"
        [
          { "id": "souffle", "name": "Souffle", "color": "#7DD3FC", "order": 1 },
          { "id": "ancrage", "name": "Ancrage", "color": "#86EFAC", "order": 2 }
        ]
    "##};

    fn v1_catalog() -> Catalog {
        let techniques = indoc! {r#"
            { "techniques": [
              { "id": "s1", "title": "Soupir", "category": "souffle", "duration": 2, "intensity": "soft",
                "instructions": ["x"], "timer": true, "durationSeconds": 60,
                "discretionLevel": "public_ok", "presets": ["A", "B"] },
              { "id": "s2", "title": "Carrée", "category": "souffle", "duration": 3, "intensity": "normal",
                "instructions": ["x"], "timer": true, "durationSeconds": 180,
                "discretionLevel": "discret", "presets": ["B"] },
              { "id": "a1", "title": "Pieds", "category": "ancrage", "duration": 5, "intensity": "intense",
                "instructions": ["x"], "timer": false, "durationSeconds": 300,
                "discretionLevel": "prive", "presets": ["B"] },
              { "id": "p1", "title": "Premium", "category": "ancrage", "duration": 2, "intensity": "soft",
                "instructions": ["x"], "timer": false, "durationSeconds": 100,
                "discretionLevel": "public_ok", "presets": ["A"], "premium": true }
            ] }
        "#};
        Catalog::from_json(techniques, CATEGORIES).unwrap()
    }

    fn ids(list: &[&Technique]) -> Vec<String> {
        list.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn default_pool_is_free_techniques() {
        let catalog = v1_catalog();
        let selector = Selector::new(&catalog);
        assert_eq!(ids(&selector.pool(&DrawFilters::default())), vec!["s1", "s2", "a1"]);
        let with_premium = DrawFilters {
            include_premium: true,
            ..Default::default()
        };
        assert_eq!(selector.count(&with_premium), 4);
    }

    #[test]
    fn preset_and_category_intersect() {
        let catalog = v1_catalog();
        let selector = Selector::new(&catalog);
        let b_souffle = DrawFilters {
            preset: Some(Preset::B),
            category: Some("souffle".into()),
            ..Default::default()
        };
        assert_eq!(ids(&selector.pool(&b_souffle)), vec!["s1", "s2"]);

        // a1 is tagged B but prive, so the preset policy drops it.
        let b_ancrage = DrawFilters {
            preset: Some(Preset::B),
            category: Some("ancrage".into()),
            ..Default::default()
        };
        assert_eq!(selector.count(&b_ancrage), 0);
        assert!(selector
            .draw(&b_ancrage, &mut SequenceRandom::new(vec![0]))
            .is_none());
    }

    #[test]
    fn draw_uses_injected_index() {
        let catalog = v1_catalog();
        let selector = Selector::new(&catalog);
        let mut rng = SequenceRandom::new(vec![2, 0]);
        assert_eq!(selector.draw(&DrawFilters::default(), &mut rng).unwrap().id, "a1");
        assert_eq!(selector.draw(&DrawFilters::default(), &mut rng).unwrap().id, "s1");
    }

    #[test]
    fn count_matches_pool_under_same_filters() {
        let catalog = v1_catalog();
        let selector = Selector::new(&catalog);
        let filters = DrawFilters {
            duration: Some(DurationMinutes::TWO),
            ..Default::default()
        };
        assert_eq!(selector.count(&filters), 2);
        assert_eq!(selector.count(&filters), selector.pool(&filters).len());
    }

    #[test]
    fn draw_another_skips_current() {
        let catalog = v1_catalog();
        let selector = Selector::new(&catalog);
        let filters = DrawFilters {
            category: Some("ancrage".into()),
            ..Default::default()
        };
        // a1 is the only free ancrage technique: falls back to the free pool.
        let mut rng = SequenceRandom::new(vec![0]);
        let other = selector.draw_another("a1", &filters, &mut rng).unwrap();
        assert_ne!(other.id, "a1");
    }

    #[test]
    fn draw_another_on_single_technique_catalog_is_none() {
        let techniques = indoc! {r#"
            [ { "id": "only", "title": "Only", "category": "souffle", "duration": 2, "intensity": "soft",
                "instructions": ["x"], "durationSeconds": 60, "discretionLevel": "public_ok" } ]
        "#};
        let catalog = Catalog::from_json(techniques, CATEGORIES).unwrap();
        let selector = Selector::new(&catalog);
        let mut rng = SequenceRandom::new(vec![0]);
        assert!(selector
            .draw_another("only", &DrawFilters::default(), &mut rng)
            .is_none());
    }

    #[test]
    fn empty_catalog_draws_nothing() {
        let catalog = Catalog::default();
        let selector = Selector::new(&catalog);
        let mut rng = PcgRandom::seeded(1);
        assert!(selector.draw(&DrawFilters::default(), &mut rng).is_none());
        assert_eq!(selector.count(&DrawFilters::default()), 0);
        assert!(draw_random(&[], &mut rng).is_none());
    }

    #[test]
    fn preset_counts_only_count_free() {
        let catalog = v1_catalog();
        let counts = Selector::new(&catalog).preset_counts();
        assert_eq!(counts, PresetCounts { all: 3, a: 1, b: 2 });
    }

    #[test]
    fn leveled_techniques_never_match_flat_filters() {
        let catalog = Catalog::bundled().unwrap();
        let selector = Selector::new(&catalog);
        let filters = DrawFilters {
            duration: Some(DurationMinutes::TWO),
            ..Default::default()
        };
        assert_eq!(selector.count(&filters), 0);
        let by_discretion = DrawFilters {
            discretion: Some(DiscretionLevel::PublicOk),
            ..Default::default()
        };
        assert!(selector.count(&by_discretion) > 0);
    }

    #[test]
    fn accepts_agrees_with_pool() {
        let catalog = v1_catalog();
        let selector = Selector::new(&catalog);
        let filters = DrawFilters {
            preset: Some(Preset::B),
            ..Default::default()
        };
        for t in catalog.techniques() {
            let in_pool = selector.pool(&filters).iter().any(|p| p.id == t.id);
            assert_eq!(filters.accepts(t), in_pool, "{}", t.id);
        }
    }

    #[test]
    fn duration_range_spans_tiers() {
        let catalog = Catalog::bundled().unwrap();
        let t = catalog.technique_by_id("souffle-478").unwrap();
        assert_eq!(duration_range(t), "20s - 2m 30s");
        let flat = v1_catalog();
        assert_eq!(duration_range(flat.technique_by_id("a1").unwrap()), "5 min");
    }
}
