//! Pure filter predicates over technique lists.
//!
//! Every filter is the identity when its value is `None`. Filters that only
//! make sense for flat techniques (duration, intensity, preset) drop leveled
//! techniques when active.

use crate::catalog::{DiscretionLevel, DurationMinutes, Intensity, Preset, Technique};

/// Discretion and duration constraints implied by a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetPolicy {
    pub max_duration_seconds: u32,
    pub allowed_discretion: &'static [DiscretionLevel],
}

const PRESET_A_POLICY: PresetPolicy = PresetPolicy {
    max_duration_seconds: 120,
    allowed_discretion: &[DiscretionLevel::PublicOk],
};

const PRESET_B_POLICY: PresetPolicy = PresetPolicy {
    max_duration_seconds: 300,
    allowed_discretion: &[DiscretionLevel::PublicOk, DiscretionLevel::Discret],
};

impl Preset {
    pub fn policy(self) -> PresetPolicy {
        match self {
            Preset::A => PRESET_A_POLICY,
            Preset::B => PRESET_B_POLICY,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::A => "Public",
            Preset::B => "Tranquille",
        }
    }
}

/// True when `technique` is tagged with `preset` and satisfies its policy.
pub fn matches_preset(technique: &Technique, preset: Preset) -> bool {
    let policy = preset.policy();
    technique.presets().contains(&preset)
        && technique
            .duration_seconds()
            .is_some_and(|secs| secs <= policy.max_duration_seconds)
        && policy
            .allowed_discretion
            .contains(&technique.discretion_level)
}

/// Duration bucket match: 2 absorbs both 2 and 3, everything else is exact.
pub fn matches_duration(raw: DurationMinutes, requested: DurationMinutes) -> bool {
    if requested == DurationMinutes::TWO {
        raw <= DurationMinutes::THREE
    } else {
        raw == requested
    }
}

pub fn filter_by_category<'a>(
    list: Vec<&'a Technique>,
    category: Option<&str>,
) -> Vec<&'a Technique> {
    match category {
        None => list,
        Some(id) => list.into_iter().filter(|t| t.category == id).collect(),
    }
}

pub fn filter_by_discretion<'a>(
    list: Vec<&'a Technique>,
    level: Option<DiscretionLevel>,
) -> Vec<&'a Technique> {
    match level {
        None => list,
        Some(level) => list
            .into_iter()
            .filter(|t| t.discretion_level == level)
            .collect(),
    }
}

pub fn filter_by_duration<'a>(
    list: Vec<&'a Technique>,
    duration: Option<DurationMinutes>,
) -> Vec<&'a Technique> {
    match duration {
        None => list,
        Some(requested) => list
            .into_iter()
            .filter(|t| t.duration().is_some_and(|raw| matches_duration(raw, requested)))
            .collect(),
    }
}

pub fn filter_by_intensity<'a>(
    list: Vec<&'a Technique>,
    intensity: Option<Intensity>,
) -> Vec<&'a Technique> {
    match intensity {
        None => list,
        Some(intensity) => list
            .into_iter()
            .filter(|t| t.intensity() == Some(intensity))
            .collect(),
    }
}

pub fn filter_by_preset<'a>(
    list: Vec<&'a Technique>,
    preset: Option<Preset>,
) -> Vec<&'a Technique> {
    match preset {
        None => list,
        Some(preset) => list
            .into_iter()
            .filter(|t| matches_preset(t, preset))
            .collect(),
    }
}
