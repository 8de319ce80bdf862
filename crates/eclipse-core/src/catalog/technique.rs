//! Technique and category records.
//!
//! Two technique shapes exist in authored catalogs:
//!
//! - **Flat** (v1): one instruction set with a `duration` in minutes, an
//!   `intensity` and context `presets`.
//! - **Leveled** (v2): an `openingPhrase` and three independent instruction
//!   sets keyed by moon-phase [`Tier`].
//!
//! Both share the identity, category, premium, discretion and evidence
//! fields, so the shape-specific part lives in [`TechniqueBody`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How visible a technique is when performed in front of others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscretionLevel {
    PublicOk,
    Discret,
    Prive,
}

impl DiscretionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscretionLevel::PublicOk => "public_ok",
            DiscretionLevel::Discret => "discret",
            DiscretionLevel::Prive => "prive",
        }
    }
}

impl FromStr for DiscretionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public_ok" => Ok(DiscretionLevel::PublicOk),
            "discret" => Ok(DiscretionLevel::Discret),
            "prive" => Ok(DiscretionLevel::Prive),
            other => Err(format!(
                "unknown discretion level '{other}' (expected public_ok, discret or prive)"
            )),
        }
    }
}

impl fmt::Display for DiscretionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Soft,
    Normal,
    Intense,
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft" => Ok(Intensity::Soft),
            "normal" => Ok(Intensity::Normal),
            "intense" => Ok(Intensity::Intense),
            other => Err(format!(
                "unknown intensity '{other}' (expected soft, normal or intense)"
            )),
        }
    }
}

/// Usage context bundle: A is public/low-visibility, B is unhurried/private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    A,
    B,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Preset::A),
            "B" | "b" => Ok(Preset::B),
            other => Err(format!("unknown preset '{other}' (expected A or B)")),
        }
    }
}

/// Raw authored duration of a flat technique, in minutes.
///
/// Only 2, 3 and 5 are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DurationMinutes(u8);

impl DurationMinutes {
    pub const TWO: DurationMinutes = DurationMinutes(2);
    pub const THREE: DurationMinutes = DurationMinutes(3);
    pub const FIVE: DurationMinutes = DurationMinutes(5);

    pub fn minutes(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DurationMinutes {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 | 3 | 5 => Ok(DurationMinutes(value)),
            other => Err(format!("invalid duration {other} (expected 2, 3 or 5)")),
        }
    }
}

impl From<DurationMinutes> for u8 {
    fn from(value: DurationMinutes) -> Self {
        value.0
    }
}

impl FromStr for DurationMinutes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u8 = s
            .trim_end_matches("min")
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration '{s}'"))?;
        DurationMinutes::try_from(raw)
    }
}

/// Moon-phase tier of a leveled technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// 10-30s: light, quick, discreet.
    Croissant,
    /// 30-90s: a medium pause.
    Quartier,
    /// 1-3 min: a fuller reset.
    PleineLune,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Croissant, Tier::Quartier, Tier::PleineLune];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Croissant => "croissant",
            Tier::Quartier => "quartier",
            Tier::PleineLune => "pleine-lune",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Croissant => "Croissant",
            Tier::Quartier => "Quartier",
            Tier::PleineLune => "Pleine lune",
        }
    }

    /// Authoring bounds for `durationSeconds`, inclusive.
    pub fn duration_bounds(self) -> (u32, u32) {
        match self {
            Tier::Croissant => (5, 45),
            Tier::Quartier => (20, 120),
            Tier::PleineLune => (30, 300),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "croissant" | "short" => Ok(Tier::Croissant),
            "quartier" | "medium" => Ok(Tier::Quartier),
            "pleine-lune" | "long" => Ok(Tier::PleineLune),
            other => Err(format!(
                "unknown tier '{other}' (expected croissant, quartier or pleine-lune)"
            )),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPhaseSpec {
    pub name: String,
    /// Seconds.
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    #[serde(default)]
    pub phases: Vec<TimerPhaseSpec>,
    #[serde(default = "default_cycles")]
    pub cycles: u32,
    /// Seconds.
    pub total_duration: u32,
}

fn default_cycles() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceLevel {
    A,
    B,
    C,
}

impl FromStr for EvidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(EvidenceLevel::A),
            "B" | "b" => Ok(EvidenceLevel::B),
            "C" | "c" => Ok(EvidenceLevel::C),
            other => Err(format!("unknown evidence level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanadaSource {
    pub org: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScientificSource {
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Validation metadata attached by content authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    #[serde(default)]
    pub is_canada_validated: bool,
    pub level: EvidenceLevel,
    #[serde(default)]
    pub canada_sources: Vec<CanadaSource>,
    #[serde(default)]
    pub scientific_sources: Vec<ScientificSource>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub needs_review: bool,
}

/// One tier's instruction set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueLevel {
    pub instructions: Vec<String>,
    pub duration_seconds: u32,
    #[serde(default)]
    pub timer: bool,
    #[serde(default)]
    pub timer_config: Option<TimerConfig>,
}

impl TechniqueLevel {
    /// Seconds the guided timer's active phase should last for this level.
    pub fn timer_seconds(&self) -> u32 {
        self.timer_config
            .as_ref()
            .map(|c| c.total_duration)
            .unwrap_or(self.duration_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Levels {
    pub croissant: TechniqueLevel,
    pub quartier: TechniqueLevel,
    #[serde(rename = "pleine-lune")]
    pub pleine_lune: TechniqueLevel,
}

impl Levels {
    pub fn get(&self, tier: Tier) -> &TechniqueLevel {
        match tier {
            Tier::Croissant => &self.croissant,
            Tier::Quartier => &self.quartier,
            Tier::PleineLune => &self.pleine_lune,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &TechniqueLevel)> {
        Tier::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatBody {
    pub duration: DurationMinutes,
    pub intensity: Intensity,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub timer: bool,
    #[serde(default)]
    pub timer_config: Option<TimerConfig>,
    /// Falls back to `duration * 60` when not authored.
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub presets: Vec<Preset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeveledBody {
    #[serde(default)]
    pub opening_phrase: String,
    pub levels: Levels,
}

/// Shape-specific part of a technique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TechniqueBody {
    Leveled(LeveledBody),
    Flat(FlatBody),
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technique {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub premium: bool,
    pub discretion_level: DiscretionLevel,
    #[serde(default)]
    pub evidence: Option<Evidence>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(flatten)]
    pub body: TechniqueBody,
}

impl Technique {
    pub fn flat(&self) -> Option<&FlatBody> {
        match &self.body {
            TechniqueBody::Flat(flat) => Some(flat),
            TechniqueBody::Leveled(_) => None,
        }
    }

    pub fn levels(&self) -> Option<&Levels> {
        match &self.body {
            TechniqueBody::Leveled(leveled) => Some(&leveled.levels),
            TechniqueBody::Flat(_) => None,
        }
    }

    pub fn is_leveled(&self) -> bool {
        matches!(self.body, TechniqueBody::Leveled(_))
    }

    pub fn duration(&self) -> Option<DurationMinutes> {
        self.flat().map(|f| f.duration)
    }

    pub fn intensity(&self) -> Option<Intensity> {
        self.flat().map(|f| f.intensity)
    }

    pub fn presets(&self) -> &[Preset] {
        self.flat().map(|f| f.presets.as_slice()).unwrap_or(&[])
    }

    pub fn opening_phrase(&self) -> Option<&str> {
        match &self.body {
            TechniqueBody::Leveled(leveled) => Some(leveled.opening_phrase.as_str()),
            TechniqueBody::Flat(_) => None,
        }
    }

    /// Authored duration in seconds of a flat technique.
    pub fn duration_seconds(&self) -> Option<u32> {
        self.flat().map(|f| {
            f.duration_seconds
                .unwrap_or_else(|| u32::from(f.duration.minutes()) * 60)
        })
    }

    /// Instructions for the given tier. Flat techniques ignore the tier;
    /// leveled techniques default to the shortest tier.
    pub fn instructions(&self, tier: Option<Tier>) -> &[String] {
        match &self.body {
            TechniqueBody::Flat(flat) => &flat.instructions,
            TechniqueBody::Leveled(leveled) => {
                &leveled.levels.get(tier.unwrap_or(Tier::Croissant)).instructions
            }
        }
    }

    /// Whether a guided timer is offered for the given tier.
    pub fn has_timer(&self, tier: Option<Tier>) -> bool {
        match &self.body {
            TechniqueBody::Flat(flat) => flat.timer,
            TechniqueBody::Leveled(leveled) => {
                leveled.levels.get(tier.unwrap_or(Tier::Croissant)).timer
            }
        }
    }

    /// Active-phase length for the guided timer, in seconds.
    ///
    /// Prefers the authored timer config total, then `durationSeconds`,
    /// then `duration * 60` for flat techniques.
    pub fn timer_seconds(&self, tier: Option<Tier>) -> u32 {
        match &self.body {
            TechniqueBody::Flat(flat) => flat
                .timer_config
                .as_ref()
                .map(|c| c.total_duration)
                .or(flat.duration_seconds)
                .unwrap_or_else(|| u32::from(flat.duration.minutes()) * 60),
            TechniqueBody::Leveled(leveled) => leveled
                .levels
                .get(tier.unwrap_or(Tier::Croissant))
                .timer_seconds(),
        }
    }

    pub fn evidence_level(&self) -> Option<EvidenceLevel> {
        self.evidence.as_ref().map(|e| e.level)
    }

    pub fn is_canada_validated(&self) -> bool {
        self.evidence
            .as_ref()
            .map(|e| e.is_canada_validated)
            .unwrap_or(false)
    }
}

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const LEVELED: &str = indoc! {r#"
        {
          "id": "souffle-478",
          "title": "Respiration 4-7-8",
          "category": "souffle",
          "openingPhrase": "Ton souffle est toujours là.",
          "discretionLevel": "discret",
          "levels": {
            "croissant": { "instructions": ["Inspire 4s"], "durationSeconds": 20, "timer": true, "timerConfig": null },
            "quartier": { "instructions": ["Inspire 4s", "Bloque 7s"], "durationSeconds": 60, "timer": true,
                          "timerConfig": { "phases": [{ "name": "Inspire", "duration": 4 }], "cycles": 4, "totalDuration": 76 } },
            "pleine-lune": { "instructions": ["Inspire 4s", "Bloque 7s", "Expire 8s"], "durationSeconds": 150, "timer": true, "timerConfig": null }
          },
          "note": null,
          "material": null,
          "tags": ["respiration"],
          "premium": false,
          "evidence": { "isCanadaValidated": true, "level": "A",
                        "canadaSources": [{ "org": "CAMH", "title": "Respiration" }],
                        "scientificSources": [], "needsReview": false }
        }
    "#};

    const FLAT: &str = indoc! {r#"
        {
          "id": "ancrage-pieds",
          "title": "Pieds au sol",
          "category": "ancrage",
          "duration": 2,
          "intensity": "soft",
          "instructions": ["Pose tes pieds à plat"],
          "timer": false,
          "durationSeconds": 90,
          "discretionLevel": "public_ok",
          "presets": ["A", "B"]
        }
    "#};

    #[test]
    fn leveled_technique_parses() {
        let t: Technique = serde_json::from_str(LEVELED).unwrap();
        assert!(t.is_leveled());
        assert_eq!(t.opening_phrase(), Some("Ton souffle est toujours là."));
        assert_eq!(t.instructions(Some(Tier::PleineLune)).len(), 3);
        assert_eq!(t.timer_seconds(Some(Tier::Quartier)), 76);
        assert_eq!(t.timer_seconds(Some(Tier::Croissant)), 20);
        assert_eq!(t.evidence_level(), Some(EvidenceLevel::A));
        assert!(t.is_canada_validated());
        assert_eq!(t.duration(), None);
        assert!(t.presets().is_empty());
    }

    #[test]
    fn flat_technique_parses() {
        let t: Technique = serde_json::from_str(FLAT).unwrap();
        assert!(!t.is_leveled());
        assert_eq!(t.duration(), Some(DurationMinutes::TWO));
        assert_eq!(t.intensity(), Some(Intensity::Soft));
        assert_eq!(t.presets(), &[Preset::A, Preset::B]);
        assert_eq!(t.duration_seconds(), Some(90));
        assert_eq!(t.timer_seconds(None), 90);
        assert_eq!(t.instructions(Some(Tier::PleineLune)).len(), 1);
        assert!(!t.premium);
    }

    #[test]
    fn flat_duration_seconds_falls_back_to_minutes() {
        let raw = FLAT.replace("\"durationSeconds\": 90,", "");
        let t: Technique = serde_json::from_str(&raw).unwrap();
        assert_eq!(t.duration_seconds(), Some(120));
    }

    #[test]
    fn invalid_duration_is_rejected() {
        let raw = FLAT.replace("\"duration\": 2", "\"duration\": 4");
        assert!(serde_json::from_str::<Technique>(&raw).is_err());
    }

    #[test]
    fn leveled_technique_serializes_back_to_same_shape() {
        let t: Technique = serde_json::from_str(LEVELED).unwrap();
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("levels").unwrap().get("pleine-lune").is_some());
        assert_eq!(json["discretionLevel"], "discret");
        let back: Technique = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn tier_parses_aliases() {
        assert_eq!("short".parse::<Tier>().unwrap(), Tier::Croissant);
        assert_eq!("pleine-lune".parse::<Tier>().unwrap(), Tier::PleineLune);
        assert!("gibbous".parse::<Tier>().is_err());
    }
}
