//! Read-only technique catalog.
//!
//! The catalog is loaded once (from the bundled data or from files named in
//! the config) and never mutated afterwards. Callers share it by reference
//! or behind an `Arc`.

mod demo;
mod technique;

pub use demo::{demo_mode_from_env, is_demo_card, DEMO_CARD_IDS, DEMO_MODE_ENV};
pub use technique::{
    CanadaSource, Category, DiscretionLevel, DurationMinutes, Evidence, EvidenceLevel, FlatBody,
    Intensity, LeveledBody, Levels, Preset, ScientificSource, Technique, TechniqueBody,
    TechniqueLevel, Tier, TimerConfig, TimerPhaseSpec,
};

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::error::CatalogError;

const BUNDLED_TECHNIQUES: &str = include_str!("../../data/techniques.json");
const BUNDLED_CATEGORIES: &str = include_str!("../../data/categories.json");

#[derive(Deserialize)]
#[serde(untagged)]
enum TechniqueDocument {
    Wrapped { techniques: Vec<Technique> },
    Bare(Vec<Technique>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryDocument {
    Wrapped { categories: Vec<Category> },
    Bare(Vec<Category>),
}

/// An authoring problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentIssue {
    EmptyInstructions { technique_id: String, tier: Option<Tier> },
    DurationOutOfBounds { technique_id: String, tier: Tier, seconds: u32 },
    UnknownCategory { technique_id: String, category: String },
}

/// Immutable technique and category lists.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    techniques: Vec<Technique>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog from already-parsed records.
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateId`] if two techniques share an id.
    pub fn new(techniques: Vec<Technique>, categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for t in &techniques {
            if !seen.insert(t.id.as_str()) {
                return Err(CatalogError::DuplicateId(t.id.clone()));
            }
        }
        Ok(Self {
            techniques,
            categories,
        })
    }

    /// Parse the two catalog documents.
    ///
    /// Each document may be wrapped (`{"techniques": [...]}`) or a bare array.
    pub fn from_json(techniques_json: &str, categories_json: &str) -> Result<Self, CatalogError> {
        let techniques = match serde_json::from_str::<TechniqueDocument>(techniques_json) {
            Ok(TechniqueDocument::Wrapped { techniques }) | Ok(TechniqueDocument::Bare(techniques)) => {
                techniques
            }
            Err(_) => {
                // Re-parse the wrapped form to surface the real field error
                // instead of the untagged "did not match any variant".
                #[derive(Deserialize)]
                struct Strict {
                    #[allow(dead_code)]
                    techniques: Vec<Technique>,
                }
                let source = serde_json::from_str::<Strict>(techniques_json)
                    .err()
                    .unwrap_or_else(|| {
                        <serde_json::Error as serde::de::Error>::custom(
                            "unrecognized technique document",
                        )
                    });
                return Err(CatalogError::ParseFailed {
                    document: "techniques",
                    source,
                });
            }
        };
        let categories = match serde_json::from_str::<CategoryDocument>(categories_json) {
            Ok(CategoryDocument::Wrapped { categories }) | Ok(CategoryDocument::Bare(categories)) => {
                categories
            }
            Err(source) => {
                return Err(CatalogError::ParseFailed {
                    document: "categories",
                    source,
                })
            }
        };
        Self::new(techniques, categories)
    }

    /// The catalog shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_TECHNIQUES, BUNDLED_CATEGORIES)
    }

    /// Load both documents from disk.
    pub fn load(techniques_path: &Path, categories_path: &Path) -> Result<Self, CatalogError> {
        Self::load_with_overrides(Some(techniques_path), Some(categories_path))
    }

    /// Load each document from disk when a path is given, else use the
    /// bundled one.
    pub fn load_with_overrides(
        techniques_path: Option<&Path>,
        categories_path: Option<&Path>,
    ) -> Result<Self, CatalogError> {
        let read = |path: Option<&Path>, bundled: &str| match path {
            Some(path) => std::fs::read_to_string(path).map_err(|source| CatalogError::ReadFailed {
                path: path.to_path_buf(),
                source,
            }),
            None => Ok(bundled.to_string()),
        };
        let catalog = Self::from_json(
            &read(techniques_path, BUNDLED_TECHNIQUES)?,
            &read(categories_path, BUNDLED_CATEGORIES)?,
        )?;
        tracing::info!(
            techniques = catalog.techniques.len(),
            categories = catalog.categories.len(),
            custom_techniques = techniques_path.is_some(),
            custom_categories = categories_path.is_some(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Restrict the catalog to the demo allow-list when `enabled`.
    pub fn with_demo_mode(self, enabled: bool) -> Self {
        if !enabled {
            return self;
        }
        let techniques: Vec<Technique> = self
            .techniques
            .into_iter()
            .filter(|t| is_demo_card(&t.id))
            .collect();
        tracing::debug!(kept = techniques.len(), "demo mode catalog");
        Self {
            techniques,
            categories: self.categories,
        }
    }

    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    /// Techniques not flagged premium.
    pub fn free_techniques(&self) -> Vec<&Technique> {
        self.techniques.iter().filter(|t| !t.premium).collect()
    }

    pub fn technique_by_id(&self, id: &str) -> Option<&Technique> {
        self.techniques.iter().find(|t| t.id == id)
    }

    pub fn category_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Categories ordered by their `order` key; ties keep catalog order.
    pub fn sorted_categories(&self) -> Vec<&Category> {
        let mut sorted: Vec<&Category> = self.categories.iter().collect();
        sorted.sort_by_key(|c| c.order);
        sorted
    }

    pub fn free_categories(&self) -> Vec<&Category> {
        self.sorted_categories()
            .into_iter()
            .filter(|c| !c.premium)
            .collect()
    }

    pub fn canada_validated(&self) -> Vec<&Technique> {
        self.techniques
            .iter()
            .filter(|t| t.is_canada_validated())
            .collect()
    }

    pub fn by_evidence_level(&self, level: EvidenceLevel) -> Vec<&Technique> {
        self.techniques
            .iter()
            .filter(|t| t.evidence_level() == Some(level))
            .collect()
    }

    /// Report authoring problems. Nothing here is enforced at load time.
    pub fn validate(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();
        for t in &self.techniques {
            if self.category_by_id(&t.category).is_none() {
                issues.push(ContentIssue::UnknownCategory {
                    technique_id: t.id.clone(),
                    category: t.category.clone(),
                });
            }
            match &t.body {
                TechniqueBody::Flat(flat) => {
                    if flat.instructions.is_empty() {
                        issues.push(ContentIssue::EmptyInstructions {
                            technique_id: t.id.clone(),
                            tier: None,
                        });
                    }
                }
                TechniqueBody::Leveled(leveled) => {
                    for (tier, level) in leveled.levels.iter() {
                        if level.instructions.is_empty() {
                            issues.push(ContentIssue::EmptyInstructions {
                                technique_id: t.id.clone(),
                                tier: Some(tier),
                            });
                        }
                        let (min, max) = tier.duration_bounds();
                        if level.duration_seconds < min || level.duration_seconds > max {
                            issues.push(ContentIssue::DurationOutOfBounds {
                                technique_id: t.id.clone(),
                                tier,
                                seconds: level.duration_seconds,
                            });
                        }
                    }
                }
            }
        }
        issues
    }
}
