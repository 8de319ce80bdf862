use clap::Subcommand;
use eclipse_core::catalog::{EvidenceLevel, Technique, Tier};
use eclipse_core::selector::{duration_range, Selector};
use eclipse_core::storage::{sort_alphabetical, Collation};
use eclipse_core::Config;
use serde::Serialize;

use super::{load_catalog, open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TechniquesAction {
    /// List techniques
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Only this evidence level (A, B, C)
        #[arg(long)]
        evidence: Option<EvidenceLevel>,
        /// Only techniques validated by Canadian sources
        #[arg(long)]
        canada: bool,
        /// Include premium techniques
        #[arg(long)]
        include_premium: bool,
        /// Sort by title instead of catalog order
        #[arg(long)]
        sort: bool,
    },
    /// Show one technique
    Show {
        id: String,
        /// Level for leveled techniques (croissant, quartier, pleine-lune)
        #[arg(long)]
        level: Option<Tier>,
    },
    /// Report authoring problems in the catalog
    Validate,
    /// Count free techniques per preset
    Presets,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary<'a> {
    id: &'a str,
    title: &'a str,
    category: &'a str,
    premium: bool,
    duration_range: String,
}

impl<'a> From<&'a Technique> for Summary<'a> {
    fn from(t: &'a Technique) -> Self {
        Self {
            id: &t.id,
            title: &t.title,
            category: &t.category,
            premium: t.premium,
            duration_range: duration_range(t),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Detail<'a> {
    #[serde(flatten)]
    technique: &'a Technique,
    duration_range: String,
    instructions_for_level: &'a [String],
    timer_seconds: u32,
    is_favorite: bool,
    last_used: Option<i64>,
}

pub fn run(action: TechniquesAction) -> CmdResult {
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;

    match action {
        TechniquesAction::List {
            category,
            evidence,
            canada,
            include_premium,
            sort,
        } => {
            let mut list: Vec<&Technique> = if include_premium || config.catalog.include_premium {
                catalog.techniques().iter().collect()
            } else {
                catalog.free_techniques()
            };
            if let Some(category) = category.as_deref() {
                list.retain(|t| t.category == category);
            }
            if let Some(level) = evidence {
                list.retain(|t| t.evidence_level() == Some(level));
            }
            if canada {
                list.retain(|t| t.is_canada_validated());
            }
            if sort {
                list = sort_alphabetical(list, Collation::French);
            }
            let summaries: Vec<Summary> = list.into_iter().map(Summary::from).collect();
            print_json(&summaries)?;
        }
        TechniquesAction::Show { id, level } => {
            let technique = catalog
                .technique_by_id(&id)
                .ok_or_else(|| format!("unknown technique: {id}"))?;
            let store = open_store()?;
            print_json(&Detail {
                technique,
                duration_range: duration_range(technique),
                instructions_for_level: technique.instructions(level),
                timer_seconds: technique.timer_seconds(level),
                is_favorite: store.is_favorite(&id),
                last_used: store.last_used(&id),
            })?;
        }
        TechniquesAction::Validate => {
            let issues: Vec<String> = catalog.validate().iter().map(|i| format!("{i:?}")).collect();
            print_json(&serde_json::json!({
                "techniques": catalog.techniques().len(),
                "issues": issues,
            }))?;
            if !issues.is_empty() {
                return Err(format!("{} catalog issue(s) found", issues.len()).into());
            }
        }
        TechniquesAction::Presets => {
            print_json(&Selector::new(&catalog).preset_counts())?;
        }
    }
    Ok(())
}
