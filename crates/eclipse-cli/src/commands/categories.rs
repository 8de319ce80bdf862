use clap::Subcommand;
use eclipse_core::catalog::Category;
use eclipse_core::Config;
use serde::Serialize;

use super::{load_catalog, print_json, CmdResult};

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories in display order
    List {
        /// Hide premium categories
        #[arg(long)]
        free: bool,
    },
    /// Show one category with its technique count
    Show { id: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryDetail<'a> {
    #[serde(flatten)]
    category: &'a Category,
    technique_count: usize,
}

pub fn run(action: CategoriesAction) -> CmdResult {
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;

    match action {
        CategoriesAction::List { free } => {
            let list = if free {
                catalog.free_categories()
            } else {
                catalog.sorted_categories()
            };
            print_json(&list)?;
        }
        CategoriesAction::Show { id } => {
            let category = catalog
                .category_by_id(&id)
                .ok_or_else(|| format!("unknown category: {id}"))?;
            let technique_count = catalog
                .techniques()
                .iter()
                .filter(|t| t.category == id)
                .count();
            print_json(&CategoryDetail {
                category,
                technique_count,
            })?;
        }
    }
    Ok(())
}
