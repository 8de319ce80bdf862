use clap::Subcommand;
use eclipse_core::catalog::Technique;
use eclipse_core::storage::{sort_favorites, FavoritesSort};
use eclipse_core::{Catalog, Config};

use super::{load_catalog, open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// Add a technique to favorites
    Add { id: String },
    /// Remove a technique from favorites
    Remove { id: String },
    /// Add if absent, remove if present
    Toggle { id: String },
    /// List favorite techniques
    List {
        /// recent or az (defaults to the stored setting)
        #[arg(long)]
        sort: Option<FavoritesSort>,
    },
}

fn ensure_known(catalog: &Catalog, id: &str) -> Result<(), String> {
    match catalog.technique_by_id(id) {
        Some(_) => Ok(()),
        None => Err(format!("unknown technique: {id}")),
    }
}

pub fn run(action: FavoritesAction) -> CmdResult {
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;
    let mut store = open_store()?;

    match action {
        FavoritesAction::Add { id } => {
            ensure_known(&catalog, &id)?;
            print_json(&store.add_favorite(&id)?)?;
        }
        FavoritesAction::Remove { id } => {
            print_json(&store.remove_favorite(&id)?)?;
        }
        FavoritesAction::Toggle { id } => {
            ensure_known(&catalog, &id)?;
            print_json(&store.toggle_favorite(&id)?)?;
        }
        FavoritesAction::List { sort } => {
            let sort = sort.unwrap_or(store.settings().default_favorites_sort);
            let favorites = store.favorites();
            // Ids that left the catalog are skipped, not removed.
            let techniques: Vec<&Technique> = favorites
                .iter()
                .filter_map(|id| catalog.technique_by_id(id))
                .collect();
            let sorted = sort_favorites(techniques, &store.history(), sort);
            let rows: Vec<serde_json::Value> = sorted
                .into_iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id,
                        "title": t.title,
                        "category": t.category,
                        "lastUsed": store.last_used(&t.id),
                    })
                })
                .collect();
            print_json(&rows)?;
        }
    }
    Ok(())
}
