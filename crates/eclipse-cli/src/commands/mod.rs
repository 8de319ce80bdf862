pub mod categories;
pub mod config;
pub mod data;
pub mod draw;
pub mod favorites;
pub mod history;
pub mod settings;
pub mod techniques;
pub mod timer;

use eclipse_core::storage::{Database, UserStore};
use eclipse_core::{Catalog, Config};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the on-disk user store.
pub fn open_store() -> Result<UserStore<Database>, Box<dyn std::error::Error>> {
    Ok(UserStore::new(Database::open()?))
}

/// Catalog as configured: bundled or overridden, demo mode applied.
pub fn load_catalog(config: &Config) -> Result<Catalog, Box<dyn std::error::Error>> {
    Ok(config.load_catalog()?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
