use clap::Subcommand;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print one setting, or all of them
    Get {
        /// immersiveMode, timerAnnouncements or defaultFavoritesSort
        key: Option<String>,
    },
    /// Change a setting
    Set { key: String, value: String },
    /// Restore default settings
    Reset,
}

pub fn run(action: SettingsAction) -> CmdResult {
    let mut store = open_store()?;

    match action {
        SettingsAction::Get { key: None } => print_json(&store.settings())?,
        SettingsAction::Get { key: Some(key) } => match store.settings().get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown setting: {key}").into()),
        },
        SettingsAction::Set { key, value } => {
            print_json(&store.set_setting(&key, &value)?)?;
        }
        SettingsAction::Reset => {
            print_json(&store.reset_settings()?)?;
        }
    }
    Ok(())
}
