use clap::Subcommand;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Summary of what is stored on this device
    Status,
    /// Erase favorites, history, settings and flags
    Reset {
        /// Confirm the erase
        #[arg(long)]
        yes: bool,
    },
    /// Remember that onboarding was shown
    MarkOnboarding,
    /// Remember that the promo was shown
    MarkPromo,
}

pub fn run(action: DataAction) -> CmdResult {
    let mut store = open_store()?;

    match action {
        DataAction::Status => {
            print_json(&serde_json::json!({
                "hasUserData": store.has_any_user_data(),
                "favorites": store.favorites().len(),
                "completed": store.completed_count(),
                "onboardingSeen": store.onboarding_seen(),
                "promoSeen": store.promo_seen(),
                "shouldShowPromo": store.should_show_promo(),
            }))?;
        }
        DataAction::Reset { yes } => {
            if !yes {
                return Err("refusing to erase data without --yes".into());
            }
            store.reset_all()?;
            println!("all data erased");
        }
        DataAction::MarkOnboarding => {
            store.mark_onboarding_seen()?;
            println!("ok");
        }
        DataAction::MarkPromo => {
            store.mark_promo_seen()?;
            println!("ok");
        }
    }
    Ok(())
}
