use clap::Subcommand;
use eclipse_core::catalog::Tier;
use eclipse_core::storage::Feedback;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Record a completed session
    Add {
        id: String,
        /// Level used (croissant, quartier, pleine-lune)
        #[arg(long)]
        level: Option<Tier>,
        /// helped, meh or nope
        #[arg(long)]
        feedback: Option<Feedback>,
    },
    /// List sessions, newest first
    List {
        /// Maximum entries to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Attach feedback to the latest session of a technique
    Feedback { id: String, feedback: Feedback },
    /// Last time a technique was used (epoch ms)
    LastUsed { id: String },
    /// Number of recorded sessions
    Count,
}

pub fn run(action: HistoryAction) -> CmdResult {
    let mut store = open_store()?;

    match action {
        HistoryAction::Add {
            id,
            level,
            feedback,
        } => {
            print_json(&store.append_history(&id, level, feedback)?)?;
        }
        HistoryAction::List { limit } => {
            let mut history = store.history();
            if let Some(limit) = limit {
                history.truncate(limit);
            }
            print_json(&history)?;
        }
        HistoryAction::Feedback { id, feedback } => match store.record_feedback(&id, feedback)? {
            Some(entry) => print_json(&entry)?,
            None => return Err(format!("no session recorded for {id}").into()),
        },
        HistoryAction::LastUsed { id } => {
            print_json(&serde_json::json!({ "id": id, "lastUsed": store.last_used(&id) }))?;
        }
        HistoryAction::Count => {
            print_json(&serde_json::json!({ "completed": store.completed_count() }))?;
        }
    }
    Ok(())
}
