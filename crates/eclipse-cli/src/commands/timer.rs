use clap::Subcommand;
use eclipse_core::catalog::Tier;
use eclipse_core::timer::{GuidedTimer, TimerDriver, TimerOptions};
use eclipse_core::{Config, Event};

use super::{load_catalog, open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the guided timer for a technique (Ctrl-C cancels)
    Run {
        id: String,
        /// Level for leveled techniques (croissant, quartier, pleine-lune)
        #[arg(long)]
        level: Option<Tier>,
        /// Disable phase announcements
        #[arg(long)]
        no_announce: bool,
        /// Do not record the session in history
        #[arg(long)]
        no_record: bool,
    },
    /// Print the initial timer state for a technique without running it
    Preview {
        id: String,
        #[arg(long)]
        level: Option<Tier>,
    },
}

fn print_event(event: &Event) -> CmdResult {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

pub fn run(action: TimerAction) -> CmdResult {
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;

    match action {
        TimerAction::Run {
            id,
            level,
            no_announce,
            no_record,
        } => {
            let technique = catalog
                .technique_by_id(&id)
                .ok_or_else(|| format!("unknown technique: {id}"))?;
            let mut store = open_store()?;
            let announcements =
                !no_announce && config.announcements(store.settings().timer_announcements);
            let timer = GuidedTimer::new(
                technique.timer_seconds(level),
                TimerOptions {
                    technique_name: technique.title.clone(),
                    announcements,
                },
            );

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let completed = runtime.block_on(async {
                let (driver, mut events) = TimerDriver::start(timer);
                let mut completed = false;
                loop {
                    tokio::select! {
                        event = events.recv() => match event {
                            Some(event) => {
                                completed |= matches!(event, Event::TimerCompleted { .. });
                                print_event(&event)?;
                            }
                            None => break,
                        },
                        _ = tokio::signal::ctrl_c() => {
                            driver.cancel();
                        }
                    }
                }
                Ok::<bool, Box<dyn std::error::Error>>(completed)
            })?;

            if completed && !no_record {
                let level = level.or_else(|| technique.is_leveled().then_some(Tier::Croissant));
                let entry = store.append_history(&technique.id, level, None)?;
                tracing::info!(technique = %entry.technique_id, "session recorded");
            }
        }
        TimerAction::Preview { id, level } => {
            let technique = catalog
                .technique_by_id(&id)
                .ok_or_else(|| format!("unknown technique: {id}"))?;
            let timer = GuidedTimer::new(
                technique.timer_seconds(level),
                TimerOptions {
                    technique_name: technique.title.clone(),
                    announcements: true,
                },
            );
            print_json(&serde_json::json!({
                "techniqueId": technique.id,
                "activeSecs": timer.active_secs(),
                "snapshot": timer.snapshot(),
            }))?;
        }
    }
    Ok(())
}
