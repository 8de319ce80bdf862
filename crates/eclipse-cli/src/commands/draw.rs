use clap::Args;
use eclipse_core::catalog::{DiscretionLevel, DurationMinutes, Intensity, Preset, Technique};
use eclipse_core::selector::{duration_range, DrawFilters, PcgRandom, Selector};
use eclipse_core::Config;
use serde::Serialize;

use super::{load_catalog, open_store, print_json, CmdResult};

#[derive(Args)]
pub struct DrawArgs {
    /// Context preset (A = public, B = quiet)
    #[arg(long)]
    pub preset: Option<Preset>,
    /// Category id
    #[arg(long)]
    pub category: Option<String>,
    /// Duration bucket in minutes (2, 3 or 5)
    #[arg(long)]
    pub duration: Option<DurationMinutes>,
    /// Intensity (soft, normal, intense)
    #[arg(long)]
    pub intensity: Option<Intensity>,
    /// Discretion level (public_ok, discret, prive)
    #[arg(long)]
    pub discretion: Option<DiscretionLevel>,
    /// Include premium techniques in the pool
    #[arg(long)]
    pub include_premium: bool,
    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,
    /// Draw a technique other than this id
    #[arg(long, value_name = "ID")]
    pub another: Option<String>,
    /// Only print how many techniques match
    #[arg(long)]
    pub count: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DrawOutput<'a> {
    technique: Option<&'a Technique>,
    duration_range: Option<String>,
    pool_size: usize,
    is_favorite: bool,
}

pub fn run(args: DrawArgs) -> CmdResult {
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;
    let selector = Selector::new(&catalog);

    let filters = DrawFilters {
        preset: args.preset,
        category: args.category,
        duration: args.duration,
        intensity: args.intensity,
        discretion: args.discretion,
        include_premium: args.include_premium || config.catalog.include_premium,
    };
    let pool_size = selector.count(&filters);

    if args.count {
        return print_json(&serde_json::json!({ "poolSize": pool_size }));
    }

    let mut rng = PcgRandom::from_seed_option(args.seed);
    let technique = match args.another.as_deref() {
        Some(current) => selector.draw_another(current, &filters, &mut rng),
        None => selector.draw(&filters, &mut rng),
    };

    let is_favorite = match technique {
        Some(t) => open_store()?.is_favorite(&t.id),
        None => false,
    };

    print_json(&DrawOutput {
        technique,
        duration_range: technique.map(duration_range),
        pool_size,
        is_favorite,
    })
}
