use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "eclipse-cli", version, about = "Eclipse CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a random technique
    Draw(commands::draw::DrawArgs),
    /// Browse the technique catalog
    Techniques {
        #[command(subcommand)]
        action: commands::techniques::TechniquesAction,
    },
    /// Browse categories
    Categories {
        #[command(subcommand)]
        action: commands::categories::CategoriesAction,
    },
    /// Favorite techniques
    Favorites {
        #[command(subcommand)]
        action: commands::favorites::FavoritesAction,
    },
    /// Session history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// User settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Stored data and one-shot flags
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Guided timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ECLIPSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Draw(args) => commands::draw::run(args),
        Commands::Techniques { action } => commands::techniques::run(action),
        Commands::Categories { action } => commands::categories::run(action),
        Commands::Favorites { action } => commands::favorites::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "eclipse-cli",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
