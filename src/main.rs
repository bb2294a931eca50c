use clap::{Parser, Subcommand};
use tracing::error;

use feedmill::{cli, logging, Config};

#[derive(Parser)]
#[command(name = "feedmill", version, about = "Web-administered RSS/Atom aggregator")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server (the default).
    Serve,
    /// Apply pending database migrations.
    Migrate,
    /// Create the default admin user.
    SeedUsers,
    /// Create the default feed subscriptions.
    SeedFeeds,
    /// Fetch and reconcile every feed once.
    FetchFeeds,
    /// Delete all users.
    ClearUsers,
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let config = match Config::load_with_env(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", args.config);
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        logging::init_console_only(&config.logging.level);
    }

    let result = match args.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve(&config).await,
        Command::Migrate => cli::migrate(&config).await,
        Command::SeedUsers => cli::seed_users(&config).await,
        Command::SeedFeeds => cli::seed_default_feeds(&config).await,
        Command::FetchFeeds => cli::fetch_feeds(&config).await,
        Command::ClearUsers => cli::clear_users(&config).await,
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
