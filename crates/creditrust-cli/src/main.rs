//! CrediTrust CLI: read-only queries against the learning-platform contract.
//!
//! Subcommands: init, profile, achievements, activity, modules, balance,
//! score, dashboard. Results are printed as JSON on stdout; logs go to stderr.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use creditrust_core::CrediTrustConfig;

/// CrediTrust: on-chain profiles and trust scores.
#[derive(Parser, Debug)]
#[command(name = "creditrust", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "creditrust.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Show an account's profile.
    Profile(commands::query::AddressArgs),
    /// List an account's soulbound achievements.
    Achievements(commands::query::AddressArgs),
    /// Show an account's activity history.
    Activity(commands::query::AddressArgs),
    /// List the learning modules offered by the contract.
    Modules,
    /// Show an account's APT balance.
    Balance(commands::query::AddressArgs),
    /// Derive an account's trust score.
    Score(commands::query::AddressArgs),
    /// Show the full dashboard for an account.
    Dashboard(commands::query::AddressArgs),
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.command {
        Commands::Init(_) => CrediTrustConfig::default(),
        _ => CrediTrustConfig::load(&cli.config)?,
    };
    config.apply_env_overrides();
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging.level, &config.logging.format);

    tracing::debug!(config = %cli.config.display(), network = %config.network.name, "configuration loaded");

    match &cli.command {
        Commands::Init(args) => commands::init::run(&cli.config, args),
        Commands::Profile(args) => commands::query::profile(&config, args).await,
        Commands::Achievements(args) => commands::query::achievements(&config, args).await,
        Commands::Activity(args) => commands::query::activity(&config, args).await,
        Commands::Modules => commands::query::modules(&config).await,
        Commands::Balance(args) => commands::query::balance(&config, args).await,
        Commands::Score(args) => commands::query::score(&config, args).await,
        Commands::Dashboard(args) => commands::query::dashboard(&config, args).await,
    }
}
