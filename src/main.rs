//! Quote-Harvester main entry point
//!
//! This is the command-line interface for the Quote-Harvester crawler.

use anyhow::Context;
use clap::Parser;
use quote_harvester::config::{load_config_with_hash, Config};
use quote_harvester::crawler::{run_harvest, user_agent_string};
use quote_harvester::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quote-Harvester: a paginated quote listing crawler
///
/// Quote-Harvester walks a quote listing page by page, resolves the profile
/// of every quoted author and stores authors and quotes without ever
/// overwriting what is already stored.
#[derive(Parser, Debug)]
#[command(name = "quote-harvester")]
#[command(version)]
#[command(about = "A paginated quote listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(config, config_hash, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quote_harvester=info,warn"),
            1 => EnvFilter::new("quote_harvester=debug,info"),
            2 => EnvFilter::new("quote_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Quote-Harvester Dry Run ===\n");

    println!("Source:");
    println!("  Seed URL: {}", config.source.seed_url);
    match config.source.max_pages {
        Some(limit) => println!("  Max pages: {}", limit),
        None => println!("  Max pages: unlimited"),
    }

    println!("\nFetching:");
    println!("  Mode: {:?}", config.fetch.mode);
    println!("  Profile fetches in flight: {}", config.fetch.concurrency());
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  User agent: {}", user_agent_string(&config.user_agent));

    println!("\nStore:");
    println!("  Database: {}", config.store.database_path);

    match &config.staging {
        Some(staging) => {
            println!("\nStaging:");
            println!("  Authors: {}", staging.authors_path);
            println!("  Quotes: {}", staging.quotes_path);
        }
        None => println!("\nStaging: disabled"),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the store
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use quote_harvester::output::{load_statistics, print_statistics};
    use quote_harvester::storage::open_store;
    use std::path::Path;

    println!("Database: {}\n", config.store.database_path);

    let store = open_store(Path::new(&config.store.database_path))
        .with_context(|| format!("Failed to open store {}", config.store.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, config_hash: String, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Harvesting from {} ({:?} profile fetching)",
        config.source.seed_url,
        config.fetch.mode
    );

    let report = run_harvest(config, config_hash)
        .await
        .context("Harvest failed")?;

    if !quiet {
        print_report(&report);
    }

    Ok(())
}
