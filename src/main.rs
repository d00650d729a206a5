//! Paperwatch main entry point
//!
//! This is the command-line interface for the Paperwatch publication monitor.

use clap::Parser;
use paperwatch::catalog::{open_catalog, Catalog};
use paperwatch::config::{load_config_with_hash, Config};
use paperwatch::monitor::Monitor;
use paperwatch::notify::LogNotifier;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Paperwatch: an incremental publication index monitor
///
/// Paperwatch periodically fetches a journal's publication index page,
/// extracts paper records, and catalogs the ones it has not seen before,
/// reporting each discovery as it lands.
#[derive(Parser, Debug)]
#[command(name = "paperwatch")]
#[command(version = "1.0.0")]
#[command(about = "An incremental publication index monitor", long_about = None)]
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

    /// Run a single fetch cycle and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    once: bool,

    /// Validate config and show what would be monitored without fetching
    #[arg(long, conflicts_with_all = ["once", "stats"])]
    dry_run: bool,

    /// Show catalog statistics and recent papers, then exit
    #[arg(long, conflicts_with_all = ["once", "dry_run"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.once {
        handle_once(config).await?;
    } else {
        handle_monitor(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("paperwatch=info,warn"),
            1 => EnvFilter::new("paperwatch=debug,info"),
            2 => EnvFilter::new("paperwatch=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config) {
    println!("=== Paperwatch Dry Run ===\n");

    println!("Monitor Configuration:");
    println!("  Target URL: {}", config.monitor.target_url);
    println!("  Check interval: {}s", config.monitor.check_interval_secs);
    println!("  Request timeout: {}s", config.monitor.timeout_secs);
    println!("  Max retries: {}", config.monitor.max_retries);
    println!("  User agent: {}", config.monitor.user_agent);
    println!(
        "  Notifications: {}",
        if config.monitor.notifications_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would check {} every {}s",
        config.monitor.target_url, config.monitor.check_interval_secs
    );
}

/// Handles the --stats mode: shows catalog statistics
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let catalog = open_catalog(Path::new(&config.output.database_path))?;

    let total = catalog.count_papers()?;
    let unread = catalog.count_unread()?;
    println!("Papers cataloged: {}", total);
    println!("Unread: {}", unread);

    let entries = catalog.list_all()?;
    if !entries.is_empty() {
        println!("\nMost recent:");
        for entry in entries.iter().take(10) {
            println!(
                "  [{}] {} - {} ({})",
                entry.paper.publication_date,
                entry.paper.title,
                entry.paper.authors.join(", "),
                entry.paper.issue
            );
        }
    }

    Ok(())
}

/// Handles the --once mode: a single fetch cycle, then exit
async fn handle_once(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open_catalog(Path::new(&config.output.database_path))?;
    let monitor = Monitor::new(catalog, LogNotifier);

    monitor.run_once(config.monitor).await?;

    tracing::info!("Single cycle finished in state: {}", monitor.state());
    Ok(())
}

/// Handles the main monitoring loop until interrupted
async fn handle_monitor(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open_catalog(Path::new(&config.output.database_path))?;
    let mut monitor = Monitor::new(catalog, LogNotifier);

    tracing::info!(
        "Monitoring {} every {}s (Ctrl-C to stop)",
        config.monitor.target_url,
        config.monitor.check_interval_secs
    );

    monitor.start(config.monitor)?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received, stopping monitor");
    monitor.stop();

    Ok(())
}
