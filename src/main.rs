//! Kumade main entry point
//!
//! This is the command-line interface for the Kumade profile harvester.

use anyhow::Context;
use clap::Parser;
use kumade::config::{load_config_with_hash, validate, Config};
use kumade::crawler::crawl;
use kumade::input::load_targets;
use kumade::output::{print_statistics, table_statistics};
use kumade::storage::open_store;
use kumade::url::classify;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Kumade: a patient profile harvester
///
/// Kumade visits a list of profile pages in a real browser session, waits
/// for you to log in, resolves a fixed set of fields from every page and
/// appends one row per page to a CSV or SQLite table.
#[derive(Parser, Debug)]
#[command(name = "kumade")]
#[command(version)]
#[command(about = "A patient profile harvester", long_about = None)]
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

    /// Input CSV to read URLs from, overriding the config
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Result table to append to, overriding the config
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and input, list what would be visited, and exit
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics for the result table and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if apply_overrides(&mut config, cli.input, cli.output) {
        validate(&config).context("Invalid command-line override")?;
    }

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
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
            0 => EnvFilter::new("kumade=info,warn"),
            1 => EnvFilter::new("kumade=debug,info"),
            2 => EnvFilter::new("kumade=trace,debug"),
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

/// Replaces configured paths with the ones given on the command line
///
/// Returns true when anything changed.
fn apply_overrides(config: &mut Config, input: Option<PathBuf>, output: Option<PathBuf>) -> bool {
    let mut changed = false;
    if let Some(path) = input {
        tracing::info!("Input overridden: {}", path.display());
        config.input.path = path.display().to_string();
        changed = true;
    }
    if let Some(path) = output {
        tracing::info!("Output overridden: {}", path.display());
        config.output.path = path.display().to_string();
        changed = true;
    }
    changed
}

/// Handles the --dry-run mode: validates config and input, lists the URLs
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Kumade Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Delay between items: {}-{}ms",
        config.crawler.min_delay_ms, config.crawler.max_delay_ms
    );
    println!("  Page timeout: {}s", config.crawler.page_timeout_secs);
    println!("  Ready timeout: {}s", config.crawler.ready_timeout_secs);
    println!("  Settle: {}ms", config.crawler.settle_ms);
    println!("  Reveal settle: {}ms", config.crawler.reveal_settle_ms);

    println!("\nBrowser:");
    let modes: Vec<_> = config.browser.startup.iter().map(|m| m.label()).collect();
    println!("  Startup order: {}", modes.join(" → "));
    println!("  Debug port: {}", config.browser.debug_port);
    println!("  Profile dir: {}", config.browser.profile_dir.display());
    println!("  Headless: {}", config.browser.headless);

    println!("\nOutput:");
    println!("  Table: {}", config.output.path);

    let urls = load_targets(Path::new(&config.input.path), &config.input.url_column)
        .with_context(|| format!("Failed to read input {}", config.input.path))?;
    println!(
        "\nInput: {} (column '{}')",
        config.input.path, config.input.url_column
    );
    println!("URLs ({}):", urls.len());
    for url in &urls {
        println!("  - [{}] {}", classify(url), url);
    }

    println!("\n✓ Configuration is valid");
    if urls.is_empty() {
        println!("✗ No usable URLs found; a crawl would not start");
    } else {
        println!("✓ Would visit {} URLs", urls.len());
    }

    Ok(())
}

/// Handles the --stats mode: shows statistics for the result table
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Result table: {}\n", config.output.path);

    let store = open_store(Path::new(&config.output.path))?;
    match store.load()? {
        Some(table) => print_statistics(&table_statistics(&table)),
        None => println!("No results have been saved yet"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Reading URLs from {} (column '{}')",
        config.input.path,
        config.input.url_column
    );

    // Run the crawler
    match crawl(config).await {
        Ok(summary) => {
            tracing::info!(
                "Crawl completed: {}/{} successful",
                summary.successful,
                summary.total
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
