//! Listing Watch main entry point
//!
//! This is the command-line interface for the Listing Watch listings watcher.

use clap::Parser;
use listing_watch::config::{load_config_with_hash, Config, MailCredentials};
use listing_watch::notify::{Notifier, SmtpTransport};
use listing_watch::scrape::HttpPageSource;
use listing_watch::{JsonFileStore, ScrapeCycle, Scheduler};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Listing Watch: a polite classified-listings watcher
///
/// Listing Watch fetches a listings page on a jittered schedule, matches
/// listings against configured search criteria and emails every new match
/// exactly once.
#[derive(Parser, Debug)]
#[command(name = "listing-watch")]
#[command(version = "1.0.0")]
#[command(about = "A polite classified-listings watcher", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "watch.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a single cycle and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    once: bool,

    /// Validate config and show what would be watched without fetching
    #[arg(long, conflicts_with_all = ["once", "stats"])]
    dry_run: bool,

    /// Show statistics from the listing store and exit
    #[arg(long, conflicts_with_all = ["once", "dry_run"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_watch(config, cli.once).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_watch=info,warn"),
            1 => EnvFilter::new("listing_watch=debug,info"),
            2 => EnvFilter::new("listing_watch=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be watched
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Listing Watch Dry Run ===\n");

    println!("Source:");
    println!("  URL: {}", config.source.url);
    println!("  Listing selector: {}", config.source.listing_selector);
    println!("  Title selector: {}", config.source.title_selector);
    println!("  Fetch timeout: {}s", config.source.fetch_timeout_secs);

    println!("\nStore:");
    println!("  Path: {}", config.store.path);

    println!("\nMail:");
    println!("  SMTP: {}:{}", config.mail.smtp_host, config.mail.smtp_port);
    match &config.mail.sender {
        Some(sender) => println!("  Sender: {}", sender),
        None => println!("  Sender: $EMAIL_USER"),
    }

    println!("\nSchedule:");
    println!(
        "  Fallback delay: {}s - {}s",
        config.schedule.fallback_min_secs, config.schedule.fallback_max_secs
    );
    for window in &config.schedule.windows {
        println!(
            "  - {} -> {}: {} - {} min",
            window.start, window.end, window.min, window.max
        );
    }

    println!("\nCriteria ({}):", config.criteria.len());
    for criterion in &config.criteria {
        println!(
            "  - {} {} [{}]",
            criterion.make,
            criterion.model,
            criterion.years.join(", ")
        );
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the listing store
fn handle_stats(config: &Config) -> listing_watch::Result<()> {
    use listing_watch::output::{load_statistics, print_statistics};

    println!("Store: {}\n", config.store.path);

    let store = JsonFileStore::new(&config.store.path);
    let stats = load_statistics(&store, &config.criteria)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main watch loop
async fn handle_watch(config: Config, once: bool) -> listing_watch::Result<()> {
    let credentials = MailCredentials::from_env()?;
    let sender = config
        .mail
        .sender
        .clone()
        .unwrap_or_else(|| credentials.user.clone());

    let transport = SmtpTransport::new(&config.mail, &credentials)?;
    let notifier = Notifier::new(
        sender,
        Arc::new(transport),
        Duration::from_secs(config.mail.send_timeout_secs),
    );

    let source = HttpPageSource::from_config(&config.source)?;
    let store = JsonFileStore::new(&config.store.path);
    let cycle = ScrapeCycle::new(
        &config,
        Arc::new(source),
        Arc::new(store),
        notifier,
        credentials.to.clone(),
    )?;

    tracing::info!(
        "Watching {} for {} criteria",
        cycle.page_url(),
        cycle.criteria().len()
    );

    let report = cycle.run().await;
    tracing::info!("Initial cycle complete: {}", report);

    if once {
        return Ok(());
    }

    let mut scheduler = Scheduler::from_config(&config.schedule)?;
    let cancel = CancellationToken::new();

    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received interrupt, stopping after the current cycle");
            signal_token.cancel();
        }
    });

    let cycles = scheduler.run(&cycle, cancel).await;
    tracing::info!("Watch stopped after {} scheduled cycles", cycles);

    Ok(())
}
