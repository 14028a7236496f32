//! Site-Survey main entry point
//!
//! This is the command-line interface for the Site-Survey crawler and
//! analyzer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use site_survey::config::{load_config_with_hash, validate, Config};
use site_survey::crawler::{Coordinator, CrawlEvent, ProgressReporter, DEFAULT_PROGRESS_CAPACITY};
use site_survey::output::{AnalysisReport, Analyzer};
use site_survey::storage::{save_report, DirectoryStore, PageStore};
use site_survey::url::validate_seed;
use site_survey::ScopeFilter;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Survey: a scoped website crawler and content analyzer
///
/// Site-Survey crawls a website breadth-first from a seed URL, staying on
/// the seed's domain and under its path, then reports word frequencies and
/// link, image, media, resource and document inventories.
#[derive(Parser, Debug)]
#[command(name = "site-survey")]
#[command(version = "1.0.0")]
#[command(about = "A scoped website crawler and content analyzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress progress and non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a website and analyze the fetched pages
    Crawl {
        /// Seed URL (scheme and domain required)
        #[arg(value_name = "URL")]
        url: String,

        /// Path to TOML configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Maximum number of pages to fetch
        #[arg(long, value_name = "N")]
        max_pages: Option<usize>,

        /// Maximum link depth from the seed
        #[arg(long, value_name = "D")]
        max_depth: Option<u32>,

        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECONDS")]
        timeout: Option<u64>,

        /// Save the fetched pages to this directory
        #[arg(long, value_name = "DIR")]
        save: Option<PathBuf>,

        /// Write the report to this file instead of stdout
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Validate settings and show the crawl scope without fetching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Analyze a previously saved page set
    Analyze {
        /// Directory written by `crawl --save`
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Path to TOML configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Shortest word counted in frequencies
        #[arg(long, value_name = "N")]
        min_word_length: Option<usize>,

        /// Write the report to this file instead of stdout
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl {
            url,
            config,
            max_pages,
            max_depth,
            timeout,
            save,
            report,
            dry_run,
        } => {
            let mut config = load_settings(config.as_deref())?;
            if let Some(max_pages) = max_pages {
                config.crawler.max_pages = max_pages;
            }
            if let Some(max_depth) = max_depth {
                config.crawler.max_depth = max_depth;
            }
            if let Some(timeout) = timeout {
                config.crawler.timeout_seconds = timeout;
            }
            if let Some(dir) = save {
                config.output.directory = Some(dir.display().to_string());
            }
            if let Some(path) = report {
                config.output.report_path = Some(path.display().to_string());
            }
            validate(&config).context("Invalid command-line settings")?;

            if dry_run {
                handle_dry_run(&url, &config)
            } else {
                handle_crawl(&url, config, cli.quiet).await
            }
        }
        Command::Analyze {
            dir,
            config,
            min_word_length,
            report,
        } => {
            let mut config = load_settings(config.as_deref())?;
            if let Some(min_word_length) = min_word_length {
                config.analysis.min_word_length = min_word_length;
            }
            if let Some(path) = report {
                config.output.report_path = Some(path.display().to_string());
            }
            validate(&config).context("Invalid command-line settings")?;

            handle_analyze(&dir, &config)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_survey=info,warn"),
            1 => EnvFilter::new("site_survey=debug,info"),
            2 => EnvFilter::new("site_survey=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file, or the built-in defaults when none is given
fn load_settings(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles `crawl --dry-run`: validates the seed and shows what would be crawled
fn handle_dry_run(url: &str, config: &Config) -> anyhow::Result<()> {
    let seed = validate_seed(url).with_context(|| format!("Invalid seed URL '{}'", url))?;
    let scope = ScopeFilter::from_seed(&seed)?;

    println!("=== Site-Survey Dry Run ===\n");

    println!("Seed: {}", seed);
    println!("Scope:");
    println!("  Domain: {}", scope.base_domain());
    if scope.base_path().is_empty() {
        println!("  Path: (unrestricted)");
    } else {
        println!("  Path: {} and below", scope.base_path());
    }

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);

    println!("\nAnalysis:");
    println!("  Min word length: {}", config.analysis.min_word_length);

    println!("\nOutput:");
    println!(
        "  Pages: {}",
        config.output.directory.as_deref().unwrap_or("(not saved)")
    );
    println!(
        "  Report: {}",
        config.output.report_path.as_deref().unwrap_or("(stdout)")
    );

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(url: &str, config: Config, quiet: bool) -> anyhow::Result<()> {
    let (progress, mut events) = ProgressReporter::channel(DEFAULT_PROGRESS_CAPACITY);
    let coordinator = Coordinator::new(url, config.crawler.clone(), progress)
        .with_context(|| format!("Cannot start crawl of {}", url))?;

    let cancel = coordinator.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            cancel.cancel();
        }
    });

    let worker = tokio::spawn(coordinator.run());

    // The channel closes when the worker drops its reporter
    while let Some(event) = events.recv().await {
        if !quiet {
            print_event(&event);
        }
    }

    let outcome = worker.await.context("Crawl worker stopped unexpectedly")??;
    tracing::info!(
        "Crawl {} in {:.1}s with {} pages",
        outcome.state,
        outcome.elapsed.as_secs_f64(),
        outcome.pages.len()
    );

    if let Some(dir) = &config.output.directory {
        DirectoryStore::new(dir)
            .save(&outcome.pages)
            .with_context(|| format!("Failed to save pages to {}", dir))?;
        if !quiet {
            println!("Pages saved to: {}", dir);
        }
    }

    let analyzer = Analyzer::new(&config.analysis)?;
    let report = analyzer.summarize(&outcome.pages);
    emit_report(&report, config.output.report_path.as_deref(), quiet)
}

/// Handles `analyze`: reloads a saved page set and reports on it
fn handle_analyze(dir: &Path, config: &Config) -> anyhow::Result<()> {
    let pages = DirectoryStore::new(dir)
        .load()
        .with_context(|| format!("Failed to load pages from {}", dir.display()))?;

    let analyzer = Analyzer::new(&config.analysis)?;
    let report = analyzer.summarize(&pages);
    emit_report(&report, config.output.report_path.as_deref(), false)
}

fn print_event(event: &CrawlEvent) {
    println!("{} - {}", chrono::Local::now().format("%H:%M:%S"), event);
}

/// Writes the report to a file, or prints it
fn emit_report(report: &AnalysisReport, path: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            save_report(report, Path::new(path))
                .with_context(|| format!("Failed to write report to {}", path))?;
            if !quiet {
                println!("✓ Report written to: {}", path);
            }
        }
        None => println!("{}", report.to_document()),
    }
    Ok(())
}
