//! visreg main entry point
//!
//! This is the command-line interface for the visreg target crawler.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use visreg::config::{
    compute_config_hash, load_config, load_or_default, sample_config, save_config,
    validate_crawler_config, DEFAULT_CONFIG_PATH,
};
use visreg::crawler::{crawl, default_user_agent, CrawlOptions, HttpBrowser};
use visreg::output::{print_statistics, print_targets};

/// visreg: find the pages of a site worth capturing
///
/// visreg crawls a website breadth-first from one URL and turns every
/// same-origin page it reaches into a screenshot target.
#[derive(Parser, Debug)]
#[command(name = "visreg")]
#[command(version)]
#[command(about = "Target discovery for visual regression testing", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and list the pages found as targets
    Crawl(CrawlArgs),

    /// Write a sample configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,

        /// Path to the TOML configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Print the targets in the configuration
    List {
        /// Path to the TOML configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Page to start from; only links on the same origin are followed
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum link distance from the start page
    #[arg(short, long)]
    depth: Option<u32>,

    /// Maximum number of targets to discover
    #[arg(short, long)]
    pages: Option<usize>,

    /// Maximum number of pages visited at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Element every page must contain; also used as the capture selector
    #[arg(long)]
    selector: Option<String>,

    /// Store the base URL and discovered targets in the configuration
    #[arg(short, long)]
    save: bool,

    /// Print crawl statistics after the target list
    #[arg(long)]
    stats: bool,

    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl(args) => handle_crawl(args).await,
        Command::Init { force, config } => handle_init(&config, force),
        Command::List { config } => handle_list(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("visreg=info,warn"),
            1 => EnvFilter::new("visreg=debug,info"),
            2 => EnvFilter::new("visreg=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so the target list on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles `visreg crawl`
async fn handle_crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let mut config = load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    // Command-line flags take precedence over the config file
    let settings = &mut config.crawler;
    if let Some(depth) = args.depth {
        settings.max_depth = depth;
    }
    if let Some(pages) = args.pages {
        settings.max_pages = pages;
    }
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency;
    }
    if let Some(selector) = &args.selector {
        settings.selector = selector.clone();
    }
    validate_crawler_config(settings).context("Invalid crawl settings")?;

    let user_agent = settings.user_agent.clone().unwrap_or_else(default_user_agent);
    let browser = HttpBrowser::new(user_agent);
    let options = CrawlOptions::from_config(settings);

    let report = crawl(&browser, &args.url, options)
        .await
        .with_context(|| format!("Crawl of {} failed", args.url))?;

    print_targets(&report.targets);
    if args.stats {
        println!();
        print_statistics(&report.stats);
    }

    if args.save {
        config.base_url = args.url.clone();
        config.targets = report.targets;
        save_config(&args.config, &config)
            .with_context(|| format!("Failed to save configuration to {}", args.config.display()))?;

        let hash = compute_config_hash(&args.config)?;
        tracing::info!(
            "Saved {} targets to {} (hash: {})",
            config.targets.len(),
            args.config.display(),
            hash
        );
    }

    Ok(())
}

/// Handles `visreg init`
fn handle_init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    save_config(path, &sample_config())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

/// Handles `visreg list`
fn handle_list(path: &Path) -> anyhow::Result<()> {
    let config = load_config(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    tracing::debug!("Base URL: {}", config.base_url);
    print_targets(&config.targets);
    Ok(())
}
