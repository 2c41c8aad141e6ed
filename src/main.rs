//! Doc-Flattener main entry point
//!
//! This is the command-line interface that crawls a documentation tree and
//! writes it as a single Markdown file.

use clap::Parser;
use doc_flattener::config::{load_config, validate, CrawlConfig};
use doc_flattener::crawler::{build_http_client, check_available, Flattener};
use doc_flattener::output::{default_output_path, ensure_md_extension, write_document};
use doc_flattener::url::resolve_target;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Flatten package documentation into a single Markdown file
///
/// The URL is a documentation page (e.g. https://pkg.go.dev/github.com/cinar/indicator/v2)
/// or a GitHub repository URL (e.g. https://github.com/cinar/indicator), which is
/// mapped to its documentation page first.
#[derive(Parser, Debug)]
#[command(name = "flatten-doc")]
#[command(version = "1.0.0")]
#[command(about = "Flatten package documentation into one Markdown file", long_about = None)]
struct Cli {
    /// Documentation or repository URL
    #[arg(value_name = "URL")]
    url: String,

    /// Output markdown file path (default: derived from the URL path)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum concurrent page fetches
    #[arg(long)]
    parallelism: Option<usize>,

    /// Upper bound of the random delay before each request, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Additional attempts after a failed request
    #[arg(long)]
    max_retries: Option<u32>,

    /// User agent sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Domain allowed for crawling (repeatable; replaces the configured list)
    #[arg(long = "allowed-domain", value_name = "HOST")]
    allowed_domains: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let target = resolve_target(&cli.url);
    if target.from_repository {
        tracing::info!("Detected GitHub URL. Transformed to: {}", target.url);
        tracing::info!("Verifying package availability...");
        let client = build_http_client(&config.user_agent)?;
        check_available(&client, &target.url).await?;
    }

    let output = match &cli.output {
        Some(path) => PathBuf::from(ensure_md_extension(&path.to_string_lossy())),
        None => PathBuf::from(default_output_path(&target.url)),
    };

    tracing::info!("Starting scraping for: {}", target.url);

    let flattener = Flattener::new(config)?;
    tracing::debug!(
        "Crawling with parallelism {}, delay up to {:?}, {} retries",
        flattener.config().parallelism,
        flattener.config().politeness_delay(),
        flattener.config().max_retries
    );
    let results = match flattener.flatten(&target.url).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Error flattening documentation: {}", e);
            return Err(e.into());
        }
    };

    if results.is_empty() {
        tracing::warn!("No documentation found.");
        return Ok(());
    }

    write_document(&results, &output)?;
    tracing::info!(
        "Successfully saved documentation to {} ({} sections)",
        output.display(),
        results.len()
    );

    Ok(())
}

/// Loads the optional config file and applies command-line overrides
fn build_config(cli: &Cli) -> Result<CrawlConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => CrawlConfig::default(),
    };

    if let Some(parallelism) = cli.parallelism {
        config.parallelism = parallelism;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.politeness_delay_ms = delay_ms;
    }
    if let Some(max_retries) = cli.max_retries {
        config.max_retries = max_retries;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent = user_agent.clone();
    }
    if !cli.allowed_domains.is_empty() {
        config.allowed_domains = cli.allowed_domains.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_flattener=info,flatten_doc=info,warn"),
            1 => EnvFilter::new("doc_flattener=debug,flatten_doc=debug,info"),
            2 => EnvFilter::new("doc_flattener=trace,flatten_doc=trace,debug"),
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
