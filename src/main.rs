//! adstxt command-line entry point
//!
//! Crawls the ads.txt files of the given domains and prints a summary per domain.

use adstxt::config::{load_config, Config};
use adstxt::{Crawler, Request, Response};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fetch and parse ads.txt files
///
/// Domains come from the command line and/or an input file with one domain per
/// line. Blank lines and lines starting with '#' in the input file are ignored.
#[derive(Parser, Debug)]
#[command(name = "adstxt")]
#[command(version)]
#[command(about = "Fetch and parse ads.txt files", long_about = None)]
struct Cli {
    /// Domains to crawl
    #[arg(value_name = "DOMAIN")]
    domains: Vec<String>,

    /// File with one domain per line
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print every record, not just the summary
    #[arg(short, long)]
    records: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    let requests = collect_requests(&cli)?;
    if requests.is_empty() {
        anyhow::bail!("No domains given; pass DOMAIN arguments or --input FILE");
    }

    let crawler = Crawler::new(&config).context("Failed to build HTTP client")?;
    let print_records = cli.records;

    let stats = crawler
        .get_multiple(requests, |request: &Request, outcome: adstxt::Result<Response>| {
            match outcome {
                Ok(response) => print_response(&response, print_records),
                Err(e) => println!("{}\terror\t{}", request.domain, e),
            }
        })
        .await;

    tracing::info!(
        "Crawled {} domains: {} succeeded, {} failed",
        stats.total,
        stats.succeeded,
        stats.failed
    );

    if stats.succeeded == 0 {
        anyhow::bail!("No ads.txt file could be fetched");
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
            0 => EnvFilter::new("adstxt=info,warn"),
            1 => EnvFilter::new("adstxt=debug,info"),
            2 => EnvFilter::new("adstxt=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds requests from positional domains and the optional input file
fn collect_requests(cli: &Cli) -> anyhow::Result<Vec<Request>> {
    let mut domains = cli.domains.clone();

    if let Some(path) = &cli.input {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?;
        domains.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    domains
        .iter()
        .map(|domain| {
            Request::for_domain(domain).with_context(|| format!("Invalid domain '{}'", domain))
        })
        .collect()
}

fn print_response(response: &Response, print_records: bool) {
    let records = &response.records;
    println!(
        "{}\tok\t{} data records, {} variables, expires {}",
        response.request.domain,
        records.data().count(),
        records.variables().count(),
        response.expires.to_rfc3339()
    );

    if print_records {
        for data in records.data() {
            println!(
                "  {}, {}, {}{}",
                data.ad_system_domain,
                data.publisher_account_id,
                data.relationship,
                data.certification_authority_id
                    .as_deref()
                    .map(|id| format!(", {}", id))
                    .unwrap_or_default()
            );
        }
        for variable in records.variables() {
            println!("  {}={}", variable.name, variable.value);
        }
    }
}
