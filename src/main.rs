//! leadscrape - collect business listings for a keyword across locations
//!
//! Runs the two-phase scrape, logs progress as it streams in, and writes the
//! deduplicated leads to CSV when the run completes.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadscrape::scrape_engine::seconds_to_human;
use leadscrape::utils::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_DETAILS, DEFAULT_MAX_RESULTS};
use leadscrape::{RecordOutcome, ScrapeConfig, ScrapeEvent, save_csv};

#[derive(Debug, Parser)]
#[command(
    name = "leadscrape",
    version,
    about = "Collect business listings from map search results into a CSV"
)]
struct Cli {
    /// Search keyword, e.g. "dentist"
    #[arg(short, long)]
    keyword: String,

    /// Location to search (repeatable)
    #[arg(short, long = "location", value_name = "LOCATION")]
    locations: Vec<String>,

    /// File with one location per line
    #[arg(long, value_name = "FILE")]
    locations_file: Option<PathBuf>,

    /// Maximum listings discovered per location
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Maximum listings enriched per location
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DETAILS)]
    max_details: usize,

    /// Listings enriched per browser session
    #[arg(long, value_name = "N", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Show the browser window
    #[arg(long, default_value_t = false)]
    headed: bool,

    /// Chrome/Chromium executable to use instead of auto-discovery
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE", default_value = "google_maps_bulk_leads.csv")]
    output: PathBuf,

    /// Print every event as a JSON line on stdout
    #[arg(long, default_value_t = false)]
    events_json: bool,
}

fn collect_locations(cli: &Cli) -> Result<Vec<String>> {
    let mut locations = cli.locations.clone();
    if let Some(path) = &cli.locations_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read locations file {}", path.display()))?;
        locations.extend(contents.lines().map(str::to_string));
    }
    Ok(locations)
}

fn log_event(event: &ScrapeEvent) {
    match event {
        ScrapeEvent::RunStarted { keyword, locations, .. } => {
            info!("Scraping '{}' across {} locations", keyword, locations.len());
        }
        ScrapeEvent::LocationStarted {
            location,
            index,
            total,
            leads_so_far,
            ..
        } => info!(
            "Processing location {}/{}: {} ({} leads so far)",
            index, total, location, leads_so_far
        ),
        ScrapeEvent::DiscoveryProgress { count, cap, candidate, .. } => {
            debug!("[{}/{}] {}", count, cap, candidate.name());
        }
        ScrapeEvent::DiscoveryExhausted {
            location,
            count,
            source_limited,
            ..
        } => {
            if *source_limited {
                info!("Only {} found (source limit) for '{}'", count, location);
            } else {
                info!("Found {} listings for '{}'", count, location);
            }
        }
        ScrapeEvent::LocationSkipped { location, reason, .. } => {
            warn!("Skipped '{}': {}", location, reason);
        }
        ScrapeEvent::EnrichmentStarted { total, .. } => {
            info!("Extracting details for {} leads", total);
        }
        ScrapeEvent::EnrichmentBatchStarted {
            batch_index,
            batch_count,
            ..
        } => debug!("Batch {}/{}", batch_index, batch_count),
        ScrapeEvent::EnrichmentProgress {
            current,
            total,
            eta,
            record,
            outcome,
            ..
        } => match outcome {
            RecordOutcome::Enriched { fields } => info!(
                "[{}/{}] {} ({} fields, ETA {})",
                current,
                total,
                record.name(),
                fields,
                eta
            ),
            other => warn!("[{}/{}] {}: {:?}", current, total, record.name(), other),
        },
        ScrapeEvent::LocationCompleted {
            location,
            new_unique,
            ..
        } => info!("'{}' done, {} new unique leads", location, new_unique),
        ScrapeEvent::RunComplete { .. } | ScrapeEvent::RunError { .. } => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadscrape=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let locations = collect_locations(&cli)?;

    let mut builder = ScrapeConfig::builder()
        .keyword(&cli.keyword)
        .locations(&locations)
        .max_results_per_location(cli.max_results)
        .max_details_per_location(cli.max_details)
        .batch_size(cli.batch_size)
        .headless(!cli.headed);
    if let Some(chrome) = &cli.chrome {
        builder = builder.chrome_executable(chrome);
    }
    let config = builder.build().context("Invalid configuration")?;

    let mut events = leadscrape::scrape(config);
    while let Some(event) = events.next().await {
        if cli.events_json {
            println!("{}", serde_json::to_string(&event)?);
        }
        log_event(&event);

        match event {
            ScrapeEvent::RunComplete {
                records,
                locations,
                elapsed,
                ..
            } => {
                save_csv(&records, &cli.output)
                    .with_context(|| format!("Failed to write {}", cli.output.display()))?;
                let summary = format!(
                    "Done! Collected {} unique leads across {} locations in {}",
                    records.len(),
                    locations,
                    seconds_to_human(elapsed.as_secs_f64())
                );
                if cli.events_json {
                    info!("{}", summary);
                } else {
                    println!("{summary}");
                }
                return Ok(());
            }
            ScrapeEvent::RunError { phase, cause, .. } => {
                bail!("Scrape failed during {phase}: {cause}");
            }
            _ => {}
        }
    }

    bail!("Scrape ended without a result")
}
