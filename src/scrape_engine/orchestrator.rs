//! Run orchestration across locations
//!
//! Locations run strictly in input order. Each one discovers, then enriches,
//! then folds its records into the run aggregate (first-seen wins). Only a
//! browser that never opens a session ends the run; a later launch failure
//! skips that location and keeps what was already collected.

use std::time::Instant;
use tracing::{info, warn};

use crate::config::ScrapeConfig;
use crate::records::{EnrichedRecord, RecordSet};
use crate::scrape_events::{EventEmitter, ScrapeEvent, ScrapeStream};
use crate::session::SessionProvider;

use super::batch::enrich_location;
use super::discovery::{DiscoveryOutcome, discover_location};
use super::eta::seconds_to_human;
use super::pacing::pace;
use super::types::{LocationOutcome, ScrapeError};

/// Start a run in the background and return its event stream.
///
/// The stream ends after a terminal `RunComplete` or `RunError` event.
/// Dropping it cancels the run: no further browser operations start and the
/// session held at that point is closed.
pub fn scrape<P>(provider: P, config: ScrapeConfig) -> ScrapeStream
where
    P: SessionProvider + 'static,
{
    let (emitter, stream) = EventEmitter::channel(config.event_buffer());
    tokio::spawn(async move {
        if let Err(e) = run_scrape(&provider, &config, &emitter).await {
            info!("Scrape ended early: {}", e);
        }
    });
    stream
}

/// Run a full scrape, reporting through `emitter`.
///
/// Every terminal state is reported as an event before returning, except
/// cancellation, which has no one left to report to. Returns the aggregate.
pub async fn run_scrape(
    provider: &dyn SessionProvider,
    config: &ScrapeConfig,
    emitter: &EventEmitter,
) -> Result<RecordSet, ScrapeError> {
    let started = Instant::now();

    let result = match config.validate() {
        Ok(()) => run_locations(provider, config, emitter).await,
        Err(e) => Err(ScrapeError::from(e)),
    };

    match result {
        Ok(aggregate) => {
            let locations = config.search_locations().count();
            let elapsed = started.elapsed();
            info!(
                "Done! Collected {} unique leads across {} locations in {}",
                aggregate.len(),
                locations,
                seconds_to_human(elapsed.as_secs_f64())
            );
            emitter
                .emit(ScrapeEvent::run_complete(
                    aggregate.as_slice().to_vec(),
                    locations,
                    elapsed,
                ))
                .await?;
            Ok(aggregate)
        }
        Err(ScrapeError::Cancelled) => Err(ScrapeError::Cancelled),
        Err(e) => {
            warn!("Scrape failed in {} phase: {}", e.phase(), e);
            // Best effort: the consumer may already be gone
            let _ = emitter
                .emit(ScrapeEvent::run_error(e.phase(), e.to_string()))
                .await;
            Err(e)
        }
    }
}

async fn run_locations(
    provider: &dyn SessionProvider,
    config: &ScrapeConfig,
    emitter: &EventEmitter,
) -> Result<RecordSet, ScrapeError> {
    let locations: Vec<&str> = config.search_locations().collect();
    emitter
        .emit(ScrapeEvent::run_started(
            config.keyword().to_string(),
            locations.iter().map(ToString::to_string).collect(),
        ))
        .await?;

    let mut aggregate = RecordSet::new();
    for (index, location) in locations.iter().enumerate() {
        if index > 0 {
            pace(config.batch_pacing(), emitter, "between locations").await?;
        }
        info!(
            "Processing location {}/{}: {} ({} leads so far)",
            index + 1,
            locations.len(),
            location,
            aggregate.len()
        );
        emitter
            .emit(ScrapeEvent::location_started(
                location.to_string(),
                index + 1,
                locations.len(),
                aggregate.len(),
            ))
            .await?;

        let (outcome, records) = match scrape_location(provider, config, emitter, location).await {
            // The first session of the run proves whether a browser exists at all
            Err(ScrapeError::SessionUnavailable(e)) if index > 0 => (
                LocationOutcome::Skipped {
                    reason: format!("could not open a browser session: {e}"),
                },
                RecordSet::new(),
            ),
            result => result?,
        };
        match outcome {
            LocationOutcome::Completed {
                discovered,
                enriched,
            } => {
                let new_unique = aggregate.merge(records);
                emitter
                    .emit(ScrapeEvent::location_completed(
                        location.to_string(),
                        discovered,
                        enriched,
                        new_unique,
                    ))
                    .await?;
            }
            LocationOutcome::Skipped { reason } => {
                info!("Skipping '{}': {}", location, reason);
                emitter
                    .emit(ScrapeEvent::location_skipped(location.to_string(), reason))
                    .await?;
            }
        }
    }

    Ok(aggregate)
}

/// Discover and enrich one location.
///
/// The discovery session is closed before enrichment opens its own.
pub async fn scrape_location(
    provider: &dyn SessionProvider,
    config: &ScrapeConfig,
    emitter: &EventEmitter,
    location: &str,
) -> Result<(LocationOutcome, RecordSet), ScrapeError> {
    emitter.ensure_open()?;
    let mut session = provider
        .open_session(config.headless())
        .await
        .map_err(ScrapeError::SessionUnavailable)?;

    let discovered = discover_location(session.as_mut(), config, emitter, location).await;
    if let Err(e) = session.close().await {
        warn!("Closing discovery session failed: {}", e);
    }

    let candidates = match discovered? {
        DiscoveryOutcome::Found(candidates) => candidates,
        DiscoveryOutcome::SourceUnavailable(reason) => {
            return Ok((LocationOutcome::Skipped { reason }, RecordSet::new()));
        }
    };

    let cap = config.max_results_per_location();
    if candidates.len() < cap {
        info!("Only {} found (source limit) for '{}'", candidates.len(), location);
    }
    emitter
        .emit(ScrapeEvent::discovery_exhausted(
            location.to_string(),
            candidates.len(),
            cap,
        ))
        .await?;

    let mut records: RecordSet = candidates.into_iter().map(EnrichedRecord::from).collect();
    let discovered = records.len();
    let enriched = enrich_location(provider, config, emitter, location, &mut records).await?;

    Ok((
        LocationOutcome::Completed {
            discovered,
            enriched,
        },
        records,
    ))
}
