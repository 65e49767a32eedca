//! Phase 2 scheduling: fixed-size batches, one fresh session per batch
//!
//! A session that dies, or never opens, costs at most the rest of its batch.
//! Batches run strictly in sequence and the next session is not opened until
//! the previous one has been closed.

use std::ops::Range;
use tracing::{info, warn};

use crate::config::ScrapeConfig;
use crate::records::{EnrichedRecord, RecordSet};
use crate::scrape_events::{EventEmitter, ScrapeEvent};
use crate::session::{Session, SessionProvider};

use super::enrichment::enrich_record;
use super::eta::ThroughputTracker;
use super::pacing::pace;
use super::types::{RecordOutcome, ScrapeError};

/// Split `0..total` into consecutive ranges of at most `batch_size`
#[must_use]
pub fn plan_batches(total: usize, batch_size: usize) -> Vec<Range<usize>> {
    let size = batch_size.max(1);
    (0..total)
        .step_by(size)
        .map(|start| start..(start + size).min(total))
        .collect()
}

/// Shared state threaded through one location's enrichment
struct BatchContext<'a> {
    config: &'a ScrapeConfig,
    emitter: &'a EventEmitter,
    location: &'a str,
    total: usize,
    tracker: ThroughputTracker,
}

impl BatchContext<'_> {
    /// Count one record as processed and report it
    async fn report(
        &mut self,
        record: EnrichedRecord,
        outcome: RecordOutcome,
    ) -> Result<(), ScrapeError> {
        self.tracker.record();
        self.emitter
            .emit(ScrapeEvent::enrichment_progress(
                self.location.to_string(),
                self.tracker.processed(),
                self.total,
                self.tracker.eta(),
                record,
                outcome,
            ))
            .await
    }
}

/// Enrich the first `min(max_details, len)` records of `records` in place.
///
/// Every record in that prefix is processed exactly once and reported with
/// one progress event. A batch whose session cannot be opened reports its
/// records as `SessionLost` and the next batch tries again. Returns the
/// number processed.
///
/// # Errors
///
/// [`ScrapeError::Cancelled`] when the consumer goes away.
pub async fn enrich_location(
    provider: &dyn SessionProvider,
    config: &ScrapeConfig,
    emitter: &EventEmitter,
    location: &str,
    records: &mut RecordSet,
) -> Result<usize, ScrapeError> {
    let total = config.max_details_per_location().min(records.len());
    info!("Phase 2: extracting details for {} leads in '{}'", total, location);
    emitter
        .emit(ScrapeEvent::enrichment_started(location.to_string(), total))
        .await?;

    let batches = plan_batches(total, config.batch_size());
    let mut ctx = BatchContext {
        config,
        emitter,
        location,
        total,
        tracker: ThroughputTracker::new(total, config.eta_min_sample()),
    };

    for (index, range) in batches.iter().enumerate() {
        if index > 0 {
            pace(config.batch_pacing(), emitter, "between batches").await?;
        }
        emitter
            .emit(ScrapeEvent::enrichment_batch_started(
                location.to_string(),
                index + 1,
                batches.len(),
                range.len(),
            ))
            .await?;

        emitter.ensure_open()?;
        match provider.open_session(config.headless()).await {
            Ok(mut session) => {
                let result = run_batch(session.as_mut(), range.clone(), records, &mut ctx).await;
                if let Err(e) = session.close().await {
                    warn!("Closing batch session failed: {}", e);
                }
                result?;
            }
            Err(e) => {
                warn!(
                    "Could not open a session for batch {}/{} in '{}': {}",
                    index + 1,
                    batches.len(),
                    location,
                    e
                );
                skip_records(range.clone(), records, &mut ctx, &e.to_string()).await?;
            }
        }
        ctx.tracker.sample();
    }

    Ok(ctx.tracker.processed())
}

async fn run_batch(
    session: &mut dyn Session,
    range: Range<usize>,
    records: &mut RecordSet,
    ctx: &mut BatchContext<'_>,
) -> Result<(), ScrapeError> {
    for position in range.clone() {
        let Some(record) = records.get_mut_at(position) else {
            continue;
        };

        let outcome = enrich_record(session, record, ctx.config, ctx.emitter).await?;
        let snapshot = record.clone();
        if let RecordOutcome::SessionLost(reason) = &outcome {
            let reason = reason.clone();
            warn!(
                "Session lost in batch; remaining records keep default fields: {}",
                reason
            );
            ctx.report(snapshot, outcome).await?;
            return skip_records(position + 1..range.end, records, ctx, &reason).await;
        }
        ctx.report(snapshot, outcome).await?;
    }
    Ok(())
}

/// Report every record in `range` as `SessionLost` without touching a browser
async fn skip_records(
    range: Range<usize>,
    records: &RecordSet,
    ctx: &mut BatchContext<'_>,
    reason: &str,
) -> Result<(), ScrapeError> {
    for position in range {
        let Some(record) = records.as_slice().get(position) else {
            continue;
        };
        ctx.report(record.clone(), RecordOutcome::SessionLost(reason.to_string()))
            .await?;
    }
    Ok(())
}
