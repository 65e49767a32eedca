//! Per-record detail enrichment
//!
//! Visits one record's detail page and populates its fields. Whatever
//! happens, the record comes back processed with a [`RecordOutcome`]; only
//! consumer cancellation escapes as an error.

use tracing::{debug, warn};

use crate::config::ScrapeConfig;
use crate::records::EnrichedRecord;
use crate::scrape_events::EventEmitter;
use crate::session::{Session, SessionError};
use crate::utils::DETAIL_READY_SELECTORS;

use super::extractors::extract_fields;
use super::pacing::pace;
use super::page_timeout::with_page_timeout;
use super::types::{Interrupted, RecordOutcome, ScrapeError};

fn outcome_for(err: &SessionError) -> RecordOutcome {
    if err.is_fatal() {
        RecordOutcome::SessionLost(err.to_string())
    } else if err.is_timeout() {
        RecordOutcome::PageLoadTimeout
    } else {
        RecordOutcome::Failed(err.to_string())
    }
}

/// Enrich one record in place.
///
/// Navigates to the place URL, waits for a load signal, lets the page settle
/// and then reads every detail field.
pub async fn enrich_record(
    session: &mut dyn Session,
    record: &mut EnrichedRecord,
    config: &ScrapeConfig,
    emitter: &EventEmitter,
) -> Result<RecordOutcome, ScrapeError> {
    emitter.ensure_open()?;
    let url = record.place_url().to_string();
    let timeout = config.detail_wait_timeout();

    if let Err(e) = with_page_timeout(session.navigate(&url), timeout, "navigate").await {
        debug!("Detail navigation failed for {}: {}", url, e);
        return Ok(outcome_for(&e));
    }

    emitter.ensure_open()?;
    if let Err(e) = session.wait_for_any(DETAIL_READY_SELECTORS, timeout).await {
        debug!("Detail page not ready for {}: {}", url, e);
        return Ok(outcome_for(&e));
    }

    pace(config.record_pacing(), emitter, "detail settle").await?;

    match extract_fields(session, emitter, record).await {
        Ok(fields) => {
            debug!("Enriched {} ({} fields)", record.name(), fields);
            Ok(RecordOutcome::Enriched { fields })
        }
        Err(Interrupted::Session(e)) => {
            warn!("Session lost while reading {}: {}", url, e);
            Ok(outcome_for(&e))
        }
        Err(Interrupted::Cancelled) => Err(ScrapeError::Cancelled),
    }
}
