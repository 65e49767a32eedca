//! Event type definitions for the scrape event stream
//!
//! This module contains the lifecycle events a run emits to its consumer,
//! in the order they occur.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::records::{CandidateRecord, EnrichedRecord};
use crate::scrape_engine::eta::seconds_to_human;
use crate::scrape_engine::types::{RecordOutcome, ScrapePhase};

/// Advisory remaining-time estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Eta {
    /// No throughput sample yet
    Calculating,
    Remaining(Duration),
}

impl std::fmt::Display for Eta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calculating => f.write_str(&seconds_to_human(-1.0)),
            Self::Remaining(d) => f.write_str(&seconds_to_human(d.as_secs_f64())),
        }
    }
}

/// Event types emitted during a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScrapeEvent {
    RunStarted {
        keyword: String,
        locations: Vec<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// A location begins; `index` is 1-based
    LocationStarted {
        location: String,
        index: usize,
        total: usize,
        leads_so_far: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// A new candidate was discovered in the feed
    DiscoveryProgress {
        location: String,
        count: usize,
        cap: usize,
        candidate: CandidateRecord,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// Discovery finished for a location. `source_limited` is set when the
    /// feed ran out before the cap was reached.
    DiscoveryExhausted {
        location: String,
        count: usize,
        cap: usize,
        source_limited: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    LocationSkipped {
        location: String,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    EnrichmentStarted {
        location: String,
        total: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// `batch_index` is 1-based
    EnrichmentBatchStarted {
        location: String,
        batch_index: usize,
        batch_count: usize,
        size: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// One record was processed
    EnrichmentProgress {
        location: String,
        current: usize,
        total: usize,
        eta: Eta,
        record: EnrichedRecord,
        outcome: RecordOutcome,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    LocationCompleted {
        location: String,
        discovered: usize,
        enriched: usize,
        new_unique: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// Terminal success: the deduplicated aggregate in output order
    RunComplete {
        records: Vec<EnrichedRecord>,
        locations: usize,
        elapsed: Duration,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// Terminal failure
    RunError {
        phase: ScrapePhase,
        cause: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Helper functions for creating events
impl ScrapeEvent {
    #[must_use]
    pub fn run_started(keyword: String, locations: Vec<String>) -> Self {
        Self::RunStarted {
            keyword,
            locations,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn location_started(
        location: String,
        index: usize,
        total: usize,
        leads_so_far: usize,
    ) -> Self {
        Self::LocationStarted {
            location,
            index,
            total,
            leads_so_far,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn discovery_progress(
        location: String,
        count: usize,
        cap: usize,
        candidate: CandidateRecord,
    ) -> Self {
        Self::DiscoveryProgress {
            location,
            count,
            cap,
            candidate,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn discovery_exhausted(location: String, count: usize, cap: usize) -> Self {
        Self::DiscoveryExhausted {
            location,
            count,
            cap,
            source_limited: count < cap,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn location_skipped(location: String, reason: String) -> Self {
        Self::LocationSkipped {
            location,
            reason,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn enrichment_started(location: String, total: usize) -> Self {
        Self::EnrichmentStarted {
            location,
            total,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn enrichment_batch_started(
        location: String,
        batch_index: usize,
        batch_count: usize,
        size: usize,
    ) -> Self {
        Self::EnrichmentBatchStarted {
            location,
            batch_index,
            batch_count,
            size,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn enrichment_progress(
        location: String,
        current: usize,
        total: usize,
        eta: Eta,
        record: EnrichedRecord,
        outcome: RecordOutcome,
    ) -> Self {
        Self::EnrichmentProgress {
            location,
            current,
            total,
            eta,
            record,
            outcome,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn location_completed(
        location: String,
        discovered: usize,
        enriched: usize,
        new_unique: usize,
    ) -> Self {
        Self::LocationCompleted {
            location,
            discovered,
            enriched,
            new_unique,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn run_complete(records: Vec<EnrichedRecord>, locations: usize, elapsed: Duration) -> Self {
        Self::RunComplete {
            records,
            locations,
            elapsed,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn run_error(phase: ScrapePhase, cause: String) -> Self {
        Self::RunError {
            phase,
            cause,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Whether this event ends the stream
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::RunComplete { .. } | Self::RunError { .. })
    }

    #[must_use]
    pub fn timestamp(&self) -> chrono::DateTime<chrono::Utc> {
        match self {
            Self::RunStarted { timestamp, .. }
            | Self::LocationStarted { timestamp, .. }
            | Self::DiscoveryProgress { timestamp, .. }
            | Self::DiscoveryExhausted { timestamp, .. }
            | Self::LocationSkipped { timestamp, .. }
            | Self::EnrichmentStarted { timestamp, .. }
            | Self::EnrichmentBatchStarted { timestamp, .. }
            | Self::EnrichmentProgress { timestamp, .. }
            | Self::LocationCompleted { timestamp, .. }
            | Self::RunComplete { timestamp, .. }
            | Self::RunError { timestamp, .. } => *timestamp,
        }
    }
}
