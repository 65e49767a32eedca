//! Core configuration types for a scrape run
//!
//! This module contains the `ScrapeConfig` struct, the `Pacing` policy used
//! for every deliberate delay, and the `ConfigError` raised by validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A randomized delay policy: `base + U[jitter_min, jitter_max)`.
///
/// Pacing is rate limiting toward the source. The engine never shortens it;
/// only configuration can (tests use [`Pacing::none`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    pub base: Duration,
    pub jitter_min: Duration,
    pub jitter_max: Duration,
}

impl Pacing {
    #[must_use]
    pub const fn new(base: Duration, jitter: (Duration, Duration)) -> Self {
        Self {
            base,
            jitter_min: jitter.0,
            jitter_max: jitter.1,
        }
    }

    /// No delay at all
    #[must_use]
    pub const fn none() -> Self {
        Self {
            base: Duration::ZERO,
            jitter_min: Duration::ZERO,
            jitter_max: Duration::ZERO,
        }
    }

    /// Fixed delay with no jitter
    #[must_use]
    pub const fn fixed(base: Duration) -> Self {
        Self {
            base,
            jitter_min: Duration::ZERO,
            jitter_max: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.base.is_zero() && self.jitter_max.is_zero()
    }
}

/// Main configuration struct for a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub(crate) keyword: String,

    /// Search locations, processed in order. Blank entries are skipped.
    pub(crate) locations: Vec<String>,

    /// Cap on candidates discovered per location
    pub(crate) max_results_per_location: usize,

    /// Cap on records enriched per location; the effective cap is the minimum
    /// of this and the discovered count
    pub(crate) max_details_per_location: usize,

    pub(crate) headless: bool,

    /// Records enriched under one session before it is released
    pub(crate) batch_size: usize,

    /// Bound on waiting for the results feed to render
    pub(crate) feed_wait_timeout: Duration,

    /// Bound on waiting for a detail page load signal
    pub(crate) detail_wait_timeout: Duration,

    /// Delay between feed scroll passes
    pub(crate) scroll_pacing: Pacing,

    /// Settle delay after each detail page signals readiness
    pub(crate) record_pacing: Pacing,

    /// Delay between batches and between locations
    pub(crate) batch_pacing: Pacing,

    /// Capacity of the event channel to the consumer
    pub(crate) event_buffer: usize,

    /// Minimum interval a throughput sample must span to count toward the ETA
    pub(crate) eta_min_sample: Duration,

    /// Explicit browser executable; discovered automatically when unset
    pub(crate) chrome_executable: Option<PathBuf>,
}

/// Configuration violations, surfaced as a run-level error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error("at least one non-blank location is required")]
    NoLocations,

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("{field} jitter bounds are inverted ({min:?} > {max:?})")]
    InvertedPacing {
        field: &'static str,
        min: Duration,
        max: Duration,
    },
}
