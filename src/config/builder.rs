//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time checking
//! that the keyword and locations are set before building a `ScrapeConfig`.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::{
    BATCH_PACING_BASE, BATCH_PACING_JITTER, DEFAULT_BATCH_SIZE, DEFAULT_DETAIL_WAIT_TIMEOUT,
    DEFAULT_ETA_MIN_SAMPLE, DEFAULT_EVENT_BUFFER, DEFAULT_FEED_WAIT_TIMEOUT, DEFAULT_MAX_DETAILS,
    DEFAULT_MAX_RESULTS, RECORD_PACING_BASE, RECORD_PACING_JITTER, SCROLL_PACING_BASE,
    SCROLL_PACING_JITTER,
};

use super::types::{ConfigError, Pacing, ScrapeConfig};

// Type states for the builder
pub struct WithKeyword;
pub struct Complete;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) keyword: Option<String>,
    pub(crate) locations: Vec<String>,
    pub(crate) max_results_per_location: usize,
    pub(crate) max_details_per_location: usize,
    pub(crate) headless: bool,
    pub(crate) batch_size: usize,
    pub(crate) feed_wait_timeout: Duration,
    pub(crate) detail_wait_timeout: Duration,
    pub(crate) scroll_pacing: Pacing,
    pub(crate) record_pacing: Pacing,
    pub(crate) batch_pacing: Pacing,
    pub(crate) event_buffer: usize,
    pub(crate) eta_min_sample: Duration,
    pub(crate) chrome_executable: Option<PathBuf>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            keyword: None,
            locations: Vec::new(),
            max_results_per_location: DEFAULT_MAX_RESULTS,
            max_details_per_location: DEFAULT_MAX_DETAILS,
            headless: true,
            batch_size: DEFAULT_BATCH_SIZE,
            feed_wait_timeout: DEFAULT_FEED_WAIT_TIMEOUT,
            detail_wait_timeout: DEFAULT_DETAIL_WAIT_TIMEOUT,
            scroll_pacing: Pacing::new(SCROLL_PACING_BASE, SCROLL_PACING_JITTER),
            record_pacing: Pacing::new(RECORD_PACING_BASE, RECORD_PACING_JITTER),
            batch_pacing: Pacing::new(BATCH_PACING_BASE, BATCH_PACING_JITTER),
            event_buffer: DEFAULT_EVENT_BUFFER,
            eta_min_sample: DEFAULT_ETA_MIN_SAMPLE,
            chrome_executable: None,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl<State> ScrapeConfigBuilder<State> {
    /// Move every field into a builder of the next state
    fn into_state<Next>(self) -> ScrapeConfigBuilder<Next> {
        ScrapeConfigBuilder {
            keyword: self.keyword,
            locations: self.locations,
            max_results_per_location: self.max_results_per_location,
            max_details_per_location: self.max_details_per_location,
            headless: self.headless,
            batch_size: self.batch_size,
            feed_wait_timeout: self.feed_wait_timeout,
            detail_wait_timeout: self.detail_wait_timeout,
            scroll_pacing: self.scroll_pacing,
            record_pacing: self.record_pacing,
            batch_pacing: self.batch_pacing,
            event_buffer: self.event_buffer,
            eta_min_sample: self.eta_min_sample,
            chrome_executable: self.chrome_executable,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn keyword(self, keyword: impl Into<String>) -> ScrapeConfigBuilder<WithKeyword> {
        let mut next = self.into_state::<WithKeyword>();
        next.keyword = Some(keyword.into().trim().to_string());
        next
    }
}

impl ScrapeConfigBuilder<WithKeyword> {
    /// Set the ordered search locations.
    ///
    /// Entries are trimmed and blank ones dropped. Duplicates are kept; each
    /// is searched again and the aggregate deduplicates the results.
    pub fn locations<I, S>(self, locations: I) -> ScrapeConfigBuilder<Complete>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next = self.into_state::<Complete>();
        next.locations = locations
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        next
    }

    /// Single-location convenience for [`Self::locations`]
    pub fn location(self, location: impl AsRef<str>) -> ScrapeConfigBuilder<Complete> {
        self.locations([location])
    }
}

// Build method only available when all required fields are set
impl ScrapeConfigBuilder<Complete> {
    /// Finish the builder, validating the assembled configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a blank keyword, no usable location,
    /// a zero cap or batch size, or inverted pacing bounds.
    pub fn build(self) -> Result<ScrapeConfig, ConfigError> {
        let config = ScrapeConfig {
            keyword: self.keyword.unwrap_or_default(),
            locations: self.locations,
            max_results_per_location: self.max_results_per_location,
            max_details_per_location: self.max_details_per_location,
            headless: self.headless,
            batch_size: self.batch_size,
            feed_wait_timeout: self.feed_wait_timeout,
            detail_wait_timeout: self.detail_wait_timeout,
            scroll_pacing: self.scroll_pacing,
            record_pacing: self.record_pacing,
            batch_pacing: self.batch_pacing,
            event_buffer: self.event_buffer,
            eta_min_sample: self.eta_min_sample,
            chrome_executable: self.chrome_executable,
        };
        config.validate()?;
        Ok(config)
    }
}
