//! Builder methods available for all states
//!
//! This module contains methods that can be called on the builder
//! regardless of its current type state.

use std::path::PathBuf;
use std::time::Duration;

use super::builder::ScrapeConfigBuilder;
use super::types::Pacing;

impl<State> ScrapeConfigBuilder<State> {
    #[must_use]
    pub fn max_results_per_location(mut self, max: usize) -> Self {
        self.max_results_per_location = max;
        self
    }

    /// Cap on enriched records per location.
    ///
    /// May exceed the discovered count; enrichment processes
    /// `min(max_details, discovered)` records.
    #[must_use]
    pub fn max_details_per_location(mut self, max: usize) -> Self {
        self.max_details_per_location = max;
        self
    }

    /// Set browser headless mode (visible vs invisible browser window)
    ///
    /// Headless is the default. A visible window is useful when selectors
    /// stop matching and the page needs to be inspected by eye.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    #[must_use]
    pub fn feed_wait_timeout(mut self, timeout: Duration) -> Self {
        self.feed_wait_timeout = timeout;
        self
    }

    #[must_use]
    pub fn detail_wait_timeout(mut self, timeout: Duration) -> Self {
        self.detail_wait_timeout = timeout;
        self
    }

    #[must_use]
    pub fn scroll_pacing(mut self, pacing: Pacing) -> Self {
        self.scroll_pacing = pacing;
        self
    }

    #[must_use]
    pub fn record_pacing(mut self, pacing: Pacing) -> Self {
        self.record_pacing = pacing;
        self
    }

    #[must_use]
    pub fn batch_pacing(mut self, pacing: Pacing) -> Self {
        self.batch_pacing = pacing;
        self
    }

    /// Disable every pacing delay.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use leadscrape::config::ScrapeConfig;
    /// # fn main() -> Result<(), leadscrape::config::ConfigError> {
    /// let config = ScrapeConfig::builder()
    ///     .keyword("dentist")
    ///     .location("DHA Lahore")
    ///     .without_pacing()
    ///     .build()?;
    /// assert!(config.batch_pacing().is_zero());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn without_pacing(mut self) -> Self {
        self.scroll_pacing = Pacing::none();
        self.record_pacing = Pacing::none();
        self.batch_pacing = Pacing::none();
        self
    }

    #[must_use]
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    #[must_use]
    pub fn eta_min_sample(mut self, interval: Duration) -> Self {
        self.eta_min_sample = interval;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }
}
