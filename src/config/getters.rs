//! Getter and validation methods for `ScrapeConfig`

use std::path::Path;
use std::time::Duration;

use super::types::{ConfigError, Pacing, ScrapeConfig};

impl ScrapeConfig {
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Locations that will actually be searched: trimmed, blanks removed
    pub fn search_locations(&self) -> impl Iterator<Item = &str> {
        self.locations
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
    }

    #[must_use]
    pub fn max_results_per_location(&self) -> usize {
        self.max_results_per_location
    }

    #[must_use]
    pub fn max_details_per_location(&self) -> usize {
        self.max_details_per_location
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn feed_wait_timeout(&self) -> Duration {
        self.feed_wait_timeout
    }

    #[must_use]
    pub fn detail_wait_timeout(&self) -> Duration {
        self.detail_wait_timeout
    }

    #[must_use]
    pub fn scroll_pacing(&self) -> Pacing {
        self.scroll_pacing
    }

    #[must_use]
    pub fn record_pacing(&self) -> Pacing {
        self.record_pacing
    }

    #[must_use]
    pub fn batch_pacing(&self) -> Pacing {
        self.batch_pacing
    }

    #[must_use]
    pub fn event_buffer(&self) -> usize {
        self.event_buffer
    }

    #[must_use]
    pub fn eta_min_sample(&self) -> Duration {
        self.eta_min_sample
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&Path> {
        self.chrome_executable.as_deref()
    }

    /// Check every configuration constraint.
    ///
    /// The builder calls this, and so does the run itself, since a config can
    /// also arrive through deserialization.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keyword.trim().is_empty() {
            return Err(ConfigError::EmptyKeyword);
        }
        if self.search_locations().next().is_none() {
            return Err(ConfigError::NoLocations);
        }

        let positives = [
            ("max_results_per_location", self.max_results_per_location),
            ("max_details_per_location", self.max_details_per_location),
            ("batch_size", self.batch_size),
            ("event_buffer", self.event_buffer),
        ];
        if let Some((field, _)) = positives.into_iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ZeroValue { field });
        }

        let pacings = [
            ("scroll_pacing", self.scroll_pacing),
            ("record_pacing", self.record_pacing),
            ("batch_pacing", self.batch_pacing),
        ];
        for (field, pacing) in pacings {
            if pacing.jitter_min > pacing.jitter_max {
                return Err(ConfigError::InvertedPacing {
                    field,
                    min: pacing.jitter_min,
                    max: pacing.jitter_max,
                });
            }
        }

        Ok(())
    }
}
