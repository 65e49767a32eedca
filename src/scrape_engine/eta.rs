//! Throughput tracking and human-readable durations
//!
//! The estimate is advisory only; nothing in the run waits on it.

use std::time::{Duration, Instant};

use crate::scrape_events::Eta;

/// Render seconds as `N sec`, `M min S sec` or `H h M min S sec`.
///
/// Negative input means no estimate exists yet.
///
/// ```
/// # use leadscrape::scrape_engine::eta::seconds_to_human;
/// assert_eq!(seconds_to_human(42.9), "42 sec");
/// assert_eq!(seconds_to_human(125.0), "2 min 5 sec");
/// assert_eq!(seconds_to_human(3725.0), "1 h 2 min 5 sec");
/// assert_eq!(seconds_to_human(-1.0), "calculating...");
/// ```
#[must_use]
pub fn seconds_to_human(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "calculating...".to_string();
    }
    let total = seconds as u64;
    if total < 60 {
        return format!("{total} sec");
    }
    if total < 3600 {
        return format!("{} min {} sec", total / 60, total % 60);
    }
    format!(
        "{} h {} min {} sec",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Tracks items processed over time within one phase.
///
/// The rate comes from the latest sample spanning at least `min_sample`;
/// until one exists the estimate is [`Eta::Calculating`].
#[derive(Debug, Clone)]
pub struct ThroughputTracker {
    total: usize,
    processed: usize,
    min_sample: Duration,
    last_sample: (Instant, usize),
    rate: Option<f64>,
}

impl ThroughputTracker {
    #[must_use]
    pub fn new(total: usize, min_sample: Duration) -> Self {
        Self::starting_at(total, min_sample, Instant::now())
    }

    fn starting_at(total: usize, min_sample: Duration, now: Instant) -> Self {
        Self {
            total,
            processed: 0,
            min_sample,
            last_sample: (now, 0),
            rate: None,
        }
    }

    /// Count one processed item
    pub fn record(&mut self) {
        self.processed = (self.processed + 1).min(self.total);
    }

    #[must_use]
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Take a throughput sample (called at batch boundaries)
    pub fn sample(&mut self) {
        self.sample_at(Instant::now());
    }

    fn sample_at(&mut self, now: Instant) {
        let (since, processed_then) = self.last_sample;
        let elapsed = now.saturating_duration_since(since);
        let items = self.processed.saturating_sub(processed_then);

        if elapsed < self.min_sample || elapsed.is_zero() || items == 0 {
            return;
        }
        self.rate = Some(items as f64 / elapsed.as_secs_f64());
        self.last_sample = (now, self.processed);
    }

    /// `remaining / rate`, or `Calculating` without a sample
    #[must_use]
    pub fn eta(&self) -> Eta {
        match self.rate {
            Some(rate) if rate > 0.0 => {
                let remaining = self.total.saturating_sub(self.processed) as f64;
                Eta::Remaining(Duration::from_secs_f64(remaining / rate))
            }
            _ => Eta::Calculating,
        }
    }
}
