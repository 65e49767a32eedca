//! Randomized pacing between source requests
//!
//! Each delay is `base + U[jitter_min, jitter_max)`. Sleeps end early only when
//! the consumer goes away, in which case the run is cancelled.

use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::config::Pacing;
use crate::scrape_events::EventEmitter;

use super::types::ScrapeError;

/// Draw one delay from the pacing policy
#[must_use]
pub fn sample_delay(pacing: Pacing) -> Duration {
    let jitter = if pacing.jitter_max > pacing.jitter_min {
        let min = pacing.jitter_min.as_millis() as u64;
        let max = pacing.jitter_max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min..max))
    } else {
        pacing.jitter_min
    };
    pacing.base + jitter
}

/// Sleep for one paced interval, aborting if the consumer disconnects
pub async fn pace(pacing: Pacing, emitter: &EventEmitter, what: &str) -> Result<(), ScrapeError> {
    if pacing.is_zero() {
        return emitter.ensure_open();
    }

    let delay = sample_delay(pacing);
    debug!("Pacing {} for {:?}", what, delay);
    tokio::select! {
        () = tokio::time::sleep(delay) => Ok(()),
        () = emitter.closed() => Err(ScrapeError::Cancelled),
    }
}
