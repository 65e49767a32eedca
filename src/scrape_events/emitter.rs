//! Bounded event channel between a run and its consumer
//!
//! Every emit awaits channel capacity, so the producer never runs more than
//! the buffer size ahead of the consumer. Once the consumer drops its stream,
//! emits fail with [`ScrapeError::Cancelled`].

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::trace;

use super::types::ScrapeEvent;
use crate::scrape_engine::types::ScrapeError;

/// Stream of events for one run. Dropping it cancels the run.
pub type ScrapeStream = ReceiverStream<ScrapeEvent>;

/// Producer half of the event channel
#[derive(Debug, Clone)]
pub struct EventEmitter {
    tx: mpsc::Sender<ScrapeEvent>,
}

impl EventEmitter {
    /// Create a connected emitter/stream pair.
    ///
    /// `capacity` is clamped to at least one.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, ScrapeStream) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, ReceiverStream::new(rx))
    }

    /// Send an event, waiting for capacity
    pub async fn emit(&self, event: ScrapeEvent) -> Result<(), ScrapeError> {
        trace!(?event, "emit");
        self.tx.send(event).await.map_err(|_| ScrapeError::Cancelled)
    }

    /// Fail fast if the consumer is gone, before starting browser work
    pub fn ensure_open(&self) -> Result<(), ScrapeError> {
        if self.tx.is_closed() {
            Err(ScrapeError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once the consumer has dropped its stream
    pub async fn closed(&self) {
        self.tx.closed().await;
    }
}
