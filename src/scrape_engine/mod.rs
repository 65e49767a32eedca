//! Two-phase scrape engine
//!
//! Phase 1 discovers candidate listings from the results feed; phase 2
//! enriches them from their detail pages in paced, session-isolated batches.
//! The orchestrator runs both per location and aggregates across locations.

pub mod batch;
pub mod discovery;
pub mod enrichment;
pub mod eta;
pub mod extractors;
pub mod orchestrator;
pub mod pacing;
pub mod page_timeout;
pub mod types;

pub use discovery::{DiscoveryOutcome, DiscoveryStatus, FeedDiscovery};
pub use eta::{ThroughputTracker, seconds_to_human};
pub use orchestrator::{run_scrape, scrape, scrape_location};
pub use types::{FieldOutcome, LocationOutcome, RecordOutcome, ScrapeError, ScrapePhase};
