pub mod browser_setup;
pub mod config;
pub mod export;
pub mod records;
pub mod scrape_engine;
pub mod scrape_events;
pub mod session;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ConfigError, Pacing, ScrapeConfig};
pub use export::{ExportError, save_csv, write_csv};
pub use records::{CandidateRecord, DetailField, EnrichedRecord, FieldValue, RecordSet};
pub use scrape_engine::{
    FieldOutcome, LocationOutcome, RecordOutcome, ScrapeError, ScrapePhase, run_scrape,
    scrape as scrape_with,
};
pub use scrape_events::{Eta, EventEmitter, ScrapeEvent, ScrapeStream};
pub use session::{ChromiumProvider, Element, Locator, Session, SessionError, SessionProvider};
pub use utils::clean_text;

/// Scrape with Chromium sessions.
///
/// Must be called from within a tokio runtime. See [`scrape_with`] to supply
/// a different session provider.
#[must_use]
pub fn scrape(config: ScrapeConfig) -> ScrapeStream {
    let provider = ChromiumProvider::new(config.chrome_executable().map(ToOwned::to_owned));
    scrape_engine::scrape(provider, config)
}
