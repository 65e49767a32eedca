//! Scrape event stream
//!
//! Lifecycle events flow from the run to its consumer over a bounded channel.
//! The consumer decides how (or whether) to render them.

pub mod emitter;
pub mod types;

pub use emitter::{EventEmitter, ScrapeStream};
pub use types::{Eta, ScrapeEvent};
