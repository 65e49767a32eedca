//! Core types for the scrape engine
//!
//! Typed outcomes for every failure boundary (field, record, location) and
//! the run-level error.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::scrape_events::EventEmitter;
use crate::session::SessionError;

/// Result of reading one detail field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldOutcome {
    Extracted(String),
    /// Nothing matched, or the match held no usable value
    Missing,
    /// The read itself failed
    Failed(String),
}

impl FieldOutcome {
    /// Map an element lookup failure to a field outcome.
    ///
    /// A not-found is an ordinary miss; anything else is a failure. Fatal
    /// session errors are returned so the caller can end the record.
    pub(crate) fn from_error(err: SessionError) -> Result<Self, SessionError> {
        if err.is_fatal() {
            Err(err)
        } else if err.is_not_found() {
            Ok(Self::Missing)
        } else {
            Ok(Self::Failed(err.to_string()))
        }
    }

    /// Treat empty values as a miss
    pub(crate) fn from_value(value: String) -> Self {
        if value.trim().is_empty() {
            Self::Missing
        } else {
            Self::Extracted(value)
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Extracted(v) => Some(v),
            Self::Missing | Self::Failed(_) => None,
        }
    }
}

/// How a single record's enrichment pass ended. Every variant counts as
/// processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOutcome {
    /// The page loaded; `fields` detail fields were populated
    Enriched { fields: usize },
    /// The page never signalled readiness
    PageLoadTimeout,
    /// The session became unusable before or during this record
    SessionLost(String),
    /// Any other record-level failure
    Failed(String),
}

impl RecordOutcome {
    #[must_use]
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::SessionLost(_))
    }
}

/// How a single location ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationOutcome {
    Completed { discovered: usize, enriched: usize },
    Skipped { reason: String },
}

/// Which part of the run a run-level error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrapePhase {
    Configuration,
    Session,
}

impl std::fmt::Display for ScrapePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Session => "session",
        };
        f.write_str(name)
    }
}

/// Why a run of browser reads stopped before finishing
#[derive(Debug)]
pub enum Interrupted {
    /// The session became unusable; reads done before it are kept
    Session(SessionError),
    /// The consumer dropped its stream
    Cancelled,
}

impl Interrupted {
    /// Checked before every browser call inside a pass or an extraction
    pub fn unless_open(emitter: &EventEmitter) -> Result<(), Self> {
        emitter.ensure_open().map_err(|_| Self::Cancelled)
    }
}

impl From<SessionError> for Interrupted {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

/// Failures that end a run
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("could not acquire a browser session: {0}")]
    SessionUnavailable(#[source] SessionError),

    /// The event consumer stopped listening
    #[error("scrape cancelled by consumer")]
    Cancelled,
}

impl ScrapeError {
    #[must_use]
    pub fn phase(&self) -> ScrapePhase {
        match self {
            Self::Config(_) => ScrapePhase::Configuration,
            Self::SessionUnavailable(_) | Self::Cancelled => ScrapePhase::Session,
        }
    }
}
