//! Error types for the session capability boundary

use std::time::Duration;
use thiserror::Error;

/// Failures reported by a [`Session`](super::Session) or its elements
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("failed to open browser session: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {timeout:?} waiting for {selectors:?}")]
    Timeout {
        selectors: Vec<String>,
        timeout: Duration,
    },

    #[error("no element matches {0}")]
    NotFound(String),

    #[error("browser session disconnected: {0}")]
    Disconnected(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("browser error: {0}")]
    Browser(String),
}

impl SessionError {
    pub fn timeout(selectors: &[&str], timeout: Duration) -> Self {
        Self::Timeout {
            selectors: selectors.iter().map(ToString::to_string).collect(),
            timeout,
        }
    }

    /// Whether the session that produced this error is no longer usable.
    ///
    /// A fatal error ends the current batch; the scheduler opens a fresh
    /// session for the next one.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Launch(_) | Self::Disconnected(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_launch_and_disconnect_are_fatal() {
        assert!(SessionError::Disconnected("ws closed".into()).is_fatal());
        assert!(SessionError::Launch("no chrome".into()).is_fatal());
        assert!(!SessionError::NotFound(".x".into()).is_fatal());
        assert!(!SessionError::timeout(&["a"], Duration::from_secs(1)).is_fatal());
        assert!(!SessionError::Script("boom".into()).is_fatal());
    }

    #[test]
    fn timeout_message_names_selectors() {
        let err = SessionError::timeout(&["#a", "#b"], Duration::from_secs(2));
        let msg = err.to_string();
        assert!(msg.contains("#a") && msg.contains("#b"), "{msg}");
    }
}
