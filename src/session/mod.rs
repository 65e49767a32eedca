//! Browser session abstraction consumed by the scrape engine.
//!
//! Defines the `SessionProvider`, `Session` and `Element` traits that abstract
//! over the browser engine (Chromium via chromiumoxide in production, scripted
//! fakes in tests).

pub mod chromium;
pub mod errors;

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

pub use chromium::ChromiumProvider;
pub use errors::SessionError;

/// How to find an element on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    Css(&'a str),
    XPath(&'a str),
}

impl fmt::Display for Locator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css:{s}"),
            Self::XPath(s) => write!(f, "xpath:{s}"),
        }
    }
}

/// Opens browser sessions. Each session is exclusively owned by its caller.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Open a fresh session with its own browser state.
    async fn open_session(&self, headless: bool) -> Result<Box<dyn Session>, SessionError>;
}

/// A single browser session (one tab in one browser process).
#[async_trait]
pub trait Session: Send {
    /// Load `url` in the session's page.
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// Wait until any of `selectors` matches, failing with
    /// [`SessionError::Timeout`] once `timeout` elapses.
    async fn wait_for_any(&mut self, selectors: &[&str], timeout: Duration)
    -> Result<(), SessionError>;

    /// All matching elements in document order (empty when none match).
    async fn query_all(&mut self, locator: Locator<'_>)
    -> Result<Vec<Box<dyn Element>>, SessionError>;

    /// First matching element, or [`SessionError::NotFound`].
    async fn query_one(&mut self, locator: Locator<'_>) -> Result<Box<dyn Element>, SessionError>;

    /// Scroll the container matched by `container` to its end.
    async fn scroll_to_end(&mut self, container: &str) -> Result<(), SessionError>;

    /// Tear the session down. Dropping without calling this still releases
    /// the browser, but without waiting for it to exit.
    async fn close(self: Box<Self>) -> Result<(), SessionError>;
}

/// A handle to an element found in a session's page.
#[async_trait]
pub trait Element: Send + Sync {
    /// Rendered text content (empty when the element has none).
    async fn text(&self) -> Result<String, SessionError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError>;

    /// First descendant matching `css`, or [`SessionError::NotFound`].
    async fn query_one(&self, css: &str) -> Result<Box<dyn Element>, SessionError>;
}
