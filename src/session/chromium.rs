//! Chromium-backed sessions via chromiumoxide.
//!
//! Every session owns its own browser process and temporary profile, so a
//! session that hangs or gets throttled takes nothing else down with it.

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::element::Element as CdpElement;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Element, Locator, Session, SessionError, SessionProvider};
use crate::browser_setup::{launch_browser, resolve_browser_executable};
use crate::utils::constants::WAIT_POLL_INTERVAL;

// =============================================================================
// Error classification
// =============================================================================

/// Messages that mean the browser or its page is gone
const DISCONNECT_MARKERS: &[&str] = &[
    "browser closed",
    "browser disconnected",
    "page closed",
    "target closed",
    "session closed",
    "session not found",
    "no response from the chromium instance",
    "channel",
    "websocket",
];

const NOT_FOUND_MARKERS: &[&str] = &["not found", "could not find node", "no node"];

fn classify(err: &CdpError, target: &str) -> SessionError {
    classify_message(err.to_string(), target)
}

fn classify_message(msg: String, target: &str) -> SessionError {
    let lower = msg.to_lowercase();

    if DISCONNECT_MARKERS.iter().any(|m| lower.contains(m)) {
        SessionError::Disconnected(msg)
    } else if NOT_FOUND_MARKERS.iter().any(|m| lower.contains(m)) {
        SessionError::NotFound(target.to_string())
    } else {
        SessionError::Browser(msg)
    }
}

// =============================================================================
// Browser ownership
// =============================================================================

/// Wrapper for Browser and its event handler task
///
/// Ensures handler is aborted and the profile directory removed however the
/// session ends.
struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    /// Remove the profile directory.
    ///
    /// Must run after the browser exits so every file handle is released.
    /// Blocking, since it also runs from `Drop`.
    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }

    async fn shutdown(&mut self) -> Result<(), SessionError> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| SessionError::Browser(e.to_string()));
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();
        self.cleanup_temp_dir();
        closed
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser::drop kills the Chrome process

        if self.user_data_dir.is_some() {
            debug!("BrowserWrapper dropped without explicit close - removing temp dir in Drop");
            self.cleanup_temp_dir();
        }
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Opens one Chromium process per session
pub struct ChromiumProvider {
    chrome_override: Option<PathBuf>,
    executable: OnceCell<PathBuf>,
}

impl ChromiumProvider {
    #[must_use]
    pub fn new(chrome_override: Option<PathBuf>) -> Self {
        Self {
            chrome_override,
            executable: OnceCell::new(),
        }
    }

    async fn executable(&self) -> Result<&PathBuf, SessionError> {
        self.executable
            .get_or_try_init(|| async {
                resolve_browser_executable(self.chrome_override.as_deref())
                    .await
                    .map_err(|e| SessionError::Launch(format!("{e:#}")))
            })
            .await
    }
}

impl Default for ChromiumProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl SessionProvider for ChromiumProvider {
    async fn open_session(&self, headless: bool) -> Result<Box<dyn Session>, SessionError> {
        let executable = self.executable().await?;
        let user_data_dir = std::env::temp_dir().join(format!("leadscrape_chrome_{}", Uuid::new_v4()));

        let (browser, handler) = launch_browser(executable, headless, &user_data_dir)
            .await
            .map_err(|e| {
                // Launch may have created the directory before failing
                let _ = std::fs::remove_dir_all(&user_data_dir);
                SessionError::Launch(format!("{e:#}"))
            })?;

        let mut wrapper = BrowserWrapper {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        };

        let page = match wrapper.browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = wrapper.shutdown().await;
                return Err(SessionError::Launch(format!("failed to open page: {e}")));
            }
        };

        info!(headless, "Browser session opened");
        Ok(Box::new(ChromiumSession {
            page: Some(page),
            browser: wrapper,
        }))
    }
}

// =============================================================================
// Session
// =============================================================================

pub struct ChromiumSession {
    page: Option<Page>,
    browser: BrowserWrapper,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, SessionError> {
        self.page
            .as_ref()
            .ok_or_else(|| SessionError::Disconnected("page already closed".to_string()))
    }
}

#[async_trait]
impl Session for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        let page = self.page()?;
        let navigation_error = |e: CdpError| match classify(&e, url) {
            fatal @ SessionError::Disconnected(_) => fatal,
            _ => SessionError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            },
        };

        page.goto(url).await.map_err(navigation_error)?;
        page.wait_for_navigation().await.map_err(navigation_error)?;
        debug!("Navigated to {}", url);
        Ok(())
    }

    async fn wait_for_any(
        &mut self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let page = self.page()?;
        let start = Instant::now();

        loop {
            for selector in selectors {
                match page.find_element(*selector).await {
                    Ok(_) => {
                        debug!("'{}' appeared after {:?}", selector, start.elapsed());
                        return Ok(());
                    }
                    Err(e) => {
                        let err = classify(&e, selector);
                        if err.is_fatal() {
                            return Err(err);
                        }
                    }
                }
            }

            if start.elapsed() >= timeout {
                return Err(SessionError::timeout(selectors, timeout));
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    async fn query_all(
        &mut self,
        locator: Locator<'_>,
    ) -> Result<Vec<Box<dyn Element>>, SessionError> {
        let page = self.page()?;
        let found = match locator {
            Locator::Css(css) => page.find_elements(css).await,
            Locator::XPath(xpath) => page.find_xpaths(xpath).await,
        };

        match found {
            Ok(elements) => Ok(elements
                .into_iter()
                .map(|e| Box::new(ChromiumElement(e)) as Box<dyn Element>)
                .collect()),
            Err(e) => match classify(&e, &locator.to_string()) {
                SessionError::NotFound(_) => Ok(Vec::new()),
                other => Err(other),
            },
        }
    }

    async fn query_one(&mut self, locator: Locator<'_>) -> Result<Box<dyn Element>, SessionError> {
        let page = self.page()?;
        let found = match locator {
            Locator::Css(css) => page.find_element(css).await,
            Locator::XPath(xpath) => page.find_xpath(xpath).await,
        };

        found
            .map(|e| Box::new(ChromiumElement(e)) as Box<dyn Element>)
            .map_err(|e| classify(&e, &locator.to_string()))
    }

    async fn scroll_to_end(&mut self, container: &str) -> Result<(), SessionError> {
        let page = self.page()?;
        let selector =
            serde_json::to_string(container).map_err(|e| SessionError::Script(e.to_string()))?;
        let script = format!(
            "(() => {{ const el = document.querySelector({selector}); \
             if (!el) return false; el.scrollTop = el.scrollHeight; return true; }})()"
        );

        let scrolled: bool = page
            .evaluate(script.as_str())
            .await
            .map_err(|e| match classify(&e, container) {
                fatal @ SessionError::Disconnected(_) => fatal,
                _ => SessionError::Script(e.to_string()),
            })?
            .into_value()
            .map_err(|e| SessionError::Script(e.to_string()))?;

        if scrolled {
            Ok(())
        } else {
            Err(SessionError::NotFound(container.to_string()))
        }
    }

    async fn close(mut self: Box<Self>) -> Result<(), SessionError> {
        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            debug!("Closing page failed: {}", e);
        }
        let result = self.browser.shutdown().await;
        info!("Browser session closed");
        result
    }
}

// =============================================================================
// Element
// =============================================================================

struct ChromiumElement(CdpElement);

#[async_trait]
impl Element for ChromiumElement {
    async fn text(&self) -> Result<String, SessionError> {
        self.0
            .inner_text()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| classify(&e, "innerText"))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        self.0
            .attribute(name)
            .await
            .map_err(|e| classify(&e, name))
    }

    async fn query_one(&self, css: &str) -> Result<Box<dyn Element>, SessionError> {
        self.0
            .find_element(css)
            .await
            .map(|e| Box::new(ChromiumElement(e)) as Box<dyn Element>)
            .map_err(|e| classify(&e, css))
    }
}
