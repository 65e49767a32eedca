//! Scripted browser sessions for the leadscrape test suite
//!
//! [`FakeSite`] stands in for the live source: feeds keyed by search URL,
//! detail pages keyed by place URL, and counters for everything the engine
//! does to it.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio_stream::StreamExt;

use leadscrape::session::{Element, Locator, Session, SessionError, SessionProvider};
use leadscrape::utils::{
    CARD_LINK_SELECTOR, CARD_NAME_SELECTOR, CARD_SELECTOR, FEED_SELECTOR, search_url,
};
use leadscrape::config::{Complete, ScrapeConfigBuilder};
use leadscrape::{EnrichedRecord, ScrapeConfig, ScrapeEvent, ScrapeStream};

// =============================================================================
// Page fixtures
// =============================================================================

/// A node in a fake page: text, attributes and named children
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    text: String,
    attrs: HashMap<String, String>,
    children: HashMap<String, FakeNode>,
}

impl FakeNode {
    fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }
}

/// One listing card in a results feed
#[derive(Debug, Clone)]
pub struct FakeCard {
    link: String,
    name: String,
    crashes: bool,
}

impl FakeCard {
    fn node(&self) -> FakeNode {
        let mut anchor = FakeNode::default();
        anchor.attrs.insert("href".into(), self.link.clone());
        let mut node = FakeNode::default();
        node.children.insert(CARD_LINK_SELECTOR.into(), anchor);
        node.children
            .insert(CARD_NAME_SELECTOR.into(), FakeNode::with_text(&self.name));
        node
    }
}

pub fn card(name: &str, link: &str) -> FakeCard {
    FakeCard {
        link: link.to_string(),
        name: name.to_string(),
        crashes: false,
    }
}

/// A card whose contents kill the browser when read
pub fn crashing_card(name: &str, link: &str) -> FakeCard {
    FakeCard {
        crashes: true,
        ..card(name, link)
    }
}

/// Place URL with embedded coordinates, unique per `n`
pub fn place_url(n: usize) -> String {
    format!("https://www.google.com/maps/place/Biz{n}/@31.5{n},74.3{n},15z/data=!3m1")
}

/// A results feed. Cards are revealed `per_scroll` at a time after the
/// first `visible` are rendered.
#[derive(Debug, Clone)]
pub struct FeedPage {
    cards: Vec<FakeCard>,
    visible: usize,
    per_scroll: usize,
    rendered: bool,
    scroll_disconnects: bool,
}

impl FeedPage {
    pub fn new(cards: impl IntoIterator<Item = FakeCard>) -> Self {
        let cards: Vec<_> = cards.into_iter().collect();
        Self {
            visible: cards.len(),
            cards,
            per_scroll: 0,
            rendered: true,
            scroll_disconnects: false,
        }
    }

    /// A search page that never renders its feed
    pub fn missing() -> Self {
        Self {
            cards: Vec::new(),
            visible: 0,
            per_scroll: 0,
            rendered: false,
            scroll_disconnects: false,
        }
    }

    pub fn revealing(mut self, visible: usize, per_scroll: usize) -> Self {
        self.visible = visible.min(self.cards.len());
        self.per_scroll = per_scroll;
        self
    }

    /// Scrolling the feed kills the browser
    pub fn crashing_on_scroll(mut self) -> Self {
        self.scroll_disconnects = true;
        self
    }
}

/// A place detail page
#[derive(Debug, Clone, Default)]
pub struct DetailPage {
    ready: bool,
    disconnects: bool,
    nodes: HashMap<String, FakeNode>,
}

impl DetailPage {
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    /// Never shows a load signal
    pub fn stalled() -> Self {
        Self::default()
    }

    /// Kills the browser on navigation
    pub fn crashing() -> Self {
        Self {
            disconnects: true,
            ..Self::default()
        }
    }

    pub fn text(mut self, selector: &str, text: &str) -> Self {
        self.nodes.entry(selector.to_string()).or_default().text = text.to_string();
        self
    }

    pub fn attr(mut self, selector: &str, name: &str, value: &str) -> Self {
        self.nodes
            .entry(selector.to_string())
            .or_default()
            .attrs
            .insert(name.to_string(), value.to_string());
        self
    }
}

// =============================================================================
// Site and counters
// =============================================================================

/// What the engine did to the site
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// `open_session` calls, failed ones included
    pub open_attempts: usize,
    pub opened: usize,
    pub closed: usize,
    pub navigations: Vec<String>,
    /// Card links, once per card whose contents were read
    pub cards_read: Vec<String>,
    /// Browser operations (other than close) started after `mark_cancelled`
    pub ops_after_cancel: usize,
}

#[derive(Debug, Default)]
struct SiteState {
    feeds: HashMap<String, FeedPage>,
    details: HashMap<String, DetailPage>,
    fail_open: bool,
    /// 1-based `open_session` attempts that fail
    fail_open_at: Vec<usize>,
    op_delay: Option<Duration>,
    cancelled: bool,
    stats: Stats,
}

/// Shared fake source; clones see the same state
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    state: Arc<Mutex<SiteState>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SiteState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_feed(self, keyword: &str, location: &str, feed: FeedPage) -> Self {
        self.lock().feeds.insert(search_url(keyword, location), feed);
        self
    }

    pub fn with_detail(self, url: &str, page: DetailPage) -> Self {
        self.lock().details.insert(url.to_string(), page);
        self
    }

    /// Every `open_session` fails
    pub fn failing_open(self) -> Self {
        self.lock().fail_open = true;
        self
    }

    /// Only the `attempt`-th `open_session` call fails (1-based)
    pub fn failing_open_at(self, attempt: usize) -> Self {
        self.lock().fail_open_at.push(attempt);
        self
    }

    /// Every browser operation sleeps for `delay` after it starts
    pub fn with_op_delay(self, delay: Duration) -> Self {
        self.lock().op_delay = Some(delay);
        self
    }

    pub fn mark_cancelled(&self) {
        self.lock().cancelled = true;
    }

    pub fn stats(&self) -> Stats {
        self.lock().stats.clone()
    }

    fn record_op(&self) {
        let mut state = self.lock();
        if state.cancelled {
            state.stats.ops_after_cancel += 1;
        }
    }

    /// Let other tasks run mid-operation, as a real browser call would
    async fn pause(&self) {
        let delay = self.lock().op_delay;
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
    }

    async fn begin_op(&self) {
        self.record_op();
        self.pause().await;
    }
}

#[async_trait]
impl SessionProvider for FakeSite {
    async fn open_session(&self, _headless: bool) -> Result<Box<dyn Session>, SessionError> {
        self.record_op();
        let mut state = self.lock();
        state.stats.open_attempts += 1;
        if state.fail_open {
            return Err(SessionError::Launch("no browser available".into()));
        }
        if state.fail_open_at.contains(&state.stats.open_attempts) {
            return Err(SessionError::Launch("transient launch failure".into()));
        }
        state.stats.opened += 1;
        Ok(Box::new(FakeSession {
            site: self.clone(),
            current: None,
            revealed: 0,
            disconnected: false,
        }))
    }
}

// =============================================================================
// Session and elements
// =============================================================================

struct FakeSession {
    site: FakeSite,
    current: Option<String>,
    revealed: usize,
    disconnected: bool,
}

impl FakeSession {
    async fn begin_op(&self) -> Result<(), SessionError> {
        self.site.begin_op().await;
        if self.disconnected {
            Err(SessionError::Disconnected("browser has exited".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.begin_op().await?;
        let mut state = self.site.lock();
        state.stats.navigations.push(url.to_string());

        if state.details.get(url).is_some_and(|d| d.disconnects) {
            self.disconnected = true;
            return Err(SessionError::Disconnected("target crashed".into()));
        }
        self.revealed = state.feeds.get(url).map_or(0, |f| f.visible);
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_any(
        &mut self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<(), SessionError> {
        self.begin_op().await?;
        let state = self.site.lock();
        let ready = self.current.as_deref().is_some_and(|url| {
            state
                .feeds
                .get(url)
                .is_some_and(|f| f.rendered && selectors.contains(&FEED_SELECTOR))
                || state.details.get(url).is_some_and(|d| d.ready)
        });
        if ready {
            Ok(())
        } else {
            Err(SessionError::timeout(selectors, timeout))
        }
    }

    async fn query_all(
        &mut self,
        locator: Locator<'_>,
    ) -> Result<Vec<Box<dyn Element>>, SessionError> {
        self.begin_op().await?;
        if locator != Locator::Css(CARD_SELECTOR) {
            return Ok(Vec::new());
        }
        let state = self.site.lock();
        let Some(feed) = self.current.as_deref().and_then(|url| state.feeds.get(url)) else {
            return Ok(Vec::new());
        };
        Ok(feed.cards[..self.revealed]
            .iter()
            .map(|c| {
                Box::new(FakeElement {
                    node: c.node(),
                    card: Some(c.link.clone()),
                    crashes: c.crashes,
                    site: self.site.clone(),
                }) as Box<dyn Element>
            })
            .collect())
    }

    async fn query_one(&mut self, locator: Locator<'_>) -> Result<Box<dyn Element>, SessionError> {
        self.begin_op().await?;
        let key = match locator {
            Locator::Css(s) | Locator::XPath(s) => s,
        };
        let state = self.site.lock();
        let node = self
            .current
            .as_deref()
            .and_then(|url| state.details.get(url))
            .and_then(|page| page.nodes.get(key))
            .cloned()
            .ok_or_else(|| SessionError::NotFound(key.to_string()))?;
        Ok(Box::new(FakeElement {
            node,
            card: None,
            crashes: false,
            site: self.site.clone(),
        }))
    }

    async fn scroll_to_end(&mut self, _container: &str) -> Result<(), SessionError> {
        self.begin_op().await?;
        let state = self.site.lock();
        if let Some(feed) = self.current.as_deref().and_then(|url| state.feeds.get(url)) {
            if feed.scroll_disconnects {
                self.disconnected = true;
                return Err(SessionError::Disconnected("renderer crashed".into()));
            }
            self.revealed = (self.revealed + feed.per_scroll).min(feed.cards.len());
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), SessionError> {
        self.site.lock().stats.closed += 1;
        Ok(())
    }
}

struct FakeElement {
    node: FakeNode,
    card: Option<String>,
    crashes: bool,
    site: FakeSite,
}

#[async_trait]
impl Element for FakeElement {
    async fn text(&self) -> Result<String, SessionError> {
        self.site.begin_op().await;
        Ok(self.node.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        self.site.begin_op().await;
        Ok(self.node.attrs.get(name).cloned())
    }

    async fn query_one(&self, css: &str) -> Result<Box<dyn Element>, SessionError> {
        self.site.begin_op().await;
        if self.crashes {
            return Err(SessionError::Disconnected("target crashed".into()));
        }
        if let Some(link) = &self.card {
            let mut state = self.site.lock();
            if !state.stats.cards_read.contains(link) {
                state.stats.cards_read.push(link.clone());
            }
        }
        let node = self
            .node
            .children
            .get(css)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(css.to_string()))?;
        Ok(Box::new(FakeElement {
            node,
            card: None,
            crashes: false,
            site: self.site.clone(),
        }))
    }
}

// =============================================================================
// Run helpers
// =============================================================================

/// Config with no pacing delays and short waits
pub fn fast_config(keyword: &str, locations: &[&str]) -> ScrapeConfigBuilder<Complete> {
    ScrapeConfig::builder()
        .keyword(keyword)
        .locations(locations)
        .without_pacing()
        .feed_wait_timeout(Duration::from_secs(2))
        .detail_wait_timeout(Duration::from_secs(2))
}

/// Drain a run to completion
pub async fn collect_events(stream: ScrapeStream) -> Vec<ScrapeEvent> {
    stream.collect().await
}

/// Output records of the terminal `RunComplete`
pub fn final_records(events: &[ScrapeEvent]) -> Vec<EnrichedRecord> {
    events
        .iter()
        .find_map(|e| match e {
            ScrapeEvent::RunComplete { records, .. } => Some(records.clone()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("run did not complete: {:?}", events.last()))
}
