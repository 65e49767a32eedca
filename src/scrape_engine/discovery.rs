//! Phase 1: candidate discovery from the scrollable results feed
//!
//! [`FeedDiscovery`] holds the bookkeeping (seen links, cap, exhaustion) and
//! performs one pass over the rendered cards per call. [`discover_location`]
//! drives it against a live session: open the search, wait for the feed,
//! then pass, scroll and pace until the cap or exhaustion.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;
use crate::records::CandidateRecord;
use crate::scrape_events::{EventEmitter, ScrapeEvent};
use crate::session::{Element, Locator, Session, SessionError};
use crate::utils::{
    CARD_LINK_SELECTOR, CARD_NAME_SELECTOR, CARD_SELECTOR, FEED_SELECTOR, clean_text, search_url,
};

use super::pacing::pace;
use super::page_timeout::with_page_timeout;
use super::types::{Interrupted, ScrapeError};

/// Where discovery stands after a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStatus {
    /// More passes may yield candidates
    Running,
    /// The candidate count reached the cap
    CapReached,
    /// A full pass added nothing and the count did not grow
    Exhausted,
    /// The session died mid-discovery; candidates found so far are kept
    SessionLost,
}

/// Candidate bookkeeping for one location's feed
#[derive(Debug)]
pub struct FeedDiscovery {
    cap: usize,
    seen: HashSet<String>,
    candidates: Vec<CandidateRecord>,
    last_count: usize,
    status: DiscoveryStatus,
}

impl FeedDiscovery {
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            seen: HashSet::new(),
            candidates: Vec::new(),
            last_count: 0,
            status: if cap == 0 {
                DiscoveryStatus::CapReached
            } else {
                DiscoveryStatus::Running
            },
        }
    }

    #[must_use]
    pub fn status(&self) -> DiscoveryStatus {
        self.status
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status != DiscoveryStatus::Running
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn candidates(&self) -> &[CandidateRecord] {
        &self.candidates
    }

    #[must_use]
    pub fn into_candidates(self) -> Vec<CandidateRecord> {
        self.candidates
    }

    /// Offer one card's link and name. Returns the new candidate when accepted.
    fn offer(&mut self, link: String, name: &str) -> Option<CandidateRecord> {
        if self.candidates.len() >= self.cap || self.seen.contains(&link) {
            return None;
        }
        let candidate = CandidateRecord::new(clean_text(name), link)?;
        self.seen.insert(candidate.place_url().to_string());
        self.candidates.push(candidate.clone());
        if self.candidates.len() >= self.cap {
            self.status = DiscoveryStatus::CapReached;
        }
        Some(candidate)
    }

    /// Close out a pass that added `added` candidates
    fn finish_pass(&mut self, added: usize) {
        if self.status == DiscoveryStatus::Running
            && added == 0
            && self.candidates.len() == self.last_count
        {
            self.status = DiscoveryStatus::Exhausted;
        }
        self.last_count = self.candidates.len();
    }

    /// Record that the session died; discovery stops with what it has
    fn lose_session(&mut self) {
        self.status = DiscoveryStatus::SessionLost;
    }

    /// Run one pass over the currently rendered cards.
    ///
    /// Returns the candidates that were new in this pass, in feed order.
    /// Cards past the cap are never read. A card whose link or name cannot be
    /// read is skipped. A fatal session error ends the pass and discovery,
    /// keeping the cards accepted before it. The consumer is checked before
    /// every card read and the pass fails with `Cancelled` once it is gone.
    pub async fn next_pass(
        &mut self,
        session: &mut dyn Session,
        emitter: &EventEmitter,
    ) -> Result<Vec<CandidateRecord>, ScrapeError> {
        if self.is_done() {
            return Ok(Vec::new());
        }

        emitter.ensure_open()?;
        let cards = match session.query_all(Locator::Css(CARD_SELECTOR)).await {
            Ok(cards) => cards,
            Err(e) if e.is_fatal() => {
                warn!("Session lost while listing cards: {}", e);
                self.lose_session();
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!("Card query failed, treating pass as empty: {}", e);
                Vec::new()
            }
        };

        let mut added = Vec::new();
        for card in &cards {
            if self.status == DiscoveryStatus::CapReached {
                break;
            }
            match read_card(card.as_ref(), emitter).await {
                Ok(Some((link, name))) => {
                    if let Some(candidate) = self.offer(link, &name) {
                        added.push(candidate);
                    }
                }
                Ok(None) => {}
                Err(Interrupted::Session(e)) => {
                    warn!("Session lost while reading cards: {}", e);
                    self.lose_session();
                    return Ok(added);
                }
                Err(Interrupted::Cancelled) => return Err(ScrapeError::Cancelled),
            }
        }

        self.finish_pass(added.len());
        debug!(
            "Feed pass: {} cards, {} new, {} total",
            cards.len(),
            added.len(),
            self.candidates.len()
        );
        Ok(added)
    }
}

/// Read a card's link and raw name; `None` when either is missing
async fn read_card(
    card: &dyn Element,
    emitter: &EventEmitter,
) -> Result<Option<(String, String)>, Interrupted> {
    let skip_unless_fatal = |e: SessionError| -> Result<Option<(String, String)>, Interrupted> {
        if e.is_fatal() { Err(e.into()) } else { Ok(None) }
    };

    Interrupted::unless_open(emitter)?;
    let anchor = match card.query_one(CARD_LINK_SELECTOR).await {
        Ok(anchor) => anchor,
        Err(e) => return skip_unless_fatal(e),
    };
    Interrupted::unless_open(emitter)?;
    let link = match anchor.attribute("href").await {
        Ok(Some(href)) if !href.trim().is_empty() => href,
        Ok(_) => return Ok(None),
        Err(e) => return skip_unless_fatal(e),
    };

    Interrupted::unless_open(emitter)?;
    let element = match card.query_one(CARD_NAME_SELECTOR).await {
        Ok(element) => element,
        Err(e) => return skip_unless_fatal(e),
    };
    Interrupted::unless_open(emitter)?;
    let name = match element.text().await {
        Ok(text) => text,
        Err(e) => return skip_unless_fatal(e),
    };

    Ok(Some((link, name)))
}

/// Result of running discovery for one location
#[derive(Debug)]
pub enum DiscoveryOutcome {
    /// Candidates in discovery order (possibly empty)
    Found(Vec<CandidateRecord>),
    /// The feed never became available
    SourceUnavailable(String),
}

/// Discover candidates for `keyword location` using an open session.
///
/// Emits a progress event per new candidate. A session lost after the feed
/// rendered ends discovery early but keeps what was found.
pub async fn discover_location(
    session: &mut dyn Session,
    config: &ScrapeConfig,
    emitter: &EventEmitter,
    location: &str,
) -> Result<DiscoveryOutcome, ScrapeError> {
    let url = search_url(config.keyword(), location);
    let cap = config.max_results_per_location();
    let feed_wait = config.feed_wait_timeout();

    emitter.ensure_open()?;
    info!("Phase 1: scanning '{} {}'", config.keyword(), location);
    if let Err(e) = with_page_timeout(session.navigate(&url), feed_wait, "navigate").await {
        return Ok(DiscoveryOutcome::SourceUnavailable(format!(
            "search page failed to load: {e}"
        )));
    }
    emitter.ensure_open()?;
    if let Err(e) = session.wait_for_any(&[FEED_SELECTOR], feed_wait).await {
        return Ok(DiscoveryOutcome::SourceUnavailable(format!(
            "no results feed: {e}"
        )));
    }

    let mut discovery = FeedDiscovery::new(cap);
    loop {
        let added = discovery.next_pass(session, emitter).await?;

        let before = discovery.len() - added.len();
        for (i, candidate) in added.into_iter().enumerate() {
            emitter
                .emit(ScrapeEvent::discovery_progress(
                    location.to_string(),
                    before + i + 1,
                    cap,
                    candidate,
                ))
                .await?;
        }

        if discovery.is_done() {
            break;
        }

        emitter.ensure_open()?;
        if let Err(e) = session.scroll_to_end(FEED_SELECTOR).await {
            if e.is_fatal() {
                warn!("Session lost while scrolling feed for '{}': {}", location, e);
                discovery.lose_session();
                break;
            }
            debug!("Feed scroll failed: {}", e);
        }
        pace(config.scroll_pacing(), emitter, "feed scroll").await?;
    }

    info!(
        "Discovery for '{}' ended ({:?}) with {} of {} candidates",
        location,
        discovery.status(),
        discovery.len(),
        cap
    );
    Ok(DiscoveryOutcome::Found(discovery.into_candidates()))
}
