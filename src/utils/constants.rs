//! Shared configuration constants for leadscrape
//!
//! This module contains default values, page selectors and pacing bounds used
//! throughout the codebase to ensure consistency and avoid magic numbers.

use std::time::Duration;

// =============================================================================
// Source endpoints
// =============================================================================

/// Base URL for map searches. The percent-encoded "keyword location" query is
/// appended as the final path segment.
pub const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// Base URL for derived map links (`@lat,lng,17z` is appended)
pub const MAPS_VIEW_URL: &str = "https://www.google.com/maps/@";

/// Zoom suffix appended to derived map links
pub const MAPS_VIEW_ZOOM: &str = "17z";

// =============================================================================
// Feed selectors (Phase 1)
// =============================================================================

/// Scrollable results container
pub const FEED_SELECTOR: &str = r#"div[role="feed"]"#;

/// Individual listing cards rendered inside the feed
pub const CARD_SELECTOR: &str = r#"div[role="feed"] div.Nv2PK"#;

/// Anchor inside a card carrying the place URL
pub const CARD_LINK_SELECTOR: &str = "a";

/// Business name inside a card
pub const CARD_NAME_SELECTOR: &str = ".qBF1Pd";

// =============================================================================
// Detail page selectors (Phase 2)
// =============================================================================

/// Any of these appearing means the detail panel has rendered
pub const DETAIL_READY_SELECTORS: &[&str] =
    &[r#"[data-item-id*="address"]"#, r#"[data-item-id*="phone"]"#];

pub const ADDRESS_SELECTOR: &str = r#"[data-item-id*="address"]"#;
pub const PHONE_SELECTOR: &str = r#"[data-item-id*="phone"]"#;
pub const WEBSITE_SELECTOR: &str = r#"[data-item-id*="authority"]"#;
pub const PLUS_CODE_SELECTOR: &str = r#"[data-item-id*="oloc"]"#;

/// Booking candidates, tried in order
pub const BOOKING_SELECTORS: &[&str] = &[
    r#"[data-item-id^="action:book"]"#,
    r#"[aria-label*="Book"]"#,
    r#"[aria-label*="Reserve"]"#,
    r#"[data-item-id*="reservation"]"#,
];

/// Attributes that may carry the booking target URL, in order of preference
pub const BOOKING_URL_ATTRIBUTES: &[&str] = &["href", "data-url"];

/// Lower-case substrings that classify a URL as a booking link
pub const BOOKING_KEYWORDS: &[&str] = &["book", "reserve"];

/// Primary rating lookup: absolute path into the rendered detail panel.
///
/// Exact but brittle; any layout shift breaks it, hence the CSS fallback.
pub const RATING_PRIMARY_XPATH: &str = "/html/body/div[1]/div[2]/div[9]/div[8]/div/div/div[1]/div[2]/div/div[1]/div/div/div[2]/div/div[1]/div[2]/div/div[1]/div[2]/span[1]/span[1]";

/// Fallback rating lookup: the aria-hidden score inside the summary block
pub const RATING_FALLBACK_SELECTOR: &str = r#".F7nice span[aria-hidden="true"]"#;

// =============================================================================
// Run defaults
// =============================================================================

/// Sentinel rendered for any field that was never extracted
pub const NOT_AVAILABLE: &str = "N/A";

/// Default cap on discovered candidates per location
pub const DEFAULT_MAX_RESULTS: usize = 120;

/// Default cap on enriched records per location
pub const DEFAULT_MAX_DETAILS: usize = 100;

/// Records enriched under one browser session before it is recycled
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// How long to wait for the results feed to render
pub const DEFAULT_FEED_WAIT_TIMEOUT: Duration = Duration::from_secs(40);

/// How long to wait for a detail page load signal
pub const DEFAULT_DETAIL_WAIT_TIMEOUT: Duration = Duration::from_secs(25);

/// Event channel capacity between the run and its consumer
pub const DEFAULT_EVENT_BUFFER: usize = 32;

/// Minimum elapsed time before a throughput sample counts toward the ETA
pub const DEFAULT_ETA_MIN_SAMPLE: Duration = Duration::from_secs(1);

// Pacing: base delay plus a uniformly drawn jitter in [min, max)

pub const SCROLL_PACING_BASE: Duration = Duration::from_millis(2000);
pub const SCROLL_PACING_JITTER: (Duration, Duration) =
    (Duration::from_millis(500), Duration::from_millis(1500));

pub const RECORD_PACING_BASE: Duration = Duration::from_millis(1200);
pub const RECORD_PACING_JITTER: (Duration, Duration) =
    (Duration::from_millis(400), Duration::from_millis(1200));

pub const BATCH_PACING_BASE: Duration = Duration::from_millis(3000);
pub const BATCH_PACING_JITTER: (Duration, Duration) =
    (Duration::from_millis(1000), Duration::from_millis(3000));

// =============================================================================
// Browser
// =============================================================================

/// Chrome user agent string presented by every session
///
/// Matches a current desktop Linux Chrome build.
pub const CHROME_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/144 Safari/537.36";

/// Browser window size; the detail panel layout the XPath targets assumes it
pub const WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// Interval between selector polls while waiting for a page condition
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// CDP request timeout for the browser connection
pub const BROWSER_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
