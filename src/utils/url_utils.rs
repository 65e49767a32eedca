//! URL construction and parsing utilities.
//!
//! Builds search URLs for a keyword/location pair and derives map links from
//! the coordinates embedded in place URLs. Everything here is pure.

use url::Url;

use super::constants::{MAPS_SEARCH_URL, MAPS_VIEW_URL, MAPS_VIEW_ZOOM};

/// Geographic coordinates recovered from a place URL
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Build the map search URL for `"{keyword} {location}"`.
///
/// The query is percent-encoded as a single path segment, spaces as `%20`.
#[must_use]
pub fn search_url(keyword: &str, location: &str) -> String {
    let query = format!("{} {}", keyword.trim(), location.trim());
    format!("{MAPS_SEARCH_URL}{}", urlencoding::encode(query.trim()))
}

fn parse_component(raw: &str, limit: f64) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value.abs() <= limit).then_some(value)
}

/// Parse the coordinates embedded in a place URL.
///
/// The first `@` path segment holds `lat,lng[,zoom]`. Returns `None` when the
/// URL does not parse, has no `@` segment, the segment has fewer than two
/// comma-separated components, or either component is not a valid
/// latitude/longitude.
///
/// ```
/// # use leadscrape::utils::parse_coordinates;
/// let c = parse_coordinates("https://www.google.com/maps/place/X/@31.5204,74.3587,17z/data=!3m1").unwrap();
/// assert_eq!((c.latitude, c.longitude), (31.5204, 74.3587));
/// assert!(parse_coordinates("https://www.google.com/maps/place/X/data=!3m1").is_none());
/// ```
#[must_use]
pub fn parse_coordinates(place_url: &str) -> Option<Coordinates> {
    let parsed = Url::parse(place_url).ok()?;
    let segment = parsed
        .path()
        .split('/')
        .find_map(|part| part.strip_prefix('@'))?;

    let mut parts = segment.split(',');
    Some(Coordinates {
        latitude: parse_component(parts.next()?, 90.0)?,
        longitude: parse_component(parts.next()?, 180.0)?,
    })
}

impl Coordinates {
    /// Map view link centred on these coordinates at the fixed zoom
    #[must_use]
    pub fn map_url(&self) -> String {
        format!(
            "{MAPS_VIEW_URL}{},{},{MAPS_VIEW_ZOOM}",
            self.latitude, self.longitude
        )
    }
}

/// Derive a stable map link (`.../maps/@lat,lng,17z`) from a place URL.
///
/// Coordinates are written in their shortest decimal form, so `31.50`
/// becomes `31.5`.
#[must_use]
pub fn map_url_for(place_url: &str) -> Option<String> {
    parse_coordinates(place_url).map(|c| c.map_url())
}
