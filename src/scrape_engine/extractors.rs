//! Detail-page field extractors
//!
//! Each extractor reads one field and reports a [`FieldOutcome`]. Misses and
//! ordinary read failures stay inside the field. Only an error that leaves the
//! session unusable, or a consumer that has gone away, is returned as `Err`.

use tracing::trace;

use crate::records::{DetailField, EnrichedRecord};
use crate::scrape_events::EventEmitter;
use crate::session::{Locator, Session, SessionError};
use crate::utils::{
    ADDRESS_SELECTOR, BOOKING_KEYWORDS, BOOKING_SELECTORS, BOOKING_URL_ATTRIBUTES, PHONE_SELECTOR,
    PLUS_CODE_SELECTOR, RATING_FALLBACK_SELECTOR, RATING_PRIMARY_XPATH, WEBSITE_SELECTOR,
    clean_text, map_url_for,
};

use super::types::{FieldOutcome, Interrupted};

/// How a simple field is read from its element
#[derive(Debug, Clone, Copy)]
enum Read {
    /// Normalized text content
    Text(&'static str),
    /// Raw `href` attribute
    Href(&'static str),
}

/// Fields read with a single selector, in extraction order
const SIMPLE_FIELDS: [(DetailField, Read); 4] = [
    (DetailField::Address, Read::Text(ADDRESS_SELECTOR)),
    (DetailField::Phone, Read::Text(PHONE_SELECTOR)),
    (DetailField::Website, Read::Href(WEBSITE_SELECTOR)),
    (DetailField::PlusCode, Read::Text(PLUS_CODE_SELECTOR)),
];

/// Whether a URL looks like a booking/reservation target
#[must_use]
pub fn is_booking_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    BOOKING_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Turn a lookup failure into a field outcome, or end the extraction
fn field_error(err: SessionError) -> Result<FieldOutcome, Interrupted> {
    Ok(FieldOutcome::from_error(err)?)
}

/// Read the normalized text of the first element matching `locator`
pub async fn read_text(
    session: &mut dyn Session,
    emitter: &EventEmitter,
    locator: Locator<'_>,
) -> Result<FieldOutcome, Interrupted> {
    Interrupted::unless_open(emitter)?;
    let element = match session.query_one(locator).await {
        Ok(element) => element,
        Err(e) => return field_error(e),
    };
    Interrupted::unless_open(emitter)?;
    match element.text().await {
        Ok(text) => Ok(FieldOutcome::from_value(clean_text(&text))),
        Err(e) => field_error(e),
    }
}

/// Read an attribute of the first element matching `css`, unnormalized
pub async fn read_attribute(
    session: &mut dyn Session,
    emitter: &EventEmitter,
    css: &str,
    name: &str,
) -> Result<FieldOutcome, Interrupted> {
    Interrupted::unless_open(emitter)?;
    let element = match session.query_one(Locator::Css(css)).await {
        Ok(element) => element,
        Err(e) => return field_error(e),
    };
    Interrupted::unless_open(emitter)?;
    match element.attribute(name).await {
        Ok(value) => Ok(FieldOutcome::from_value(value.unwrap_or_default())),
        Err(e) => field_error(e),
    }
}

/// Booking link: the first candidate element whose target URL qualifies.
///
/// A matched element without a qualifying URL is a miss for that candidate,
/// never a fallback to some other field.
pub async fn read_booking_link(
    session: &mut dyn Session,
    emitter: &EventEmitter,
) -> Result<FieldOutcome, Interrupted> {
    for selector in BOOKING_SELECTORS {
        Interrupted::unless_open(emitter)?;
        let element = match session.query_one(Locator::Css(selector)).await {
            Ok(element) => element,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(_) => continue,
        };

        let mut target = None;
        for attribute in BOOKING_URL_ATTRIBUTES {
            Interrupted::unless_open(emitter)?;
            match element.attribute(attribute).await {
                Ok(Some(value)) if !value.trim().is_empty() => {
                    target = Some(value);
                    break;
                }
                Ok(_) => {}
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(_) => {}
            }
        }

        match target {
            Some(url) if is_booking_url(&url) => return Ok(FieldOutcome::Extracted(url)),
            Some(url) => trace!("Booking candidate {} has non-booking target {}", selector, url),
            None => trace!("Booking candidate {} has no target URL", selector),
        }
    }
    Ok(FieldOutcome::Missing)
}

/// Rating: exact XPath first, structural CSS fallback second
pub async fn read_rating(
    session: &mut dyn Session,
    emitter: &EventEmitter,
) -> Result<FieldOutcome, Interrupted> {
    let primary = read_text(session, emitter, Locator::XPath(RATING_PRIMARY_XPATH)).await?;
    if primary.value().is_some() {
        return Ok(primary);
    }
    trace!("Primary rating lookup missed: {:?}", primary);
    read_text(session, emitter, Locator::Css(RATING_FALLBACK_SELECTOR)).await
}

fn apply(record: &mut EnrichedRecord, field: DetailField, outcome: &FieldOutcome) -> bool {
    match outcome {
        FieldOutcome::Extracted(value) => record.set_field(field, value.clone()),
        FieldOutcome::Missing => false,
        FieldOutcome::Failed(reason) => {
            trace!("{} read failed for {}: {}", field, record.place_url(), reason);
            false
        }
    }
}

/// Populate every detail field of `record` from the loaded page.
///
/// Fields are independent: a miss on one never blocks the next. Returns the
/// number of fields populated. A fatal session error or a dropped consumer
/// ends extraction early; the fields read before it stay on the record.
pub async fn extract_fields(
    session: &mut dyn Session,
    emitter: &EventEmitter,
    record: &mut EnrichedRecord,
) -> Result<usize, Interrupted> {
    let mut populated = 0;

    if let Some(map_url) = map_url_for(record.place_url()) {
        populated += usize::from(record.set_field(DetailField::MapUrl, map_url));
    }

    for (field, read) in SIMPLE_FIELDS {
        let outcome = match read {
            Read::Text(css) => read_text(session, emitter, Locator::Css(css)).await?,
            Read::Href(css) => read_attribute(session, emitter, css, "href").await?,
        };
        populated += usize::from(apply(record, field, &outcome));
    }

    let booking = read_booking_link(session, emitter).await?;
    populated += usize::from(apply(record, DetailField::BookingLink, &booking));

    let rating = read_rating(session, emitter).await?;
    populated += usize::from(apply(record, DetailField::Rating, &rating));

    Ok(populated)
}
