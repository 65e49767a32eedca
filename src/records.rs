//! Listing records and the ordered, deduplicating record set
//!
//! A [`CandidateRecord`] is created during discovery; enrichment turns it into
//! an [`EnrichedRecord`] whose detail fields start at the "not available"
//! sentinel and only ever move to a concrete value. [`RecordSet`] keeps records
//! in first-seen order keyed by place URL, rejecting empty and duplicate keys.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::utils::NOT_AVAILABLE;

// =============================================================================
// Field values
// =============================================================================

/// A detail field: either a confirmed value or the explicit sentinel.
///
/// Serializes as the value itself, or `"N/A"` when unavailable, so tabular
/// output keeps a stable shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Available(String),
    #[default]
    NotAvailable,
}

impl FieldValue {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Available(v) => Some(v),
            Self::NotAvailable => None,
        }
    }

    /// Rendered form: the value, or the sentinel
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() || raw == NOT_AVAILABLE {
            Ok(Self::NotAvailable)
        } else {
            Ok(Self::Available(raw))
        }
    }
}

/// The fixed set of detail fields populated during enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetailField {
    Address,
    Phone,
    Website,
    BookingLink,
    PlusCode,
    Rating,
    MapUrl,
}

impl DetailField {
    pub const ALL: [DetailField; 7] = [
        Self::Address,
        Self::Phone,
        Self::Website,
        Self::BookingLink,
        Self::PlusCode,
        Self::Rating,
        Self::MapUrl,
    ];

    /// Column header used in exported tables
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Address => "Detailed Address",
            Self::Phone => "Detailed Phone",
            Self::Website => "Detailed Website",
            Self::BookingLink => "Booking Link",
            Self::PlusCode => "Plus Code",
            Self::Rating => "Rating",
            Self::MapUrl => "Map URL",
        }
    }
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// =============================================================================
// Records
// =============================================================================

/// A discovered listing identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    name: String,
    place_url: String,
}

impl CandidateRecord {
    /// Create a candidate. Returns `None` for an empty (or blank) place URL.
    #[must_use]
    pub fn new(name: impl Into<String>, place_url: impl Into<String>) -> Option<Self> {
        let place_url = place_url.into();
        if place_url.trim().is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            place_url,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn place_url(&self) -> &str {
        &self.place_url
    }
}

/// A candidate plus its detail fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(rename = "Business Name")]
    name: String,
    #[serde(rename = "Place URL")]
    place_url: String,
    #[serde(rename = "Detailed Address")]
    address: FieldValue,
    #[serde(rename = "Detailed Phone")]
    phone: FieldValue,
    #[serde(rename = "Detailed Website")]
    website: FieldValue,
    #[serde(rename = "Booking Link")]
    booking_link: FieldValue,
    #[serde(rename = "Plus Code")]
    plus_code: FieldValue,
    #[serde(rename = "Rating")]
    rating: FieldValue,
    #[serde(rename = "Map URL")]
    map_url: FieldValue,
}

impl From<CandidateRecord> for EnrichedRecord {
    fn from(candidate: CandidateRecord) -> Self {
        Self {
            name: candidate.name,
            place_url: candidate.place_url,
            address: FieldValue::NotAvailable,
            phone: FieldValue::NotAvailable,
            website: FieldValue::NotAvailable,
            booking_link: FieldValue::NotAvailable,
            plus_code: FieldValue::NotAvailable,
            rating: FieldValue::NotAvailable,
            map_url: FieldValue::NotAvailable,
        }
    }
}

impl EnrichedRecord {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn place_url(&self) -> &str {
        &self.place_url
    }

    #[must_use]
    pub fn field(&self, field: DetailField) -> &FieldValue {
        match field {
            DetailField::Address => &self.address,
            DetailField::Phone => &self.phone,
            DetailField::Website => &self.website,
            DetailField::BookingLink => &self.booking_link,
            DetailField::PlusCode => &self.plus_code,
            DetailField::Rating => &self.rating,
            DetailField::MapUrl => &self.map_url,
        }
    }

    fn field_mut(&mut self, field: DetailField) -> &mut FieldValue {
        match field {
            DetailField::Address => &mut self.address,
            DetailField::Phone => &mut self.phone,
            DetailField::Website => &mut self.website,
            DetailField::BookingLink => &mut self.booking_link,
            DetailField::PlusCode => &mut self.plus_code,
            DetailField::Rating => &mut self.rating,
            DetailField::MapUrl => &mut self.map_url,
        }
    }

    /// Record a successfully extracted value.
    ///
    /// Blank values are ignored, so a field never moves back to (or through)
    /// an empty state. Returns whether the field changed.
    pub fn set_field(&mut self, field: DetailField, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() {
            return false;
        }
        let slot = self.field_mut(field);
        if slot.as_deref() == Some(value.as_str()) {
            return false;
        }
        *slot = FieldValue::Available(value);
        true
    }

    /// Number of detail fields holding a concrete value
    #[must_use]
    pub fn available_fields(&self) -> usize {
        DetailField::ALL
            .iter()
            .filter(|f| self.field(**f).is_available())
            .count()
    }
}

// =============================================================================
// Ordered set keyed by place URL
// =============================================================================

/// Insertion-ordered set of records keyed by place URL.
///
/// The first record inserted under a key wins; later duplicates are discarded
/// entirely, not merged.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<EnrichedRecord>,
    index: HashMap<String, usize>,
}

impl RecordSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning `false` if its key is empty or already present
    pub fn insert(&mut self, record: EnrichedRecord) -> bool {
        let key = record.place_url();
        if key.trim().is_empty() || self.index.contains_key(key) {
            return false;
        }
        self.index.insert(key.to_string(), self.records.len());
        self.records.push(record);
        true
    }

    #[must_use]
    pub fn contains(&self, place_url: &str) -> bool {
        self.index.contains_key(place_url)
    }

    #[must_use]
    pub fn get(&self, place_url: &str) -> Option<&EnrichedRecord> {
        self.index.get(place_url).map(|&i| &self.records[i])
    }

    /// Mutable access by position, for in-place enrichment
    pub fn get_mut_at(&mut self, position: usize) -> Option<&mut EnrichedRecord> {
        self.records.get_mut(position)
    }

    /// Fold another set into this one, keeping existing records on collision.
    ///
    /// Returns the number of records that were new to this set.
    pub fn merge(&mut self, other: RecordSet) -> usize {
        other
            .records
            .into_iter()
            .map(|record| usize::from(self.insert(record)))
            .sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrichedRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[EnrichedRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<EnrichedRecord> {
        self.records
    }
}

impl FromIterator<EnrichedRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = EnrichedRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a EnrichedRecord;
    type IntoIter = std::slice::Iter<'a, EnrichedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
