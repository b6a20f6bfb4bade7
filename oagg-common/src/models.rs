//! Domain models exchanged with the upstream services
//!
//! All identifiers are signed so that the `-1` "not resolved" sentinel used
//! by the enriched order is representable in the same type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order record, the root of every enrichment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub offer_id: i64,
    pub product_id: i64,
}

impl Order {
    pub fn new(id: i64, offer_id: i64, product_id: i64) -> Self {
        Self {
            id,
            offer_id,
            product_id,
        }
    }
}

/// Condition of the offered item
///
/// `Unknown` is never returned by the offer service itself; it marks an
/// offer that could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferCondition {
    New,
    AsNew,
    Good,
    Fair,
    Unknown,
}

/// Offer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    pub condition: OfferCondition,
}

impl Offer {
    pub fn new(id: i64, condition: OfferCondition) -> Self {
        Self { id, condition }
    }
}

/// Product record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
}

impl Product {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Format {
    Gif,
    Jpeg,
    Png,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Gif => "GIF",
            Format::Jpeg => "JPEG",
            Format::Png => "PNG",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub title: String,
    pub format: Format,
    /// Size in bytes
    pub size: u64,
}

impl Image {
    pub fn new(title: impl Into<String>, format: Format, size: u64) -> Self {
        Self {
            title: title.into(),
            format,
            size,
        }
    }
}

/// Field the image service orders results by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Size,
    Title,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Size => "size",
            SortField::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Ordering requested from the image service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortCriteria {
    /// Largest images first
    pub fn largest_first() -> Self {
        Self {
            field: SortField::Size,
            direction: SortDirection::Desc,
        }
    }
}

/// Selection requested from the image service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub product_id: i64,
    /// Restrict to one encoding (`None` = any)
    pub format: Option<Format>,
}

impl FilterCriteria {
    pub fn for_product(product_id: i64) -> Self {
        Self {
            product_id,
            format: None,
        }
    }
}
