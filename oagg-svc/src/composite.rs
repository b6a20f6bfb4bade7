//! Enriched order returned to callers

use oagg_common::models::{Image, OfferCondition};
use serde::{Deserialize, Serialize};

/// Whether a field carries upstream data or its documented fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    Fetched,
    Defaulted,
}

/// Per-kind status markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentStatus {
    pub offer: FieldStatus,
    pub product: FieldStatus,
    pub images: FieldStatus,
}

impl EnrichmentStatus {
    pub fn is_complete(&self) -> bool {
        self.offer == FieldStatus::Fetched
            && self.product == FieldStatus::Fetched
            && self.images == FieldStatus::Fetched
    }
}

/// Order plus its offer, product and image enrichment
///
/// Always fully populated: every field is either the upstream value or the
/// sentinel defined in `merge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    /// Order id
    pub id: i64,
    /// Offer id, `-1` when the offer was not resolved
    pub offer_id: i64,
    pub offer_condition: OfferCondition,
    /// Product id, `-1` when the product was not resolved
    pub product_id: i64,
    pub product_title: Option<String>,
    /// Never empty when the image lookup failed (placeholder image)
    pub images: Vec<Image>,
    pub status: EnrichmentStatus,
}
