//! Merge policy
//!
//! Turns branch outcomes into enriched-order fields. Failure and Empty are
//! treated identically: the field takes its sentinel value and the status is
//! `Defaulted`. The sentinels are part of the public contract:
//!
//! | Field             | Sentinel                                   |
//! |-------------------|--------------------------------------------|
//! | `offer_id`        | `-1`                                       |
//! | `offer_condition` | `OfferCondition::Unknown`                  |
//! | `product_id`      | `-1`                                       |
//! | `product_title`   | `None`                                     |
//! | `images`          | `[Image("Default Image", GIF, 123)]`       |

use crate::composite::{EnrichedOrder, EnrichmentStatus, FieldStatus};
use crate::outcome::EnrichmentOutcome;
use oagg_common::models::{Format, Image, Offer, OfferCondition, Order, Product};

/// Id reported for an offer or product that could not be resolved
pub const UNRESOLVED_ID: i64 = -1;

pub const DEFAULT_IMAGE_TITLE: &str = "Default Image";
pub const DEFAULT_IMAGE_FORMAT: Format = Format::Gif;
pub const DEFAULT_IMAGE_SIZE: u64 = 123;

/// Placeholder shown when no image list could be fetched
pub fn default_image() -> Image {
    Image::new(DEFAULT_IMAGE_TITLE, DEFAULT_IMAGE_FORMAT, DEFAULT_IMAGE_SIZE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferFields {
    pub offer_id: i64,
    pub condition: OfferCondition,
    pub status: FieldStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub product_id: i64,
    pub title: Option<String>,
    pub status: FieldStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFields {
    pub images: Vec<Image>,
    pub status: FieldStatus,
}

/// `requested_id` is the id the lookup was issued with
pub fn merge_offer(requested_id: i64, outcome: EnrichmentOutcome<Offer>) -> OfferFields {
    match outcome.into_value() {
        Some(offer) => OfferFields {
            offer_id: requested_id,
            condition: offer.condition,
            status: FieldStatus::Fetched,
        },
        None => OfferFields {
            offer_id: UNRESOLVED_ID,
            condition: OfferCondition::Unknown,
            status: FieldStatus::Defaulted,
        },
    }
}

pub fn merge_product(requested_id: i64, outcome: EnrichmentOutcome<Product>) -> ProductFields {
    match outcome.into_value() {
        Some(product) => ProductFields {
            product_id: requested_id,
            title: Some(product.title),
            status: FieldStatus::Fetched,
        },
        None => ProductFields {
            product_id: UNRESOLVED_ID,
            title: None,
            status: FieldStatus::Defaulted,
        },
    }
}

/// A successful empty list stays empty; only a missing list gets the placeholder
pub fn merge_images(outcome: EnrichmentOutcome<Vec<Image>>) -> ImageFields {
    match outcome.into_value() {
        Some(images) => ImageFields {
            images,
            status: FieldStatus::Fetched,
        },
        None => ImageFields {
            images: vec![default_image()],
            status: FieldStatus::Defaulted,
        },
    }
}

/// Reduce all branch outcomes into the enriched order
pub fn merge(
    order: &Order,
    offer: EnrichmentOutcome<Offer>,
    product: EnrichmentOutcome<Product>,
    images: EnrichmentOutcome<Vec<Image>>,
) -> EnrichedOrder {
    let offer = merge_offer(order.offer_id, offer);
    let product = merge_product(order.product_id, product);
    let images = merge_images(images);

    EnrichedOrder {
        id: order.id,
        offer_id: offer.offer_id,
        offer_condition: offer.condition,
        product_id: product.product_id,
        product_title: product.title,
        images: images.images,
        status: EnrichmentStatus {
            offer: offer.status,
            product: product.status,
            images: images.status,
        },
    }
}
