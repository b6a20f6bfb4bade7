//! Dependency ports
//!
//! Narrow interfaces over the upstream services. The aggregator only sees
//! these traits; `clients` provides the HTTP-backed implementations and the
//! tests provide scripted ones.

use async_trait::async_trait;
use oagg_common::models::{FilterCriteria, Image, Offer, Order, Product, SortCriteria};
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by an upstream lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// Connection, timeout or other transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {0}: {1}")]
    Status(u16, String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

/// Root lookup: seller id → order
#[async_trait]
pub trait OrderLookup: Send + Sync {
    async fn fetch_order(&self, seller_id: i64) -> Result<Option<Order>, LookupError>;
}

#[async_trait]
pub trait OfferLookup: Send + Sync {
    async fn fetch_offer(&self, offer_id: i64) -> Result<Option<Offer>, LookupError>;
}

#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, LookupError>;
}

/// Image lookup
///
/// An empty list is a valid answer, distinct from an error.
#[async_trait]
pub trait ImageLookup: Send + Sync {
    async fn fetch_images(
        &self,
        sort: &SortCriteria,
        filter: &FilterCriteria,
    ) -> Result<Vec<Image>, LookupError>;
}

/// The full set of collaborators one aggregator talks to
#[derive(Clone)]
pub struct Ports {
    pub orders: Arc<dyn OrderLookup>,
    pub offers: Arc<dyn OfferLookup>,
    pub products: Arc<dyn ProductLookup>,
    pub images: Arc<dyn ImageLookup>,
}

impl Ports {
    pub fn new(
        orders: Arc<dyn OrderLookup>,
        offers: Arc<dyn OfferLookup>,
        products: Arc<dyn ProductLookup>,
        images: Arc<dyn ImageLookup>,
    ) -> Self {
        Self {
            orders,
            offers,
            products,
            images,
        }
    }
}
