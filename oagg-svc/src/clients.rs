//! HTTP-backed dependency ports
//!
//! Every upstream is a plain JSON-over-HTTP service:
//! - `GET {order_url}/sellers/{seller_id}/order`
//! - `GET {offer_url}/offers/{offer_id}`
//! - `GET {product_url}/products/{product_id}`
//! - `GET {image_url}/images?product_id=..&sort=..&direction=..[&format=..]`
//!
//! A 404 means "no such record" and maps to `Ok(None)` (an empty list for
//! images). Any other non-success status is a `LookupError::Status`.

use crate::ports::{ImageLookup, LookupError, OfferLookup, OrderLookup, ProductLookup, Ports};
use async_trait::async_trait;
use oagg_common::config::UpstreamSection;
use oagg_common::models::{FilterCriteria, Image, Offer, Order, Product, SortCriteria};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;

const USER_AGENT: &str = concat!("oagg-svc/", env!("CARGO_PKG_VERSION"));

/// Client for all four upstream services
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    http_client: reqwest::Client,
    order_url: String,
    offer_url: String,
    product_url: String,
    image_url: String,
}

impl HttpUpstream {
    pub fn new(upstream: &UpstreamSection) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(upstream.request_timeout())
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            order_url: trim_base(&upstream.order_url),
            offer_url: trim_base(&upstream.offer_url),
            product_url: trim_base(&upstream.product_url),
            image_url: trim_base(&upstream.image_url),
        })
    }

    /// Share one client across all ports
    pub fn into_ports(self) -> Ports {
        let upstream = Arc::new(self);
        Ports::new(
            upstream.clone(),
            upstream.clone(),
            upstream.clone(),
            upstream,
        )
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, LookupError> {
        let response = request
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LookupError::Status(status.as_u16(), error_text));
        }

        // Upstreams may answer 200 with a JSON `null` body
        response
            .json::<Option<T>>()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[async_trait]
impl OrderLookup for HttpUpstream {
    async fn fetch_order(&self, seller_id: i64) -> Result<Option<Order>, LookupError> {
        let url = format!("{}/sellers/{}/order", self.order_url, seller_id);
        tracing::debug!(url = %url, "Querying order service");
        self.get_optional(self.http_client.get(&url)).await
    }
}

#[async_trait]
impl OfferLookup for HttpUpstream {
    async fn fetch_offer(&self, offer_id: i64) -> Result<Option<Offer>, LookupError> {
        let url = format!("{}/offers/{}", self.offer_url, offer_id);
        tracing::debug!(url = %url, "Querying offer service");
        self.get_optional(self.http_client.get(&url)).await
    }
}

#[async_trait]
impl ProductLookup for HttpUpstream {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, LookupError> {
        let url = format!("{}/products/{}", self.product_url, product_id);
        tracing::debug!(url = %url, "Querying product service");
        self.get_optional(self.http_client.get(&url)).await
    }
}

#[async_trait]
impl ImageLookup for HttpUpstream {
    async fn fetch_images(
        &self,
        sort: &SortCriteria,
        filter: &FilterCriteria,
    ) -> Result<Vec<Image>, LookupError> {
        let url = format!("{}/images", self.image_url);
        let mut query = vec![
            ("product_id", filter.product_id.to_string()),
            ("sort", sort.field.as_str().to_string()),
            ("direction", sort.direction.as_str().to_string()),
        ];
        if let Some(format) = filter.format {
            query.push(("format", format.as_str().to_string()));
        }

        tracing::debug!(url = %url, product_id = filter.product_id, "Querying image service");
        let images: Option<Vec<Image>> = self
            .get_optional(self.http_client.get(&url).query(&query))
            .await?;
        Ok(images.unwrap_or_default())
    }
}
