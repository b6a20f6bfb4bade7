//! oagg-svc library - order aggregation service
//!
//! Resolves a seller's order and enriches it concurrently with offer,
//! product and image data, degrading to documented defaults when an
//! enrichment dependency fails.

pub mod api;
pub mod clients;
pub mod composite;
pub mod engine;
pub mod error;
pub mod merge;
pub mod outcome;
pub mod ports;

pub use crate::composite::{EnrichedOrder, EnrichmentStatus, FieldStatus};
pub use crate::engine::{Aggregator, AggregatorConfig, EnrichError};
pub use crate::error::{ApiError, ApiResult};
pub use crate::outcome::EnrichmentOutcome;
pub use crate::ports::{ImageLookup, LookupError, OfferLookup, OrderLookup, Ports, ProductLookup};

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::enrich_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
