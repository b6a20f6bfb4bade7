//! HTTP API handlers for oagg-svc

pub mod enrich;
pub mod health;

pub use enrich::{enrich_order, enrich_routes};
pub use health::health_routes;
