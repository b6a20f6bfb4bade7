//! Enriched order endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::composite::EnrichedOrder;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /sellers/:seller_id/order
///
/// 404 when the seller has no order, 502 when the order service fails.
/// Offer, product and image failures still return 200 with default fields.
pub async fn enrich_order(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
) -> ApiResult<Json<EnrichedOrder>> {
    let seller_id: i64 = seller_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid seller id: {}", seller_id)))?;

    let enriched = state.aggregator.enrich(seller_id).await?;
    Ok(Json(enriched))
}

pub fn enrich_routes() -> Router<AppState> {
    Router::new().route("/sellers/:seller_id/order", get(enrich_order))
}
