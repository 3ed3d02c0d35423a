//! Health, cache statistics and the catch-all fallback.

use axum::{extract::State, http::StatusCode, Json};

use super::AppState;
use crate::models::{ApiResponse, CacheStatsResponse, HealthResponse};

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::running())
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(
    State(state): State<AppState>,
) -> Json<ApiResponse<CacheStatsResponse>> {
    let stats = state.cache.stats().await;
    Json(ApiResponse::ok(
        "Cache statistics retrieved successfully",
        CacheStatsResponse::new(&stats, state.cache.ttl_ms()),
    ))
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure("Route not found", None)),
    )
}
