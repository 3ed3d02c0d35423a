//! Catalog Handlers
//!
//! Fruit and variant listings and lookups. Both catalogs share these
//! handlers; the route decides which service they run against.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::AppState;
use crate::error::{ApiError, Result};
use crate::models::{ApiResponse, Item, SearchQuery};
use crate::services::CatalogService;

type ItemsResponse = Json<ApiResponse<Arc<Vec<Item>>>>;

async fn list(catalog: &CatalogService) -> Result<ItemsResponse> {
    let plural = catalog.kind().plural();
    let items = catalog
        .get_all()
        .await
        .map_err(ApiError::store(&format!("Failed to retrieve {}", plural)))?;

    Ok(Json(ApiResponse::ok(
        format!("{} retrieved successfully", capitalize(plural)),
        items,
    )))
}

async fn search(catalog: &CatalogService, query: &SearchQuery) -> Result<ItemsResponse> {
    let id = query.validate().map_err(ApiError::Validation)?;
    let items = catalog
        .search(id)
        .await
        .map_err(ApiError::store(&format!(
            "Failed to search {}",
            catalog.kind().plural()
        )))?;

    Ok(Json(ApiResponse::ok("Search completed successfully", items)))
}

/// Handler for GET /fruits
pub async fn list_fruits(State(state): State<AppState>) -> Result<ItemsResponse> {
    list(&state.fruits).await
}

/// Handler for GET /fruits/search?id=
pub async fn search_fruits(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ItemsResponse> {
    search(&state.fruits, &query).await
}

/// Handler for GET /variants
pub async fn list_variants(State(state): State<AppState>) -> Result<ItemsResponse> {
    list(&state.variants).await
}

/// Handler for GET /variants/search?id=
pub async fn search_variants(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ItemsResponse> {
    search(&state.variants, &query).await
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
