//! Catalog API handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use storefront::catalog::{CatalogError, Product};

use super::{ApiError, AppState, api_error};
use crate::metrics;

/// Body returned when the catalog store fails
pub const CATALOG_UNAVAILABLE: &str = "something went wrong, please try after some time";

/// Body returned for a missing or empty search query
pub const INVALID_SEARCH: &str = "Invalid search index";

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

/// List every product.
///
/// # Errors
///
/// - `500 Internal Server Error`: The catalog could not be read
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    metrics::catalog_queries_total("list");

    state.catalog.list_all().await.map(Json).map_err(|e| {
        tracing::error!("Listing products failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, CATALOG_UNAVAILABLE)
    })
}

/// Products whose name contains the `name` query parameter.
///
/// ```bash
/// curl 'http://localhost:8000/products/search?name=ware'
/// ```
///
/// # Errors
///
/// - `404 Not Found`: `name` missing or empty
/// - `500 Internal Server Error`: The catalog could not be read
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    metrics::catalog_queries_total("search");
    let query = params.name.unwrap_or_default();

    match state.catalog.search_by_name(&query).await {
        Ok(products) => Ok(Json(products)),
        Err(CatalogError::EmptyQuery) => Err(api_error(StatusCode::NOT_FOUND, INVALID_SEARCH)),
        Err(e) => {
            tracing::error!("Product search failed: {}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, CATALOG_UNAVAILABLE))
        }
    }
}
