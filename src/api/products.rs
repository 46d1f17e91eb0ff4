//! Product search and catalog endpoints.

use super::{AppState, auth::CurrentUser};
use crate::{
    core::catalog::{self, ProductPage, ProductQuery, SortOrder},
    entities::product,
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

/// Query-string shape of the search endpoints; store ids arrive as a
/// comma-separated list.
#[derive(Deserialize)]
pub struct SearchParams {
    /// Search text
    pub q: String,
    /// Category filter
    pub category: Option<String>,
    /// Minimum average price
    pub min_price: Option<f64>,
    /// Maximum average price
    pub max_price: Option<f64>,
    /// Comma-separated store ids
    pub store_ids: Option<String>,
    /// Sort order
    #[serde(default)]
    pub sort_by: SortOrder,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size
    pub per_page: Option<u64>,
}

impl From<SearchParams> for ProductQuery {
    fn from(params: SearchParams) -> Self {
        Self {
            query: params.q,
            category: params.category,
            min_price: params.min_price,
            max_price: params.max_price,
            store_ids: params
                .store_ids
                .map(|ids| {
                    ids.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            sort: params.sort_by,
            page: params.page,
            per_page: params.per_page,
        }
    }
}

/// Routes under `/api/products`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/guest-search", get(guest_search))
        .route("/categories", get(categories))
        .route("/:product_id", get(get_product))
}

async fn search(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<ProductPage>, Error> {
    let page = catalog::search_products(&state.db, &params.into()).await?;
    Ok(Json(page))
}

/// Same search surface without authentication, for browsing before login.
async fn guest_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ProductPage>, Error> {
    let page = catalog::search_products(&state.db, &params.into()).await?;
    Ok(Json(page))
}

async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, Error> {
    let categories = catalog::list_categories(&state.db).await?;
    Ok(Json(categories))
}

async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<product::Model>, Error> {
    let found = catalog::get_product(&state.db, &product_id).await?;
    Ok(Json(found))
}
