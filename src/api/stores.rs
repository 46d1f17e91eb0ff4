//! Store directory endpoints.

use super::AppState;
use crate::{
    core::store::{self, StoreFilter, StoreProductPage},
    entities::store as store_entity,
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

/// Query-string parameters for a store's product page.
#[derive(Deserialize)]
pub struct StoreProductParams {
    /// Category filter
    pub category: Option<String>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size
    pub per_page: Option<u64>,
}

/// Routes under `/api/stores`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores))
        .route("/:store_id", get(get_store))
        .route("/:store_id/products", get(store_products))
}

async fn list_stores(
    State(state): State<AppState>,
    Query(filter): Query<StoreFilter>,
) -> Result<Json<Vec<store_entity::Model>>, Error> {
    let stores = store::list_stores(&state.db, &filter).await?;
    Ok(Json(stores))
}

async fn get_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<store_entity::Model>, Error> {
    let found = store::get_store(&state.db, &store_id).await?;
    Ok(Json(found))
}

async fn store_products(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(params): Query<StoreProductParams>,
) -> Result<Json<StoreProductPage>, Error> {
    let page = store::store_products(
        &state.db,
        &store_id,
        params.category.as_deref(),
        params.page.unwrap_or(1),
        params.per_page.unwrap_or(20),
    )
    .await?;
    Ok(Json(page))
}
