//! Basket endpoints - the HTTP surface over the pricing engine.

use super::{AppState, auth::CurrentUser};
use crate::{
    core::basket::{self, BasketSummary},
    entities::basket as basket_entity,
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

/// Payload for adding a line to the basket.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddLineRequest {
    /// Catalog product to add
    pub product_id: String,
    /// Store to price it at
    pub store_id: String,
    /// Quantity (defaults to 1)
    pub quantity: Option<f64>,
}

/// Payload for replacing a line's quantity.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateLineRequest {
    /// The new quantity
    pub quantity: f64,
}

/// Routes under `/api/basket`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_basket).delete(clear_basket))
        .route("/items", axum::routing::post(add_line))
        .route(
            "/items/:line_id",
            axum::routing::put(update_line).delete(remove_line),
        )
        .route("/summary", get(summary))
}

async fn get_basket(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<Json<basket_entity::Model>, Error> {
    let current = basket::get_or_create_basket(&state.db, &account.id).await?;
    Ok(Json(current))
}

async fn add_line(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(req): Json<AddLineRequest>,
) -> Result<(StatusCode, Json<basket_entity::Model>), Error> {
    let updated = basket::add_line(
        &state.db,
        &account.id,
        &req.product_id,
        &req.store_id,
        req.quantity.unwrap_or(1.0),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(updated)))
}

async fn update_line(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(line_id): Path<String>,
    Json(req): Json<UpdateLineRequest>,
) -> Result<Json<basket_entity::Model>, Error> {
    let updated =
        basket::update_line_quantity(&state.db, &account.id, &line_id, req.quantity).await?;
    Ok(Json(updated))
}

async fn remove_line(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(line_id): Path<String>,
) -> Result<Json<basket_entity::Model>, Error> {
    let updated = basket::remove_line(&state.db, &account.id, &line_id).await?;
    Ok(Json(updated))
}

async fn clear_basket(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<Json<basket_entity::Model>, Error> {
    let cleared = basket::clear_basket(&state.db, &account.id).await?;
    Ok(Json(cleared))
}

async fn summary(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<Json<BasketSummary>, Error> {
    let current = basket::get_or_create_basket(&state.db, &account.id).await?;
    Ok(Json(basket::summarize(&current)))
}
