//! Shopping list endpoints.

use super::{AppState, auth::CurrentUser};
use crate::{
    core::shopping_list::{
        self, CategorySuggestion, ListItemUpdate, ListUpdate, NewList, NewListItem,
    },
    entities::shopping_list as list_entity,
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

/// Query-string parameters for category suggestions.
#[derive(Deserialize)]
pub struct SuggestionParams {
    /// Substring matched against keywords and category names
    pub q: Option<String>,
}

/// Routes under `/api/shopping-lists`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lists).post(create_list))
        .route(
            "/:list_id",
            get(get_list).put(update_list).delete(delete_list),
        )
        .route("/:list_id/items", axum::routing::post(add_item))
        .route(
            "/:list_id/items/:item_id",
            axum::routing::put(update_item).delete(remove_item),
        )
        .route("/suggestions/categories", get(category_suggestions))
}

/// Static hints for quick item entry; available without authentication.
async fn category_suggestions(
    Query(params): Query<SuggestionParams>,
) -> Json<Vec<CategorySuggestion>> {
    Json(shopping_list::suggest_categories(params.q.as_deref()))
}

async fn list_lists(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<Json<Vec<list_entity::Model>>, Error> {
    let lists = shopping_list::lists_for_user(&state.db, &account.id).await?;
    Ok(Json(lists))
}

async fn create_list(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(new): Json<NewList>,
) -> Result<(StatusCode, Json<list_entity::Model>), Error> {
    let created = shopping_list::create_list(&state.db, &account.id, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_list(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(list_id): Path<String>,
) -> Result<Json<list_entity::Model>, Error> {
    let found = shopping_list::get_list(&state.db, &account.id, &list_id).await?;
    Ok(Json(found))
}

async fn update_list(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(list_id): Path<String>,
    Json(update): Json<ListUpdate>,
) -> Result<Json<list_entity::Model>, Error> {
    let updated = shopping_list::update_list(&state.db, &account.id, &list_id, update).await?;
    Ok(Json(updated))
}

async fn delete_list(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(list_id): Path<String>,
) -> Result<StatusCode, Error> {
    shopping_list::delete_list(&state.db, &account.id, &list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_item(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(list_id): Path<String>,
    Json(new): Json<NewListItem>,
) -> Result<(StatusCode, Json<list_entity::Model>), Error> {
    let updated = shopping_list::add_item(&state.db, &account.id, &list_id, new).await?;
    Ok((StatusCode::CREATED, Json(updated)))
}

async fn update_item(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path((list_id, item_id)): Path<(String, String)>,
    Json(update): Json<ListItemUpdate>,
) -> Result<Json<list_entity::Model>, Error> {
    let updated =
        shopping_list::update_item(&state.db, &account.id, &list_id, &item_id, update).await?;
    Ok(Json(updated))
}

async fn remove_item(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path((list_id, item_id)): Path<(String, String)>,
) -> Result<Json<list_entity::Model>, Error> {
    let updated = shopping_list::remove_item(&state.db, &account.id, &list_id, &item_id).await?;
    Ok(Json(updated))
}
