//! HTTP interface - axum routers and handlers over the core functions.
//!
//! Handlers stay thin: extract, delegate to `core`, serialize. The error
//! enum maps onto HTTP statuses here and nowhere else.

/// Registration, login, and the current-user extractor
pub mod auth;
/// Basket endpoints backed by the pricing engine
pub mod basket;
/// Product search and catalog endpoints
pub mod products;
/// Shopping list endpoints
pub mod shopping_lists;
/// Store directory endpoints
pub mod stores;

use crate::errors::Error;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The one database connection, opened at service start
    pub db: DatabaseConnection,
}

/// Builds the full application router under `/api`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/stores", stores::router())
        .nest("/shopping-lists", shopping_lists::router())
        .nest("/basket", basket::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Structured error body returned for every failed request.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Error::ProductNotFound { .. }
            | Error::StoreOfferNotFound { .. }
            | Error::StoreNotFound { .. }
            | Error::BasketLineNotFound { .. }
            | Error::ShoppingListNotFound { .. }
            | Error::ListItemNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Error::InvalidQuantity { .. } | Error::Config { .. } | Error::EmailTaken { .. } => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            Error::InvalidCredentials | Error::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            Error::Database(_) | Error::Io(_) | Error::EnvVar(_) => {
                error!(error = %self, "internal error while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        // Infrastructure detail stays in the logs, not the response
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: code, message })).into_response()
    }
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    database: &'static str,
}

/// Liveness check that also pings the database.
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<HealthBody>, StatusCode> {
    match state.db.ping().await {
        Ok(()) => Ok(Json(HealthBody {
            status: "healthy",
            database: "connected",
        })),
        Err(e) => {
            error!(error = %e, "health check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
