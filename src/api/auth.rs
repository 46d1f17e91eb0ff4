//! Authentication endpoints and the bearer-token extractor.

use super::AppState;
use crate::{
    core::account::{self, ProfileUpdate},
    entities::user,
    errors::Error,
};
use axum::{
    Json, Router, async_trait,
    extract::{FromRequestParts, State},
    http::{StatusCode, header, request::Parts},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

/// The authenticated user, resolved from the `Authorization: Bearer` header.
pub struct CurrentUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(Error::Unauthorized)?;

        let account = account::authenticate(&state.db, token).await?;
        Ok(Self(account))
    }
}

/// Registration payload.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// Login email
    pub email: String,
    /// Plain-text password (hashed before storage)
    pub password: String,
    /// Display name
    pub full_name: String,
    /// Optional home location
    pub location: Option<String>,
}

/// Login payload.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Session token plus the account it belongs to.
#[derive(Serialize)]
pub struct TokenResponse {
    /// Opaque bearer token
    pub access_token: String,
    /// Always "bearer"
    pub token_type: &'static str,
    /// The authenticated account
    pub user: user::Model,
}

/// Routes under `/api/auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me).put(update_me))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), Error> {
    let (account, session) = account::register(
        &state.db,
        &req.email,
        &req.password,
        &req.full_name,
        req.location,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access_token: session.token,
            token_type: "bearer",
            user: account,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, Error> {
    let (account, session) = account::login(&state.db, &req.email, &req.password).await?;
    Ok(Json(TokenResponse {
        access_token: session.token,
        token_type: "bearer",
        user: account,
    }))
}

async fn me(CurrentUser(account): CurrentUser) -> Json<user::Model> {
    Json(account)
}

async fn update_me(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<user::Model>, Error> {
    let updated = account::update_profile(&state.db, &account.id, update).await?;
    Ok(Json(updated))
}
