use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::auth::jwt::{AuthUser, JwtKeys};
use crate::auth::services;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::UserResponse;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = services::register_user(&state.db, payload).await?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let token = services::login(&state.db, &keys, &payload.username, &payload.password).await?;
    info!("user logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = services::resolve_identity(&state.db, user_id).await?;
    Ok(Json(user.into()))
}
