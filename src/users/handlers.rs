use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::ids;
use crate::state::AppState;
use crate::users::dto::{ListUsersParams, UserResponse};
use crate::users::repo;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state))]
async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let (skip, limit) = params.page();
    let users = repo::list(&state.db, params.username.as_deref(), skip, limit).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = ids::parse_id(&id)?;
    let user = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(user.into()))
}
