use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::auth::services::resolve_identity;
use crate::blogs::dto::{
    normalize_tags, BlogResponse, CreateBlogRequest, ListBlogsParams, UpdateBlogRequest,
};
use crate::blogs::repo;
use crate::error::ApiError;
use crate::ids;
use crate::state::AppState;
use crate::users;

const UNKNOWN_AUTHOR: &str = "Unknown";

pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs).post(create_blog))
        .route(
            "/blogs/:id",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
}

#[instrument(skip(state, payload))]
async fn create_blog(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<BlogResponse>), ApiError> {
    payload.validate()?;
    let author = resolve_identity(&state.db, user_id).await?;
    let tags = normalize_tags(payload.tags);
    let blog = repo::create(&state.db, author.id, &payload.title, &payload.content, &tags).await?;
    info!(blog_id = %blog.id, author_id = %author.id, "blog created");
    Ok((
        StatusCode::CREATED,
        Json(BlogResponse::new(blog, author.username)),
    ))
}

#[instrument(skip(state))]
async fn list_blogs(
    State(state): State<AppState>,
    Query(params): Query<ListBlogsParams>,
) -> Result<Json<Vec<BlogResponse>>, ApiError> {
    let (skip, limit) = params.page();
    let author_filter = params
        .author_id
        .as_deref()
        .map(ids::parse_id)
        .transpose()?;

    let blogs = repo::list(&state.db, params.tag.as_deref(), author_filter, skip, limit).await?;

    let author_ids: Vec<Uuid> = blogs
        .iter()
        .map(|b| b.author_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let usernames = users::repo::usernames_by_ids(&state.db, &author_ids).await?;

    let items = blogs
        .into_iter()
        .map(|b| {
            let author = usernames
                .get(&b.author_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
            BlogResponse::new(b, author)
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, ApiError> {
    let id = ids::parse_id(&id)?;
    let blog = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Blog"))?;

    let author = users::repo::find_by_id(&state.db, blog.author_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    Ok(Json(BlogResponse::new(blog, author)))
}

#[instrument(skip(state, patch))]
async fn update_blog(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(patch): Json<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, ApiError> {
    let id = ids::parse_id(&id)?;
    let requester = resolve_identity(&state.db, user_id).await?;
    patch.validate()?;

    // An empty patch mutates nothing and must not bump updated_at, but the
    // ownership rule still applies.
    if patch.is_empty() {
        let blog = repo::find_by_id(&state.db, id)
            .await?
            .ok_or(ApiError::NotFound("Blog"))?;
        if blog.author_id != requester.id {
            return Err(ApiError::Forbidden("You can only update your own blogs"));
        }
        return Ok(Json(BlogResponse::new(blog, requester.username)));
    }

    let tags = patch.tags.map(normalize_tags);
    match repo::update(&state.db, id, requester.id, patch.title, patch.content, tags).await? {
        Some(blog) => {
            info!(blog_id = %blog.id, "blog updated");
            Ok(Json(BlogResponse::new(blog, requester.username)))
        }
        // No row matched: the blog is either absent or someone else's.
        None => match repo::find_by_id(&state.db, id).await? {
            Some(_) => Err(ApiError::Forbidden("You can only update your own blogs")),
            None => Err(ApiError::NotFound("Blog")),
        },
    }
}

#[instrument(skip(state))]
async fn delete_blog(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = ids::parse_id(&id)?;
    let requester = resolve_identity(&state.db, user_id).await?;

    let deleted = repo::delete(&state.db, id, requester.id).await?;
    if deleted == 0 {
        return match repo::find_by_id(&state.db, id).await? {
            Some(_) => Err(ApiError::Forbidden("You can only delete your own blogs")),
            None => Err(ApiError::NotFound("Blog")),
        };
    }

    info!(blog_id = %id, "blog deleted");
    Ok(StatusCode::NO_CONTENT)
}
