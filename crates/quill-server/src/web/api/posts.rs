use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use crate::web::api::parse_uuid_param;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use quill_common::models::post::{Category, Post};
use quill_common::policy::can_modify;
use quill_common::validation::validate_post;
use quill_db::PostRepo;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

/// Distinguishes "field absent" (keep the stored image) from "field set
/// to null" (clear it).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
}

/// GET /blogs - list posts with optional search and category filter
#[tracing::instrument(skip(state))]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPostsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let search = query.search.as_deref().filter(|s| !s.is_empty());
    // "All" is the client's pseudo-category for "no filter"
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "All");

    let posts: Vec<Post> = PostRepo::list(&state.pool, search, category)
        .await
        .map_err(ApiError::Store)?
        .into_iter()
        .map(Post::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "count": posts.len(),
        "data": posts,
    })))
}

/// GET /blogs/{id}
#[tracing::instrument(skip(state))]
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_uuid_param(&id, "post")?;

    let post = PostRepo::get(&state.pool, post_id)
        .await
        .map_err(ApiError::Store)?
        .map(Post::from)
        .ok_or(ApiError::NotFound("Post"))?;

    Ok(Json(json!({ "success": true, "data": post })))
}

/// POST /blogs - create a post owned by the requesting actor
#[tracing::instrument(skip(state, auth, req))]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let AuthUser(actor) = auth;

    let (title, description) = match (req.title, req.description) {
        (Some(t), Some(d)) => (t.trim().to_string(), d.trim().to_string()),
        _ => {
            return Err(ApiError::Validation(
                "Please provide a title and description".to_string(),
            ))
        }
    };
    let category = req
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| Category::General.as_str().to_string());

    // Validation happens before any store write
    validate_post(&title, &description, &category, req.image.as_deref())
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    // The author is always the requesting actor, never client-supplied
    let post = PostRepo::create(
        &state.pool,
        actor.user_id,
        &actor.username,
        &title,
        &description,
        &category,
        req.image.as_deref(),
    )
    .await
    .map_err(ApiError::Store)
    .map(Post::from)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Post created successfully",
            "data": post,
        })),
    ))
}

/// PUT /blogs/{id} - update a post (owner or admin)
#[tracing::instrument(skip(state, auth, req))]
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let AuthUser(actor) = auth;
    let post_id = parse_uuid_param(&id, "post")?;

    let existing = PostRepo::get(&state.pool, post_id)
        .await
        .map_err(ApiError::Store)?
        .ok_or(ApiError::NotFound("Post"))?;

    if !can_modify(&actor, existing.author_id) {
        return Err(ApiError::Forbidden(
            "Access denied. You can only modify your own posts.".to_string(),
        ));
    }

    // Merge supplied fields over the stored row; absent fields keep their
    // value, image: null clears the image.
    let title = req
        .title
        .map(|t| t.trim().to_string())
        .unwrap_or(existing.title);
    let description = req
        .description
        .map(|d| d.trim().to_string())
        .unwrap_or(existing.description);
    let category = req
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or(existing.category);
    let image = match req.image {
        Some(image) => image,
        None => existing.image,
    };

    validate_post(&title, &description, &category, image.as_deref())
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let post = PostRepo::update(
        &state.pool,
        post_id,
        &title,
        &description,
        &category,
        image.as_deref(),
    )
    .await
    .map_err(ApiError::Store)?
    .map(Post::from)
    .ok_or(ApiError::NotFound("Post"))?;

    Ok(Json(json!({
        "success": true,
        "message": "Post updated successfully",
        "data": post,
    })))
}

/// DELETE /blogs/{id} - delete a post (owner or admin)
#[tracing::instrument(skip(state, auth))]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let AuthUser(actor) = auth;
    let post_id = parse_uuid_param(&id, "post")?;

    let existing = PostRepo::get(&state.pool, post_id)
        .await
        .map_err(ApiError::Store)?
        .ok_or(ApiError::NotFound("Post"))?;

    if !can_modify(&actor, existing.author_id) {
        return Err(ApiError::Forbidden(
            "Access denied. You can only modify your own posts.".to_string(),
        ));
    }

    let deleted = PostRepo::delete(&state.pool, post_id)
        .await
        .map_err(ApiError::Store)?;
    if !deleted {
        // Lost a race with a concurrent delete
        return Err(ApiError::NotFound("Post"));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Post deleted successfully",
    })))
}

/// GET /blogs/user/{user_id} - all posts by one author
#[tracing::instrument(skip(state))]
pub async fn list_user_posts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let author_id = parse_uuid_param(&user_id, "user")?;

    let posts: Vec<Post> = PostRepo::list_by_author(&state.pool, author_id)
        .await
        .map_err(ApiError::Store)?
        .into_iter()
        .map(Post::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "count": posts.len(),
        "data": posts,
    })))
}

/// GET /blogs/categories/list - every category in use, ascending
#[tracing::instrument(skip(state))]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = PostRepo::distinct_categories(&state.pool)
        .await
        .map_err(ApiError::Store)?;

    Ok(Json(json!({ "success": true, "data": categories })))
}
