pub mod auth;
pub mod middleware;
pub mod posts;

use crate::error::ApiError;
use crate::state::AppState;
use axum::response::IntoResponse;
use axum::{routing::get, routing::post, Json, Router};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// GET / -- public endpoint describing the API surface
async fn service_info() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Quill blog API is running",
        "data": {
            "auth": "/auth",
            "blogs": "/blogs",
        },
    }))
}

pub(crate) fn parse_uuid_param(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("Invalid {} id", what)))
}

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Service info
        .route("/", get(service_info))
        // Auth routes
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Post routes; reads are public, mutations go through the gate
        .route("/blogs", get(posts::list_posts).post(posts::create_post))
        .route(
            "/blogs/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/blogs/user/{user_id}", get(posts::list_user_posts))
        .route("/blogs/categories/list", get(posts::list_categories))
        .with_state(state)
}
