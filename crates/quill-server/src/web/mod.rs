pub mod api;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Request bodies may carry base64 images; allow up to 50 MB.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::build_api_routes(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
