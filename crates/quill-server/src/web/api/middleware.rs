use crate::auth::{verify_token, TokenError, BEARER_PREFIX};
use crate::error::{ApiError, AuthRejection};
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use quill_common::models::user::User;
use quill_db::UserRepo;
use std::sync::Arc;

/// Extractor that authenticates the request and resolves the actor.
///
/// The user row is re-read from the store on every request, so a token
/// whose subject was deleted stops working immediately. The resolved
/// `User` carries no password hash.
#[derive(Debug)]
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix(BEARER_PREFIX))
            .ok_or(ApiError::Unauthenticated(AuthRejection::NoCredential))?;

        let user_id =
            verify_token(token, &state.config.auth.jwt_secret).map_err(|e| match e {
                TokenError::Expired => ApiError::Unauthenticated(AuthRejection::ExpiredToken),
                TokenError::Malformed => ApiError::Unauthenticated(AuthRejection::InvalidToken),
            })?;

        let user = UserRepo::get_by_id(&state.pool, user_id)
            .await
            .map_err(ApiError::Store)?
            .ok_or(ApiError::Unauthenticated(AuthRejection::UserGone))?;

        Ok(AuthUser(user.into_public()))
    }
}
