use crate::auth::{hash_password, issue_token, verify_password};
use crate::error::{ApiError, AuthRejection};
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Duration;
use quill_common::models::user::Role;
use quill_db::UserRepo;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub username: Option<String>,
    pub password: Option<String>,
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    e.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}

/// POST /auth/register
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, email, password) = match (req.username, req.email, req.password) {
        (Some(u), Some(e), Some(p)) if !u.is_empty() && !e.is_empty() && !p.is_empty() => {
            (u, e, p)
        }
        _ => {
            return Err(ApiError::Validation(
                "Please provide username, email, and password".to_string(),
            ))
        }
    };

    // Pre-check both unique fields so each duplicate gets its own message
    if UserRepo::get_by_email(&state.pool, &email)
        .await
        .map_err(ApiError::Store)?
        .is_some()
    {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }
    if UserRepo::get_by_username(&state.pool, &username)
        .await
        .map_err(ApiError::Store)?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let password_hash = hash_password(&password).map_err(ApiError::Store)?;

    // The unique indexes back-stop a race lost between the pre-check and
    // the insert; report it as the same conflict, not a 500.
    let row = match UserRepo::create(
        &state.pool,
        Uuid::new_v4(),
        &username,
        &email,
        &password_hash,
        Role::User,
    )
    .await
    {
        Ok(row) => row,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(
                "Username or email already exists".to_string(),
            ))
        }
        Err(e) => return Err(ApiError::Store(e)),
    };

    let token = issue_token(
        row.user_id,
        &state.config.auth.jwt_secret,
        Duration::days(state.config.auth.token_ttl_days),
    )
    .map_err(ApiError::Store)?;
    let user = row.into_public();

    tracing::info!("Registered user '{}'", user.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registration successful",
            "data": { "user": user, "token": token },
        })),
    ))
}

/// POST /auth/login
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (login, password) = match (req.username, req.password) {
        (Some(l), Some(p)) if !l.is_empty() && !p.is_empty() => (l, p),
        _ => {
            return Err(ApiError::Validation(
                "Please provide username/email and password".to_string(),
            ))
        }
    };

    // Same rejection for unknown user and wrong password
    let row = UserRepo::get_by_login(&state.pool, &login)
        .await
        .map_err(ApiError::Store)?
        .ok_or(ApiError::Unauthenticated(AuthRejection::BadCredentials))?;

    if !verify_password(&password, &row.password_hash).map_err(ApiError::Store)? {
        return Err(ApiError::Unauthenticated(AuthRejection::BadCredentials));
    }

    let token = issue_token(
        row.user_id,
        &state.config.auth.jwt_secret,
        Duration::days(state.config.auth.token_ttl_days),
    )
    .map_err(ApiError::Store)?;
    let user = row.into_public();

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "data": { "user": user, "token": token },
    })))
}

/// GET /auth/me
#[tracing::instrument(skip_all)]
pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(json!({ "success": true, "data": user }))
}
