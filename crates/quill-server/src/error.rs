use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Why a request failed authentication. All map to 401; each keeps its
/// own code and user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Authorization header absent or not `Bearer `-prefixed.
    NoCredential,
    /// Token structurally invalid or signature mismatch.
    InvalidToken,
    /// Valid signature, expiry in the past.
    ExpiredToken,
    /// Token subject no longer exists in the store.
    UserGone,
    /// Login attempt with an unknown identifier or wrong password.
    BadCredentials,
}

impl AuthRejection {
    pub fn code(&self) -> &'static str {
        match self {
            AuthRejection::NoCredential => "no_credential",
            AuthRejection::InvalidToken => "invalid_token",
            AuthRejection::ExpiredToken => "expired_token",
            AuthRejection::UserGone => "user_gone",
            AuthRejection::BadCredentials => "bad_credentials",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthRejection::NoCredential => "No token provided, authorization denied",
            AuthRejection::InvalidToken => "Invalid token",
            AuthRejection::ExpiredToken => "Token expired",
            AuthRejection::UserGone => "User not found",
            AuthRejection::BadCredentials => "Invalid username/email or password",
        }
    }
}

/// One variant per failure taxonomy entry. Every variant carries a stable
/// machine-readable code alongside its human message; handlers never match
/// on message text.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{}", .0.message())]
    Unauthenticated(AuthRejection),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Internal server error")]
    Store(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Conflict(_) => "conflict",
            ApiError::Unauthenticated(reason) => reason.code(),
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Store(_) => "store_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Store(e) => {
                tracing::error!("Store error: {:#}", e);
                // Detailed chain in debug builds only
                if cfg!(debug_assertions) {
                    format!("{:#}", e)
                } else {
                    self.to_string()
                }
            }
            other => other.to_string(),
        };
        (
            self.status(),
            Json(json!({
                "success": false,
                "error": self.code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_per_taxonomy_entry() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated(AuthRejection::NoCredential).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound("Post").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Store(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_rejections_have_distinct_codes_and_messages() {
        let reasons = [
            AuthRejection::NoCredential,
            AuthRejection::InvalidToken,
            AuthRejection::ExpiredToken,
            AuthRejection::UserGone,
            AuthRejection::BadCredentials,
        ];
        for (i, a) in reasons.iter().enumerate() {
            for b in &reasons[i + 1..] {
                assert_ne!(a.code(), b.code());
                assert_ne!(a.message(), b.message());
            }
        }
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::NotFound("Post").to_string(), "Post not found");
    }
}
