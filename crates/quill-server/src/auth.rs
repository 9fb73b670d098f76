use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use quill_common::models::auth::Claims;
use uuid::Uuid;

/// Scheme prefix expected on the Authorization header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Why token verification failed. Callers surface a different message
/// for each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Structurally invalid token or signature mismatch.
    #[error("invalid token")]
    Malformed,
    /// Valid signature, expiry strictly in the past.
    #[error("token expired")]
    Expired,
}

/// Hash a password using argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Create a signed bearer token for a user
pub fn issue_token(user_id: Uuid, jwt_secret: &str, ttl: Duration) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .context("Failed to sign token")
}

/// Validate a bearer token and return the subject user id.
///
/// Zero leeway: a token whose expiry equals the current second is still
/// accepted, one second past is not.
pub fn verify_token(token: &str, jwt_secret: &str) -> Result<Uuid, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    })?;
    data.claims.sub.parse().map_err(|_| TokenError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret";

    #[test]
    fn test_password_hash_and_verify_correct() {
        let password = "my-secure-password";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_password_verify_wrong() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_password_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash1, hash2);
        // Both still verify
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, SECRET, Duration::days(7)).unwrap();
        assert_eq!(verify_token(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let token = issue_token(Uuid::new_v4(), "secret-1", Duration::days(7)).unwrap();
        assert_eq!(
            verify_token(&token, "secret-2").unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        assert_eq!(
            verify_token("not-a-jwt", SECRET).unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_tampered_token_is_malformed() {
        let token = issue_token(Uuid::new_v4(), SECRET, Duration::days(7)).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert_eq!(
            verify_token(&tampered, SECRET).unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_expired_token() {
        let token = issue_token(Uuid::new_v4(), SECRET, Duration::seconds(-60)).unwrap();
        assert_eq!(verify_token(&token, SECRET).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_non_uuid_subject_is_malformed() {
        let now = Utc::now();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            verify_token(&token, SECRET).unwrap_err(),
            TokenError::Malformed
        );
    }
}
