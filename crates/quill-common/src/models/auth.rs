use serde::{Deserialize, Serialize};

/// JWT claims: subject user id, issued-at, expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}
