//! Bearer token authentication.
//!
//! Clients sign in with Google and send the resulting ID token as
//! `Authorization: Bearer <token>`. A [`TokenVerifier`] turns the token into
//! [`Claims`]; authorization against the stored user allow-list happens in
//! the API middleware.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod google;

pub use google::GoogleTokenVerifier;

/// Identity asserted by a verified token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No token provided")]
    MissingToken,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token verification unavailable: {0}")]
    Network(String),
}

/// Verifies ID tokens.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Extract the token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or("")
        .trim();

    if token.is_empty() {
        Err(AuthError::MissingToken)
    } else {
        Ok(token)
    }
}
