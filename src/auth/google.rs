//! Google ID token verification through the tokeninfo endpoint.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;

use super::{AuthError, Claims, TokenVerifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GoogleTokenVerifier {
    client: reqwest::Client,
    tokeninfo_url: String,
    client_id: String,
}

impl GoogleTokenVerifier {
    pub fn new(client_id: impl Into<String>, tokeninfo_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Network(e.to_string()))?;

        Ok(Self {
            client,
            tokeninfo_url: tokeninfo_url.into(),
            client_id: client_id.into(),
        })
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            debug!("tokeninfo rejected token with status {}", response.status());
            return Err(AuthError::Invalid(format!("tokeninfo returned {}", response.status())));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AuthError::Invalid(format!("Malformed tokeninfo response: {}", e)))?;

        claims_from_tokeninfo(&body, &self.client_id, Utc::now().timestamp())
    }
}

/// Validate a tokeninfo payload for `client_id` at time `now`.
pub fn claims_from_tokeninfo(body: &Value, client_id: &str, now: i64) -> Result<Claims, AuthError> {
    let aud = string_field(body, "aud").ok_or_else(|| AuthError::Invalid("missing audience".to_string()))?;
    if aud != client_id {
        warn!("⚠️  Token issued for a different client: {}", aud);
        return Err(AuthError::Invalid("audience mismatch".to_string()));
    }

    let exp = body
        .get("exp")
        .and_then(|exp| match exp {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
        .ok_or_else(|| AuthError::Invalid("missing expiry".to_string()))?;
    if exp <= now {
        return Err(AuthError::Expired);
    }

    let email = string_field(body, "email").ok_or_else(|| AuthError::Invalid("missing email".to_string()))?;
    let sub = string_field(body, "sub").unwrap_or_else(|| email.clone());

    Ok(Claims {
        sub,
        email,
        name: string_field(body, "name"),
        picture: string_field(body, "picture"),
        exp,
    })
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}
