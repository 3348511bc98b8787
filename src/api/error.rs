//! JSON error responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error};
use serde_json::json;

use crate::auth::AuthError;
use crate::constants::{AUTH_INVALID_TOKEN, AUTH_NO_TOKEN, AUTH_TOKEN_EXPIRED};

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by request handlers.
///
/// Every variant renders as `{"message": ...}`. Unauthorized responses also
/// carry `tokenExpired: true` so the client signs in again, and internal
/// errors add the underlying cause as `error`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn internal(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::BadRequest(message) | Self::Forbidden(message) | Self::NotFound(message) => {
                json!({ "message": message })
            }
            Self::Unauthorized(message) => json!({ "message": message, "tokenExpired": true }),
            Self::Internal { message, detail } => {
                error!("❌ {}: {}", message, detail);
                json!({ "message": message, "error": detail })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        debug!("Authentication failed: {}", err);
        let message = match err {
            AuthError::MissingToken => AUTH_NO_TOKEN,
            AuthError::Expired => AUTH_TOKEN_EXPIRED,
            AuthError::Invalid(_) | AuthError::Network(_) => AUTH_INVALID_TOKEN,
        };
        Self::Unauthorized(message.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Turn a storage failure into a 500 with a resource specific message.
pub trait OrInternal<T> {
    fn or_internal(self, message: &str) -> ApiResult<T>;
}

impl<T> OrInternal<T> for anyhow::Result<T> {
    fn or_internal(self, message: &str) -> ApiResult<T> {
        self.map_err(|e| ApiError::internal(message, format!("{:#}", e)))
    }
}
