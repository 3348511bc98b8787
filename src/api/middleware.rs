//! Authentication and authorization middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use log::warn;

use super::error::{ApiError, ApiResult, OrInternal};
use super::AppState;
use crate::auth::{bearer_token, Claims};
use crate::constants::{AUTH_ADMIN_REQUIRED, AUTH_NOT_ALLOWED, FAILED_GET_USER};
use crate::entities::user;
use crate::repositories::UserRepository;

/// Identity attached to authenticated requests.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub claims: Claims,
    /// Stored account for the token's email, if one exists
    pub user: Option<user::Model>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

/// Verify the bearer token and, when enforced, the user allow-list.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> ApiResult<Response> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header)?;
    let claims = state.verifier.verify(token).await?;

    let user = UserRepository::get_by_email(state.conn(), &claims.email)
        .await
        .or_internal(FAILED_GET_USER)?;

    if state.config.auth.enforce_allow_list && !user.as_ref().is_some_and(|u| u.is_allowed) {
        warn!("🚫 Rejected request from {}", claims.email);
        return Err(ApiError::forbidden(AUTH_NOT_ALLOWED));
    }

    request.extensions_mut().insert(AuthUser { claims, user });
    Ok(next.run(request).await)
}

/// Require an administrator. Must run after [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> ApiResult<Response> {
    let is_admin = request
        .extensions()
        .get::<AuthUser>()
        .is_some_and(AuthUser::is_admin);

    if !is_admin {
        return Err(ApiError::forbidden(AUTH_ADMIN_REQUIRED));
    }
    Ok(next.run(request).await)
}
