//! Administrator user management.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::{ApiError, ApiResult, OrInternal};
use super::middleware::AuthUser;
use super::payload::parse_id;
use super::AppState;
use crate::constants::{
    ERROR_INVALID_USER_ID, ERROR_IS_ALLOWED_REQUIRED, ERROR_USER_NOT_FOUND, FAILED_DELETE_USER, FAILED_FETCH_USERS,
    FAILED_UPDATE_USER, SUCCESS_USER_DELETED,
};
use crate::entities::user;
use crate::repositories::UserRepository;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedPayload {
    pub is_allowed: Option<bool>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<user::Model>>> {
    let users = UserRepository::get_all(state.conn())
        .await
        .or_internal(FAILED_FETCH_USERS)?;
    Ok(Json(users))
}

pub async fn set_allowed(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<AllowedPayload>, JsonRejection>,
) -> ApiResult<Json<user::Model>> {
    let id = parse_id(&id, ERROR_INVALID_USER_ID)?;
    let Json(payload) = payload?;
    let is_allowed = payload
        .is_allowed
        .ok_or_else(|| ApiError::bad_request(ERROR_IS_ALLOWED_REQUIRED))?;

    let updated = UserRepository::set_allowed(state.conn(), &id, is_allowed)
        .await
        .or_internal(FAILED_UPDATE_USER)?
        .ok_or_else(|| ApiError::not_found(ERROR_USER_NOT_FOUND))?;

    info!(
        "🔐 {} set isAllowed={} for {}",
        admin.claims.email, is_allowed, updated.email
    );
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, ERROR_INVALID_USER_ID)?;
    let deleted = UserRepository::delete(state.conn(), &id)
        .await
        .or_internal(FAILED_DELETE_USER)?;
    if !deleted {
        return Err(ApiError::not_found(ERROR_USER_NOT_FOUND));
    }

    info!("🔐 {} deleted user {}", admin.claims.email, id);
    Ok(Json(json!({ "message": SUCCESS_USER_DELETED })))
}
