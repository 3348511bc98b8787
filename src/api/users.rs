//! User bootstrap and identity handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::{ApiError, ApiResult, OrInternal};
use super::middleware::AuthUser;
use super::payload::{non_blank, parse_id};
use super::AppState;
use crate::constants::{
    AUTH_WORKING, ERROR_EMAIL_REQUIRED, ERROR_INVALID_USER_ID, ERROR_USER_NOT_FOUND, FAILED_CREATE_USER,
    FAILED_GET_USER,
};
use crate::entities::user;
use crate::repositories::{NewUser, UserRepository};

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// Authorization summary returned by `GET /users/{id}`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccess {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub is_allowed: bool,
    pub is_admin: bool,
    pub email: String,
    pub name: String,
}

impl From<user::Model> for UserAccess {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            is_allowed: user.is_allowed,
            is_admin: user.is_admin,
            email: user.email,
            name: user.name,
        }
    }
}

/// Return the user for `email`, creating it on first login.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserPayload>, JsonRejection>,
) -> ApiResult<Json<user::Model>> {
    let Json(payload) = payload?;
    let email = non_blank(payload.email).ok_or_else(|| ApiError::bad_request(ERROR_EMAIL_REQUIRED))?;
    let conn = state.conn();

    if let Some(existing) = UserRepository::get_by_email(conn, &email)
        .await
        .or_internal(FAILED_CREATE_USER)?
    {
        return Ok(Json(existing));
    }

    let auth = &state.config.auth;
    let is_admin = auth.is_admin_email(&email);
    let new_user = NewUser {
        name: non_blank(payload.name).unwrap_or_else(|| email.clone()),
        avatar: non_blank(payload.avatar),
        is_allowed: is_admin || auth.auto_allow_new_users,
        is_admin,
        email,
    };

    let created = UserRepository::create(conn, new_user)
        .await
        .or_internal(FAILED_CREATE_USER)?;
    info!(
        "👤 Registered {} (allowed: {}, admin: {})",
        created.email, created.is_allowed, created.is_admin
    );
    Ok(Json(created))
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<UserAccess>> {
    let id = parse_id(&id, ERROR_INVALID_USER_ID)?;
    let user = UserRepository::get_by_id(state.conn(), &id)
        .await
        .or_internal(FAILED_GET_USER)?
        .ok_or_else(|| ApiError::not_found(ERROR_USER_NOT_FOUND))?;
    Ok(Json(user.into()))
}

/// Echo the verified claims.
pub async fn test_auth(Extension(auth): Extension<AuthUser>) -> Json<Value> {
    Json(json!({ "message": AUTH_WORKING, "user": auth.claims }))
}
