//! Category handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::{ApiError, ApiResult, OrInternal};
use super::payload::{non_blank, parse_id};
use super::AppState;
use crate::constants::{
    ERROR_CATEGORY_EXISTS, ERROR_CATEGORY_NOT_FOUND, ERROR_CATEGORY_REQUIRED, ERROR_INVALID_CATEGORY_ID,
    FAILED_CREATE_CATEGORY, FAILED_DELETE_CATEGORY, FAILED_FETCH_CATEGORIES, FAILED_UPDATE_CATEGORY,
    SUCCESS_CATEGORY_DELETED,
};
use crate::entities::category;
use crate::repositories::CategoryRepository;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    pub category: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<category::Model>>> {
    let categories = CategoryRepository::get_all(state.conn())
        .await
        .or_internal(FAILED_FETCH_CATEGORIES)?;
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<category::Model>)> {
    let Json(payload) = payload?;
    let name = non_blank(payload.category).ok_or_else(|| ApiError::bad_request(ERROR_CATEGORY_REQUIRED))?;
    let conn = state.conn();

    let existing = CategoryRepository::get_by_name(conn, &name)
        .await
        .or_internal(FAILED_CREATE_CATEGORY)?;
    if existing.is_some() {
        return Err(ApiError::bad_request(ERROR_CATEGORY_EXISTS));
    }

    let created = CategoryRepository::create(conn, &name)
        .await
        .or_internal(FAILED_CREATE_CATEGORY)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<Json<category::Model>> {
    let id = parse_id(&id, ERROR_INVALID_CATEGORY_ID)?;
    let Json(payload) = payload?;
    let name = non_blank(payload.category).ok_or_else(|| ApiError::bad_request(ERROR_CATEGORY_REQUIRED))?;
    let conn = state.conn();

    let clash = CategoryRepository::get_by_name(conn, &name)
        .await
        .or_internal(FAILED_UPDATE_CATEGORY)?;
    if clash.is_some_and(|other| other.id != id) {
        return Err(ApiError::bad_request(ERROR_CATEGORY_EXISTS));
    }

    let renamed = CategoryRepository::rename(conn, &id, &name)
        .await
        .or_internal(FAILED_UPDATE_CATEGORY)?
        .ok_or_else(|| ApiError::not_found(ERROR_CATEGORY_NOT_FOUND))?;
    Ok(Json(renamed))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, ERROR_INVALID_CATEGORY_ID)?;
    let deleted = CategoryRepository::delete(state.conn(), &id)
        .await
        .or_internal(FAILED_DELETE_CATEGORY)?;
    if !deleted {
        return Err(ApiError::not_found(ERROR_CATEGORY_NOT_FOUND));
    }
    Ok(Json(json!({ "message": SUCCESS_CATEGORY_DELETED })))
}
