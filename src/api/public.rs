//! Unauthenticated feeds for the public website.
//!
//! Highlights are restricted to published ones whatever the query asks for.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

use super::error::{ApiError, ApiResult, OrInternal};
use super::highlights::HighlightView;
use super::payload::parse_id;
use super::query::{counted, ListParams};
use super::AppState;
use crate::constants::{
    ERROR_HIGHLIGHT_NOT_FOUND, ERROR_INVALID_HIGHLIGHT_ID, ERROR_INVALID_PRESS_RELEASE_ID, ERROR_PRESS_RELEASE_NOT_FOUND,
    FAILED_FETCH_HIGHLIGHTS, FAILED_FETCH_PRESS_RELEASES, FAILED_GET_HIGHLIGHT, FAILED_GET_PRESS_RELEASE,
};
use crate::entities::{highlight, press_release};
use crate::repositories::{HighlightRepository, PressReleaseRepository};

pub async fn list_highlights(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(mut params) = params?;
    params.status = None;

    let mut filter = params.highlight_filter()?;
    filter.status = Some(highlight::Status::Published);

    let (total, rows) = HighlightRepository::list(state.conn(), &filter)
        .await
        .or_internal(FAILED_FETCH_HIGHLIGHTS)?;
    let views: Vec<HighlightView> = rows.into_iter().map(HighlightView::from).collect();
    Ok(counted(total, views))
}

pub async fn get_highlight(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<HighlightView>> {
    let id = parse_id(&id, ERROR_INVALID_HIGHLIGHT_ID)?;
    let row = HighlightRepository::get_populated(state.conn(), &id)
        .await
        .or_internal(FAILED_GET_HIGHLIGHT)?
        .filter(|(row, _)| row.status == highlight::Status::Published)
        .ok_or_else(|| ApiError::not_found(ERROR_HIGHLIGHT_NOT_FOUND))?;
    Ok(Json(row.into()))
}

pub async fn list_press_releases(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let (total, rows) = PressReleaseRepository::list(state.conn(), &params.press_release_filter())
        .await
        .or_internal(FAILED_FETCH_PRESS_RELEASES)?;
    Ok(counted(total, rows))
}

pub async fn get_press_release(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<press_release::Model>> {
    let id = parse_id(&id, ERROR_INVALID_PRESS_RELEASE_ID)?;
    let row = PressReleaseRepository::get_by_id(state.conn(), &id)
        .await
        .or_internal(FAILED_GET_PRESS_RELEASE)?
        .ok_or_else(|| ApiError::not_found(ERROR_PRESS_RELEASE_NOT_FOUND))?;
    Ok(Json(row))
}
