//! Press release handlers.
//!
//! A press release carries exactly one hosted image. On update the new image
//! is uploaded first; the old one is only removed once the record points at
//! its replacement.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use log::{info, warn};
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::{ApiError, ApiResult, OrInternal};
use super::payload::{non_blank, parse_id, parse_id_list, OneOrMany};
use super::query::{counted, ListParams};
use super::AppState;
use crate::constants::{
    ERROR_IMAGE_PROCESSING_FAILED, ERROR_INVALID_DATE, ERROR_INVALID_PRESS_RELEASE_ID, ERROR_NO_PRESS_RELEASES_TO_DELETE,
    ERROR_PRESS_RELEASE_NOT_FOUND, ERROR_PRESS_RELEASE_REQUIRED_FIELDS, ERROR_SEQ_TAKEN, FAILED_CREATE_PRESS_RELEASE,
    FAILED_DELETE_PRESS_RELEASE, FAILED_FETCH_PRESS_RELEASES, FAILED_GET_PRESS_RELEASE, FAILED_UPDATE_PRESS_RELEASE,
    SUCCESS_PRESS_RELEASE_CREATED, SUCCESS_PRESS_RELEASE_DELETED, SUCCESS_PRESS_RELEASE_UPDATED,
};
use crate::entities::press_release;
use crate::media::data_uri::is_data_uri;
use crate::repositories::PressReleaseRepository;
use crate::utils::datetime::normalize_date;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressReleasePayload {
    pub seq: Option<i32>,
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
    /// Hosted URL or data URI; a list is accepted and its first entry used
    pub image: Option<OneOrMany>,
}

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let (total, rows) = PressReleaseRepository::list(state.conn(), &params.press_release_filter())
        .await
        .or_internal(FAILED_FETCH_PRESS_RELEASES)?;
    Ok(counted(total, rows))
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<press_release::Model>> {
    let id = parse_id(&id, ERROR_INVALID_PRESS_RELEASE_ID)?;
    let row = PressReleaseRepository::get_by_id(state.conn(), &id)
        .await
        .or_internal(FAILED_GET_PRESS_RELEASE)?
        .ok_or_else(|| ApiError::not_found(ERROR_PRESS_RELEASE_NOT_FOUND))?;
    Ok(Json(row))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<PressReleasePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(payload) = payload?;
    let conn = state.conn();

    let image = payload.image.and_then(OneOrMany::into_first);
    let (Some(title), Some(publisher), Some(date), Some(link), Some(image)) = (
        non_blank(payload.title),
        non_blank(payload.publisher),
        non_blank(payload.date),
        non_blank(payload.link),
        non_blank(image),
    ) else {
        return Err(ApiError::bad_request(ERROR_PRESS_RELEASE_REQUIRED_FIELDS));
    };

    let date = required_date(&date)?;
    let seq = assign_seq(conn, payload.seq, None).await?;

    let hosted = upload_image(&state, &image)
        .await
        .ok_or_else(|| ApiError::internal(FAILED_CREATE_PRESS_RELEASE, ERROR_IMAGE_PROCESSING_FAILED))?;

    let now = Utc::now();
    let model = press_release::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        seq: ActiveValue::Set(seq),
        title: ActiveValue::Set(title),
        publisher: ActiveValue::Set(publisher),
        date: ActiveValue::Set(date),
        image: ActiveValue::Set(hosted.clone()),
        link: ActiveValue::Set(link),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
    };

    let created = match PressReleaseRepository::create(conn, model).await {
        Ok(created) => created,
        Err(e) => {
            if hosted != image {
                state.images.spawn_cleanup(vec![hosted]);
            }
            return Err(ApiError::internal(FAILED_CREATE_PRESS_RELEASE, format!("{:#}", e)));
        }
    };
    info!("📰 Created press release #{} '{}'", created.seq, created.title);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": SUCCESS_PRESS_RELEASE_CREATED, "pressRelease": created })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PressReleasePayload>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, ERROR_INVALID_PRESS_RELEASE_ID)?;
    let Json(payload) = payload?;
    let conn = state.conn();

    let existing = PressReleaseRepository::get_by_id(conn, &id)
        .await
        .or_internal(FAILED_UPDATE_PRESS_RELEASE)?
        .ok_or_else(|| ApiError::not_found(ERROR_PRESS_RELEASE_NOT_FOUND))?;

    let mut active: press_release::ActiveModel = existing.clone().into();

    if let Some(title) = payload.title {
        active.title = ActiveValue::Set(required(title)?);
    }
    if let Some(publisher) = payload.publisher {
        active.publisher = ActiveValue::Set(required(publisher)?);
    }
    if let Some(link) = payload.link {
        active.link = ActiveValue::Set(required(link)?);
    }
    if let Some(date) = payload.date {
        active.date = ActiveValue::Set(required_date(&date)?);
    }
    if let Some(seq) = payload.seq {
        if seq != existing.seq {
            active.seq = ActiveValue::Set(assign_seq(conn, Some(seq), Some(id)).await?);
        }
    }

    let mut replaced = None;
    let mut fresh = None;
    if let Some(image) = non_blank(payload.image.and_then(OneOrMany::into_first)) {
        if image != existing.image {
            match upload_image(&state, &image).await {
                Some(hosted) => {
                    if hosted != image {
                        fresh = Some(hosted.clone());
                    }
                    active.image = ActiveValue::Set(hosted);
                    replaced = Some(existing.image.clone());
                }
                None => warn!("⚠️  New image for press release {} failed, keeping the current one", id),
            }
        }
    }

    active.updated_at = ActiveValue::Set(Utc::now());
    let updated = match PressReleaseRepository::update(conn, active).await {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(hosted) = fresh {
                state.images.spawn_cleanup(vec![hosted]);
            }
            return Err(ApiError::internal(FAILED_UPDATE_PRESS_RELEASE, format!("{:#}", e)));
        }
    };

    if let Some(old) = replaced {
        state.images.spawn_cleanup(vec![old]);
    }

    Ok(Json(json!({ "message": SUCCESS_PRESS_RELEASE_UPDATED, "pressRelease": updated })))
}

pub async fn delete(State(state): State<AppState>, Path(ids): Path<String>) -> ApiResult<Json<Value>> {
    let ids = parse_id_list(&ids, ERROR_INVALID_PRESS_RELEASE_ID)?;
    let conn = state.conn();

    let found = PressReleaseRepository::get_many(conn, &ids)
        .await
        .or_internal(FAILED_DELETE_PRESS_RELEASE)?;
    if found.is_empty() {
        return Err(ApiError::not_found(ERROR_NO_PRESS_RELEASES_TO_DELETE));
    }

    let images: Vec<String> = found.into_iter().map(|pr| pr.image).collect();
    let deleted = PressReleaseRepository::delete_many(conn, &ids)
        .await
        .or_internal(FAILED_DELETE_PRESS_RELEASE)?;
    state.images.spawn_cleanup(images);

    let message = if deleted == 1 {
        SUCCESS_PRESS_RELEASE_DELETED.to_string()
    } else {
        format!("Successfully deleted {} press releases", deleted)
    };
    Ok(Json(json!({ "message": message })))
}

/// Upload a data URI, or pass a hosted URL through. `None` when the upload failed.
async fn upload_image(state: &AppState, image: &str) -> Option<String> {
    if !is_data_uri(image) {
        return Some(image.to_string());
    }
    state
        .images
        .process_images(&[image.to_string()], &state.press_release_uploads)
        .await
        .into_iter()
        .next()
}

fn required(value: String) -> ApiResult<String> {
    non_blank(Some(value)).ok_or_else(|| ApiError::bad_request(ERROR_PRESS_RELEASE_REQUIRED_FIELDS))
}

fn required_date(date: &str) -> ApiResult<String> {
    match normalize_date(date) {
        Ok(Some(date)) => Ok(date),
        Ok(None) => Err(ApiError::bad_request(ERROR_PRESS_RELEASE_REQUIRED_FIELDS)),
        Err(_) => Err(ApiError::bad_request(ERROR_INVALID_DATE)),
    }
}

async fn assign_seq<C: ConnectionTrait>(conn: &C, requested: Option<i32>, exclude: Option<Uuid>) -> ApiResult<i32> {
    match requested {
        Some(seq) => {
            let taken = PressReleaseRepository::seq_taken(conn, seq, exclude)
                .await
                .or_internal(FAILED_CREATE_PRESS_RELEASE)?;
            if taken {
                return Err(ApiError::bad_request(ERROR_SEQ_TAKEN));
            }
            Ok(seq)
        }
        None => PressReleaseRepository::next_seq(conn)
            .await
            .or_internal(FAILED_CREATE_PRESS_RELEASE),
    }
}
