//! Highlight handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Extension, Json};
use chrono::Utc;
use log::info;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::{ApiError, ApiResult, OrInternal};
use super::middleware::AuthUser;
use super::payload::{double_option, non_blank, parse_id, parse_id_list, CategoryInput, OneOrMany};
use super::query::{counted, ListParams};
use super::AppState;
use crate::constants::{
    DASHBOARD_DEFAULT_LIMIT, ERROR_CATEGORY_NOT_FOUND, ERROR_HIGHLIGHT_NOT_FOUND, ERROR_HIGHLIGHT_REQUIRED_FIELDS,
    ERROR_INVALID_CATEGORY_ID, ERROR_INVALID_DATE, ERROR_INVALID_HIGHLIGHT_ID, ERROR_NO_HIGHLIGHTS_TO_DELETE,
    ERROR_SEQ_TAKEN, ERROR_UNKNOWN_SDG, FAILED_CREATE_HIGHLIGHT, FAILED_DASHBOARD_HIGHLIGHTS, FAILED_DELETE_HIGHLIGHTS,
    FAILED_FETCH_HIGHLIGHTS, FAILED_GET_HIGHLIGHT, FAILED_UPDATE_HIGHLIGHT, SUCCESS_HIGHLIGHT_CREATED,
    SUCCESS_HIGHLIGHT_UPDATED, WARNING_IMAGES_DROPPED,
};
use crate::entities::{category, highlight};
use crate::media::{plan_update, UploadProfile};
use crate::repositories::{CategoryRepository, HighlightRepository, PopulatedHighlight, SdgRepository};
use crate::utils::datetime::normalize_date;

/// Highlight with its category populated.
#[derive(Clone, Debug, Serialize)]
pub struct HighlightView {
    #[serde(flatten)]
    pub highlight: highlight::Model,
    pub category: Option<category::Model>,
}

impl From<PopulatedHighlight> for HighlightView {
    fn from((highlight, category): PopulatedHighlight) -> Self {
        Self { highlight, category }
    }
}

/// Dashboard card: the highlight plus its first image.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardHighlight {
    #[serde(flatten)]
    pub view: HighlightView,
    pub featured_image: Option<String>,
}

/// Create/update body. Every field is optional so PATCH only touches what is sent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPayload {
    pub seq: Option<i32>,
    pub title: Option<String>,
    pub sdg: Option<OneOrMany>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<CategoryInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    pub content: Option<String>,
    pub status: Option<highlight::Status>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub limit: Option<u64>,
}

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let filter = params.highlight_filter()?;
    let (total, rows) = HighlightRepository::list(state.conn(), &filter)
        .await
        .or_internal(FAILED_FETCH_HIGHLIGHTS)?;

    let views: Vec<HighlightView> = rows.into_iter().map(HighlightView::from).collect();
    Ok(counted(total, views))
}

pub async fn dashboard(
    State(state): State<AppState>,
    params: Result<Query<DashboardParams>, QueryRejection>,
) -> ApiResult<Json<Vec<DashboardHighlight>>> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DASHBOARD_DEFAULT_LIMIT);
    let rows = HighlightRepository::get_published_recent(state.conn(), limit)
        .await
        .or_internal(FAILED_DASHBOARD_HIGHLIGHTS)?;

    Ok(Json(
        rows.into_iter()
            .map(|row| {
                let view = HighlightView::from(row);
                let featured_image = view.highlight.images.first().cloned();
                DashboardHighlight { view, featured_image }
            })
            .collect(),
    ))
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<HighlightView>> {
    let id = parse_id(&id, ERROR_INVALID_HIGHLIGHT_ID)?;
    let row = HighlightRepository::get_populated(state.conn(), &id)
        .await
        .or_internal(FAILED_GET_HIGHLIGHT)?
        .ok_or_else(|| ApiError::not_found(ERROR_HIGHLIGHT_NOT_FOUND))?;
    Ok(Json(row.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<HighlightPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(payload) = payload?;
    let conn = state.conn();

    let (Some(title), Some(content)) = (non_blank(payload.title), payload.content.filter(|c| !c.trim().is_empty()))
    else {
        return Err(ApiError::bad_request(ERROR_HIGHLIGHT_REQUIRED_FIELDS));
    };

    let sdg = validate_sdgs(payload.sdg.map(OneOrMany::into_vec).unwrap_or_default())?;
    let category_id = resolve_category(conn, payload.category.flatten()).await?;
    let date = normalize(payload.date.flatten())?;
    let seq = assign_seq(conn, payload.seq, None).await?;

    let requested = payload.images.unwrap_or_default();
    let images = state.images.process_images(&requested, &state.highlight_uploads).await;
    let dropped = expected_uploads(&requested, &state.highlight_uploads) > images.len();

    let now = Utc::now();
    let model = highlight::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        seq: ActiveValue::Set(seq),
        title: ActiveValue::Set(title),
        sdg: ActiveValue::Set(sdg.into()),
        category_id: ActiveValue::Set(category_id),
        date: ActiveValue::Set(date),
        location: ActiveValue::Set(non_blank(payload.location.flatten())),
        images: ActiveValue::Set(images.clone().into()),
        content: ActiveValue::Set(content),
        status: ActiveValue::Set(payload.status.unwrap_or_default()),
        email: ActiveValue::Set(non_blank(payload.email).or_else(|| Some(auth.claims.email.clone()))),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
    };

    let created = match HighlightRepository::create(conn, model).await {
        Ok(created) => created,
        Err(e) => {
            // Nothing references the fresh uploads
            let uploaded = images.into_iter().filter(|url| !requested.contains(url)).collect();
            state.images.spawn_cleanup(uploaded);
            return Err(ApiError::internal(FAILED_CREATE_HIGHLIGHT, format!("{:#}", e)));
        }
    };
    info!("✨ Created highlight #{} '{}'", created.seq, created.title);

    let view = populate(conn, created).await?;
    let mut body = json!({ "message": SUCCESS_HIGHLIGHT_CREATED, "highlight": view });
    if dropped {
        body["warning"] = json!(WARNING_IMAGES_DROPPED);
    }
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<HighlightPayload>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, ERROR_INVALID_HIGHLIGHT_ID)?;
    let Json(payload) = payload?;
    let conn = state.conn();

    let existing = HighlightRepository::get_by_id(conn, &id)
        .await
        .or_internal(FAILED_UPDATE_HIGHLIGHT)?
        .ok_or_else(|| ApiError::not_found(ERROR_HIGHLIGHT_NOT_FOUND))?;

    let mut active: highlight::ActiveModel = existing.clone().into();

    if let Some(title) = payload.title {
        let title = non_blank(Some(title)).ok_or_else(|| ApiError::bad_request(ERROR_HIGHLIGHT_REQUIRED_FIELDS))?;
        active.title = ActiveValue::Set(title);
    }
    if let Some(content) = payload.content {
        if content.trim().is_empty() {
            return Err(ApiError::bad_request(ERROR_HIGHLIGHT_REQUIRED_FIELDS));
        }
        active.content = ActiveValue::Set(content);
    }
    if let Some(sdg) = payload.sdg {
        active.sdg = ActiveValue::Set(validate_sdgs(sdg.into_vec())?.into());
    }
    if let Some(category) = payload.category {
        active.category_id = ActiveValue::Set(resolve_category(conn, category).await?);
    }
    if let Some(date) = payload.date {
        active.date = ActiveValue::Set(normalize(date)?);
    }
    if let Some(location) = payload.location {
        active.location = ActiveValue::Set(non_blank(location));
    }
    if let Some(status) = payload.status {
        active.status = ActiveValue::Set(status);
    }
    if let Some(email) = payload.email {
        active.email = ActiveValue::Set(non_blank(Some(email)));
    }
    if let Some(seq) = payload.seq {
        if seq != existing.seq {
            active.seq = ActiveValue::Set(assign_seq(conn, Some(seq), Some(id)).await?);
        }
    }

    let mut stale = Vec::new();
    let mut fresh = Vec::new();
    if let Some(incoming) = payload.images {
        let plan = plan_update(&existing.images.0, &incoming);
        let profile = UploadProfile {
            max_images: state.highlight_uploads.max_images.saturating_sub(plan.retained.len()),
            ..state.highlight_uploads.clone()
        };

        let mut images = plan.retained.clone();
        if !plan.to_upload.is_empty() {
            info!("📸 Processing {} new images for highlight {}", plan.to_upload.len(), id);
            images.extend(state.images.process_images(&plan.to_upload, &profile).await);
        }
        fresh = plan.fresh_uploads(&images);
        active.images = ActiveValue::Set(images.into());
        stale = plan.to_delete;
    }

    active.updated_at = ActiveValue::Set(Utc::now());
    let updated = match HighlightRepository::update(conn, active).await {
        Ok(updated) => updated,
        Err(e) => {
            // The stored record still points at the old images
            if !fresh.is_empty() {
                state.images.spawn_cleanup(fresh);
            }
            return Err(ApiError::internal(FAILED_UPDATE_HIGHLIGHT, format!("{:#}", e)));
        }
    };

    if !stale.is_empty() {
        info!("🗑️  Removing {} replaced images", stale.len());
        state.images.spawn_cleanup(stale);
    }

    let view = populate(conn, updated).await?;
    Ok(Json(json!({ "message": SUCCESS_HIGHLIGHT_UPDATED, "highlight": view })))
}

pub async fn delete(State(state): State<AppState>, Path(ids): Path<String>) -> ApiResult<Json<Value>> {
    let ids = parse_id_list(&ids, ERROR_INVALID_HIGHLIGHT_ID)?;
    let conn = state.conn();

    let found = HighlightRepository::get_many(conn, &ids)
        .await
        .or_internal(FAILED_DELETE_HIGHLIGHTS)?;
    if found.is_empty() {
        return Err(ApiError::not_found(ERROR_NO_HIGHLIGHTS_TO_DELETE));
    }

    let images: Vec<String> = found.iter().flat_map(|h| h.images.iter().cloned()).collect();
    let deleted = HighlightRepository::delete_many(conn, &ids)
        .await
        .or_internal(FAILED_DELETE_HIGHLIGHTS)?;

    if !images.is_empty() {
        state.images.spawn_cleanup(images);
    }

    let noun = if deleted == 1 { "highlight" } else { "highlights" };
    Ok(Json(json!({ "message": format!("Successfully deleted {} {}", deleted, noun) })))
}

async fn populate<C: ConnectionTrait>(conn: &C, highlight: highlight::Model) -> ApiResult<HighlightView> {
    let category = match highlight.category_id {
        Some(category_id) => CategoryRepository::get_by_id(conn, &category_id)
            .await
            .or_internal(FAILED_GET_HIGHLIGHT)?,
        None => None,
    };
    Ok(HighlightView { highlight, category })
}

/// Trim, dedupe and check tags against the known SDG labels.
fn validate_sdgs(labels: Vec<String>) -> ApiResult<Vec<String>> {
    let mut validated: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if label.is_empty() || validated.iter().any(|known| known == label) {
            continue;
        }
        if !SdgRepository::is_known(label) {
            return Err(ApiError::bad_request(format!("{}: {}", ERROR_UNKNOWN_SDG, label)));
        }
        validated.push(label.to_string());
    }
    Ok(validated)
}

/// Resolve a category reference; an empty reference clears the category.
async fn resolve_category<C: ConnectionTrait>(conn: &C, input: Option<CategoryInput>) -> ApiResult<Option<Uuid>> {
    let Some(raw) = input.as_ref().map(|c| c.id().trim()).filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let id = parse_id(raw, ERROR_INVALID_CATEGORY_ID)?;
    CategoryRepository::get_by_id(conn, &id)
        .await
        .or_internal(FAILED_GET_HIGHLIGHT)?
        .map(|category| Some(category.id))
        .ok_or_else(|| ApiError::bad_request(ERROR_CATEGORY_NOT_FOUND))
}

fn normalize(date: Option<String>) -> ApiResult<Option<String>> {
    match date {
        Some(date) => normalize_date(&date).map_err(|_| ApiError::bad_request(ERROR_INVALID_DATE)),
        None => Ok(None),
    }
}

/// Use the requested sequence number if free, otherwise the next one.
async fn assign_seq<C: ConnectionTrait>(conn: &C, requested: Option<i32>, exclude: Option<Uuid>) -> ApiResult<i32> {
    match requested {
        Some(seq) => {
            let taken = HighlightRepository::seq_taken(conn, seq, exclude)
                .await
                .or_internal(FAILED_CREATE_HIGHLIGHT)?;
            if taken {
                return Err(ApiError::bad_request(ERROR_SEQ_TAKEN));
            }
            Ok(seq)
        }
        None => HighlightRepository::next_seq(conn).await.or_internal(FAILED_CREATE_HIGHLIGHT),
    }
}

/// How many non-empty images the profile would accept from `requested`.
fn expected_uploads(requested: &[String], profile: &UploadProfile) -> usize {
    requested
        .iter()
        .take(profile.max_images)
        .filter(|image| !image.trim().is_empty())
        .count()
}
