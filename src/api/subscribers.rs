//! Newsletter subscriber handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::{ApiError, ApiResult, OrInternal};
use super::AppState;
use crate::constants::{
    ERROR_EMAIL_REQUIRED, ERROR_INVALID_EMAIL, ERROR_INVALID_SUBSCRIBER_ID, ERROR_NO_SUBSCRIBERS_DELETED,
    ERROR_SUBSCRIBER_EXISTS, FAILED_CREATE_SUBSCRIBER, FAILED_DELETE_SUBSCRIBERS, FAILED_FETCH_SUBSCRIBERS,
    SUBSCRIBER_CSV_FILENAME, SUBSCRIBER_CSV_HEADER, SUCCESS_SUBSCRIBED,
};
use crate::entities::subscriber;
use crate::repositories::SubscriberRepository;
use crate::utils::datetime::format_timestamp_date;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Default, Deserialize)]
pub struct SubscribePayload {
    pub email: Option<String>,
}

/// Outcome for one id of a bulk delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeletionResult {
    pub id: String,
    pub success: bool,
    pub message: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<subscriber::Model>>> {
    let subscribers = SubscriberRepository::get_all(state.conn())
        .await
        .or_internal(FAILED_FETCH_SUBSCRIBERS)?;
    Ok(Json(subscribers))
}

/// All subscribers as CSV, newest first.
pub async fn export_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let subscribers = SubscriberRepository::get_all(state.conn())
        .await
        .or_internal(FAILED_FETCH_SUBSCRIBERS)?;

    let disposition = format!("attachment; filename=\"{}\"", SUBSCRIBER_CSV_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        subscribers_csv(&subscribers),
    )
        .into_response())
}

pub async fn subscribe(
    State(state): State<AppState>,
    payload: Result<Json<SubscribePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(payload) = payload?;
    let email = payload
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request(ERROR_EMAIL_REQUIRED))?;

    if !is_valid_email(&email) {
        return Err(ApiError::bad_request(ERROR_INVALID_EMAIL));
    }

    let conn = state.conn();
    let existing = SubscriberRepository::get_by_email(conn, &email)
        .await
        .or_internal(FAILED_CREATE_SUBSCRIBER)?;
    if existing.is_some() {
        return Err(ApiError::bad_request(ERROR_SUBSCRIBER_EXISTS));
    }

    let created = SubscriberRepository::create(conn, &email)
        .await
        .or_internal(FAILED_CREATE_SUBSCRIBER)?;
    info!("📬 New subscriber #{}", created.seq);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": SUCCESS_SUBSCRIBED, "data": created })),
    ))
}

/// Delete a comma separated list of subscribers, reporting per id.
pub async fn delete(State(state): State<AppState>, Path(ids): Path<String>) -> ApiResult<(StatusCode, Json<Value>)> {
    let conn = state.conn();
    let mut results = Vec::new();

    for raw in ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        let result = match Uuid::parse_str(raw) {
            Err(_) => failure(raw, ERROR_INVALID_SUBSCRIBER_ID),
            Ok(id) => match SubscriberRepository::delete(conn, &id).await {
                Ok(true) => DeletionResult {
                    id: raw.to_string(),
                    success: true,
                    message: "Successfully deleted".to_string(),
                },
                Ok(false) => failure(raw, "Subscriber not found"),
                Err(e) => {
                    error!("❌ {}: {:#}", FAILED_DELETE_SUBSCRIBERS, e);
                    failure(raw, "Failed to delete")
                }
            },
        };
        results.push(result);
    }

    let deleted = results.iter().filter(|r| r.success).count();
    if deleted == 0 {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": ERROR_NO_SUBSCRIBERS_DELETED, "results": results })),
        ));
    }

    let noun = if deleted == 1 { "subscriber" } else { "subscribers" };
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Successfully deleted {} {}", deleted, noun), "results": results })),
    ))
}

fn failure(id: &str, message: &str) -> DeletionResult {
    DeletionResult {
        id: id.to_string(),
        success: false,
        message: message.to_string(),
    }
}

/// Render `Sequence,Email,Subscription Date` rows.
pub fn subscribers_csv(subscribers: &[subscriber::Model]) -> String {
    let mut csv = String::from(SUBSCRIBER_CSV_HEADER);
    csv.push('\n');
    for subscriber in subscribers {
        csv.push_str(&format!(
            "{},{},{}\n",
            subscriber.seq,
            csv_field(&subscriber.email),
            format_timestamp_date(&subscriber.created_at)
        ));
    }
    csv
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
