//! Refine style list query parameters.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use crate::constants::TOTAL_COUNT_HEADER;
use crate::entities::highlight;
use crate::repositories::{HighlightFilter, ListWindow, PressReleaseFilter, SortOrder};

/// `?_start=0&_end=10&_sort=title&_order=asc&title_like=...`
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ListParams {
    #[serde(rename = "_start")]
    pub start: Option<u64>,
    #[serde(rename = "_end")]
    pub end: Option<u64>,
    #[serde(rename = "_sort")]
    pub sort: Option<String>,
    #[serde(rename = "_order")]
    pub order: Option<String>,
    pub title_like: Option<String>,
    pub status: Option<String>,
    pub publisher: Option<String>,
    pub limit: Option<u64>,
}

impl ListParams {
    pub fn window(&self) -> ListWindow {
        ListWindow {
            start: self.start.unwrap_or(0),
            end: self.end,
        }
    }

    pub fn order(&self) -> SortOrder {
        self.order.as_deref().and_then(SortOrder::parse).unwrap_or_default()
    }

    pub fn highlight_filter(&self) -> ApiResult<HighlightFilter> {
        let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                highlight::Status::parse(raw)
                    .ok_or_else(|| ApiError::bad_request(format!("Invalid status '{}'", raw)))?,
            ),
            None => None,
        };

        Ok(HighlightFilter {
            status,
            title_like: self.title_like.clone(),
            sort: self.sort.as_deref().and_then(HighlightFilter::sort_column),
            order: self.order(),
            window: self.window(),
        })
    }

    pub fn press_release_filter(&self) -> PressReleaseFilter {
        PressReleaseFilter {
            publisher: self.publisher.clone().filter(|p| !p.is_empty()),
            title_like: self.title_like.clone(),
            sort: self.sort.as_deref().and_then(PressReleaseFilter::sort_column),
            order: self.order(),
            window: self.window(),
        }
    }
}

/// JSON list body with the unpaginated match count in `x-total-count`.
pub fn counted<T: Serialize>(total: u64, items: T) -> Response {
    ([(TOTAL_COUNT_HEADER, total.to_string())], Json(items)).into_response()
}
