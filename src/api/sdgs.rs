use axum::extract::State;
use axum::Json;

use super::error::{ApiResult, OrInternal};
use super::AppState;
use crate::constants::FAILED_FETCH_SDGS;
use crate::entities::sdg;
use crate::repositories::SdgRepository;

/// The seeded SDG labels in goal order.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<sdg::Model>>> {
    let sdgs = SdgRepository::get_all(state.conn())
        .await
        .or_internal(FAILED_FETCH_SDGS)?;
    Ok(Json(sdgs))
}
