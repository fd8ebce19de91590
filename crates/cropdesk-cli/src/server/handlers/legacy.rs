//! Narrow update endpoints kept for older clients.
//!
//! Both are superseded by `POST /update_properties` and persist on their own.

use axum::extract::{Path, State, rejection::PathRejection};
use tracing::info;

use cropdesk::Crop;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// GET /set_image_approved/:filename/:approved
///
/// `approved` is true when it reads `true` in any case. The record is also
/// marked processed.
pub async fn set_image_approved(
    State(state): State<AppState>,
    Path((filename, approved)): Path<(String, String)>,
) -> Result<String, ApiError> {
    let approved = approved.eq_ignore_ascii_case("true");

    let mut db = state.db.write().await;
    if !db.commit(&filename, |db| db.set_approved(&filename, approved))? {
        return Err(ApiError::unknown_image());
    }

    info!(filename = %filename, approved, "Set approval");
    Ok(filename)
}

/// GET /set_image_crop/:filename/:left/:top/:size
pub async fn set_image_crop(
    State(state): State<AppState>,
    params: Result<Path<(String, i64, i64, u32)>, PathRejection>,
) -> Result<String, ApiError> {
    let Path((filename, left, top, size)) =
        params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let crop = Crop::new(left, top, size);
    let mut db = state.db.write().await;
    if !db.commit(&filename, |db| db.set_crop(&filename, crop))? {
        return Err(ApiError::unknown_image());
    }

    info!(filename = %filename, left, top, size, "Set crop");
    Ok(filename)
}
