//! Unified metadata update handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use tracing::info;

use cropdesk::{Crop, ImageRecord};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for a full replace of one record.
#[derive(Debug, Deserialize)]
pub struct UpdatePropertiesRequest {
    pub filename: String,
    pub processed: bool,
    pub approved: bool,
    pub crop_left: i64,
    pub crop_top: i64,
    pub crop_size: u32,
}

impl UpdatePropertiesRequest {
    fn record(&self) -> ImageRecord {
        ImageRecord::new(
            self.processed,
            self.approved,
            Crop::new(self.crop_left, self.crop_top, self.crop_size),
        )
    }
}

/// POST /update_properties - Replace all five fields of a record and persist.
///
/// Responds with the filename on success. A failed save leaves the record as
/// it was.
pub async fn update_properties(
    State(state): State<AppState>,
    payload: Result<Json<UpdatePropertiesRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let record = req.record();
    let mut db = state.db.write().await;
    if !db.commit(&req.filename, |db| db.update(&req.filename, record))? {
        return Err(ApiError::unknown_image());
    }

    info!(
        filename = %req.filename,
        processed = req.processed,
        approved = req.approved,
        crop_size = req.crop_size,
        "Updated image"
    );

    Ok(req.filename)
}
