//! Image listing and raw image handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use cropdesk::{CropdeskError, ImageRecord, validate_filename};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// One entry of the image listing: the record with its filename merged in.
#[derive(Serialize)]
pub struct ImageListing {
    pub filename: String,
    #[serde(flatten)]
    pub record: ImageRecord,
}

/// GET /get_images - List every record, sorted by filename.
pub async fn get_images(State(state): State<AppState>) -> Json<Vec<ImageListing>> {
    let db = state.db.read().await;

    let images = db
        .iter()
        .map(|(filename, record)| ImageListing {
            filename: filename.to_string(),
            record: *record,
        })
        .collect();

    Json(images)
}

/// GET /get_image/:filename - Raw image bytes from the image directory.
///
/// Only the file system is consulted; a file without a metadata record is
/// still served.
pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    if validate_filename(&filename).is_err() {
        return Err(ApiError::file_not_found());
    }

    let path = state.image_dir.join(&filename);
    if !path.is_file() {
        return Err(ApiError::file_not_found());
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| CropdeskError::Io {
            path: path.clone(),
            source,
        })?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response())
}
