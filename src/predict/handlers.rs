use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument};

use crate::{classifier::disease_info, error::ApiError, state::AppState};

use super::dto::PredictResponse;
use super::upload::{allowed_file, sanitize_filename};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}

/// POST /predict (multipart, field `image`)
///
/// Saves the upload under its sanitized filename, decodes it, runs the frozen
/// model and returns the winning label with its metadata. Saved files are
/// never cleaned up; the upload directory grows without bound.
#[instrument(skip(state, multipart))]
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("No image uploaded".into()))?
    {
        if field.name() == Some("image") {
            let filename = field
                .file_name()
                .ok_or_else(|| ApiError::BadRequest("No image uploaded".into()))?
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Failed to read file data".into()))?;
            upload = Some((filename, data));
            break;
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| ApiError::BadRequest("No image uploaded".into()))?;

    if !allowed_file(&filename) {
        return Err(ApiError::BadRequest("Unsupported file type".into()));
    }

    let safe_filename = sanitize_filename(&filename);
    let path = state.config.upload_dir.join(&safe_filename);
    tokio::fs::write(&path, &data)
        .await
        .with_context(|| format!("save upload {}", path.display()))?;

    let img = image::load_from_memory(&data)
        .map_err(|_| ApiError::BadRequest("Could not decode image".into()))?;

    let label = state.classifier.classify(&img)?;
    let meta = disease_info(label);

    info!(%label, filename = %safe_filename, "image classified");
    Ok(Json(PredictResponse {
        result: label,
        definition: meta.definition,
        color: meta.color,
        healthy: meta.is_healthy(),
        image_url: format!("/static/uploads/{safe_filename}"),
    }))
}
