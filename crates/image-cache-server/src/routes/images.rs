use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use blob_store::BlobStoreError;
use tracing::{debug, info, warn};

use crate::acquisition::{file_name_of, ImageAcquisition, IMAGE_PREFIX};
use crate::error::AppError;
use crate::state::SharedState;
use crate::types::{DeleteResponse, DownloadParams, DownloadResponse, ImageListResponse, ImageSummary};

/// Store path for a client-supplied file name; names that would leave the prefix are treated as absent
fn image_path(filename: &str) -> Result<String, AppError> {
    if filename.is_empty() || filename.contains('/') || filename == "." || filename == ".." {
        return Err(AppError::NotFound(filename.to_string()));
    }
    blob_store::normalize_path(&format!("{}/{}", IMAGE_PREFIX, filename))
        .map_err(|_| AppError::NotFound(filename.to_string()))
}

fn not_found_or_internal(err: BlobStoreError, filename: &str) -> AppError {
    match err {
        BlobStoreError::NotFound(_) | BlobStoreError::InvalidPath(_) => {
            AppError::NotFound(filename.to_string())
        }
        other => other.into(),
    }
}

/// GET /download-image?url=...
pub async fn download_image(
    State(state): State<SharedState>,
    RawQuery(raw_query): RawQuery,
    params: Result<Query<DownloadParams>, QueryRejection>,
) -> Result<Json<DownloadResponse>, AppError> {
    let Query(params) = params.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Unreadable download query");
        AppError::InvalidUrl(raw_query.unwrap_or_default())
    })?;

    let response = ImageAcquisition::new(state.store.as_ref(), &state.fetcher)
        .acquire(params.url.as_deref())
        .await?;
    Ok(Json(response))
}

/// GET /list-images
pub async fn list_images(
    State(state): State<SharedState>,
) -> Result<Json<ImageListResponse>, AppError> {
    let paths = state.store.list(IMAGE_PREFIX).await?;

    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let stat = match state.store.stat(&path).await {
            Ok(stat) => stat,
            // Deleted between listing and stat
            Err(BlobStoreError::NotFound(_)) => {
                debug!(path = %path, "Image vanished while listing");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        images.push(ImageSummary {
            filename: file_name_of(&path).to_string(),
            url: state.store.url(&path),
            size: stat.size,
            last_modified: stat.last_modified,
        });
    }

    let total = images.len();
    Ok(Json(ImageListResponse { images, total }))
}

/// GET /show-image/{filename}
pub async fn show_image(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = image_path(&filename)?;

    if !state.store.exists(&path).await? {
        return Err(AppError::NotFound(filename));
    }

    let data = state
        .store
        .get(&path)
        .await
        .map_err(|e| not_found_or_internal(e, &filename))?;
    let content_type = state
        .store
        .mime_type(&path)
        .await
        .map_err(|e| not_found_or_internal(e, &filename))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// DELETE /delete-image/{filename}
pub async fn delete_image(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let path = image_path(&filename)?;

    if !state.store.exists(&path).await? {
        return Err(AppError::NotFound(filename));
    }

    state
        .store
        .delete(&path)
        .await
        .map_err(|e| not_found_or_internal(e, &filename))?;

    info!(path = %path, "Deleted cached image");

    Ok(Json(DeleteResponse {
        message: "Resim silindi".to_string(),
        filename,
    }))
}
