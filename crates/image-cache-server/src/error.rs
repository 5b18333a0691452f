//! Error types for the image cache server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Usage hint returned when the `url` parameter is missing
const DOWNLOAD_EXAMPLE: &str = "/download-image?url=https://example.com/image.jpg";

/// Request-level error type that converts to HTTP responses
#[derive(Debug)]
pub enum AppError {
    MissingUrl,
    InvalidUrl(String),
    /// Fetch failed; `status` is `None` for timeouts and connection errors
    DownloadFailed { status: Option<u16> },
    NotAnImage { content_type: String },
    NotFound(String),
    RouteNotFound {
        requested_path: String,
        available_routes: Vec<String>,
    },
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingUrl => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "URL parametresi gerekli", "example": DOWNLOAD_EXAMPLE }),
            ),
            AppError::InvalidUrl(url) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Geçersiz URL formatı", "url": url }),
            ),
            AppError::DownloadFailed { status } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Resim indirilemedi", "status": status }),
            ),
            AppError::NotAnImage { content_type } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "URL bir resim dosyası değil", "content_type": content_type }),
            ),
            AppError::NotFound(filename) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Resim bulunamadı", "filename": filename }),
            ),
            AppError::RouteNotFound {
                requested_path,
                available_routes,
            } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "404 - Route not found",
                    "requested_path": requested_path,
                    "available_routes": available_routes,
                }),
            ),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Bir hata oluştu", "message": msg }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<blob_store::BlobStoreError> for AppError {
    fn from(err: blob_store::BlobStoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Errors that abort server startup
#[derive(Debug)]
pub enum ServerError {
    BlobStore(blob_store::BlobStoreError),
    Fetcher(remote_fetcher::FetchError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::BlobStore(err) => write!(f, "Blob store error: {}", err),
            ServerError::Fetcher(err) => write!(f, "Fetcher error: {}", err),
            ServerError::Io(err) => write!(f, "IO error: {}", err),
            ServerError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::BlobStore(err) => Some(err),
            ServerError::Fetcher(err) => Some(err),
            ServerError::Io(err) => Some(err.as_ref()),
            ServerError::Config(_) => None,
        }
    }
}

impl From<blob_store::BlobStoreError> for ServerError {
    fn from(err: blob_store::BlobStoreError) -> Self {
        ServerError::BlobStore(err)
    }
}

impl From<remote_fetcher::FetchError> for ServerError {
    fn from(err: remote_fetcher::FetchError) -> Self {
        ServerError::Fetcher(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ServerError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ServerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
