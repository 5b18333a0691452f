//! Request and response bodies for the image cache endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query string of `GET /download-image`
#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    pub url: Option<String>,
}

/// Result of a completed (or short-circuited) image download
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub url: String,
    pub path: String,
    pub original_url: String,
    pub file_size: u64,
    pub content_type: String,
}

/// One cached image in the listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    pub filename: String,
    pub url: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageListResponse {
    pub images: Vec<ImageSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub filename: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// Runtime diagnostics served at `/php-info`
#[derive(Debug, Serialize)]
pub struct RuntimeInfo {
    pub name: String,
    pub version: String,
    pub os: String,
    pub arch: String,
    pub family: String,
    pub pid: u32,
    pub current_dir: Option<String>,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: u64,
    pub app_url: String,
    pub storage_root: String,
    pub fetch_timeout_secs: u64,
}

/// Request details echoed by `/test-route`
#[derive(Debug, Serialize)]
pub struct RequestEcho {
    pub url: String,
    pub host: String,
    pub path: String,
    #[serde(rename = "fullUrl")]
    pub full_url: String,
}

#[derive(Debug, Serialize)]
pub struct TestRouteResponse {
    pub message: String,
    pub app_url: String,
    pub request: RequestEcho,
    pub headers: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_response_serialization() {
        let response = DownloadResponse {
            success: true,
            message: "Resim başarıyla indirildi".to_string(),
            filename: "aB3dE6gH9j_cat.png".to_string(),
            url: "http://localhost:8000/storage/downloaded_images/aB3dE6gH9j_cat.png".to_string(),
            path: "downloaded_images/aB3dE6gH9j_cat.png".to_string(),
            original_url: "https://example.com/cat.png".to_string(),
            file_size: 2048,
            content_type: "image/png".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["file_size"], 2048);
        assert_eq!(json["content_type"], "image/png");
        assert_eq!(json["original_url"], "https://example.com/cat.png");
    }

    #[test]
    fn test_request_echo_uses_full_url_key() {
        let echo = RequestEcho {
            url: "http://localhost/test-route".to_string(),
            host: "localhost".to_string(),
            path: "test-route".to_string(),
            full_url: "http://localhost/test-route?a=1".to_string(),
        };

        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["fullUrl"], "http://localhost/test-route?a=1");
        assert!(json.get("full_url").is_none());
    }

    #[test]
    fn test_download_params_missing_url() {
        let params: DownloadParams = serde_json::from_str("{}").unwrap();
        assert!(params.url.is_none());
    }
}
