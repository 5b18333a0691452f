use axum::extract::State;
use axum::http::{header, HeaderMap, Uri};
use axum::response::Html;
use axum::Json;
use std::collections::BTreeMap;

use crate::state::SharedState;
use crate::types::{HealthResponse, RequestEcho, RuntimeInfo, TestRouteResponse};

const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Image Cache</title>
    <style>
        body { font-family: system-ui, sans-serif; margin: 3rem auto; max-width: 40rem; color: #1f2937; }
        code { background: #f3f4f6; padding: 0.1rem 0.3rem; border-radius: 0.25rem; }
        li { margin: 0.4rem 0; }
    </style>
</head>
<body>
    <h1>Image Cache</h1>
    <p>Download remote images into local storage and serve them back.</p>
    <ul>
        <li><code>GET /download-image?url=https://example.com/image.jpg</code></li>
        <li><code>GET /list-images</code></li>
        <li><code>GET /show-image/{filename}</code></li>
        <li><code>DELETE /delete-image/{filename}</code></li>
        <li><code>GET /test-route</code></li>
        <li><code>GET /php-info</code></li>
    </ul>
</body>
</html>
"#;

/// GET /
pub async fn welcome() -> Html<&'static str> {
    Html(WELCOME_PAGE)
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// GET /php-info
pub async fn php_info(State(state): State<SharedState>) -> Json<RuntimeInfo> {
    Json(RuntimeInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        family: std::env::consts::FAMILY.to_string(),
        pid: std::process::id(),
        current_dir: std::env::current_dir()
            .ok()
            .map(|p| p.display().to_string()),
        started_at: state.started_at,
        uptime_secs: state.uptime_secs(),
        app_url: state.config.app_url.clone(),
        storage_root: state.config.storage_root.display().to_string(),
        fetch_timeout_secs: state.fetcher.timeout().as_secs(),
    })
}

/// Request path without leading or trailing slashes, `/` for the root
pub fn display_path(uri: &Uri) -> String {
    let trimmed = uri.path().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// GET /test-route
pub async fn test_route(
    State(state): State<SharedState>,
    uri: Uri,
    headers: HeaderMap,
) -> Json<TestRouteResponse> {
    let authority = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_else(|| "localhost".to_string());
    let host = authority
        .rsplit_once(':')
        .filter(|(_, port)| port.chars().all(|c| c.is_ascii_digit()))
        .map(|(host, _)| host.to_string())
        .unwrap_or_else(|| authority.clone());

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");

    let url = format!("{}://{}{}", scheme, authority, uri.path());
    let full_url = match uri.query() {
        Some(query) => format!("{}?{}", url, query),
        None => url.clone(),
    };

    let mut echoed: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers.iter() {
        echoed
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    Json(TestRouteResponse {
        message: "Server is working!".to_string(),
        app_url: state.config.app_url.clone(),
        request: RequestEcho {
            url,
            host,
            path: display_path(&uri),
            full_url,
        },
        headers: echoed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(&Uri::from_static("/")), "/");
        assert_eq!(display_path(&Uri::from_static("/unknown/path")), "unknown/path");
        assert_eq!(display_path(&Uri::from_static("/test-route?a=1")), "test-route");
        assert_eq!(display_path(&Uri::from_static("/unknown/path/")), "unknown/path");
        assert_eq!(display_path(&Uri::from_static("//")), "/");
    }

    #[test]
    fn test_welcome_page_lists_endpoints() {
        assert!(WELCOME_PAGE.contains("/download-image"));
        assert!(WELCOME_PAGE.contains("/list-images"));
    }
}
