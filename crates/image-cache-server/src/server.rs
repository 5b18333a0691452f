//! HTTP server for the image cache
//!
//! Builds the route table, the public `/storage` file service and the
//! JSON 404 fallback that lists every registered route.

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, MethodRouter};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::routes::{diagnostics, images};
use crate::state::SharedState;

/// Router builder that remembers the URI template of every route it adds
struct RouteRegistry {
    router: Router<SharedState>,
    uris: Vec<String>,
}

impl RouteRegistry {
    fn new() -> Self {
        Self {
            router: Router::new(),
            uris: Vec::new(),
        }
    }

    fn route(mut self, path: &str, method_router: MethodRouter<SharedState>) -> Self {
        self.uris.push(route_uri(path));
        self.router = self.router.route(path, method_router);
        self
    }

    fn nest(mut self, path: &str, router: Router<SharedState>) -> Self {
        self.uris.push(format!("{}/{{path}}", route_uri(path)));
        self.router = self.router.nest(path, router);
        self
    }
}

/// URI template as reported in route listings: no leading slash, `/` for the root
fn route_uri(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(parse_origins(&config.cors_origins))
            .allow_methods([Method::GET, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    }
}

/// Parse CORS origins, skipping the ones that are not valid header values
fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// Whether a path segment names a dotfile, including percent-encoded dots
fn is_hidden_segment(segment: &str) -> bool {
    segment.starts_with('.') || segment.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("%2e"))
}

/// Keep dotfiles under the storage root (content-type sidecars) private
async fn reject_hidden_paths(request: Request, next: Next) -> Response {
    if request.uri().path().split('/').any(is_hidden_segment) {
        let requested = diagnostics::display_path(request.uri());
        debug!(path = %requested, "Refusing to serve hidden storage path");
        return AppError::NotFound(requested).into_response();
    }
    next.run(request).await
}

/// Public file service over the storage root
fn storage_router(root: &Path) -> Router<SharedState> {
    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(middleware::from_fn(reject_hidden_paths))
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    let registry = RouteRegistry::new()
        .route("/", get(diagnostics::welcome))
        .route("/php-info", get(diagnostics::php_info))
        .route("/test-route", get(diagnostics::test_route))
        .route("/health", get(diagnostics::health))
        .route("/download-image", get(images::download_image))
        .route("/show-image/{filename}", get(images::show_image))
        .route("/list-images", get(images::list_images))
        .route("/delete-image/{filename}", delete(images::delete_image))
        .nest("/storage", storage_router(&state.config.storage_root));

    let available_routes: Arc<[String]> = registry.uris.into();
    let fallback = move |uri: Uri| {
        let available_routes = available_routes.clone();
        async move { route_not_found(&uri, &available_routes) }
    };

    registry
        .router
        .fallback(fallback.clone())
        .method_not_allowed_fallback(fallback)
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn route_not_found(uri: &Uri, available_routes: &[String]) -> AppError {
    let requested_path = diagnostics::display_path(uri);
    debug!(path = %requested_path, "No route matched");
    AppError::RouteNotFound {
        requested_path,
        available_routes: available_routes.to_vec(),
    }
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}
