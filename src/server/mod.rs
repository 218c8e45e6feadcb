//! Static/telemetry HTTP service.
//!
//! Serves the dashboard bundle and the live snapshot files out of the
//! project root. The one contract that matters here: anything under
//! `/data/` is served no-cache so the sync loop always sees current bytes;
//! everything else gets a default cache lifetime.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Dashboard entry point the root path redirects to.
pub const DASHBOARD_PATH: &str = "/web/out/";

/// Path prefix that must never be cached by clients.
const LIVE_DATA_PREFIX: &str = "/data/";

const DEFAULT_CACHE: &str = "max-age=3600";
const NO_CACHE: &str = "no-cache";

pub fn build_app(project_root: PathBuf) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]);

    Router::new()
        .route("/", get(redirect_root))
        .fallback(serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(project_root))
}

async fn redirect_root() -> Redirect {
    Redirect::temporary(DASHBOARD_PATH)
}

async fn serve_static(State(root): State<Arc<PathBuf>>, uri: Uri) -> Response {
    let mut path = uri.path().to_string();
    if path.ends_with('/') {
        path.push_str("index.html");
    }

    let Some(file_path) = resolve(&root, &path) else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    match tokio::fs::read(&file_path).await {
        Ok(bytes) => {
            let cache = if path.starts_with(LIVE_DATA_PREFIX) {
                NO_CACHE
            } else {
                DEFAULT_CACHE
            };
            (
                [
                    (header::CONTENT_TYPE, mime_type(&path)),
                    (header::CACHE_CONTROL, cache),
                ],
                bytes,
            )
                .into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Map a URL path onto a file under the project root, rejecting anything
/// that would escape it.
fn resolve(root: &Path, url_path: &str) -> Option<PathBuf> {
    let relative = url_path.trim_start_matches('/');
    let candidate = Path::new(relative);
    for component in candidate.components() {
        match component {
            Component::Normal(_) => {}
            _ => return None,
        }
    }
    Some(root.join(candidate))
}

fn mime_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "html" => "text/html",
        "js" => "application/javascript",
        "css" => "text/css",
        "json" => "application/json",
        "txt" | "log" => "text/plain",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        _ => "application/octet-stream",
    }
}
