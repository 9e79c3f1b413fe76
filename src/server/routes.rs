//! Request routing: static files, SPA fallback and CORS.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::handler::Handler;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::services::ServeDir;
use tracing::{debug, warn};

/// Extensions that name real assets. A missing file with one of these is a
/// 404, never the SPA entry point.
pub const STATIC_EXTENSIONS: &[&str] = &[
    "xmlui", "xs", "html", "js", "mjs", "css", "png", "jpg", "jpeg", "gif", "svg", "ico", "webp",
    "woff", "woff2", "ttf", "eot", "otf", "json", "xml", "txt", "map", "mp4", "webm", "mp3",
    "wav", "pdf", "zip", "tar", "gz",
];

/// Build the router serving `root`, falling back to `root/<index_file>`.
pub fn router(root: &Path, index_file: &str) -> Router {
    let index = Arc::new(root.join(index_file));
    let files = ServeDir::new(root).fallback(spa_fallback.with_state(index));

    Router::new()
        .fallback_service(files)
        .layer(middleware::from_fn(cors))
}

/// Whether the last segment of a request path ends in an allow-listed asset
/// extension. The extension is whatever follows the segment's last `.`.
pub fn is_static_asset(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .is_some_and(|ext| {
            STATIC_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

async fn spa_fallback(State(index): State<Arc<PathBuf>>, uri: Uri) -> Response {
    if is_static_asset(uri.path()) {
        debug!(path = uri.path(), "Asset not found");
        return not_found();
    }

    match tokio::fs::read(index.as_ref()).await {
        Ok(body) => ([(CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response(),
        Err(e) => {
            warn!(index = %index.display(), error = %e, "SPA entry point unavailable");
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found\n").into_response()
}

/// Permissive CORS on every response; `OPTIONS` is answered here.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    response
}
