//! Web Server for the IPAM UI
//!
//! Serves the embedded web UI, publishes `/api/info`, and proxies every
//! other `/api/*` request to the IPAM backend.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, Response, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use ipam_shared::{ApiInfo, ApiVersion};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ConsoleError;

/// Embedded UI assets (compiled WASM app)
#[derive(RustEmbed)]
#[folder = "../ui/dist/"]
#[allow_missing = true]
struct UiAssets;

/// Served in place of `index.html` when the UI was not built before the console
const UI_NOT_BUILT: &str = "<!DOCTYPE html>\n<html><body>\n<p>The IPAM UI has not been built. Run <code>trunk build --release</code> in <code>ui/</code> and rebuild the console.</p>\n</body></html>\n";

/// Server state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Base URL of the IPAM backend, without the `/api` prefix
    pub backend_url: String,
    pub api_version: ApiVersion,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(backend_url: &str, api_version: ApiVersion) -> Self {
        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            api_version,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Build the router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Which backend and route layout the UI should use
        .route("/api/info", get(api_info))
        // Everything else under /api goes to the backend
        .route("/api/*path", any(proxy_api))
        // Serve UI assets - index.html for root
        .route("/", get(serve_index))
        // Use fallback for all other paths (static files and SPA routing)
        .fallback(serve_static)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server
pub async fn start_server(
    port: u16,
    state: AppState,
) -> anyhow::Result<tokio::task::JoinHandle<anyhow::Result<()>>> {
    let backend = state.backend_url.clone();
    let app = create_router(Arc::new(state));

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("UI server listening on {}", addr);
    info!("Proxying /api to {}", backend);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))
    });

    Ok(handle)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn api_info(State(state): State<Arc<AppState>>) -> Json<ApiInfo> {
    Json(ApiInfo {
        backend: state.backend_url.clone(),
        api_version: state.api_version,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn proxy_api(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response<Body> {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let url = format!("{}{}", state.backend_url, path_and_query);

    match proxy_request(&state.http_client, &url, req).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("proxy {} failed: {}", url, e);
            e.into_response()
        }
    }
}

/// Forward a request as-is and relay the answer, whatever its status
async fn proxy_request(
    client: &reqwest::Client,
    url: &str,
    req: Request<Body>,
) -> Result<Response<Body>, ConsoleError> {
    let method = req.method().clone();
    let headers = req.headers().clone();

    let body_bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .map_err(|e| ConsoleError::Body(e.to_string()))?;

    // Build the proxied request
    let mut proxy_req = client.request(method, url);

    // Copy relevant headers
    for (name, value) in headers.iter() {
        if name != header::HOST {
            proxy_req = proxy_req.header(name, value);
        }
    }

    let upstream = proxy_req.body(body_bytes).send().await?;
    tracing::debug!(status = %upstream.status(), "proxied {}", url);

    let status = upstream.status();
    let upstream_headers = upstream.headers().clone();
    let body = upstream.bytes().await?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    copy_response_headers(&upstream_headers, response.headers_mut());
    Ok(response)
}

/// Hop-by-hop headers describe the upstream connection, not the payload
fn copy_response_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from.iter() {
        if name != header::TRANSFER_ENCODING && name != header::CONNECTION && name != header::CONTENT_LENGTH {
            to.append(name.clone(), value.clone());
        }
    }
}

/// Serve index.html
async fn serve_index() -> Response<Body> {
    serve_index_file()
}

/// Serve static files from embedded assets (fallback handler)
async fn serve_static(req: Request<Body>) -> Response<Body> {
    let path = req.uri().path().to_string();
    tracing::debug!("Fallback handler called for path: {}", path);

    // Try the exact path first
    if let Some(response) = try_serve_file(&path) {
        return response;
    }

    // For SPA routing, serve index.html for non-asset paths
    if !path.contains('.') {
        return serve_index_file();
    }

    // 404 for missing assets
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn try_serve_file(path: &str) -> Option<Response<Body>> {
    let path = path.trim_start_matches('/');
    UiAssets::get(path).map(|content| {
        let mime = mime_guess::from_path(path).first_or_octet_stream().to_string();
        (
            [
                (header::CONTENT_TYPE, mime),
                (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
            ],
            content.data.into_owned(),
        )
            .into_response()
    })
}

fn serve_index_file() -> Response<Body> {
    let body = match UiAssets::get("index.html") {
        Some(content) => content.data.into_owned(),
        None => UI_NOT_BUILT.as_bytes().to_vec(),
    };
    ([(header::CONTENT_TYPE, "text/html")], body).into_response()
}
