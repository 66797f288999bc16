use anyhow::{Context, Result};
use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::SearchError;
use crate::upstream::SearchClient;

pub mod handlers;
pub mod models;

/// Shared, read-only state for all requests.
pub struct AppState {
    pub config: Config,
    pub search_client: SearchClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<AppState, SearchError> {
        let search_client = SearchClient::new(&config)?;
        Ok(AppState {
            config,
            search_client,
        })
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/search",
            get(handlers::search_handler).fallback(handlers::not_found_handler),
        )
        .route(
            "/health",
            get(handlers::health_handler).fallback(handlers::not_found_handler),
        )
        .fallback(handlers::not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
}

/// Answers preflights for any path and stamps the open CORS headers on
/// every response. Meant for a single local user, not an untrusted network.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers
        .entry(header::CONTENT_TYPE)
        .or_insert(HeaderValue::from_static("application/json"));
    response
}

pub async fn serve(config: Config) -> Result<()> {
    let addr = config.listen_addr();
    let state = Arc::new(AppState::new(config).context("Failed to build upstream client")?);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("search proxy listening on http://{addr}");
    tracing::info!("  health check: http://{addr}/health");
    tracing::info!("  search:       http://{addr}/search?q=your+query");
    tracing::info!("  upstream:     {}", state.config.upstream_url);

    axum::serve(listener, create_router(state))
        .await
        .context("Server error")?;
    Ok(())
}
