use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::{SearchResponse, now_timestamp};

use super::AppState;
use super::models::{ErrorResponse, HealthResponse, SearchParams};

pub const SERVICE_NAME: &str = "DuckDuckGo Search Proxy";

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();

    let params = match pairs {
        Ok(Query(pairs)) => SearchParams::from_pairs(pairs),
        Err(rejection) => {
            tracing::warn!("unreadable query string: {rejection}");
            SearchParams::default()
        }
    };

    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Query parameter required")),
            ));
        }
    };

    tracing::info!("searching for: {query:?}");

    let response = state.search_client.search(&query).await.map_err(|e| {
        tracing::error!("search for {query:?} failed: {e:#}");
        (
            e.status_code(),
            Json(ErrorResponse::search_failed(e.label(), e.to_string())),
        )
    })?;

    if response.count == 0 {
        tracing::warn!("no results found for {query:?}");
    }
    tracing::debug!(
        "search for {query:?} took {}ms",
        start.elapsed().as_millis()
    );

    Ok(Json(response))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: now_timestamp(),
    })
}

pub async fn not_found_handler() -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}
