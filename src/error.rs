use axum::http::StatusCode;
use thiserror::Error;

/// Failures talking to the upstream results page. Extraction itself cannot
/// fail: markup that matches nothing is an empty result list.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("upstream returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("upstream did not respond within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl SearchError {
    pub fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout { timeout_ms }
        } else {
            SearchError::Upstream(err)
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            SearchError::Upstream(_) | SearchError::UpstreamStatus(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label used as the `error` field of the JSON payload.
    pub fn label(&self) -> &'static str {
        match self {
            SearchError::Timeout { .. } => "Search timed out",
            SearchError::Upstream(_) | SearchError::UpstreamStatus(_) => "Search failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = SearchError::Timeout { timeout_ms: 250 };
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.label(), "Search timed out");
        assert_eq!(err.to_string(), "upstream did not respond within 250ms");
    }

    #[test]
    fn test_bad_status_maps_to_server_error() {
        let err = SearchError::UpstreamStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.label(), "Search failed");
    }
}
