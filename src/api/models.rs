use serde::{Deserialize, Serialize};

use crate::data_models::SearchResult;

#[derive(Debug, Default)]
pub struct SearchParams {
    pub q: Option<String>,
}

impl SearchParams {
    /// Keeps the first `q` when the parameter is repeated.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> SearchParams {
        SearchParams {
            q: pairs.into_iter().find(|(k, _)| k == "q").map(|(_, v)| v),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Body of every non-2xx response. The upstream-failure fields are only
/// serialized for search failures so a 400/404 stays `{error}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SearchResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> ErrorResponse {
        ErrorResponse {
            error: error.into(),
            message: None,
            results: None,
            count: None,
        }
    }

    pub fn search_failed(error: impl Into<String>, message: String) -> ErrorResponse {
        ErrorResponse {
            error: error.into(),
            message: Some(message),
            results: Some(Vec::new()),
            count: Some(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_q_wins() {
        let params = SearchParams::from_pairs(pairs(&[("x", "1"), ("q", "a"), ("q", "b")]));
        assert_eq!(params.q.as_deref(), Some("a"));

        assert!(SearchParams::from_pairs(pairs(&[("Q", "a")])).q.is_none());
        assert!(SearchParams::from_pairs(vec![]).q.is_none());
    }
}
