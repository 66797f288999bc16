use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One scraped result record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchResult {
    pub fn new(title: String, url: String, snippet: String) -> SearchResult {
        SearchResult {
            title,
            url,
            snippet,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub count: usize,
    pub timestamp: String,
}

impl SearchResponse {
    /// `count` is always derived from `results`, never set independently.
    pub fn new(query: String, results: Vec<SearchResult>) -> SearchResponse {
        SearchResponse {
            query,
            count: results.len(),
            results,
            timestamp: now_timestamp(),
        }
    }

    /// Renders the results as the context block the chat client prepends to
    /// a model prompt. Returns `None` when there is nothing to add.
    pub fn to_prompt_context(&self, user_query: &str) -> Option<String> {
        if self.results.is_empty() {
            return None;
        }
        let context = self
            .results
            .iter()
            .map(|r| format!("Title: {}\nSnippet: {}\nURL: {}", r.title, r.snippet, r.url))
            .collect::<Vec<String>>()
            .join("\n\n");

        Some(format!(
            "Context from web search:\n{context}\n\nUser Query: {user_query}\n\n\
             Please answer the user's query using the provided context if relevant."
        ))
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(n: usize) -> SearchResult {
        SearchResult::new(
            format!("Title {n}"),
            format!("https://example{n}.com/"),
            format!("Snippet {n}"),
        )
    }

    #[test]
    fn test_count_tracks_results() {
        let response = SearchResponse::new("rust".into(), vec![result(1), result(2)]);
        assert_eq!(response.count, 2);
        assert_eq!(response.query, "rust");

        let empty = SearchResponse::new("nothing".into(), vec![]);
        assert_eq!(empty.count, 0);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'), "timestamp should be UTC: {ts}");
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        // millisecond precision: "....ss.mmmZ"
        let fraction = ts.rsplit('.').next().unwrap();
        assert_eq!(fraction.len(), 4);
    }

    #[test]
    fn test_prompt_context() {
        let response = SearchResponse::new("rust".into(), vec![result(1), result(2)]);
        let context = response.to_prompt_context("what is rust?").unwrap();

        assert!(context.starts_with("Context from web search:\n"));
        assert!(context.contains(
            "Title: Title 1\nSnippet: Snippet 1\nURL: https://example1.com/\n\nTitle: Title 2"
        ));
        assert!(context.contains("User Query: what is rust?"));

        let empty = SearchResponse::new("rust".into(), vec![]);
        assert!(empty.to_prompt_context("what is rust?").is_none());
    }
}
