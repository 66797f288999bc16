use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA,
};

use crate::config::Config;
use crate::data_models::SearchResponse;
use crate::error::SearchError;
use crate::extractor::ResultExtractor;

/// Fetches the upstream lite results page and turns it into a
/// [`SearchResponse`]. One outbound request per call, no retries.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    upstream_url: String,
    timeout_ms: u64,
    extractor: ResultExtractor,
}

impl SearchClient {
    pub fn new(config: &Config) -> Result<SearchClient, SearchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(browser_headers())
            .build()
            .map_err(SearchError::Upstream)?;

        Ok(SearchClient {
            client,
            upstream_url: config.upstream_url.clone(),
            timeout_ms: config.timeout_ms,
            extractor: ResultExtractor::from_config(config),
        })
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let html = self.fetch_page(query).await?;
        let (results, strategy) = self.extractor.extract_with_strategy(&html);
        log::info!(
            "found {} results for {query:?} ({strategy:?})",
            results.len()
        );
        Ok(SearchResponse::new(query.to_string(), results))
    }

    /// The lite endpoint only returns results for a form POST.
    async fn fetch_page(&self, query: &str) -> Result<String, SearchError> {
        let res = self
            .client
            .post(&self.upstream_url)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(e, self.timeout_ms))?;

        if !res.status().is_success() {
            return Err(SearchError::UpstreamStatus(res.status()));
        }

        let body = res
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(e, self.timeout_ms))?;
        Ok(body)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}
