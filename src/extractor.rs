use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use crate::config::Config;
use crate::data_models::SearchResult;

// Anchors and snippet cells in one selector so `select` yields them in
// document order and a snippet can be paired with the anchor before it.
static ANCHOR_OR_SNIPPET: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href], td.result-snippet").expect("valid selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Which pass produced the accepted results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Anchor followed by a `result-snippet` cell.
    AnchorWithSnippet,
    /// Bare anchors, used when the primary pass accepts nothing.
    LinksOnly,
}

#[derive(Debug, Clone)]
pub struct ResultExtractor {
    result_cap: usize,
    excluded_hosts: Vec<String>,
}

impl ResultExtractor {
    pub fn new(result_cap: usize, excluded_hosts: Vec<String>) -> ResultExtractor {
        ResultExtractor {
            result_cap,
            excluded_hosts: excluded_hosts
                .into_iter()
                .map(|h| h.to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> ResultExtractor {
        Self::new(config.result_cap, config.excluded_hosts.clone())
    }

    pub fn extract(&self, html: &str) -> Vec<SearchResult> {
        self.extract_with_strategy(html).0
    }

    /// Runs the anchor+snippet pass, falling back to the links-only pass
    /// when the first one accepts nothing. Never fails: unmatched or
    /// malformed markup gives an empty list.
    pub fn extract_with_strategy(&self, html: &str) -> (Vec<SearchResult>, Strategy) {
        let document = Html::parse_document(html);

        let results = self.anchors_with_snippets(&document);
        if !results.is_empty() {
            return (results, Strategy::AnchorWithSnippet);
        }

        log::debug!("no anchor/snippet pairs accepted, falling back to bare links");
        (self.anchors_only(&document), Strategy::LinksOnly)
    }

    fn anchors_with_snippets(&self, document: &Html) -> Vec<SearchResult> {
        let mut results = Vec::new();
        let mut seen = HashSet::new();
        let mut pending: Option<ElementRef> = None;

        for element in document.select(&ANCHOR_OR_SNIPPET) {
            if results.len() >= self.result_cap {
                break;
            }
            if element.value().name() == "a" {
                pending = Some(element);
                continue;
            }
            if let Some(anchor) = pending.take() {
                let snippet = normalize_text(&element_text(element));
                self.offer(anchor, snippet, &mut seen, &mut results);
            }
        }
        results
    }

    fn anchors_only(&self, document: &Html) -> Vec<SearchResult> {
        let mut results = Vec::new();
        let mut seen = HashSet::new();

        for anchor in document.select(&ANCHOR) {
            if results.len() >= self.result_cap {
                break;
            }
            self.offer(anchor, String::new(), &mut seen, &mut results);
        }
        results
    }

    fn offer(
        &self,
        anchor: ElementRef,
        snippet: String,
        seen: &mut HashSet<String>,
        out: &mut Vec<SearchResult>,
    ) {
        let Some(url) = anchor.value().attr("href").and_then(|h| self.accept_url(h)) else {
            return;
        };
        let title = normalize_text(&element_text(anchor));
        if title.is_empty() {
            return;
        }
        if !seen.insert(url.clone()) {
            return;
        }
        out.push(SearchResult::new(title, url, snippet));
    }

    /// Returns the trimmed href if it is an absolute http(s) link and no
    /// excluded entry appears anywhere in it, path and query included.
    pub fn accept_url(&self, href: &str) -> Option<String> {
        let href = href.trim();
        let parsed = Url::parse(href).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        parsed.host_str()?;
        let lowered = href.to_lowercase();
        if self
            .excluded_hosts
            .iter()
            .any(|excluded| lowered.contains(excluded.as_str()))
        {
            return None;
        }
        Some(href.to_string())
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Collapses every whitespace run (non-breaking spaces included) to a single
/// space and trims the ends.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}
