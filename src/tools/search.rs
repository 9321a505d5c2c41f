//! Web search tool.
//!
//! Uses SerpAPI when `SERPAPI_KEY` is configured. Without a key it answers
//! with a fixed-shape placeholder result set so agents stay usable offline.

use std::sync::Arc;
use std::time::Duration;

use agent_core::{FunctionTool, Tool};
use reqwest::Client;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";
pub const RESULT_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search service returned {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SearchResult>,
}

pub struct WebSearch {
    client: Client,
    api_key: Option<String>,
}

impl WebSearch {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!(query, "no search credential; returning placeholder results");
            return Ok(placeholder_results(query));
        };

        let num = RESULT_COUNT.to_string();
        let response = self
            .client
            .get(SERPAPI_ENDPOINT)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("num", num.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status()));
        }
        let body: SerpApiResponse = response.json().await?;
        Ok(body.organic_results.into_iter().take(RESULT_COUNT).collect())
    }
}

/// Three deterministic entries echoing the query.
pub fn placeholder_results(query: &str) -> Vec<SearchResult> {
    (1..=RESULT_COUNT)
        .map(|index| SearchResult {
            title: format!("Search result {index} for '{query}'"),
            link: format!("https://example.com/search/{index}"),
            snippet: format!(
                "Placeholder result {index}. Set SERPAPI_KEY to enable live web search."
            ),
        })
        .collect()
}

pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "{}. {}\n   {}\n   {}",
                index + 1,
                result.title,
                result.link,
                result.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Search query.
    pub query: String,
}

pub fn web_search_tool(search: Arc<WebSearch>) -> Arc<dyn Tool> {
    FunctionTool::new(
        "web_search",
        "Search the web for recent information. Returns titles, links and snippets.",
        move |args: SearchArgs| {
            let search = search.clone();
            async move {
                match search.search(&args.query).await {
                    Ok(results) => format_results(&results),
                    Err(err) => {
                        warn!(%err, "web search failed");
                        format!("Failed to search the web: {err}")
                    }
                }
            }
        },
    )
    .into_arc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_set_without_credential() {
        let search = WebSearch::new(None);
        assert!(!search.has_credential());
        let results = search.search("rust async").await.unwrap();
        assert_eq!(results.len(), 3);
        for result in &results {
            assert!(!result.title.is_empty());
            assert!(result.link.starts_with("https://"));
            assert!(!result.snippet.is_empty());
        }
        assert_eq!(results, placeholder_results("rust async"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        assert!(!WebSearch::new(Some("  ".into())).has_credential());
    }

    #[test]
    fn serpapi_payload_parses() {
        let body: SerpApiResponse = serde_json::from_str(
            r#"{"organic_results": [{"title": "Rust", "link": "https://rust-lang.org", "position": 1}]}"#,
        )
        .unwrap();
        assert_eq!(body.organic_results[0].snippet, "");
    }

    #[test]
    fn formatting_numbers_entries() {
        let text = format_results(&placeholder_results("q"));
        assert!(text.starts_with("1. Search result 1 for 'q'"));
        assert!(text.contains("\n3. "));
    }
}
