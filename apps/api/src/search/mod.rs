//! Web search for the market-research stage (Google Custom Search JSON API).
//!
//! Searching never fails from the caller's point of view: missing configuration,
//! transport errors and quota errors come back in `SearchResponse::error`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
const RESULTS_PER_QUERY: u32 = 5;
const REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    #[serde(rename = "displayLink")]
    pub display_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn failed(query: &str, error: impl Into<String>) -> Self {
        Self {
            query: query.to_string(),
            results: Vec::new(),
            total_results: None,
            error: Some(error.into()),
        }
    }
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> SearchResponse;
}

// Wire format of the Custom Search API (only the fields we read).

#[derive(Debug, Deserialize)]
struct CustomSearchBody {
    #[serde(default)]
    items: Vec<CustomSearchItem>,
    #[serde(rename = "searchInformation")]
    search_information: Option<SearchInformation>,
}

#[derive(Debug, Deserialize)]
struct CustomSearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(rename = "displayLink", default)]
    display_link: String,
}

#[derive(Debug, Deserialize)]
struct SearchInformation {
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

impl CustomSearchBody {
    fn into_response(self, query: &str) -> SearchResponse {
        SearchResponse {
            query: query.to_string(),
            results: self
                .items
                .into_iter()
                .map(|item| SearchResult {
                    title: item.title,
                    link: item.link,
                    snippet: item.snippet,
                    display_link: item.display_link,
                })
                .collect(),
            total_results: Some(
                self.search_information
                    .and_then(|info| info.total_results)
                    .unwrap_or_else(|| "0".to_string()),
            ),
            error: None,
        }
    }
}

struct Credentials {
    api_key: String,
    cse_id: String,
}

/// Google Custom Search client. Unconfigured when either credential is absent.
#[derive(Clone)]
pub struct GoogleSearchClient {
    client: Client,
    credentials: Option<std::sync::Arc<Credentials>>,
}

impl GoogleSearchClient {
    pub fn new(api_key: Option<String>, cse_id: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let credentials = match (api_key, cse_id) {
            (Some(api_key), Some(cse_id)) => {
                Some(std::sync::Arc::new(Credentials { api_key, cse_id }))
            }
            _ => None,
        };
        Ok(Self {
            client,
            credentials,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl WebSearch for GoogleSearchClient {
    async fn search(&self, query: &str) -> SearchResponse {
        let Some(credentials) = &self.credentials else {
            return SearchResponse::failed(query, "Google Search API not configured");
        };

        let num = RESULTS_PER_QUERY.to_string();
        let response = self
            .client
            .get(CUSTOM_SEARCH_URL)
            .query(&[
                ("key", credentials.api_key.as_str()),
                ("cx", credentials.cse_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("Search request failed for '{query}': {e}");
                return SearchResponse::failed(query, format!("Search failed: {e}"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Search API returned {status} for '{query}'");
            return SearchResponse::failed(query, format!("Search failed ({status}): {body}"));
        }

        match response.json::<CustomSearchBody>().await {
            Ok(body) => {
                let parsed = body.into_response(query);
                debug!("Search '{query}' returned {} results", parsed.results.len());
                parsed
            }
            Err(e) => SearchResponse::failed(query, format!("Search failed: {e}")),
        }
    }
}
