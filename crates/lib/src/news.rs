//! # News Fetching
//!
//! A small client for the NewsAPI `top-headlines` endpoint. Only the first page
//! returned by the provider is read.

use crate::errors::JobError;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One news item as returned by the provider.
///
/// Fields the job does not load are ignored. Absent and `null` values both
/// deserialize to `None`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// --- NewsAPI response envelope ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TopHeadlinesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    total_results: Option<u64>,
    #[serde(default)]
    articles: Option<Vec<Article>>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A client for the NewsAPI `top-headlines` endpoint.
#[derive(Clone)]
pub struct NewsClient {
    client: ReqwestClient,
    base_url: String,
    api_key: String,
    country: String,
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url)
            .field("country", &self.country)
            .finish_non_exhaustive()
    }
}

impl NewsClient {
    /// Creates a new `NewsClient`.
    pub fn new(base_url: String, api_key: String, country: String) -> Result<Self, JobError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(JobError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            base_url,
            api_key,
            country,
        })
    }

    /// Fetches the current top headlines for the configured country.
    ///
    /// The HTTP status is checked before the body is parsed, and a body
    /// without an `articles` field is rejected with `MissingArticles`.
    pub async fn fetch_top_headlines(&self) -> Result<Vec<Article>, JobError> {
        let url = format!("{}/top-headlines", self.base_url);
        info!("Fetching top headlines for country '{}'", self.country);
        debug!(%url, "--> Sending news API request");

        // The key travels in the query string; strip URLs from transport errors.
        let response = self
            .client
            .get(&url)
            .query(&[("country", &self.country), ("apiKey", &self.api_key)])
            .send()
            .await
            .map_err(|e| JobError::NewsRequest(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| JobError::NewsRequest(e.without_url()))?;

        if !status.is_success() {
            // Error bodies are usually JSON, but keep the raw text if not.
            let parsed: Option<TopHeadlinesResponse> = serde_json::from_str(&body).ok();
            let (code, message) = match parsed {
                Some(r) => (
                    r.code.unwrap_or_else(|| "unknown".to_string()),
                    r.message.unwrap_or(body),
                ),
                None => ("unknown".to_string(), body),
            };
            return Err(JobError::NewsApi {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let headlines: TopHeadlinesResponse = serde_json::from_str(&body)?;

        if headlines.status.as_deref() == Some("error") {
            return Err(JobError::NewsApi {
                status: status.as_u16(),
                code: headlines.code.unwrap_or_else(|| "unknown".to_string()),
                message: headlines.message.unwrap_or_default(),
            });
        }

        let articles = headlines.articles.ok_or(JobError::MissingArticles)?;
        info!(
            "Received {} articles (provider reports {} total results)",
            articles.len(),
            headlines
                .total_results
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        Ok(articles)
    }
}
