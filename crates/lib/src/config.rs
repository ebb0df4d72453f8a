//! # Job Configuration
//!
//! The static configuration of one ingestion run. Values are supplied at
//! startup (flags, environment or `.env`) and validated by
//! [`JobConfigBuilder::build`] before any network call is made.

use crate::errors::JobError;
use std::fmt;

/// The default NewsAPI base URL.
pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2";
/// The default country code for top headlines.
pub const DEFAULT_COUNTRY: &str = "us";
/// The default BigQuery dataset.
pub const DEFAULT_DATASET: &str = "batchnews";
/// The default BigQuery table.
pub const DEFAULT_TABLE: &str = "batchnewstable";

/// Validated configuration for an `IngestJob`.
#[derive(Clone)]
pub struct JobConfig {
    pub api_key: String,
    pub project_id: String,
    pub dataset: String,
    pub table: String,
    pub country: String,
    pub news_api_url: String,
}

impl JobConfig {
    /// Returns the fully-qualified `project.dataset.table` name.
    pub fn table_name(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset, self.table)
    }
}

impl fmt::Debug for JobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("table", &self.table)
            .field("country", &self.country)
            .field("news_api_url", &self.news_api_url)
            .finish_non_exhaustive()
    }
}

/// A builder for creating `JobConfig` instances.
///
/// Optional values fall back to the defaults above; the API key and the
/// project ID are required.
///
/// # Examples
///
/// ```
/// use batchnews::JobConfigBuilder;
///
/// let config = JobConfigBuilder::new()
///     .api_key("secret".to_string())
///     .project_id("my-project".to_string())
///     .build()
///     .unwrap();
/// assert_eq!(config.table_name(), "my-project.batchnews.batchnewstable");
/// ```
#[derive(Default)]
pub struct JobConfigBuilder {
    api_key: Option<String>,
    project_id: Option<String>,
    dataset: Option<String>,
    table: Option<String>,
    country: Option<String>,
    news_api_url: Option<String>,
}

impl JobConfigBuilder {
    /// Creates a new `JobConfigBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the NewsAPI key.
    pub fn api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the BigQuery project ID.
    pub fn project_id(mut self, project_id: String) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Sets the BigQuery dataset.
    pub fn dataset(mut self, dataset: String) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Sets the BigQuery table.
    pub fn table(mut self, table: String) -> Self {
        self.table = Some(table);
        self
    }

    /// Sets the country code for top headlines.
    pub fn country(mut self, country: String) -> Self {
        self.country = Some(country);
        self
    }

    /// Sets the NewsAPI base URL.
    pub fn news_api_url(mut self, news_api_url: String) -> Self {
        self.news_api_url = Some(news_api_url);
        self
    }

    /// Builds the `JobConfig`.
    ///
    /// Blank values count as missing.
    pub fn build(self) -> Result<JobConfig, JobError> {
        let api_key = non_blank(self.api_key).ok_or(JobError::MissingApiKey)?;
        let project_id = non_blank(self.project_id).ok_or(JobError::MissingProjectId)?;

        Ok(JobConfig {
            api_key,
            project_id,
            dataset: non_blank(self.dataset).unwrap_or_else(|| DEFAULT_DATASET.to_string()),
            table: non_blank(self.table).unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            country: non_blank(self.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            news_api_url: non_blank(self.news_api_url)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_NEWS_API_URL.to_string()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
