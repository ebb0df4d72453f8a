use crate::providers::warehouse::RowInsertError;
use thiserror::Error;

/// Custom error types for the ingestion job.
///
/// Every failure mode of a run maps to exactly one variant. None of them are
/// recovered locally; they all terminate the run.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("News API key is missing")]
    MissingApiKey,
    #[error("BigQuery project ID is missing (set PROJECT_ID)")]
    MissingProjectId,
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the news API: {0}")]
    NewsRequest(reqwest::Error),
    #[error("News API returned an error (HTTP {status}, code {code}): {message}")]
    NewsApi {
        status: u16,
        code: String,
        message: String,
    },
    #[error("Failed to deserialize news API response: {0}")]
    NewsDeserialization(#[from] serde_json::Error),
    #[error("News API response has no `articles` field")]
    MissingArticles,
    #[error("BigQuery client error: {0}")]
    WarehouseClient(#[from] gcp_bigquery_client::error::BQError),
    #[error("Table `{0}` was not found")]
    TableNotFound(String),
    #[error("Warehouse operation failed: {0}")]
    Warehouse(String),
    #[error("Failed to serialize row {index}: {message}")]
    RowSerialization { index: usize, message: String },
    #[error("Failed to serialize rows: {0}")]
    BatchSerialization(serde_json::Error),
    #[error("Error inserting rows into BigQuery: {}", format_insert_errors(.0))]
    InsertFailed(Vec<RowInsertError>),
}

fn format_insert_errors(errors: &[RowInsertError]) -> String {
    let items: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
