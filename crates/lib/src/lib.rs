//! # batchnews
//!
//! Fetches the current top headlines from NewsAPI and appends their title,
//! description and url as rows to a BigQuery table. One run is one batch.

pub mod config;
pub mod errors;
pub mod job;
pub mod news;
pub mod providers;
pub mod rows;

pub use config::{JobConfig, JobConfigBuilder};
pub use errors::JobError;
pub use job::{IngestJob, IngestionSummary, SUCCESS_MESSAGE};
pub use news::{Article, NewsClient};
pub use providers::{
    bigquery::BigQueryWarehouse,
    warehouse::{InsertErrorDetail, RowInsertError, TableRef, Warehouse},
};
pub use rows::{to_rows, Row};
