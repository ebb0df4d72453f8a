//! # Ingestion Job
//!
//! One fetch, one transform, one load. Each step is awaited in sequence and any
//! failure ends the run; nothing is retried or rolled back.

use crate::{
    config::JobConfig,
    errors::JobError,
    news::NewsClient,
    providers::warehouse::Warehouse,
    rows::{to_rows, Row},
};
use tracing::{error, info};

/// The line printed to stdout after a successful load.
pub const SUCCESS_MESSAGE: &str = "Data successfully ingested into BigQuery.";

/// The outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    /// The fully-qualified target table.
    pub table: String,
    /// Rows appended, or that would have been appended in a dry run.
    pub rows: usize,
    pub dry_run: bool,
}

/// A single fetch-transform-load run.
#[derive(Debug)]
pub struct IngestJob {
    config: JobConfig,
    news: NewsClient,
}

impl IngestJob {
    /// Creates a new `IngestJob` for the given configuration.
    pub fn new(config: JobConfig) -> Result<Self, JobError> {
        let news = NewsClient::new(
            config.news_api_url.clone(),
            config.api_key.clone(),
            config.country.clone(),
        )?;
        Ok(Self { config, news })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Fetches the headlines and projects them to rows.
    pub async fn fetch_rows(&self) -> Result<Vec<Row>, JobError> {
        let articles = self.news.fetch_top_headlines().await?;
        let rows = to_rows(&articles);
        info!("Prepared {} rows for ingestion", rows.len());
        Ok(rows)
    }

    /// Runs the job once against `warehouse`.
    ///
    /// Equivalent to [`IngestJob::fetch_rows`] followed by [`IngestJob::load`].
    pub async fn run(&self, warehouse: &dyn Warehouse) -> Result<IngestionSummary, JobError> {
        let rows = self.fetch_rows().await?;
        self.load(warehouse, rows).await
    }

    /// Appends already fetched rows in one call.
    ///
    /// On success the confirmation line is printed to stdout. When the append
    /// call reports per-row errors the whole run fails with
    /// [`JobError::InsertFailed`], even though some rows may already be stored.
    pub async fn load(
        &self,
        warehouse: &dyn Warehouse,
        rows: Vec<Row>,
    ) -> Result<IngestionSummary, JobError> {
        let table = warehouse
            .resolve_table(&self.config.dataset, &self.config.table)
            .await?;
        let errors = warehouse.insert_rows(&table, &rows).await?;

        if !errors.is_empty() {
            error!(
                "{} of {} rows were rejected by {}",
                errors.len(),
                rows.len(),
                warehouse.name()
            );
            return Err(JobError::InsertFailed(errors));
        }

        println!("{SUCCESS_MESSAGE}");
        info!("Appended {} rows to {table}", rows.len());

        Ok(IngestionSummary {
            table: table.to_string(),
            rows: rows.len(),
            dry_run: false,
        })
    }

    /// Fetches and transforms, then prints the rows as JSON instead of loading.
    pub async fn dry_run(&self) -> Result<IngestionSummary, JobError> {
        let rows = self.fetch_rows().await?;
        let rendered = serde_json::to_string_pretty(&rows).map_err(JobError::BatchSerialization)?;
        println!("{rendered}");
        info!(
            "Dry run: skipped loading {} rows into {}",
            rows.len(),
            self.config.table_name()
        );
        Ok(IngestionSummary {
            table: self.config.table_name(),
            rows: rows.len(),
            dry_run: true,
        })
    }
}
