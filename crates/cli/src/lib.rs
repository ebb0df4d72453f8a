//! # `batchnews-cli` Library Crate
//!
//! Argument parsing and the one-shot run behind the `batchnews` binary.

use anyhow::{Context, Result};
use batchnews::{BigQueryWarehouse, IngestJob, IngestionSummary, JobConfigBuilder};
use clap::Parser;
use tracing::info;

// --- CLI Argument Struct ---

/// Appends today's top headlines to a BigQuery table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// NewsAPI key.
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// BigQuery project that owns the target table.
    #[arg(long, env = "PROJECT_ID")]
    pub project_id: Option<String>,
    /// BigQuery dataset.
    #[arg(long, env = "BQ_DATASET")]
    pub dataset: Option<String>,
    /// BigQuery table.
    #[arg(long, env = "BQ_TABLE")]
    pub table: Option<String>,
    /// Two-letter country code for the headlines.
    #[arg(long, env = "NEWS_COUNTRY")]
    pub country: Option<String>,
    /// NewsAPI base URL.
    #[arg(long, env = "NEWS_API_URL")]
    pub news_api_url: Option<String>,
    /// Print the rows instead of loading them. No warehouse call is made.
    #[arg(long)]
    pub dry_run: bool,
}

/// Builds the job from the parsed arguments and runs it once.
pub async fn run(cli: Cli) -> Result<IngestionSummary> {
    let mut builder = JobConfigBuilder::new();
    if let Some(api_key) = cli.api_key {
        builder = builder.api_key(api_key);
    }
    if let Some(project_id) = cli.project_id {
        builder = builder.project_id(project_id);
    }
    if let Some(dataset) = cli.dataset {
        builder = builder.dataset(dataset);
    }
    if let Some(table) = cli.table {
        builder = builder.table(table);
    }
    if let Some(country) = cli.country {
        builder = builder.country(country);
    }
    if let Some(news_api_url) = cli.news_api_url {
        builder = builder.news_api_url(news_api_url);
    }
    let config = builder.build().context("Invalid configuration")?;
    info!(?config, "Configuration loaded");

    let job = IngestJob::new(config)?;
    if cli.dry_run {
        return Ok(job.dry_run().await?);
    }

    // The warehouse client is only built once the fetch has been parsed.
    let rows = job.fetch_rows().await?;
    let warehouse = BigQueryWarehouse::new(job.config().project_id.clone())
        .await
        .context("Failed to create BigQuery client")?;
    Ok(job.load(&warehouse, rows).await?)
}
