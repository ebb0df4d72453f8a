use async_trait::async_trait;
use batchnews::{BigQueryWarehouse, JobError, Row, RowInsertError, TableRef, Warehouse};
use gcp_bigquery_client::{
    auth::Authenticator, client_builder::ClientBuilder, error::BQError, Client,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock Warehouse ---

/// An in-memory `Warehouse` that records every call.
///
/// Clones share their state, so a test can keep one handle and give the
/// other to the job.
#[derive(Clone, Debug, Default)]
pub struct MockWarehouse {
    project_id: String,
    tables: Arc<Mutex<HashSet<(String, String)>>>,
    insert_errors: Arc<Mutex<Vec<RowInsertError>>>,
    resolve_calls: Arc<Mutex<Vec<(String, String)>>>,
    insert_calls: Arc<Mutex<Vec<(TableRef, Vec<Row>)>>>,
}

impl MockWarehouse {
    pub fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            ..Default::default()
        }
    }

    /// Registers a table that `resolve_table` will find.
    pub fn with_table(self, dataset_id: &str, table_id: &str) -> Self {
        self.tables
            .lock()
            .unwrap()
            .insert((dataset_id.to_string(), table_id.to_string()));
        self
    }

    /// Pre-programs the per-row errors returned by the next inserts.
    pub fn with_insert_errors(self, errors: Vec<RowInsertError>) -> Self {
        *self.insert_errors.lock().unwrap() = errors;
        self
    }

    /// Retrieves the recorded `resolve_table` calls for assertion.
    pub fn resolve_calls(&self) -> Vec<(String, String)> {
        self.resolve_calls.lock().unwrap().clone()
    }

    /// Retrieves the recorded `insert_rows` calls for assertion.
    pub fn insert_calls(&self) -> Vec<(TableRef, Vec<Row>)> {
        self.insert_calls.lock().unwrap().clone()
    }

    /// True when no warehouse call of any kind was made.
    pub fn untouched(&self) -> bool {
        self.resolve_calls().is_empty() && self.insert_calls().is_empty()
    }
}

#[async_trait]
impl Warehouse for MockWarehouse {
    fn name(&self) -> &str {
        "MockWarehouse"
    }

    async fn resolve_table(&self, dataset_id: &str, table_id: &str) -> Result<TableRef, JobError> {
        self.resolve_calls
            .lock()
            .unwrap()
            .push((dataset_id.to_string(), table_id.to_string()));

        let table_ref = TableRef {
            project_id: self.project_id.clone(),
            dataset_id: dataset_id.to_string(),
            table_id: table_id.to_string(),
        };
        let known = self
            .tables
            .lock()
            .unwrap()
            .contains(&(dataset_id.to_string(), table_id.to_string()));
        if known {
            Ok(table_ref)
        } else {
            Err(JobError::TableNotFound(table_ref.to_string()))
        }
    }

    async fn insert_rows(
        &self,
        table: &TableRef,
        rows: &[Row],
    ) -> Result<Vec<RowInsertError>, JobError> {
        self.insert_calls
            .lock()
            .unwrap()
            .push((table.clone(), rows.to_vec()));
        Ok(self.insert_errors.lock().unwrap().clone())
    }
}

// --- BigQuery against a mock server ---

/// Hands out a fixed bearer token so no Google credentials are needed.
#[derive(Clone)]
pub struct StaticTokenAuthenticator;

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn access_token(&self) -> Result<String, BQError> {
        Ok("test-token".to_string())
    }
}

/// A BigQuery client whose REST calls go to `base_url`.
pub async fn bigquery_client(base_url: &str) -> Client {
    let mut builder = ClientBuilder::new();
    builder.with_v2_base_url(base_url.to_string());
    builder
        .build_from_authenticator(Arc::new(StaticTokenAuthenticator))
        .await
        .expect("BigQuery client should build without network access")
}

/// A `BigQueryWarehouse` backed by [`bigquery_client`].
pub async fn bigquery_warehouse(base_url: &str, project_id: &str) -> BigQueryWarehouse {
    BigQueryWarehouse::from_client(bigquery_client(base_url).await, project_id.to_string())
}

// --- NewsAPI fixtures ---

/// A `top-headlines` body wrapping the given articles.
pub fn top_headlines_body(articles: Value) -> Value {
    let total = articles.as_array().map(|a| a.len()).unwrap_or(0);
    json!({
        "status": "ok",
        "totalResults": total,
        "articles": articles,
    })
}

/// A realistic article object, including fields the job ignores.
pub fn full_article(title: &str, description: Option<&str>, url: &str) -> Value {
    json!({
        "source": { "id": null, "name": "Test Wire" },
        "author": "Reporter",
        "title": title,
        "description": description,
        "url": url,
        "urlToImage": null,
        "publishedAt": "2026-10-16T08:00:00Z",
        "content": "Lorem ipsum"
    })
}
