use crate::{
    errors::JobError,
    providers::warehouse::{RowInsertError, TableRef, Warehouse},
    rows::Row,
};
use async_trait::async_trait;
use gcp_bigquery_client::{
    error::BQError,
    model::{
        table_data_insert_all_request::TableDataInsertAllRequest,
        table_data_insert_all_response::TableDataInsertAllResponse,
    },
    Client,
};
use std::fmt::{self, Debug};
use tracing::{debug, info};

/// A warehouse provider backed by Google BigQuery.
#[derive(Clone)]
pub struct BigQueryWarehouse {
    client: Client,
    project_id: String,
}

impl BigQueryWarehouse {
    /// Creates a new `BigQueryWarehouse` using Application Default Credentials.
    pub async fn new(project_id: String) -> Result<Self, JobError> {
        if project_id.trim().is_empty() {
            return Err(JobError::MissingProjectId);
        }
        let client = Client::from_application_default_credentials().await?;
        Ok(Self { client, project_id })
    }

    /// Wraps an already configured client, e.g. one with a custom base URL.
    pub fn from_client(client: Client, project_id: String) -> Self {
        Self { client, project_id }
    }
}

impl Debug for BigQueryWarehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigQueryWarehouse")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Warehouse for BigQueryWarehouse {
    fn name(&self) -> &str {
        "BigQuery"
    }

    /// Looks the table up with `tables.get`; a 404 becomes `TableNotFound`.
    async fn resolve_table(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableRef, JobError> {
        let table_ref = TableRef {
            project_id: self.project_id.clone(),
            dataset_id: dataset_id.to_string(),
            table_id: table_id.to_string(),
        };
        debug!("--> Resolving BigQuery table {table_ref}");

        match self
            .client
            .table()
            .get(&self.project_id, dataset_id, table_id, None)
            .await
        {
            Ok(_) => Ok(table_ref),
            Err(e) => Err(table_lookup_error(e, &table_ref)),
        }
    }

    /// Appends every row with one `tabledata.insertAll` request.
    ///
    /// Rows carry no insert id, so repeated runs are not deduplicated.
    async fn insert_rows(
        &self,
        table: &TableRef,
        rows: &[Row],
    ) -> Result<Vec<RowInsertError>, JobError> {
        let Some(request) = build_insert_request(rows)? else {
            info!("No rows to insert into {table}.");
            return Ok(Vec::new());
        };

        info!("--> Inserting {} rows into {table}", rows.len());
        let response = self
            .client
            .tabledata()
            .insert_all(
                &table.project_id,
                &table.dataset_id,
                &table.table_id,
                request,
            )
            .await?;

        collect_insert_errors(response)
    }
}

/// Maps a failed `tables.get`; only a 404 means the table is missing.
fn table_lookup_error(err: BQError, table_ref: &TableRef) -> JobError {
    match err {
        BQError::ResponseError { error } if error.error.code == 404 => {
            JobError::TableNotFound(table_ref.to_string())
        }
        other => JobError::WarehouseClient(other),
    }
}

/// Builds one insert request for the whole batch, or `None` for an empty
/// batch since BigQuery rejects an empty `rows` array.
fn build_insert_request(rows: &[Row]) -> Result<Option<TableDataInsertAllRequest>, JobError> {
    if rows.is_empty() {
        return Ok(None);
    }
    let mut request = TableDataInsertAllRequest::new();
    for (index, row) in rows.iter().enumerate() {
        request
            .add_row(None, row.clone())
            .map_err(|e| JobError::RowSerialization {
                index,
                message: e.to_string(),
            })?;
    }
    Ok(Some(request))
}

/// Converts the response's insert errors into the warehouse-neutral form.
fn collect_insert_errors(
    response: TableDataInsertAllResponse,
) -> Result<Vec<RowInsertError>, JobError> {
    let Some(insert_errors) = response.insert_errors else {
        return Ok(Vec::new());
    };
    let value = serde_json::to_value(insert_errors)
        .map_err(|e| JobError::Warehouse(format!("unreadable insert errors: {e}")))?;
    serde_json::from_value(value)
        .map_err(|e| JobError::Warehouse(format!("unreadable insert errors: {e}")))
}
