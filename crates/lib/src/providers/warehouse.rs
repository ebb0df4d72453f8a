use crate::{errors::JobError, rows::Row};
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// A resolved handle to a warehouse table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

/// One detail of a rejected row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A per-row error reported by the append call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowInsertError {
    /// Position of the rejected row within the submitted batch.
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub errors: Vec<InsertErrorDetail>,
}

impl fmt::Display for RowInsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "row {index}: ")?,
            None => write!(f, "row ?: ")?,
        }
        let details: Vec<String> = self
            .errors
            .iter()
            .map(|e| {
                format!(
                    "{} ({})",
                    e.message.as_deref().unwrap_or("no message"),
                    e.reason.as_deref().unwrap_or("unknown")
                )
            })
            .collect();
        write!(f, "{}", details.join("; "))
    }
}

/// A trait for appending rows to a warehouse table.
///
/// Implementations must submit the whole batch in one append call and report
/// per-row failures instead of failing the call as a whole.
#[async_trait]
pub trait Warehouse: Send + Sync + DynClone + Debug {
    /// Returns the name of the warehouse provider (e.g., "BigQuery").
    fn name(&self) -> &str;

    /// Resolves a handle to an existing table.
    async fn resolve_table(&self, dataset_id: &str, table_id: &str)
        -> Result<TableRef, JobError>;

    /// Appends `rows` to the table in one call.
    ///
    /// An empty result means every row was accepted.
    async fn insert_rows(
        &self,
        table: &TableRef,
        rows: &[Row],
    ) -> Result<Vec<RowInsertError>, JobError>;
}

dyn_clone::clone_trait_object!(Warehouse);
