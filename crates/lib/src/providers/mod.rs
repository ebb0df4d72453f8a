pub mod bigquery;
pub mod warehouse;
