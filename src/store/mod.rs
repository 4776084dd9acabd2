use std::collections::HashMap;

use async_trait::async_trait;

pub mod memory;
pub mod sheets;

pub const LIST_TABLE: &str = "LIST";
pub const USERS_TABLE: &str = "USERS";
pub const RESULT_TABLE: &str = "RESULT";

/// One sheet row, keyed by the table's header cells (canonicalized).
pub type Record = HashMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned status {status} for {context}")]
    Status { status: u16, context: String },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Row {index} out of range for table {table}")]
    RowOutOfRange { table: String, index: usize },

    #[error("Malformed store response: {0}")]
    Malformed(String),
}

/// Row-level access to the remote spreadsheet. Tables are addressed by sheet
/// name and their first row is the header. `delete_row(index)` addresses the
/// index-th data record, header excluded; `clear_and_rewrite` takes the full
/// replacement with the header as its first element.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn read_table(&self, table: &str) -> Result<Vec<Record>, StoreError>;

    async fn append_row(&self, table: &str, values: Vec<String>) -> Result<(), StoreError>;

    async fn clear_and_rewrite(&self, table: &str, rows: Vec<Vec<String>>)
        -> Result<(), StoreError>;

    async fn delete_row(&self, table: &str, index: usize) -> Result<(), StoreError>;
}
