use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Record, StoreError, TableStore};
use crate::utils::normalize::canon;

#[derive(Debug, Default, Clone)]
struct MemTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Table store backed by process memory. Used by the test suites and as a
/// stand-in backend when no spreadsheet is reachable; counts reads so cache
/// behavior stays observable.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, MemTable>>,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, table: &str, header: &[&str], rows: Vec<Vec<&str>>) {
        let mut tables = self.tables.write().await;
        tables.insert(
            table.to_string(),
            MemTable {
                header: header.iter().map(|cell| cell.to_string()).collect(),
                rows: rows
                    .into_iter()
                    .map(|row| row.into_iter().map(|cell| cell.to_string()).collect())
                    .collect(),
            },
        );
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub async fn rows(&self, table: &str) -> Vec<Vec<String>> {
        self.tables
            .read()
            .await
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn read_table(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.read().await;
        let found = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let header: Vec<String> = found.header.iter().map(|cell| canon(cell)).collect();
        Ok(found
            .rows
            .iter()
            .map(|row| {
                header
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or_default()))
                    .collect::<Record>()
            })
            .collect())
    }

    async fn append_row(&self, table: &str, values: Vec<String>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let found = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        found.rows.push(values);
        Ok(())
    }

    async fn clear_and_rewrite(
        &self,
        table: &str,
        mut rows: Vec<Vec<String>>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let found = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        if rows.is_empty() {
            found.rows.clear();
            return Ok(());
        }
        found.header = rows.remove(0);
        found.rows = rows;
        Ok(())
    }

    async fn delete_row(&self, table: &str, index: usize) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let found = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        if index >= found.rows.len() {
            return Err(StoreError::RowOutOfRange {
                table: table.to_string(),
                index,
            });
        }
        found.rows.remove(index);
        Ok(())
    }
}
