//! In-process [`RowStore`] used in development mode and by tests.
//!
//! Mirrors the remote store's semantics: no uniqueness checks, linear
//! scans, absolute 1-based row indices that shift on deletion. Writes are
//! serialized by a single lock, so unlike the remote store it cannot
//! interleave two requests mid-operation.

use super::{RowStore, RowStoreError, RowStoreResult, SheetRow, Tab};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryRowStore {
    tabs: RwLock<HashMap<Tab, Vec<Vec<String>>>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn read_rows(&self, tab: Tab) -> RowStoreResult<Vec<SheetRow>> {
        let tabs = self.tabs.read().await;
        let rows = tabs.get(&tab).cloned().unwrap_or_default();
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(offset, values)| SheetRow {
                index: offset + 2,
                values,
            })
            .collect())
    }

    async fn append_row(&self, tab: Tab, values: Vec<String>) -> RowStoreResult<()> {
        let mut tabs = self.tabs.write().await;
        tabs.entry(tab).or_default().push(values);
        Ok(())
    }

    async fn update_cell(
        &self,
        tab: Tab,
        row_index: usize,
        column: usize,
        value: String,
    ) -> RowStoreResult<()> {
        let mut tabs = self.tabs.write().await;
        let rows = tabs.entry(tab).or_default();
        if row_index < 2 || row_index - 2 >= rows.len() {
            return Err(RowStoreError::RowOutOfRange(row_index));
        }
        let row = &mut rows[row_index - 2];
        if row.len() <= column {
            row.resize(column + 1, String::new());
        }
        row[column] = value;
        Ok(())
    }

    async fn delete_row(&self, tab: Tab, row_index: usize) -> RowStoreResult<()> {
        let mut tabs = self.tabs.write().await;
        let rows = tabs.entry(tab).or_default();
        if row_index < 2 || row_index - 2 >= rows.len() {
            return Err(RowStoreError::RowOutOfRange(row_index));
        }
        rows.remove(row_index - 2);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_read() {
        let store = MemoryRowStore::new();
        store
            .append_row(Tab::Users, vec!["a@example.com".into(), "Ana".into()])
            .await
            .unwrap();
        store
            .append_row(Tab::Users, vec!["b@example.com".into(), "Bo".into()])
            .await
            .unwrap();

        let rows = store.read_rows(Tab::Users).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 2);
        assert_eq!(rows[1].index, 3);
        assert_eq!(rows[1].cell(1), "Bo");
    }

    #[tokio::test]
    async fn test_update_cell_extends_ragged_row() {
        let store = MemoryRowStore::new();
        store
            .append_row(Tab::Users, vec!["a@example.com".into()])
            .await
            .unwrap();
        store
            .update_cell(Tab::Users, 2, 3, "TRUE".into())
            .await
            .unwrap();

        let rows = store.read_rows(Tab::Users).await.unwrap();
        assert_eq!(rows[0].cell(3), "TRUE");
        assert_eq!(rows[0].cell(2), "");
    }

    #[tokio::test]
    async fn test_delete_shifts_indices() {
        let store = MemoryRowStore::new();
        for email in ["a@x.com", "b@x.com", "c@x.com"] {
            store
                .append_row(Tab::Users, vec![email.to_string()])
                .await
                .unwrap();
        }
        store.delete_row(Tab::Users, 3).await.unwrap();

        let rows = store.read_rows(Tab::Users).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cell(0), "c@x.com");
        assert_eq!(rows[1].index, 3);
    }

    #[tokio::test]
    async fn test_out_of_range_update() {
        let store = MemoryRowStore::new();
        let result = store.update_cell(Tab::Users, 5, 0, "x".into()).await;
        assert!(matches!(result, Err(RowStoreError::RowOutOfRange(5))));
    }
}
