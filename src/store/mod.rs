//! Row store seam.
//!
//! All persistent state lives in a remote spreadsheet-style tabular store.
//! The store offers no transactions, no secondary indexes, and no uniqueness
//! enforcement; every invariant (unique emails, one owner per family, ...)
//! is enforced above this layer by scan-before-write. A logical update that
//! spans several rows executes as independent single-cell writes, and a
//! partial failure leaves the affected rows inconsistent with no rollback.

pub mod memory;
pub mod sheets;

pub use memory::MemoryRowStore;
pub use sheets::SheetsRowStore;

use async_trait::async_trait;
use std::env;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RowStoreError {
    #[error("Store request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Store returned status {0}: {1}")]
    Status(u16, String),
    #[error("Malformed store response: {0}")]
    MalformedResponse(String),
    #[error("Row {0} does not exist")]
    RowOutOfRange(usize),
}

pub type RowStoreResult<T> = Result<T, RowStoreError>;

/// Sheet tabs, one per entity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Users,
    Families,
    Activities,
    Comments,
}

impl Tab {
    pub fn name(&self) -> &'static str {
        match self {
            Tab::Users => "Users",
            Tab::Families => "Families",
            Tab::Activities => "Activities",
            Tab::Comments => "Comments",
        }
    }
}

/// A data row together with its absolute position in the sheet.
///
/// `index` is 1-based and counts the header row, so the first data row has
/// index 2. Cell updates and deletions address rows by this index, which is
/// only stable until another request deletes a preceding row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub index: usize,
    pub values: Vec<String>,
}

impl SheetRow {
    /// Cell at `column` (0-based), empty string if the row is ragged.
    pub fn cell(&self, column: usize) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait RowStore: Send + Sync {
    /// All data rows of a tab, header excluded. Lookups scan this linearly.
    async fn read_rows(&self, tab: Tab) -> RowStoreResult<Vec<SheetRow>>;

    /// Appends one row after the last non-empty row of the tab.
    async fn append_row(&self, tab: Tab, values: Vec<String>) -> RowStoreResult<()>;

    /// Overwrites a single cell. `row_index` is absolute (1-based, header
    /// included), `column` is 0-based.
    async fn update_cell(
        &self,
        tab: Tab,
        row_index: usize,
        column: usize,
        value: String,
    ) -> RowStoreResult<()>;

    /// Removes a row entirely. Indices of subsequent rows shift down.
    async fn delete_row(&self, tab: Tab, row_index: usize) -> RowStoreResult<()>;
}

/// Picks the store backend from the environment: the remote sheets API when
/// credentials are configured, otherwise an in-process store for development.
pub fn create_row_store() -> anyhow::Result<Arc<dyn RowStore>> {
    match (env::var("SHEETS_API_TOKEN"), env::var("SPREADSHEET_ID")) {
        (Ok(token), Ok(spreadsheet_id)) if !token.is_empty() && !spreadsheet_id.is_empty() => {
            let base_url = env::var("SHEETS_API_URL")
                .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string());
            tracing::info!("Using remote sheets store (spreadsheet {})", spreadsheet_id);
            Ok(Arc::new(SheetsRowStore::new(base_url, spreadsheet_id, token)?))
        }
        _ => {
            tracing::warn!("SHEETS_API_TOKEN not set; using in-memory store (development only)");
            Ok(Arc::new(MemoryRowStore::new()))
        }
    }
}
