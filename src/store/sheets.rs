//! HTTP implementation of [`RowStore`] against a Sheets v4 values API.
//!
//! Every operation is a single round trip with a 30-second client
//! timeout and no retries; transient failures surface to the caller
//! immediately. Cell addressing is A1 notation built from the row index and
//! a 0-based column; row deletion goes through batchUpdate, which addresses
//! sheets by numeric id, resolved once from the spreadsheet metadata and
//! cached for the life of the store.

use super::{RowStore, RowStoreError, RowStoreResult, SheetRow, Tab};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;

pub struct SheetsRowStore {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    token: String,
    // Tab title -> numeric sheet id, fetched once from the spreadsheet
    // metadata. batchUpdate ranges address sheets by id, not title.
    sheet_ids: OnceCell<HashMap<String, i64>>,
}

impl SheetsRowStore {
    pub fn new(
        base_url: String,
        spreadsheet_id: String,
        token: String,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
            token,
            sheet_ids: OnceCell::new(),
        })
    }

    async fn sheet_id(&self, tab: Tab) -> RowStoreResult<i64> {
        let ids = self
            .sheet_ids
            .get_or_try_init(|| self.fetch_sheet_ids())
            .await?;
        ids.get(tab.name()).copied().ok_or_else(|| {
            RowStoreError::MalformedResponse(format!("no sheet titled {}", tab.name()))
        })
    }

    async fn fetch_sheet_ids(&self) -> RowStoreResult<HashMap<String, i64>> {
        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties",
            self.base_url, self.spreadsheet_id
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body = Self::check_status(response).await?;

        let sheets = body
            .get("sheets")
            .and_then(Value::as_array)
            .ok_or_else(|| RowStoreError::MalformedResponse("missing sheets".to_string()))?;

        let mut ids = HashMap::new();
        for sheet in sheets {
            let properties = sheet.get("properties");
            let title = properties
                .and_then(|p| p.get("title"))
                .and_then(Value::as_str);
            let id = properties
                .and_then(|p| p.get("sheetId"))
                .and_then(Value::as_i64);
            if let (Some(title), Some(id)) = (title, id) {
                ids.insert(title.to_string(), id);
            }
        }
        Ok(ids)
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    async fn check_status(response: reqwest::Response) -> RowStoreResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RowStoreError::Status(status.as_u16(), body));
        }
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| RowStoreError::MalformedResponse(e.to_string()))
    }
}

/// Converts a 0-based column number to its A1 letter ("A", "B", ..., "AA").
fn column_letter(column: usize) -> String {
    let mut n = column + 1;
    let mut letters = String::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters
}

#[async_trait]
impl RowStore for SheetsRowStore {
    async fn read_rows(&self, tab: Tab) -> RowStoreResult<Vec<SheetRow>> {
        let url = self.values_url(&format!("{}!A2:Z", tab.name()));
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body = Self::check_status(response).await?;

        let values = match body.get("values") {
            Some(Value::Array(rows)) => rows.clone(),
            // An empty tab omits the "values" field entirely.
            None => Vec::new(),
            Some(other) => {
                return Err(RowStoreError::MalformedResponse(format!(
                    "unexpected values field: {}",
                    other
                )))
            }
        };

        let mut rows = Vec::with_capacity(values.len());
        for (offset, row) in values.into_iter().enumerate() {
            let cells = match row {
                Value::Array(cells) => cells
                    .into_iter()
                    .map(|cell| match cell {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
                other => {
                    return Err(RowStoreError::MalformedResponse(format!(
                        "unexpected row shape: {}",
                        other
                    )))
                }
            };
            rows.push(SheetRow {
                // Data starts at sheet row 2 (row 1 is the header).
                index: offset + 2,
                values: cells,
            });
        }
        Ok(rows)
    }

    async fn append_row(&self, tab: Tab, values: Vec<String>) -> RowStoreResult<()> {
        let url = format!(
            "{}:append?valueInputOption=RAW",
            self.values_url(&format!("{}!A1", tab.name()))
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": [values] }))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn update_cell(
        &self,
        tab: Tab,
        row_index: usize,
        column: usize,
        value: String,
    ) -> RowStoreResult<()> {
        let cell = format!("{}!{}{}", tab.name(), column_letter(column), row_index);
        let url = format!("{}?valueInputOption=RAW", self.values_url(&cell));
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": [[value]] }))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete_row(&self, tab: Tab, row_index: usize) -> RowStoreResult<()> {
        let sheet_id = self.sheet_id(tab).await?;
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        // The dimension range is 0-based and end-exclusive.
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row_index - 1,
                        "endIndex": row_index,
                    }
                }
            }]
        });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
