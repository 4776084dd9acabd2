use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{Record, StoreError, TableStore};
use crate::utils::normalize::canon;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

#[derive(Clone)]
pub struct SheetsStore {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsStore {
    pub fn new(
        client: Client,
        base_url: String,
        spreadsheet_id: String,
        access_token: String,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
            access_token,
        }
    }

    fn values_url(&self, table: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, table
        )
    }

    async fn fetch_values(&self, table: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let response = self
            .client
            .get(self.values_url(table))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = response.status();
        // The values API answers an unknown range with 400, not 404.
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                context: format!("GET values/{}", table),
            });
        }
        let range = response.json::<ValueRange>().await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn sheet_id_for(&self, table: &str) -> Result<i64, StoreError> {
        let url = format!("{}/v4/spreadsheets/{}", self.base_url, self.spreadsheet_id);
        let response = self
            .client
            .get(url)
            .query(&[("fields", "sheets.properties")])
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                context: "GET spreadsheet metadata".to_string(),
            });
        }
        let meta = response.json::<SpreadsheetMeta>().await?;
        meta.sheets
            .into_iter()
            .find(|entry| canon(&entry.properties.title) == canon(table))
            .map(|entry| entry.properties.sheet_id)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    async fn ensure_success(
        response: reqwest::Response,
        context: String,
    ) -> Result<(), StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::Status {
                status: status.as_u16(),
                context,
            })
        }
    }
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TableStore for SheetsStore {
    async fn read_table(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let mut rows = self.fetch_values(table).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let header: Vec<String> = rows.remove(0).iter().map(|cell| canon(cell)).collect();
        let records = rows
            .into_iter()
            .map(|row| {
                header
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or_default()))
                    .collect::<Record>()
            })
            .collect();
        Ok(records)
    }

    async fn append_row(&self, table: &str, values: Vec<String>) -> Result<(), StoreError> {
        let url = format!("{}:append", self.values_url(table));
        let response = self
            .client
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": [values] }))
            .send()
            .await?;
        Self::ensure_success(response, format!("POST values/{}:append", table)).await
    }

    async fn clear_and_rewrite(
        &self,
        table: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), StoreError> {
        let clear_url = format!("{}:clear", self.values_url(table));
        let response = self
            .client
            .post(clear_url)
            .bearer_auth(&self.access_token)
            .json(&json!({}))
            .send()
            .await?;
        Self::ensure_success(response, format!("POST values/{}:clear", table)).await?;

        let response = self
            .client
            .put(self.values_url(table))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": rows }))
            .send()
            .await?;
        Self::ensure_success(response, format!("PUT values/{}", table)).await
    }

    async fn delete_row(&self, table: &str, index: usize) -> Result<(), StoreError> {
        let sheet_id = self.sheet_id_for(table).await?;
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        // Sheet rows are counted with the header, so record N is row N + 1.
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": index + 1,
                        "endIndex": index + 2
                    }
                }
            }]
        });
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(response, format!("POST batchUpdate deleteDimension {}", table)).await
    }
}
