use async_trait::async_trait;
use serde_json::Value;

use phrasey_core::config::SheetsConfig;
use phrasey_core::phrase::{PhraseRecord, PhraseRow};

use crate::store::{PhraseStore, StoreError};

/// HTTP client for the deployed spreadsheet web app.
///
/// Reads are `GET <base_url>?q=<text>` returning a JSON array of row arrays;
/// writes are `POST <base_url>` with one JSON record body. Filtering and row
/// order are owned by the store; this client only coerces cells to text.
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
}

impl SheetsClient {
    pub fn new(http: reqwest::Client, config: &SheetsConfig) -> Self {
        Self { http, base_url: config.base_url.clone() }
    }
}

#[async_trait]
impl PhraseStore for SheetsClient {
    async fn query(&self, search_text: &str) -> Result<Vec<PhraseRow>, StoreError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", search_text)])
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status: status.as_u16(), body });
        }

        let rows: Vec<Vec<Value>> =
            response.json().await.map_err(|err| StoreError::Decode(err.to_string()))?;

        Ok(rows.into_iter().map(row_from_cells).collect())
    }

    async fn append(&self, record: &PhraseRecord) -> Result<(), StoreError> {
        let response = self
            .http
            .post(&self.base_url)
            .json(record)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status: status.as_u16(), body });
        }

        Ok(())
    }
}

fn row_from_cells(cells: Vec<Value>) -> PhraseRow {
    PhraseRow::new(cells.iter().map(cell_text).collect())
}

// Sheet cells are not guaranteed to be strings: dates and counts come back
// as JSON numbers, empty cells as null.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}
