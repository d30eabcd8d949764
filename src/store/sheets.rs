use super::{Row, StoreError, StoreResult, TableStore};
use crate::config::SheetsConfig;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Body shape of the spreadsheet values API
#[derive(Debug, Default, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    fn from_rows(rows: &[Row]) -> Self {
        Self {
            values: rows
                .iter()
                .map(|row| row.iter().cloned().map(serde_json::Value::String).collect())
                .collect(),
        }
    }

    fn into_rows(self) -> Vec<Row> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect()
    }
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Table store backed by a remote spreadsheet; each table is one sheet tab.
///
/// Requires an already-issued bearer token. Acquiring or refreshing tokens is
/// left to whoever deploys the binary.
pub struct SheetsTableStore {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsTableStore {
    /// Create a store from configuration
    pub fn new(config: &SheetsConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// URL for `values/{range}{suffix}` on this spreadsheet
    pub fn values_url(&self, range: &str, suffix: &str) -> StoreResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| StoreError::Unavailable(format!("invalid API base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Unavailable("API base cannot carry a path".to_string()))?
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", range, suffix));
        Ok(url)
    }

    /// Append endpoint for a table. Cells are stored as given, never parsed
    /// as formulas, dates or numbers.
    fn append_url(&self, table: &str) -> StoreResult<Url> {
        let mut url = self.values_url(&sheet_range(table), ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        Ok(url)
    }

    async fn get_values(&self, range: &str) -> StoreResult<Result<ValueRange, String>> {
        let url = self.values_url(range, "")?;
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        match check_status(response).await {
            Ok(response) => Ok(Ok(response.json::<ValueRange>().await?)),
            Err(message) => Ok(Err(message)),
        }
    }
}

/// A1 range covering the first row of a sheet
fn header_range(table: &str) -> String {
    format!("'{}'!1:1", table.replace('\'', "''"))
}

/// A1 range covering a whole sheet
fn sheet_range(table: &str) -> String {
    format!("'{}'", table.replace('\'', "''"))
}

/// Pass successful responses through; turn error statuses into a message
async fn check_status(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(format!("HTTP {}: {}", status, body))
}

#[async_trait]
impl TableStore for SheetsTableStore {
    async fn read_header(&self, table: &str) -> StoreResult<Row> {
        let values = self
            .get_values(&header_range(table))
            .await?
            .map_err(|message| StoreError::ReadHeader {
                table: table.to_string(),
                message,
            })?;
        Ok(values.into_rows().into_iter().next().unwrap_or_default())
    }

    async fn clear(&self, table: &str) -> StoreResult<()> {
        let url = self.values_url(&sheet_range(table), ":clear")?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        check_status(response).await.map_err(|message| StoreError::Clear {
            table: table.to_string(),
            message,
        })?;
        Ok(())
    }

    async fn write_header(&self, table: &str, columns: &[String]) -> StoreResult<()> {
        let mut url = self.values_url(&header_range(table), "")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&ValueRange::from_rows(&[columns.to_vec()]))
            .send()
            .await?;
        check_status(response)
            .await
            .map_err(|message| StoreError::WriteHeader {
                table: table.to_string(),
                message,
            })?;
        Ok(())
    }

    async fn append_rows(&self, table: &str, rows: &[Row]) -> StoreResult<()> {
        let url = self.append_url(table)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&ValueRange::from_rows(rows))
            .send()
            .await?;
        check_status(response).await.map_err(|message| StoreError::Append {
            table: table.to_string(),
            message,
        })?;
        Ok(())
    }

    async fn read_rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        let values = self
            .get_values(&sheet_range(table))
            .await?
            .map_err(|message| StoreError::Read {
                table: table.to_string(),
                message,
            })?;
        Ok(values.into_rows())
    }
}
