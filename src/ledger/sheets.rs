//! Google Sheets v4 values client.
//!
//! Reads the whole table with a single `values.get` and mutates single
//! cells with `values.update` in `RAW` mode, addressed in A1 notation.
//! The values API right-trims trailing empty cells from each row, so
//! reads pad every row to the width of the widest row (the header, for a
//! well-formed sheet) before handing the grid to positional parsing.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use super::Ledger;
use super::auth::{ServiceAccountKey, TokenProvider};
use crate::error::LedgerError;

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Production [`Ledger`] backed by the Google Sheets values API.
#[derive(Debug)]
pub struct SheetsLedger {
    http: reqwest::Client,
    auth: TokenProvider,
    spreadsheet_id: String,
    sheet_name: String,
}

/// `values.get` response body.
#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsLedger {
    /// Creates a client for one sheet of one spreadsheet.
    #[must_use]
    pub fn new(key: ServiceAccountKey, spreadsheet_id: String, sheet_name: String) -> Self {
        let http = reqwest::Client::new();
        Self {
            auth: TokenProvider::new(key, http.clone()),
            http,
            spreadsheet_id,
            sheet_name,
        }
    }

    /// Builds the values endpoint URL for an A1 `range`.
    ///
    /// The range goes in as a path segment, so sheet names with spaces
    /// survive URL encoding.
    fn values_url(&self, range: &str) -> Result<Url, LedgerError> {
        let mut url = Url::parse(API_BASE)
            .map_err(|err| LedgerError::Malformed(format!("invalid API base: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| LedgerError::Malformed("API base cannot hold segments".to_string()))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }
}

#[async_trait]
impl Ledger for SheetsLedger {
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, LedgerError> {
        let token = self.auth.bearer_token().await?;
        let url = self.values_url(&self.sheet_name)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("majorDimension", "ROWS")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LedgerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let range: ValueRange = response.json().await?;
        tracing::debug!(rows = range.values.len(), sheet = %self.sheet_name, "ledger read");
        Ok(pad_rows(range.values))
    }

    async fn write_cell(&self, row: usize, col: usize, value: &str) -> Result<(), LedgerError> {
        if row == 0 || col == 0 {
            return Err(LedgerError::Malformed(
                "cell addresses are 1-based".to_string(),
            ));
        }
        let range = format!("{}!{}{row}", self.sheet_name, column_letters(col));
        let token = self.auth.bearer_token().await?;
        let url = self.values_url(&range)?;
        let body = serde_json::json!({ "values": [[value]] });
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LedgerError::Api {
                status: status.as_u16(),
                message,
            });
        }
        tracing::debug!(%range, "ledger cell written");
        Ok(())
    }
}

/// Pads every row with empty cells to the width of the widest row.
fn pad_rows(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}

/// Converts a 1-based column number to A1 letters (1 → A, 27 → AA).
fn column_letters(col: usize) -> String {
    let mut letters = String::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        letters.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters
}
