//! Spreadsheet-backed expense ledger.
//!
//! The ledger is an external spreadsheet reached through the Sheets REST
//! API: rows are appended to a fixed range and read back positionally. There
//! is no local state; every call is a fresh network round trip.

use std::collections::HashMap;
use std::path::Path;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

mod auth;

pub use auth::AuthError;

const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// Columns A..G: id, amount, reason, source, date, username, active.
const LEDGER_RANGE: &str = "1!A2:G";

/// One user-submitted expense row.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub reason: String,
    pub source: String,
    pub date: String,
    pub username: String,
    pub active: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("sheets api error: {0}")]
    Api(StatusCode),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Client for the expense spreadsheet.
pub struct Ledger {
    client: Client,
    credentials: auth::Credentials,
    spreadsheet_id: String,
}

impl Ledger {
    /// Loads the service-account credentials eagerly. An error here means
    /// the ledger is unreachable and the caller should treat it as fatal.
    pub fn new(spreadsheet_id: String, credentials_path: &Path) -> Result<Self, AuthError> {
        let credentials = auth::Credentials::load(credentials_path)?;
        tracing::info!("ledger credentials loaded");

        Ok(Self {
            client: Client::new(),
            credentials,
            spreadsheet_id,
        })
    }

    /// Appends expense rows to the ledger. Failures are logged and reported
    /// as `false`; the ledger is never left partially written because the
    /// append is a single API call.
    pub async fn append(&self, expenses: &[Expense]) -> bool {
        match self.try_append(expenses).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("failed to append to the ledger: {err}");
                false
            }
        }
    }

    async fn try_append(&self, expenses: &[Expense]) -> Result<(), LedgerError> {
        let token = self.credentials.access_token(&self.client).await?;
        let rows: Vec<_> = expenses
            .iter()
            .map(|e| {
                serde_json::json!([
                    e.id, e.amount, e.reason, e.source, e.date, e.username, e.active
                ])
            })
            .collect();

        let url = format!(
            "{SHEETS_URL}/{}/values/{LEDGER_RANGE}:append",
            self.spreadsheet_id
        );
        let resp = self
            .client
            .post(url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&serde_json::json!({ "values": rows }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LedgerError::Api(resp.status()));
        }
        Ok(())
    }

    /// Reads every expense row, in sheet order.
    pub async fn load_all(&self) -> Result<Vec<Expense>, LedgerError> {
        let token = self.credentials.access_token(&self.client).await?;
        let url = format!(
            "{SHEETS_URL}/{}/values/{LEDGER_RANGE}",
            self.spreadsheet_id
        );
        let resp = self.client.get(url).bearer_auth(token).send().await?;

        if !resp.status().is_success() {
            return Err(LedgerError::Api(resp.status()));
        }

        let range: ValueRange = resp.json().await?;
        Ok(parse_rows(range.values))
    }

    /// Expense rows for one user, exact handle match.
    pub async fn load_by_user(&self, username: &str) -> Result<Vec<Expense>, LedgerError> {
        Ok(filter_by_user(self.load_all().await?, username))
    }

    /// Summed amount per user. Map iteration order is unspecified.
    pub async fn totals_by_user(
        &self,
        only_active: bool,
    ) -> Result<HashMap<String, f64>, LedgerError> {
        Ok(totals_by_user(&self.load_all().await?, only_active))
    }
}

fn parse_rows(values: Vec<Vec<String>>) -> Vec<Expense> {
    values.iter().map(|row| parse_row(row)).collect()
}

/// Positional parse of one sheet row. Missing trailing columns read as
/// empty; malformed numeric cells fall back to zero.
fn parse_row(row: &[String]) -> Expense {
    let column = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");

    Expense {
        id: column(0).parse().unwrap_or(0),
        amount: parse_amount(column(1)),
        reason: column(2).to_string(),
        source: column(3).to_string(),
        date: column(4).to_string(),
        username: column(5).to_string(),
        active: parse_flag(column(6)),
    }
}

/// Keeps the rows whose handle matches exactly; case and order-preserving,
/// no substring matching.
pub fn filter_by_user(expenses: Vec<Expense>, username: &str) -> Vec<Expense> {
    expenses
        .into_iter()
        .filter(|expense| expense.username == username)
        .collect()
}

pub fn totals_by_user(expenses: &[Expense], only_active: bool) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for expense in expenses {
        if only_active && !expense.active {
            continue;
        }
        *totals.entry(expense.username.clone()).or_default() += expense.amount;
    }
    totals
}

fn parse_amount(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }
    match raw.replace(',', ".").parse() {
        Ok(amount) => amount,
        Err(err) => {
            tracing::warn!("failed to parse amount {raw:?}: {err}");
            0.0
        }
    }
}

// Same literal set as Go's strconv.ParseBool, which wrote the column
// originally; everything else (including parse failures) reads as false.
fn parse_flag(raw: &str) -> bool {
    matches!(raw, "1" | "t" | "T" | "true" | "TRUE" | "True")
}
