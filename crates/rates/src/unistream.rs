//! Unistream money-transfer adapter.
//!
//! The calculator endpoint quotes a RUS→GEO transfer of a fixed notional
//! amount; the effective rate is the accepted amount over the withdrawn
//! amount of the first fee entry.

use reqwest::{Client, StatusCode, header};
use serde::Deserialize;

use crate::{Currency, Provider, RateError, RateMap, collect_quotes, format_rate};

const API_URL: &str = "https://api6.unistream.com/api/v1/transfer/calculate";
const SENDER_BANK_ID: &str = "361934";
const NOTIONAL_AMOUNT: &str = "1000";

#[derive(Debug, Deserialize)]
struct CalculateResponse {
    #[serde(default)]
    fees: Vec<Fee>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fee {
    accepted_amount: f64,
    withdraw_amount: f64,
}

pub(crate) async fn rates(client: &Client) -> RateMap {
    let mut entries = Vec::new();
    for currency in [Currency::Usd, Currency::Gel, Currency::Eur] {
        entries.push((currency, calculate(client, currency.code()).await));
    }
    collect_quotes(Provider::Unistream, entries)
}

async fn calculate(client: &Client, withdraw_currency: &str) -> Result<String, RateError> {
    let form = [
        ("senderBankId", SENDER_BANK_ID),
        ("acceptedCurrency", "RUB"),
        ("withdrawCurrency", withdraw_currency),
        ("amount", NOTIONAL_AMOUNT),
        ("countryCode", "GEO"),
    ];

    let resp = client
        .post(API_URL)
        .header(header::ACCEPT, "*/*")
        .form(&form)
        .send()
        .await?;

    if resp.status() != StatusCode::OK {
        return Err(RateError::Status(resp.status()));
    }

    let body: CalculateResponse = resp.json().await?;
    let fee = body
        .fees
        .first()
        .ok_or_else(|| RateError::Decode("empty fee list".to_string()))?;

    Ok(format_rate(fee.accepted_amount / fee.withdraw_amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fee_list() {
        let raw = r#"{
            "message": "",
            "fees": [
                {
                    "name": "PAYOUT",
                    "acceptedAmount": 1000.0,
                    "acceptedCurrency": "RUB",
                    "withdrawAmount": 12.2,
                    "withdrawCurrency": "USD",
                    "rate": 81.9672,
                    "acceptedTotalFee": 0.0,
                    "acceptedTotalFeeCurrency": "RUB"
                }
            ]
        }"#;
        let body: CalculateResponse = serde_json::from_str(raw).unwrap();
        let fee = body.fees.first().unwrap();
        assert_eq!(format_rate(fee.accepted_amount / fee.withdraw_amount), "81.96721");
    }

    #[test]
    fn missing_fees_field_decodes_to_empty_list() {
        let body: CalculateResponse = serde_json::from_str(r#"{"message": "no tariffs"}"#).unwrap();
        assert!(body.fees.is_empty());
    }
}
