//! AlphaVantage adapter, used as the "official rate" source.
//!
//! USD and EUR are quoted against RUB directly. GEL has no RUB pair on this
//! API, so it is derived from the two EUR quotes: EUR→RUB divided by
//! EUR→GEL.

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{Currency, Provider, RateError, RateMap, collect_quotes, format_rate};

const API_URL: &str = "https://www.alphavantage.co/query";
const FUNCTION: &str = "CURRENCY_EXCHANGE_RATE";

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    quote: Quote,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(rename = "5. Exchange Rate")]
    exchange_rate: String,
}

pub(crate) async fn rates(client: &Client, api_key: &str) -> RateMap {
    let usd_rub = quote(client, api_key, "USD", "RUB").await;
    let eur_rub = quote(client, api_key, "EUR", "RUB").await;
    let mut result = collect_quotes(
        Provider::Official,
        [(Currency::Usd, usd_rub), (Currency::Eur, eur_rub)],
    );

    let gel = quote(client, api_key, "EUR", "GEL").await.map(|eur_gel| {
        let eur_rub = result
            .get(&Currency::Eur)
            .map(String::as_str)
            .unwrap_or_default();
        derive_gel(eur_rub, &eur_gel)
    });
    result.extend(collect_quotes(Provider::Official, [(Currency::Gel, gel)]));

    result
}

async fn quote(
    client: &Client,
    api_key: &str,
    from: &str,
    to: &str,
) -> Result<String, RateError> {
    let resp = client
        .get(API_URL)
        .query(&[
            ("function", FUNCTION),
            ("from_currency", from),
            ("to_currency", to),
            ("apikey", api_key),
        ])
        .send()
        .await?;

    if resp.status() != StatusCode::OK {
        return Err(RateError::Status(resp.status()));
    }

    let body: QuoteEnvelope = resp.json().await?;
    Ok(body.quote.exchange_rate)
}

/// RUB→GEL out of the two EUR quotes.
fn derive_gel(eur_rub: &str, eur_gel: &str) -> String {
    format_rate(parse_or_zero(eur_rub) / parse_or_zero(eur_gel))
}

fn parse_or_zero(raw: &str) -> f64 {
    match raw.replace(',', ".").parse() {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("failed to parse rate {raw:?}: {err}");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_quote_envelope() {
        let raw = r#"{
            "Realtime Currency Exchange Rate": {
                "1. From_Currency Code": "USD",
                "2. From_Currency Name": "United States Dollar",
                "3. To_Currency Code": "RUB",
                "4. To_Currency Name": "Russian Ruble",
                "5. Exchange Rate": "81.25000000",
                "6. Last Refreshed": "2023-04-06 15:35:01",
                "7. Time Zone": "UTC",
                "8. Bid Price": "81.24000000",
                "9. Ask Price": "81.26000000"
            }
        }"#;
        let body: QuoteEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(body.quote.exchange_rate, "81.25000000");
    }

    #[test]
    fn gel_is_eur_rub_divided_by_eur_gel() {
        // 86.4 RUB per EUR, 2.7 GEL per EUR => 32 RUB per GEL.
        assert_eq!(derive_gel("86.40000000", "2.70000000"), "32.00000");
    }

    #[test]
    fn gel_derivation_accepts_comma_separator() {
        assert_eq!(derive_gel("86,4", "2,7"), "32.00000");
    }

    #[test]
    fn unparseable_operand_falls_back_to_zero() {
        assert_eq!(derive_gel("", "2.7"), "0.00000");
    }
}
