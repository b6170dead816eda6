//! Exchange-rate provider adapters.
//!
//! Every adapter wraps one third-party HTTP API and exposes the same
//! contract: a mapping from currency code to a decimal rate string. Adapters
//! never fail as a whole; a currency that could not be quoted is simply
//! absent from the returned map.

use std::collections::HashMap;
use std::fmt;

use reqwest::Client;

mod alpha_vantage;
mod contact;
mod korona;
mod unistream;

/// Currencies quoted against RUB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Gel,
    Eur,
}

impl Currency {
    /// Display order used when rendering the rate table.
    pub const LISTED: [Currency; 3] = [Currency::Usd, Currency::Gel, Currency::Eur];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Gel => "GEL",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-provider lookup result. Partial maps are valid output.
pub type RateMap = HashMap<Currency, String>;

/// The fixed set of rate providers. Adding or removing a provider is a
/// change to this enumeration, not to scattered call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Official,
    Unistream,
    Korona,
    Contact,
}

impl Provider {
    /// Display order used when rendering the rate table.
    pub const ORDERED: [Provider; 4] = [
        Provider::Official,
        Provider::Unistream,
        Provider::Korona,
        Provider::Contact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Provider::Official => "official rate",
            Provider::Unistream => "unistream",
            Provider::Korona => "corona",
            Provider::Contact => "contact",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum RateError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Handle on every upstream rate source. Owns the HTTP client and the
/// provider credentials; constructed once and injected where needed.
#[derive(Clone, Debug)]
pub struct RateSources {
    client: Client,
    alpha_vantage_key: String,
}

impl RateSources {
    pub fn new(alpha_vantage_key: String) -> Self {
        Self {
            client: Client::new(),
            alpha_vantage_key,
        }
    }

    /// Quotes every currency a single provider supports.
    pub async fn fetch(&self, provider: Provider) -> RateMap {
        match provider {
            Provider::Official => alpha_vantage::rates(&self.client, &self.alpha_vantage_key).await,
            Provider::Unistream => unistream::rates(&self.client).await,
            Provider::Korona => korona::rates(&self.client).await,
            Provider::Contact => contact::rates(&self.client).await,
        }
    }

    /// Queries all providers, one after the other, in display order.
    pub async fn fetch_all(&self) -> Vec<(Provider, RateMap)> {
        let mut quotes = Vec::with_capacity(Provider::ORDERED.len());
        for provider in Provider::ORDERED {
            quotes.push((provider, self.fetch(provider).await));
        }
        quotes
    }
}

/// Fixed 5-decimal rendering shared by all adapters.
pub(crate) fn format_rate(value: f64) -> String {
    format!("{value:.5}")
}

/// Folds per-currency lookup results into a rate map. A failed lookup is
/// logged and leaves its currency absent; other currencies are unaffected.
pub(crate) fn collect_quotes(
    provider: Provider,
    entries: impl IntoIterator<Item = (Currency, Result<String, RateError>)>,
) -> RateMap {
    let mut result = RateMap::new();
    for (currency, quote) in entries {
        match quote {
            Ok(rate) => {
                result.insert(currency, rate);
            }
            Err(err) => tracing::warn!("{} {currency} lookup failed: {err}", provider.label()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_order_is_fixed() {
        let labels: Vec<_> = Provider::ORDERED.iter().map(|p| p.label()).collect();
        assert_eq!(labels, ["official rate", "unistream", "corona", "contact"]);
    }

    #[test]
    fn listed_currencies_match_display_order() {
        let codes: Vec<_> = Currency::LISTED.iter().map(|c| c.code()).collect();
        assert_eq!(codes, ["USD", "GEL", "EUR"]);
    }

    #[test]
    fn rates_render_with_five_decimals() {
        assert_eq!(format_rate(12.5), "12.50000");
        assert_eq!(format_rate(76.123456), "76.12346");
    }

    #[test]
    fn failed_lookup_leaves_its_currency_absent() {
        let result = collect_quotes(
            Provider::Unistream,
            [
                (Currency::Usd, Ok("81.25000".to_string())),
                (
                    Currency::Gel,
                    Err(RateError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)),
                ),
                (
                    Currency::Eur,
                    Err(RateError::Decode("empty fee list".to_string())),
                ),
            ],
        );

        assert_eq!(result.get(&Currency::Usd).map(String::as_str), Some("81.25000"));
        assert!(!result.contains_key(&Currency::Gel));
        assert!(!result.contains_key(&Currency::Eur));
    }

    #[test]
    fn all_failed_lookups_yield_an_empty_map() {
        let result = collect_quotes(
            Provider::Korona,
            [(
                Currency::Usd,
                Err(RateError::Status(reqwest::StatusCode::FORBIDDEN)),
            )],
        );
        assert!(result.is_empty());
    }
}
