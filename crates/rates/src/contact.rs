//! Contact money-transfer adapter.
//!
//! The API hands out a bearer token for an anonymous session and pairs it
//! with two cookies delivered via `Set-Cookie`; both cookies may be rotated
//! by any response, so every reply is scanned for them. A quote takes three
//! calls on top of the token exchange: create a transfer form, set its
//! amount and currency, then ask for the fees of that form.
//!
//! The session is short-lived: each lookup authenticates from scratch, which
//! matches the upstream behavior of refreshing the token before every quote.

use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{self, HeaderMap},
};
use serde::{Deserialize, Serialize};

use crate::{Currency, Provider, RateError, RateMap, collect_quotes};

const API_URL: &str = "https://online.contact-sys.com/api/contact/v2";

const TOKEN_TYPE: &str = "SplitTokenV2";
const ANONYMOUS_TICKET: &str = "D5267BED-18CC-4661-B03A-65934CAE1CA4";
const BANK_CODE: &str = "CFRN";
const NOTIONAL_AMOUNT: &str = "1000";

const REFRESH_COOKIE: &str = "tokenTailRefresh2";
const ACCESS_COOKIE: &str = "tokenTailAccess2";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest {
    token_type: &'static str,
    grant_type: &'static str,
    ticket: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BankForm {
    bank_code: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormFields<'a> {
    trn_amount: &'static str,
    trn_currency: &'a str,
}

#[derive(Debug, Deserialize)]
struct FormCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FeesResponse {
    rate: String,
}

pub(crate) async fn rates(client: &Client) -> RateMap {
    let mut entries = Vec::new();
    for currency in [Currency::Usd, Currency::Gel] {
        entries.push((currency, rate(client, currency.code()).await));
    }
    collect_quotes(Provider::Contact, entries)
}

async fn rate(client: &Client, currency: &str) -> Result<String, RateError> {
    let mut session = Session::authenticate(client).await?;
    let form_id = session.create_form(client).await?;
    session.set_fields(client, &form_id, currency).await?;
    session.fees(client, &form_id).await
}

/// Anonymous API session: bearer token plus the two tail cookies.
#[derive(Debug, Default)]
struct Session {
    token: String,
    refresh_cookie: Option<String>,
    access_cookie: Option<String>,
}

impl Session {
    async fn authenticate(client: &Client) -> Result<Session, RateError> {
        let resp = client
            .post(format!("{API_URL}/auth/token"))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&TokenRequest {
                token_type: TOKEN_TYPE,
                grant_type: "anonymous",
                ticket: ANONYMOUS_TICKET,
            })
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(RateError::Status(resp.status()));
        }

        let mut session = Session::default();
        session.absorb_cookies(resp.headers());

        let body: TokenResponse = resp.json().await?;
        session.token = body.access_token;
        Ok(session)
    }

    async fn create_form(&mut self, client: &Client) -> Result<String, RateError> {
        let req = client
            .post(format!("{API_URL}/trns/bank"))
            .json(&BankForm { bank_code: BANK_CODE });
        let resp = self.send(req).await?;
        let body: FormCreated = resp.json().await?;
        Ok(body.id)
    }

    async fn set_fields(
        &mut self,
        client: &Client,
        form_id: &str,
        currency: &str,
    ) -> Result<(), RateError> {
        let req = client
            .put(format!("{API_URL}/trns/{form_id}/fields"))
            .json(&FormFields {
                trn_amount: NOTIONAL_AMOUNT,
                trn_currency: currency,
            });
        self.send(req).await?;
        Ok(())
    }

    async fn fees(&mut self, client: &Client, form_id: &str) -> Result<String, RateError> {
        let req = client.post(format!("{API_URL}/trns/{form_id}/fees"));
        let resp = self.send(req).await?;
        let body: FeesResponse = resp.json().await?;
        Ok(body.rate)
    }

    /// Attaches auth headers, fires the request and picks up any rotated
    /// cookies from the reply.
    async fn send(&mut self, req: RequestBuilder) -> Result<Response, RateError> {
        let mut req = req.header(header::CONTENT_TYPE, "application/json");
        if !self.token.is_empty() {
            req = req.header(header::AUTHORIZATION, format!("{TOKEN_TYPE} {}", self.token));
        }
        if let Some(cookie) = self.cookie_header() {
            req = req.header(header::COOKIE, cookie);
        }

        let resp = req.send().await?;
        self.absorb_cookies(resp.headers());

        if !resp.status().is_success() {
            return Err(RateError::Status(resp.status()));
        }
        Ok(resp)
    }

    fn cookie_header(&self) -> Option<String> {
        let mut pairs = Vec::new();
        if let Some(value) = &self.refresh_cookie {
            pairs.push(format!("{REFRESH_COOKIE}={value}"));
        }
        if let Some(value) = &self.access_cookie {
            pairs.push(format!("{ACCESS_COOKIE}={value}"));
        }
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    fn absorb_cookies(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else {
                continue;
            };
            let Some((name, rest)) = raw.split_once('=') else {
                tracing::warn!("malformed cookie: {raw}");
                continue;
            };
            let value = rest.split(';').next().unwrap_or("").trim();
            match name.trim() {
                REFRESH_COOKIE => self.refresh_cookie = Some(value.to_string()),
                ACCESS_COOKIE => self.access_cookie = Some(value.to_string()),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderValue, SET_COOKIE};

    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(SET_COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn extracts_both_tail_cookies() {
        let mut session = Session::default();
        session.absorb_cookies(&headers(&[
            "tokenTailRefresh2=abc123; Path=/; HttpOnly",
            "tokenTailAccess2=def456; Path=/; Secure",
            "unrelated=zzz",
        ]));

        assert_eq!(session.refresh_cookie.as_deref(), Some("abc123"));
        assert_eq!(session.access_cookie.as_deref(), Some("def456"));
    }

    #[test]
    fn later_cookies_replace_earlier_ones() {
        let mut session = Session::default();
        session.absorb_cookies(&headers(&["tokenTailAccess2=first"]));
        session.absorb_cookies(&headers(&["tokenTailAccess2=second; Path=/"]));
        assert_eq!(session.access_cookie.as_deref(), Some("second"));
    }

    #[test]
    fn cookie_header_joins_known_cookies() {
        let mut session = Session::default();
        session.absorb_cookies(&headers(&[
            "tokenTailRefresh2=r1",
            "tokenTailAccess2=a1",
        ]));
        assert_eq!(
            session.cookie_header().as_deref(),
            Some("tokenTailRefresh2=r1; tokenTailAccess2=a1")
        );
    }

    #[test]
    fn no_cookies_means_no_header() {
        assert!(Session::default().cookie_header().is_none());
    }

    #[test]
    fn decodes_token_and_fees_bodies() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"accessToken": "tok", "refreshToken": "ref"}"#).unwrap();
        assert_eq!(token.access_token, "tok");

        let fees: FeesResponse = serde_json::from_str(r#"{"rate": "81.25000"}"#).unwrap();
        assert_eq!(fees.rate, "81.25000");
    }
}
