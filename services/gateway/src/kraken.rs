//! Kraken REST client
//!
//! Posts a sealed order to `AddOrder` and classifies the reply:
//! - non-2xx: status passed through, Kraken's error list (if readable) as message
//! - 2xx with a non-empty error list: application rejection
//! - 2xx with an unreadable body: transport failure

use kraken_signing::SignedEnvelope;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;
use types::envelope::ExchangeResponse;

use crate::error::{AppError, UPSTREAM_FAILED_MESSAGE};

/// Private endpoint path; also the first input to the HMAC.
pub const ADD_ORDER_PATH: &str = "/0/private/AddOrder";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

pub const API_KEY_HEADER: &str = "API-Key";
pub const API_SIGN_HEADER: &str = "API-Sign";

#[derive(Debug, Clone)]
pub struct KrakenClient {
    http: Client,
    add_order_url: String,
}

impl KrakenClient {
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            add_order_url: format!("{}{}", base_url.as_str().trim_end_matches('/'), ADD_ORDER_PATH),
        })
    }

    /// Submit a sealed `AddOrder` request. No retries: a replayed nonce
    /// would be rejected anyway.
    pub async fn add_order(
        &self,
        api_key: &str,
        envelope: &SignedEnvelope,
    ) -> Result<ExchangeResponse, AppError> {
        let response = self
            .http
            .post(&self.add_order_url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(API_KEY_HEADER, api_key)
            .header(API_SIGN_HEADER, envelope.signature.as_str())
            .body(envelope.encoded_params.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ExchangeResponse>(&body)
                .ok()
                .and_then(|reply| reply.joined_errors())
                .unwrap_or_else(|| UPSTREAM_FAILED_MESSAGE.to_string());

            return Err(AppError::UpstreamStatus {
                status,
                message,
            });
        }

        let reply: ExchangeResponse = response.json().await?;
        if let Some(message) = reply.joined_errors() {
            return Err(AppError::UpstreamRejected(message));
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_order_url_joins_base() {
        let base = Url::parse("https://api.kraken.com").unwrap();
        let client = KrakenClient::new(&base, None).unwrap();
        assert_eq!(client.add_order_url, "https://api.kraken.com/0/private/AddOrder");
    }

    #[test]
    fn test_add_order_url_keeps_base_prefix() {
        let base = Url::parse("http://127.0.0.1:8081/kraken/").unwrap();
        let client = KrakenClient::new(&base, Some(Duration::from_secs(5))).unwrap();
        assert_eq!(
            client.add_order_url,
            "http://127.0.0.1:8081/kraken/0/private/AddOrder"
        );
    }
}
