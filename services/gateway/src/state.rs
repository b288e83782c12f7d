use crate::config::GatewayConfig;
use crate::kraken::KrakenClient;
use kraken_signing::NonceSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub kraken: KrakenClient,
    /// Shared by every request so concurrent orders never reuse a nonce
    pub nonces: Arc<NonceSource>,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            kraken: KrakenClient::new(&config.kraken_base_url, config.upstream_timeout)?,
            nonces: Arc::new(NonceSource::new()),
        })
    }
}
