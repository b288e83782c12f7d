//! Gateway configuration
//!
//! Read once at startup and handed to [`AppState`](crate::state::AppState);
//! nothing reads the environment after that.
//!
//! # Environment Variables
//!
//! - `PORT`: listening port (default: 3001)
//! - `KRAKEN_BASE_URL`: upstream base URL (default: https://api.kraken.com)
//! - `KRAKEN_TIMEOUT_SECS`: upstream request timeout (default: none)

use reqwest::Url;
use std::fmt::Display;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_KRAKEN_BASE_URL: &str = "https://api.kraken.com";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub kraken_base_url: Url,
    /// `None` leaves the request to the transport's own behaviour
    pub upstream_timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Defaults for everything except the upstream base URL.
    pub fn new(kraken_base_url: Url) -> Self {
        Self {
            port: DEFAULT_PORT,
            kraken_base_url,
            upstream_timeout: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_var::<u16, _>(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);

        let kraken_base_url = match parse_var::<Url, _>(&lookup, "KRAKEN_BASE_URL")? {
            Some(url) => url,
            None => Url::parse(DEFAULT_KRAKEN_BASE_URL).map_err(|e| ConfigError::InvalidValue {
                key: "KRAKEN_BASE_URL",
                value: DEFAULT_KRAKEN_BASE_URL.to_string(),
                reason: e.to_string(),
            })?,
        };
        if !matches!(kraken_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "KRAKEN_BASE_URL",
                value: kraken_base_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        let upstream_timeout = match parse_var::<u64, _>(&lookup, "KRAKEN_TIMEOUT_SECS")? {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "KRAKEN_TIMEOUT_SECS",
                    value: "0".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            port,
            kraken_base_url,
            upstream_timeout,
        })
    }

    /// All interfaces on the configured port.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        })
}
