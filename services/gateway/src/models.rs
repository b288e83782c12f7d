use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use types::order::{OrderOverrides, OrderParams, Side};

use crate::error::AppError;

/// Body of `POST /api/kraken/connect`.
///
/// Every field is optional on the wire; `null` is treated as absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "optional_secret")]
    pub api_secret: Option<SecretString>,
    pub pair: Option<String>,
    #[serde(rename = "type")]
    pub side: Option<Side>,
    #[serde(rename = "ordertype")]
    pub order_type: Option<String>,
    pub volume: Option<String>,
    pub validate_only: Option<bool>,
}

fn optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|secret| SecretString::new(secret.into_boxed_str())))
}

/// A validated order request: credentials present, defaults merged.
#[derive(Debug)]
pub struct OrderRequest {
    pub api_key: String,
    pub api_secret: SecretString,
    pub params: OrderParams,
}

impl OrderRequest {
    /// Validate a raw JSON body.
    ///
    /// Credentials are checked before the optional fields are parsed, so a
    /// body without them always fails with [`AppError::MissingCredentials`].
    pub fn from_json(body: Value) -> Result<Self, AppError> {
        if !has_credential(&body, "apiKey") || !has_credential(&body, "apiSecret") {
            return Err(AppError::MissingCredentials);
        }

        let request: ConnectRequest =
            serde_json::from_value(body).map_err(|e| AppError::InvalidPayload(e.to_string()))?;
        Self::try_from(request)
    }
}

fn has_credential(body: &Value, field: &str) -> bool {
    match body.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(value)) => !value.is_empty(),
        Some(_) => true,
    }
}

impl TryFrom<ConnectRequest> for OrderRequest {
    type Error = AppError;

    fn try_from(req: ConnectRequest) -> Result<Self, Self::Error> {
        let api_key = req.api_key.filter(|key| !key.is_empty());
        let api_secret = req
            .api_secret
            .filter(|secret| !secret.expose_secret().is_empty());

        let (Some(api_key), Some(api_secret)) = (api_key, api_secret) else {
            return Err(AppError::MissingCredentials);
        };

        let overrides = OrderOverrides {
            pair: req.pair,
            side: req.side,
            order_type: req.order_type,
            volume: req.volume,
            validate_only: req.validate_only,
        };

        Ok(Self {
            api_key,
            api_secret,
            params: overrides.apply(OrderParams::default()),
        })
    }
}
