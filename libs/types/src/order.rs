//! Order intent types
//!
//! The trade parameters a caller may submit, the fixed default record they
//! are merged over, and the field order Kraken's `AddOrder` expects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default trading pair
pub const DEFAULT_PAIR: &str = "XBTUSD";

/// Default Kraken order type
pub const DEFAULT_ORDER_TYPE: &str = "market";

/// Default order volume (base currency units)
pub const DEFAULT_VOLUME: &str = "0.01";

/// Order side, serialized the way Kraken spells it in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved order parameters.
///
/// Every field has a value; callers never build this directly from partial
/// input, they go through [`OrderOverrides::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParams {
    pub pair: String,
    pub side: Side,
    pub order_type: String,
    pub volume: String,
    /// Ask Kraken to check the order without executing it
    pub validate_only: bool,
}

impl Default for OrderParams {
    fn default() -> Self {
        Self {
            pair: DEFAULT_PAIR.to_string(),
            side: Side::Buy,
            order_type: DEFAULT_ORDER_TYPE.to_string(),
            volume: DEFAULT_VOLUME.to_string(),
            validate_only: true,
        }
    }
}

impl OrderParams {
    /// Wire fields in the order they are form-encoded, nonce excluded.
    ///
    /// `validate=true` is appended last, and only for validate-only orders.
    pub fn wire_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("pair", self.pair.as_str()),
            ("type", self.side.as_str()),
            ("ordertype", self.order_type.as_str()),
            ("volume", self.volume.as_str()),
        ];
        if self.validate_only {
            fields.push(("validate", "true"));
        }
        fields
    }
}

/// Caller-supplied order fields.
///
/// A `None` field falls back to the default record when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderOverrides {
    pub pair: Option<String>,
    pub side: Option<Side>,
    pub order_type: Option<String>,
    pub volume: Option<String>,
    pub validate_only: Option<bool>,
}

impl OrderOverrides {
    /// Merge these fields over `defaults` in one step.
    pub fn apply(self, defaults: OrderParams) -> OrderParams {
        OrderParams {
            pair: self.pair.unwrap_or(defaults.pair),
            side: self.side.unwrap_or(defaults.side),
            order_type: self.order_type.unwrap_or(defaults.order_type),
            volume: self.volume.unwrap_or(defaults.volume),
            validate_only: self.validate_only.unwrap_or(defaults.validate_only),
        }
    }
}
