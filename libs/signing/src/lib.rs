//! Kraken Signing — Request Authentication Layer
//!
//! Everything needed to authenticate a call to a Kraken private endpoint:
//! - Ordered form encoding of request parameters
//! - A strictly increasing, clock-derived nonce source
//! - The `API-Sign` computation and the sealed request it produces
//!
//! # Determinism
//! Signing is pure: identical path, parameters and secret always yield the
//! identical signature. Only `NonceSource` reads the clock.

pub mod form;
pub mod nonce;
pub mod signing;

pub use form::FormParams;
pub use nonce::NonceSource;
pub use signing::{sign, SignedEnvelope, SigningError};
