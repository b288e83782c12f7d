//! Kraken Gateway
//!
//! HTTP front for the order relay: accepts credentials and trade intent as
//! JSON, signs the request with the caller's secret and forwards it to
//! Kraken's `AddOrder`, then maps Kraken's reply onto a uniform envelope.

pub mod config;
pub mod error;
pub mod handlers;
pub mod kraken;
pub mod models;
pub mod router;
pub mod state;
pub mod telemetry;
