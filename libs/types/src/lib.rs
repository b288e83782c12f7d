//! Types library for the Kraken order relay
//!
//! Shared definitions used by the signing library and the gateway service.
//!
//! # Modules
//! - `order`: Order intent (side, parameters, defaults merge)
//! - `envelope`: Kraken reply shape and the uniform caller-facing envelope

pub mod envelope;
pub mod order;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::envelope::*;
    pub use crate::order::*;
}
