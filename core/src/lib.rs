//! Shared building blocks for the unified exchange layer: the error
//! taxonomy, decimal and fixed-point numeric handling, payload field
//! resolution and process configuration.

pub mod config;
pub mod error;
pub mod fields;
pub mod fixed_point;
pub mod json;
pub mod key_cache;
pub mod metrics;
pub mod precision;

pub use error::{Error, ErrorKind, Result};
pub use fields::FieldChain;
pub use fixed_point::Scale;
pub use precision::Rounding;
