//! Effect-size computation for binary and continuous outcomes.
//!
//! One entry point per measure. All functions are pure: validation
//! failures come back as [`crate::core::errors::Error::InvalidData`] with
//! every violated constraint listed, and all diagnostics are returned in
//! the estimate's `warnings` list.

pub mod binary;
pub mod confidence;
pub mod continuous;
mod validation;

pub use binary::{odds_ratio, risk_difference, risk_ratio};
pub use continuous::{mean_difference, standardized_mean_difference};
