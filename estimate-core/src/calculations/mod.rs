//! Pricing calculations for construction estimates.
//!
//! Everything here is pure: identical records always produce identical
//! estimates, and nothing touches storage.

pub mod common;
pub mod pricing;

pub use pricing::{PricingEngine, estimate};
