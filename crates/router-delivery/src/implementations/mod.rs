//! Concrete delivery implementations.
//!
//! Available implementations:
//! - `alloy`: direct JSON-RPC submission through an Alloy provider with a
//!   local signing key

pub mod alloy;

pub use alloy::AlloyDelivery;
