//! Liquidity venue abstraction for the swap router.
//!
//! A venue is anything able to price one conversion step: given an input
//! amount and a direction, it returns the expected output amount. The
//! optimizer only ever consumes this quoting capability; how a venue
//! computes the number (on-chain quoter simulation, vault query, ...) is
//! the implementation's business.

use alloy_primitives::U256;
use alloy_provider::Provider;
use alloy_transport_http::Http;
use async_trait::async_trait;
use router_types::SwapDirection;
use std::sync::Arc;
use thiserror::Error;

pub mod implementations;

pub use implementations::{BalancerVenue, UniswapVenue};

/// Shared handle to an HTTP JSON-RPC provider used for read-only calls.
pub type DynProvider = Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>;

/// Errors surfaced by venue quote queries.
///
/// Venue failures are fatal to the optimization that triggered them; no
/// retry happens at this layer.
#[derive(Debug, Error)]
pub enum VenueError {
	/// The venue's market could not be resolved or the quote query failed.
	#[error("quote unavailable: {0}")]
	QuoteUnavailable(String),
	/// The venue answered but the response could not be interpreted.
	#[error("venue response error: {0}")]
	Network(String),
}

/// A liquidity source able to quote either conversion direction.
///
/// Implementations must be side-effect-free from the caller's point of
/// view and O(1) amortized: any market configuration they need is
/// resolved once and cached behind a single-flight guard.
#[async_trait]
pub trait VenueInterface: Send + Sync {
	/// Short identifier used in logs and route displays.
	fn name(&self) -> &str;

	/// Quotes the output amount for swapping `amount_in` in the given
	/// direction.
	async fn quote(&self, direction: SwapDirection, amount_in: U256)
		-> Result<U256, VenueError>;
}
