//! Swap route types shared across the router.
//!
//! A route describes how an input amount is split across the configured
//! liquidity venues, together with the expected output and the minimum
//! output enforced at execution time.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Direction of a swap between native ETH and the liquid staking token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapDirection {
	/// Convert native ETH into the staking token.
	ToLst,
	/// Convert the staking token back into ETH.
	ToEth,
}

/// Error returned when parsing a [`SwapDirection`] from a string.
#[derive(Debug, Error)]
#[error("unknown swap direction: {0} (expected \"to-lst\" or \"to-eth\")")]
pub struct ParseDirectionError(String);

impl FromStr for SwapDirection {
	type Err = ParseDirectionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"to-lst" | "lst" => Ok(SwapDirection::ToLst),
			"to-eth" | "eth" => Ok(SwapDirection::ToEth),
			other => Err(ParseDirectionError(other.to_string())),
		}
	}
}

impl fmt::Display for SwapDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SwapDirection::ToLst => write!(f, "to-lst"),
			SwapDirection::ToEth => write!(f, "to-eth"),
		}
	}
}

/// A computed allocation of an input amount across the venue set.
///
/// Routes are produced by the optimizer and treated as immutable values;
/// the only sanctioned adjustment before execution is relaxing the
/// slippage floor via [`SwapRoute::with_slippage_bps`].
///
/// `portions[i]` counts the discrete steps allocated to venue `i` in the
/// order the venues were registered; the portion counts always sum to the
/// step count the route was optimized with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRoute {
	/// Which conversion this route prices.
	pub direction: SwapDirection,
	/// Discrete steps allocated to each venue, index-aligned with the
	/// venue set.
	pub portions: Vec<u64>,
	/// Total input amount in wei.
	pub amount_in: U256,
	/// Expected output computed from pre-trade quotes. Realized output can
	/// diverge once intervening trades move the pools.
	pub amount_out: U256,
	/// Minimum output enforced atomically by the execution contract.
	/// Defaults to `amount_out`; callers are expected to relax it.
	pub min_amount_out: U256,
}

impl SwapRoute {
	/// Returns a copy of the route with the slippage floor relaxed by the
	/// given tolerance in basis points.
	///
	/// The floor is recomputed from `amount_out`, not from the current
	/// `min_amount_out`, so repeated calls do not compound. A tolerance at
	/// or above 10_000 bps floors the route at zero.
	pub fn with_slippage_bps(&self, bps: u64) -> Self {
		let numerator = U256::from(10_000u64.saturating_sub(bps));
		let min_amount_out = self.amount_out * numerator / U256::from(10_000u64);
		Self {
			min_amount_out,
			..self.clone()
		}
	}

	/// Total number of discrete steps this route allocates.
	pub fn steps(&self) -> u64 {
		self.portions.iter().sum()
	}
}
