//! Call surface of the on-chain execution router.
//!
//! The contract atomically splits a swap across the two venues it is
//! deployed against, enforces the minimum-output guard, and reverts the
//! whole swap if the guard is violated. It also exposes its own optimiser
//! as a read-only entry point, which prices routes with the same greedy
//! scheme as the off-chain optimizer and serves as a cross-check.

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolError};
use router_types::SwapRoute;

use crate::RouterError;

sol! {
	interface ISwapRouter {
		/// Raised when the realized output lands below the caller's floor.
		error LessThanMinimum(uint256 amountOut, uint256 minAmountOut);

		/// Swap attached ETH into the staking token.
		function swapTo(
			uint256 uniswapPortion,
			uint256 balancerPortion,
			uint256 minTokensOut,
			uint256 idealTokensOut
		) external payable;

		/// Swap the staking token back into ETH.
		function swapFrom(
			uint256 uniswapPortion,
			uint256 balancerPortion,
			uint256 minTokensOut,
			uint256 idealTokensOut,
			uint256 tokensIn
		) external;

		/// On-chain route optimiser, ETH to staking token.
		function optimiseSwapTo(
			uint256 amount,
			uint256 steps
		) external returns (uint256[2] portions, uint256 amountOut);

		/// On-chain route optimiser, staking token to ETH.
		function optimiseSwapFrom(
			uint256 amount,
			uint256 steps
		) external returns (uint256[2] portions, uint256 amountOut);
	}
}

/// Number of venues the deployed call surface accepts.
pub const CONTRACT_VENUES: usize = 2;

/// Splits a route's portions into the contract's two positional venue
/// slots, rejecting routes whose shape does not match the call surface.
pub fn venue_portions(route: &SwapRoute) -> Result<(U256, U256), RouterError> {
	match route.portions.as_slice() {
		[uniswap, balancer] => Ok((U256::from(*uniswap), U256::from(*balancer))),
		other => Err(RouterError::UnsupportedRoute(other.len())),
	}
}

/// Decodes a `LessThanMinimum` revert from raw revert data, if that is
/// what the data encodes.
pub fn decode_less_than_minimum(data: &[u8]) -> Option<(U256, U256)> {
	ISwapRouter::LessThanMinimum::abi_decode(data, true)
		.ok()
		.map(|e| (e.amountOut, e.minAmountOut))
}

#[cfg(test)]
mod tests {
	use super::*;
	use router_types::SwapDirection;

	fn route_with_portions(portions: Vec<u64>) -> SwapRoute {
		SwapRoute {
			direction: SwapDirection::ToLst,
			portions,
			amount_in: U256::from(100u64),
			amount_out: U256::from(98u64),
			min_amount_out: U256::from(98u64),
		}
	}

	#[test]
	fn two_portions_map_to_venue_slots() {
		let (uniswap, balancer) = venue_portions(&route_with_portions(vec![7, 3])).unwrap();
		assert_eq!(uniswap, U256::from(7u64));
		assert_eq!(balancer, U256::from(3u64));
	}

	#[test]
	fn other_portion_shapes_are_rejected() {
		assert!(matches!(
			venue_portions(&route_with_portions(vec![10])),
			Err(RouterError::UnsupportedRoute(1))
		));
		assert!(matches!(
			venue_portions(&route_with_portions(vec![4, 3, 3])),
			Err(RouterError::UnsupportedRoute(3))
		));
	}

	#[test]
	fn less_than_minimum_round_trips() {
		let encoded = ISwapRouter::LessThanMinimum {
			amountOut: U256::from(97u64),
			minAmountOut: U256::from(99u64),
		}
		.abi_encode();

		assert_eq!(
			decode_less_than_minimum(&encoded),
			Some((U256::from(97u64), U256::from(99u64)))
		);
	}

	#[test]
	fn other_reverts_do_not_decode() {
		assert_eq!(decode_less_than_minimum(&[0x08, 0xc3, 0x79, 0xa0]), None);
		assert_eq!(decode_less_than_minimum(&[]), None);
	}
}
