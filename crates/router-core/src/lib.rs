//! Swap router facade.
//!
//! Binds a fixed venue set to an execution contract: `optimize` prices a
//! route off-chain through the greedy optimizer, `execute` hands a route
//! to the contract. The two are deliberately independent so callers can
//! execute routes they adjusted for slippage or obtained from the
//! contract's own optimiser.

use alloy_primitives::{Address as AlloyAddress, Bytes, TxKind, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::SolCall;
use router_delivery::{DeliveryError, DeliveryInterface};
use router_optimizer::{OptimizerError, RouteOptimizer};
use router_types::{SwapDirection, SwapRoute, Transaction, TransactionHash};
use router_venues::{DynProvider, VenueInterface};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub mod contract;

use contract::{decode_less_than_minimum, venue_portions, ISwapRouter};

#[derive(Debug, Error)]
pub enum RouterError {
	#[error(transparent)]
	Optimizer(#[from] OptimizerError),

	#[error(transparent)]
	Delivery(#[from] DeliveryError),

	/// The route's portion count does not match the deployed call surface.
	#[error("route has {0} portions but the execution contract takes {}", contract::CONTRACT_VENUES)]
	UnsupportedRoute(usize),

	/// The contract reported that execution would land below the floor.
	/// Raised at preflight so no gas is spent on a doomed swap.
	#[error("swap would return {amount_out}, below the minimum {min_amount_out}")]
	LessThanMinimum {
		amount_out: U256,
		min_amount_out: U256,
	},

	/// A read-only contract call failed for a reason other than the
	/// minimum-output guard.
	#[error("router contract call failed: {0}")]
	Call(String),
}

/// Construction parameters for [`SwapRouter`].
pub struct SwapRouterConfig {
	/// Address of the deployed execution router contract.
	pub address: AlloyAddress,
	/// Chain the router operates on.
	pub chain_id: u64,
	/// Gas limit attached to swap transactions.
	pub gas_limit: u64,
	/// Step count used when the caller does not supply one.
	pub default_steps: u32,
}

/// Facade over the venue set, the optimizer and the execution contract.
pub struct SwapRouter {
	optimizer: RouteOptimizer,
	provider: DynProvider,
	delivery: Arc<dyn DeliveryInterface>,
	sender: AlloyAddress,
	config: SwapRouterConfig,
}

impl SwapRouter {
	pub fn new(
		venues: Vec<Arc<dyn VenueInterface>>,
		provider: DynProvider,
		delivery: Arc<dyn DeliveryInterface>,
		config: SwapRouterConfig,
	) -> Self {
		let sender = AlloyAddress::from_slice(&delivery.sender().0);
		Self {
			optimizer: RouteOptimizer::new(venues),
			provider,
			delivery,
			sender,
			config,
		}
	}

	/// The venue set routes are optimized across, in portion order.
	pub fn venues(&self) -> &[Arc<dyn VenueInterface>] {
		self.optimizer.venues()
	}

	/// Prices a route off-chain via the greedy optimizer.
	pub async fn optimize(
		&self,
		direction: SwapDirection,
		amount_in: U256,
		steps: Option<u32>,
	) -> Result<SwapRoute, RouterError> {
		let steps = steps.unwrap_or(self.config.default_steps);
		Ok(self.optimizer.optimize(direction, amount_in, steps).await?)
	}

	/// Prices a route through the contract's own optimiser, read-only.
	///
	/// The contract runs the same greedy scheme against live pool state;
	/// this is the authoritative cross-check for the off-chain result.
	pub async fn optimize_on_chain(
		&self,
		direction: SwapDirection,
		amount_in: U256,
		steps: Option<u32>,
	) -> Result<SwapRoute, RouterError> {
		let steps = steps.unwrap_or(self.config.default_steps);
		if steps == 0 {
			return Err(OptimizerError::InvalidStepCount(steps).into());
		}

		let data = match direction {
			SwapDirection::ToLst => ISwapRouter::optimiseSwapToCall {
				amount: amount_in,
				steps: U256::from(steps),
			}
			.abi_encode(),
			SwapDirection::ToEth => ISwapRouter::optimiseSwapFromCall {
				amount: amount_in,
				steps: U256::from(steps),
			}
			.abi_encode(),
		};

		let returned = self.call_router(data, U256::ZERO).await?;

		let (portions, amount_out) = match direction {
			SwapDirection::ToLst => {
				let decoded = ISwapRouter::optimiseSwapToCall::abi_decode_returns(&returned, true)
					.map_err(|e| RouterError::Call(format!("failed to decode optimiser: {}", e)))?;
				(decoded.portions, decoded.amountOut)
			}
			SwapDirection::ToEth => {
				let decoded =
					ISwapRouter::optimiseSwapFromCall::abi_decode_returns(&returned, true)
						.map_err(|e| RouterError::Call(format!("failed to decode optimiser: {}", e)))?;
				(decoded.portions, decoded.amountOut)
			}
		};

		let portions = portions
			.iter()
			.map(|p| u64::try_from(*p))
			.collect::<Result<Vec<_>, _>>()
			.map_err(|_| RouterError::Call("optimiser portion exceeds u64".to_string()))?;

		debug!(%direction, %amount_in, steps, ?portions, %amount_out, "on-chain optimiser result");

		Ok(SwapRoute {
			direction,
			portions,
			amount_in,
			amount_out,
			min_amount_out: amount_out,
		})
	}

	/// Submits a route to the execution contract.
	///
	/// Performs no optimization: the route is executed exactly as given,
	/// so slippage adjustments must already be applied. The call is
	/// preflighted via `eth_call` first; a `LessThanMinimum` revert
	/// surfaces as [`RouterError::LessThanMinimum`] without spending gas.
	pub async fn execute(&self, route: &SwapRoute) -> Result<TransactionHash, RouterError> {
		let (data, value) = encode_execution(route)?;

		self.call_router(data.clone(), value).await?;

		let tx = Transaction {
			to: Some(self.config.address.into()),
			data,
			value,
			chain_id: self.config.chain_id,
			nonce: None,
			gas_limit: Some(self.config.gas_limit),
			gas_price: None,
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		};

		let hash = self.delivery.submit(tx).await?;
		info!(
			direction = %route.direction,
			amount_in = %route.amount_in,
			min_amount_out = %route.min_amount_out,
			tx_hash = %hash,
			"submitted swap"
		);

		Ok(hash)
	}

	/// Read-only call against the router contract from the sender's
	/// address, with `LessThanMinimum` reverts decoded into their own
	/// error.
	async fn call_router(&self, data: Vec<u8>, value: U256) -> Result<Bytes, RouterError> {
		let request = TransactionRequest {
			from: Some(self.sender),
			to: Some(TxKind::Call(self.config.address)),
			input: TransactionInput::new(data.into()),
			value: Some(value),
			..Default::default()
		};

		match self.provider.call(&request).await {
			Ok(bytes) => Ok(bytes),
			Err(e) => {
				if let Some(revert) = e.as_error_resp().and_then(|payload| payload.as_revert_data())
				{
					if let Some((amount_out, min_amount_out)) = decode_less_than_minimum(&revert) {
						return Err(RouterError::LessThanMinimum {
							amount_out,
							min_amount_out,
						});
					}
				}
				Err(RouterError::Call(e.to_string()))
			}
		}
	}
}

/// Encodes a route into contract calldata and the native value to attach.
///
/// `ToLst` carries the input as transaction value; `ToEth` passes it as a
/// call parameter and attaches nothing.
pub fn encode_execution(route: &SwapRoute) -> Result<(Vec<u8>, U256), RouterError> {
	let (uniswap_portion, balancer_portion) = venue_portions(route)?;

	let encoded = match route.direction {
		SwapDirection::ToLst => (
			ISwapRouter::swapToCall {
				uniswapPortion: uniswap_portion,
				balancerPortion: balancer_portion,
				minTokensOut: route.min_amount_out,
				idealTokensOut: route.amount_out,
			}
			.abi_encode(),
			route.amount_in,
		),
		SwapDirection::ToEth => (
			ISwapRouter::swapFromCall {
				uniswapPortion: uniswap_portion,
				balancerPortion: balancer_portion,
				minTokensOut: route.min_amount_out,
				idealTokensOut: route.amount_out,
				tokensIn: route.amount_in,
			}
			.abi_encode(),
			U256::ZERO,
		),
	};

	Ok(encoded)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn route(direction: SwapDirection) -> SwapRoute {
		SwapRoute {
			direction,
			portions: vec![6, 4],
			amount_in: U256::from(100u64),
			amount_out: U256::from(98u64),
			min_amount_out: U256::from(97u64),
		}
	}

	#[test]
	fn to_lst_encodes_swap_to_with_value() {
		let (data, value) = encode_execution(&route(SwapDirection::ToLst)).unwrap();

		// The input amount rides along as native value
		assert_eq!(value, U256::from(100u64));

		let decoded = ISwapRouter::swapToCall::abi_decode(&data, true).unwrap();
		assert_eq!(decoded.uniswapPortion, U256::from(6u64));
		assert_eq!(decoded.balancerPortion, U256::from(4u64));
		assert_eq!(decoded.minTokensOut, U256::from(97u64));
		assert_eq!(decoded.idealTokensOut, U256::from(98u64));
	}

	#[test]
	fn to_eth_encodes_swap_from_without_value() {
		let (data, value) = encode_execution(&route(SwapDirection::ToEth)).unwrap();

		assert_eq!(value, U256::ZERO);

		let decoded = ISwapRouter::swapFromCall::abi_decode(&data, true).unwrap();
		assert_eq!(decoded.uniswapPortion, U256::from(6u64));
		assert_eq!(decoded.balancerPortion, U256::from(4u64));
		assert_eq!(decoded.minTokensOut, U256::from(97u64));
		assert_eq!(decoded.idealTokensOut, U256::from(98u64));
		assert_eq!(decoded.tokensIn, U256::from(100u64));
	}

	#[test]
	fn portion_shape_mismatch_fails_before_encoding() {
		let mut bad = route(SwapDirection::ToLst);
		bad.portions = vec![10];

		assert!(matches!(
			encode_execution(&bad),
			Err(RouterError::UnsupportedRoute(1))
		));
	}
}
