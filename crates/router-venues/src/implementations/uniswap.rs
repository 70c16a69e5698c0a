//! Uniswap V3 venue implementation.
//!
//! Quotes are obtained from the Quoter contract via `eth_call`; the quoter
//! simulates the swap against current pool state without executing it. The
//! pool's fee tier is the only piece of market configuration needed and is
//! resolved lazily from the pool contract on first use.

use crate::implementations::eth_call;
use crate::{DynProvider, VenueError, VenueInterface};
use alloy_primitives::{
	aliases::{U160, U24},
	Address, U256,
};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use router_types::SwapDirection;
use tokio::sync::OnceCell;
use tracing::debug;

sol! {
	/// Subset of the Uniswap V3 pool surface needed here.
	interface IUniswapV3Pool {
		function fee() external view returns (uint24);
	}

	/// Quoter entry point. Not a view function on-chain; calling it through
	/// eth_call turns it into a read-only simulation.
	interface IQuoter {
		function quoteExactInputSingle(
			address tokenIn,
			address tokenOut,
			uint24 fee,
			uint256 amountIn,
			uint160 sqrtPriceLimitX96
		) external returns (uint256 amountOut);
	}
}

/// Uniswap V3 WETH/LST pool priced through the Quoter contract.
pub struct UniswapVenue {
	provider: DynProvider,
	pool: Address,
	quoter: Address,
	weth: Address,
	lst: Address,
	/// Fee tier of the pool, resolved once. The OnceCell keeps concurrent
	/// first callers on a single resolution.
	fee: OnceCell<U24>,
}

impl UniswapVenue {
	pub fn new(
		provider: DynProvider,
		pool: Address,
		quoter: Address,
		weth: Address,
		lst: Address,
	) -> Self {
		Self {
			provider,
			pool,
			quoter,
			weth,
			lst,
			fee: OnceCell::new(),
		}
	}

	async fn resolve_fee(&self) -> Result<U24, VenueError> {
		let data = eth_call(&self.provider, self.pool, IUniswapV3Pool::feeCall {}.abi_encode())
			.await?;

		let decoded = IUniswapV3Pool::feeCall::abi_decode_returns(&data, true)
			.map_err(|e| VenueError::Network(format!("failed to decode pool fee: {}", e)))?;

		debug!(pool = %self.pool, fee = %decoded._0, "resolved uniswap pool fee tier");
		Ok(decoded._0)
	}

	fn token_pair(&self, direction: SwapDirection) -> (Address, Address) {
		match direction {
			SwapDirection::ToLst => (self.weth, self.lst),
			SwapDirection::ToEth => (self.lst, self.weth),
		}
	}
}

#[async_trait]
impl VenueInterface for UniswapVenue {
	fn name(&self) -> &str {
		"uniswap"
	}

	async fn quote(
		&self,
		direction: SwapDirection,
		amount_in: U256,
	) -> Result<U256, VenueError> {
		let fee = *self.fee.get_or_try_init(|| self.resolve_fee()).await?;
		let (token_in, token_out) = self.token_pair(direction);

		let call = IQuoter::quoteExactInputSingleCall {
			tokenIn: token_in,
			tokenOut: token_out,
			fee,
			amountIn: amount_in,
			sqrtPriceLimitX96: U160::ZERO,
		};

		let data = eth_call(&self.provider, self.quoter, call.abi_encode()).await?;

		let decoded = IQuoter::quoteExactInputSingleCall::abi_decode_returns(&data, true)
			.map_err(|e| VenueError::Network(format!("failed to decode quote: {}", e)))?;

		debug!(
			venue = self.name(),
			%direction,
			%amount_in,
			amount_out = %decoded.amountOut,
			"quoted"
		);

		Ok(decoded.amountOut)
	}
}
