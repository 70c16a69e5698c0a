//! Balancer V2 venue implementation.
//!
//! Quotes go through the Vault's `queryBatchSwap`, the canonical off-chain
//! pricing path for Balancer pools: the vault simulates the batch swap and
//! reports per-asset deltas without moving funds. Pool existence is checked
//! once against the vault's registry.

use crate::implementations::eth_call;
use crate::{DynProvider, VenueError, VenueInterface};
use alloy_primitives::{Address, Bytes, FixedBytes, I256, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use router_types::SwapDirection;
use tokio::sync::OnceCell;
use tracing::debug;

sol! {
	/// One hop of a batch swap.
	struct BatchSwapStep {
		bytes32 poolId;
		uint256 assetInIndex;
		uint256 assetOutIndex;
		uint256 amount;
		bytes userData;
	}

	/// Fund routing for a batch swap. Irrelevant for queries but required
	/// by the call shape.
	struct FundManagement {
		address sender;
		bool fromInternalBalance;
		address recipient;
		bool toInternalBalance;
	}

	/// Subset of the Balancer V2 vault surface needed here.
	interface IVault {
		function getPool(bytes32 poolId) external view returns (address, uint8);

		function queryBatchSwap(
			uint8 kind,
			BatchSwapStep[] swaps,
			address[] assets,
			FundManagement funds
		) external returns (int256[] assetDeltas);
	}
}

/// Vault swap kind for exact-input swaps.
const GIVEN_IN: u8 = 0;

/// Balancer V2 WETH/LST pool priced through the vault's batch-swap query.
pub struct BalancerVenue {
	provider: DynProvider,
	vault: Address,
	pool_id: FixedBytes<32>,
	weth: Address,
	lst: Address,
	/// Pool contract address from the vault registry, resolved once under
	/// a single-flight guard.
	pool: OnceCell<Address>,
}

impl BalancerVenue {
	pub fn new(
		provider: DynProvider,
		vault: Address,
		pool_id: FixedBytes<32>,
		weth: Address,
		lst: Address,
	) -> Self {
		Self {
			provider,
			vault,
			pool_id,
			weth,
			lst,
			pool: OnceCell::new(),
		}
	}

	async fn resolve_pool(&self) -> Result<Address, VenueError> {
		let call = IVault::getPoolCall {
			poolId: self.pool_id,
		};

		let data = eth_call(&self.provider, self.vault, call.abi_encode()).await?;

		let decoded = IVault::getPoolCall::abi_decode_returns(&data, true)
			.map_err(|e| VenueError::Network(format!("failed to decode getPool: {}", e)))?;

		let pool = decoded._0;
		if pool == Address::ZERO {
			return Err(VenueError::QuoteUnavailable(format!(
				"balancer pool {} not registered with vault {}",
				self.pool_id, self.vault
			)));
		}

		debug!(pool_id = %self.pool_id, pool = %pool, "resolved balancer pool");
		Ok(pool)
	}

	fn token_pair(&self, direction: SwapDirection) -> (Address, Address) {
		match direction {
			SwapDirection::ToLst => (self.weth, self.lst),
			SwapDirection::ToEth => (self.lst, self.weth),
		}
	}
}

#[async_trait]
impl VenueInterface for BalancerVenue {
	fn name(&self) -> &str {
		"balancer"
	}

	async fn quote(
		&self,
		direction: SwapDirection,
		amount_in: U256,
	) -> Result<U256, VenueError> {
		self.pool.get_or_try_init(|| self.resolve_pool()).await?;

		let (token_in, token_out) = self.token_pair(direction);

		let call = IVault::queryBatchSwapCall {
			kind: GIVEN_IN,
			swaps: vec![BatchSwapStep {
				poolId: self.pool_id,
				assetInIndex: U256::ZERO,
				assetOutIndex: U256::from(1u64),
				amount: amount_in,
				userData: Bytes::new(),
			}],
			assets: vec![token_in, token_out],
			funds: FundManagement {
				sender: Address::ZERO,
				fromInternalBalance: false,
				recipient: Address::ZERO,
				toInternalBalance: false,
			},
		};

		let data = eth_call(&self.provider, self.vault, call.abi_encode()).await?;

		let decoded = IVault::queryBatchSwapCall::abi_decode_returns(&data, true)
			.map_err(|e| VenueError::Network(format!("failed to decode queryBatchSwap: {}", e)))?;

		let amount_out = amount_out_from_deltas(&decoded.assetDeltas)?;

		debug!(
			venue = self.name(),
			%direction,
			%amount_in,
			%amount_out,
			"quoted"
		);

		Ok(amount_out)
	}
}

/// Extracts the output amount from vault asset deltas.
///
/// The vault reports deltas from its own perspective: positive amounts flow
/// into the vault, negative amounts flow out to the caller. The output
/// asset sits at index 1 of the assets array built above.
fn amount_out_from_deltas(deltas: &[I256]) -> Result<U256, VenueError> {
	let delta = deltas
		.get(1)
		.ok_or_else(|| VenueError::Network("vault returned no output delta".to_string()))?;

	if delta.is_positive() {
		return Err(VenueError::Network(format!(
			"vault quoted an inbound delta for the output asset: {}",
			delta
		)));
	}

	Ok(delta.unsigned_abs())
}
