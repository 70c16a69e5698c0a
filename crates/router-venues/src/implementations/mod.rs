//! Concrete venue implementations.
//!
//! Available venues:
//! - `uniswap`: Uniswap V3 pool priced through the Quoter contract
//! - `balancer`: Balancer V2 pool priced through the Vault's batch-swap query

use crate::{DynProvider, VenueError};
use alloy_primitives::{Address, Bytes, TxKind};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionInput, TransactionRequest};

pub mod balancer;
pub mod uniswap;

pub use balancer::BalancerVenue;
pub use uniswap::UniswapVenue;

/// Read-only contract call shared by the venue implementations.
pub(crate) async fn eth_call(
	provider: &DynProvider,
	to: Address,
	data: Vec<u8>,
) -> Result<Bytes, VenueError> {
	let request = TransactionRequest {
		to: Some(TxKind::Call(to)),
		input: TransactionInput::new(data.into()),
		..Default::default()
	};

	provider
		.call(&request)
		.await
		.map_err(|e| VenueError::QuoteUnavailable(format!("eth_call to {} failed: {}", to, e)))
}
