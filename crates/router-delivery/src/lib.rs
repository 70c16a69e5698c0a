//! Transaction delivery for the swap router.
//!
//! Delivery owns the signing key and the write path to the chain: it
//! submits transactions and tracks them to confirmation. Everything above
//! this layer hands over a prepared [`Transaction`] and gets back a hash.

use async_trait::async_trait;
use router_types::{Address, Transaction, TransactionHash, TransactionReceipt};
use thiserror::Error;

pub mod implementations;

pub use implementations::AlloyDelivery;

#[derive(Debug, Error)]
pub enum DeliveryError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Transaction submission and monitoring.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Address transactions are sent from.
	fn sender(&self) -> Address;

	/// Signs and submits a transaction, returning its hash.
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError>;

	/// Waits until the transaction has the requested number of
	/// confirmations.
	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError>;

	/// Fetches the receipt for an already-mined transaction.
	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError>;
}
