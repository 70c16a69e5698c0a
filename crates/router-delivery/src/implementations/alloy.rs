//! Alloy-based transaction delivery.
//!
//! The provider is built with the recommended fillers and a wallet layer,
//! so gas, nonce and signing are handled on the way out. Confirmation
//! tracking polls receipts with a timeout budget proportional to the
//! number of confirmations requested.

use crate::{DeliveryError, DeliveryInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::FixedBytes;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use router_types::{Address, Transaction, TransactionHash, TransactionReceipt};
use std::sync::Arc;
use tracing::{debug, info};

/// Truncates a transaction hash for display.
fn truncate_hash(hash: &TransactionHash) -> String {
	let hash_str = hex::encode(&hash.0);
	if hash_str.len() <= 8 {
		hash_str
	} else {
		format!("{}..", &hash_str[..8])
	}
}

/// Direct JSON-RPC delivery with a local signing key.
pub struct AlloyDelivery {
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
	sender: Address,
}

impl AlloyDelivery {
	/// Creates a delivery service for the given endpoint and key.
	///
	/// The chain ID is fixed on the signer so every outgoing transaction
	/// carries replay protection for the configured network.
	pub fn new(rpc_url: &str, chain_id: u64, private_key: &str) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL: {}", e)))?;

		let signer: PrivateKeySigner = private_key
			.parse()
			.map_err(|e| DeliveryError::InvalidKey(format!("Invalid private key: {}", e)))?;
		let signer = signer.with_chain_id(Some(chain_id));
		let sender = Address(signer.address().as_slice().to_vec());

		let wallet = EthereumWallet::from(signer);

		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(wallet)
			.on_http(url);

		Ok(Self {
			provider: Arc::new(provider),
			sender,
		})
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	fn sender(&self) -> Address {
		self.sender.clone()
	}

	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		let request: TransactionRequest = tx.into();

		// The provider's wallet layer signs on the way out
		let pending_tx = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to send transaction: {}", e)))?;

		let tx_hash = TransactionHash(pending_tx.tx_hash().0.to_vec());
		info!(tx_hash = %truncate_hash(&tx_hash), "Submitted transaction");

		Ok(tx_hash)
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);

		let poll_interval = tokio::time::Duration::from_secs(10);
		// ~15s block time plus buffer per confirmation, capped at an hour
		let seconds_per_confirmation = 20;
		let max_timeout = 3600;
		let timeout_seconds = (confirmations * seconds_per_confirmation)
			.max(seconds_per_confirmation)
			.min(max_timeout);
		let max_wait_time = tokio::time::Duration::from_secs(timeout_seconds);
		let start_time = tokio::time::Instant::now();

		info!(
			tx_hash = %truncate_hash(hash),
			"Waiting for {} confirmations (timeout: {}s)",
			confirmations,
			timeout_seconds
		);

		loop {
			if start_time.elapsed() > max_wait_time {
				return Err(DeliveryError::Network(format!(
					"Timeout waiting for {} confirmations after {} seconds",
					confirmations,
					max_wait_time.as_secs()
				)));
			}

			let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					// Not yet mined
					tokio::time::sleep(poll_interval).await;
					continue;
				}
				Err(e) => {
					return Err(DeliveryError::Network(format!(
						"Failed to get receipt: {}",
						e
					)));
				}
			};

			let current_block = self
				.provider
				.get_block_number()
				.await
				.map_err(|e| DeliveryError::Network(format!("Failed to get block number: {}", e)))?;

			let tx_block = receipt.block_number.unwrap_or(0);
			let current_confirmations = current_block.saturating_sub(tx_block);

			if current_confirmations >= confirmations {
				return Ok(TransactionReceipt {
					hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
					block_number: tx_block,
					success: receipt.status(),
				});
			}

			debug!(
				"Waiting for {} more confirmations...",
				confirmations.saturating_sub(current_confirmations)
			);

			tokio::time::sleep(poll_interval).await;
		}
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);

		let receipt = self
			.provider
			.get_transaction_receipt(tx_hash)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get receipt: {}", e)))?
			.ok_or_else(|| DeliveryError::Network("Transaction not found".to_string()))?;

		Ok(TransactionReceipt {
			hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
			block_number: receipt.block_number.unwrap_or(0),
			success: receipt.status(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hash_truncation_keeps_short_hashes() {
		assert_eq!(truncate_hash(&TransactionHash(vec![0xab, 0xcd])), "abcd");
		assert_eq!(
			truncate_hash(&TransactionHash(vec![0x12; 32])),
			"12121212.."
		);
	}

	#[test]
	fn rejects_malformed_keys() {
		let result = AlloyDelivery::new("http://localhost:8545", 1, "not-a-key");
		assert!(matches!(result, Err(DeliveryError::InvalidKey(_))));
	}

	#[test]
	fn sender_matches_the_key() {
		// Well-known anvil/hardhat dev key 0
		let delivery = AlloyDelivery::new(
			"http://localhost:8545",
			1,
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
		)
		.unwrap();

		assert_eq!(
			delivery.sender().to_string(),
			"0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
		);
	}
}
