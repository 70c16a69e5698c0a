//! Transaction and address types used at the delivery boundary.
//!
//! Addresses and hashes are stored as raw bytes so the delivery layer can
//! stay agnostic of any particular Ethereum library's fixed-size types.

use alloy_primitives::{Address as AlloyAddress, Bytes, TxKind, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Blockchain address stored as raw bytes.
///
/// Constructed through [`Address::from_hex`], which enforces the 20-byte
/// length the conversions below rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address(pub Vec<u8>);

/// Error returned when parsing an [`Address`] from hex.
#[derive(Debug, Error)]
pub enum AddressError {
	#[error("invalid hex: {0}")]
	Hex(#[from] hex::FromHexError),
	#[error("expected 20 bytes, got {0}")]
	Length(usize),
}

impl Address {
	/// Parses an address from a hex string, with or without a 0x prefix.
	pub fn from_hex(s: &str) -> Result<Self, AddressError> {
		let bytes = hex::decode(s.trim_start_matches("0x"))?;
		if bytes.len() != 20 {
			return Err(AddressError::Length(bytes.len()));
		}
		Ok(Address(bytes))
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

impl From<AlloyAddress> for Address {
	fn from(addr: AlloyAddress) -> Self {
		Address(addr.as_slice().to_vec())
	}
}

/// Blockchain transaction hash stored as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

/// Transaction receipt with the fields the router cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
}

/// Transaction request shape handed to the delivery layer.
///
/// Gas and nonce fields are optional; the delivery provider's fillers
/// complete whatever the caller leaves unset.
#[derive(Debug, Clone)]
pub struct Transaction {
	/// Recipient address (None for contract creation).
	pub to: Option<Address>,
	/// Transaction calldata.
	pub data: Vec<u8>,
	/// Value to transfer in native currency.
	pub value: U256,
	/// Chain ID for replay protection.
	pub chain_id: u64,
	/// Transaction nonce.
	pub nonce: Option<u64>,
	/// Gas limit for transaction execution.
	pub gas_limit: Option<u64>,
	/// Legacy gas price.
	pub gas_price: Option<u128>,
	/// Maximum fee per gas (EIP-1559).
	pub max_fee_per_gas: Option<u128>,
	/// Maximum priority fee per gas (EIP-1559).
	pub max_priority_fee_per_gas: Option<u128>,
}

impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		TransactionRequest {
			to: Some(match &tx.to {
				Some(addr) => TxKind::Call(AlloyAddress::from_slice(&addr.0)),
				None => TxKind::Create,
			}),
			input: TransactionInput::new(Bytes::from(tx.data)),
			value: Some(tx.value),
			chain_id: Some(tx.chain_id),
			nonce: tx.nonce,
			gas: tx.gas_limit,
			gas_price: tx.gas_price,
			max_fee_per_gas: tx.max_fee_per_gas,
			max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
			..Default::default()
		}
	}
}

impl From<TransactionRequest> for Transaction {
	fn from(req: TransactionRequest) -> Self {
		Transaction {
			to: req.to.and_then(|kind| match kind {
				TxKind::Call(addr) => Some(addr.into()),
				TxKind::Create => None,
			}),
			data: req.input.input.clone().unwrap_or_default().to_vec(),
			value: req.value.unwrap_or(U256::ZERO),
			chain_id: req.chain_id.unwrap_or(1),
			nonce: req.nonce,
			gas_limit: req.gas,
			gas_price: req.gas_price,
			max_fee_per_gas: req.max_fee_per_gas,
			max_priority_fee_per_gas: req.max_priority_fee_per_gas,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn address_parses_with_and_without_prefix() {
		let with = Address::from_hex("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap();
		let without = Address::from_hex("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap();
		assert_eq!(with, without);
		assert_eq!(
			with.to_string(),
			"0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
		);
	}

	#[test]
	fn address_rejects_wrong_length() {
		assert!(matches!(
			Address::from_hex("0x1234"),
			Err(AddressError::Length(2))
		));
		assert!(Address::from_hex("0xzz").is_err());
	}

	#[test]
	fn transaction_round_trips_through_request() {
		let tx = Transaction {
			to: Some(Address::from_hex("0xae78736cd615f374d3085123a210448e74fc6393").unwrap()),
			data: vec![0xde, 0xad, 0xbe, 0xef],
			value: U256::from(42u64),
			chain_id: 1,
			nonce: Some(7),
			gas_limit: Some(2_000_000),
			gas_price: None,
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		};

		let request: TransactionRequest = tx.clone().into();
		let back: Transaction = request.into();

		assert_eq!(back.to, tx.to);
		assert_eq!(back.data, tx.data);
		assert_eq!(back.value, tx.value);
		assert_eq!(back.chain_id, tx.chain_id);
		assert_eq!(back.gas_limit, tx.gas_limit);
	}
}
