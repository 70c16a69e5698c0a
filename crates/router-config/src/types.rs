//! Configuration types for the swap router.
//!
//! Every deployment-specific address lives here; nothing in the router
//! carries built-in network constants. Addresses stay as hex strings at
//! this layer and are parsed into concrete types when the services are
//! wired up.

use serde::{Deserialize, Serialize};

/// Top-level router configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	pub network: NetworkConfig,
	pub router: RouterConfig,
	pub tokens: TokenConfig,
	pub venues: VenuesConfig,
	pub wallet: WalletConfig,
}

/// JSON-RPC endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
	pub rpc_url: String,
	pub chain_id: u64,
}

/// Execution router contract settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
	/// Address of the deployed swap router contract.
	pub address: String,
	/// Gas limit attached to swap transactions.
	#[serde(default = "default_gas_limit")]
	pub gas_limit: u64,
	/// Discretization granularity for route optimization.
	#[serde(default = "default_steps")]
	pub steps: u32,
}

/// Token addresses for the traded pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
	/// Wrapped native token the venues trade against.
	pub weth: String,
	/// The liquid staking token.
	pub lst: String,
}

/// Per-venue market configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenuesConfig {
	pub uniswap: UniswapVenueConfig,
	pub balancer: BalancerVenueConfig,
}

/// Uniswap V3 market parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniswapVenueConfig {
	/// WETH/LST pool address.
	pub pool: String,
	/// Quoter contract used for read-only price simulation.
	pub quoter: String,
}

/// Balancer V2 market parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancerVenueConfig {
	/// Vault contract address.
	pub vault: String,
	/// 32-byte pool identifier.
	pub pool_id: String,
}

/// Signing key configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
	/// Hex-encoded private key, usually injected via `${ENV_VAR}`.
	pub private_key: String,
}

fn default_gas_limit() -> u64 {
	2_000_000
}

fn default_steps() -> u32 {
	10
}
