//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lst-router")]
#[command(about = "Multi-venue ETH/LST swap router", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
	/// Path to configuration file
	#[arg(
		short,
		long,
		value_name = "FILE",
		env = "ROUTER_CONFIG",
		default_value = "config/local.toml"
	)]
	pub config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, env = "ROUTER_LOG_LEVEL", default_value = "info")]
	pub log_level: String,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Price a swap without executing it
	Quote {
		/// Swap direction: to-lst or to-eth
		#[arg(long)]
		direction: String,

		/// Input amount in ether units
		#[arg(long)]
		amount: String,

		/// Number of discrete allocation steps
		#[arg(long)]
		steps: Option<u32>,

		/// Ask the contract's on-chain optimiser instead of quoting the
		/// venues directly
		#[arg(long)]
		on_chain: bool,
	},

	/// Optimize a route and execute the swap
	Swap {
		/// Swap direction: to-lst or to-eth
		#[arg(long)]
		direction: String,

		/// Input amount in ether units
		#[arg(long)]
		amount: String,

		/// Number of discrete allocation steps
		#[arg(long)]
		steps: Option<u32>,

		/// Slippage tolerance in basis points applied to the output floor
		#[arg(long, default_value_t = 100)]
		slippage_bps: u64,

		/// Confirmations to wait for after submission
		#[arg(long, default_value_t = 1)]
		confirmations: u64,
	},

	/// Validate the configuration file
	Validate,
}
