use anyhow::{Context, Result};
use clap::Parser;
use router_config::{Config, ConfigLoader};
use router_core::{SwapRouter, SwapRouterConfig};
use router_delivery::{AlloyDelivery, DeliveryInterface};
use router_types::{SwapDirection, SwapRoute};
use router_venues::{BalancerVenue, DynProvider, UniswapVenue, VenueInterface};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alloy_primitives::{
	utils::{format_ether, parse_ether},
	Address, B256, U256,
};
use alloy_provider::ProviderBuilder;

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	match cli.command {
		Command::Quote {
			direction,
			amount,
			steps,
			on_chain,
		} => quote(&cli.config, &direction, &amount, steps, on_chain).await,
		Command::Swap {
			direction,
			amount,
			steps,
			slippage_bps,
			confirmations,
		} => swap(&cli.config, &direction, &amount, steps, slippage_bps, confirmations).await,
		Command::Validate => validate(&cli.config).await,
	}
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let filter = tracing_subscriber::EnvFilter::try_new(log_level)
		.with_context(|| format!("Invalid log level: {}", log_level))?;

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

struct Services {
	router: SwapRouter,
	delivery: Arc<dyn DeliveryInterface>,
}

/// Wires the provider, venues, delivery and facade from configuration.
///
/// Venue order is load-bearing: the execution contract's portion slots
/// are (uniswap, balancer), so the venue set must be registered in that
/// order.
fn build_services(config: &Config) -> Result<Services> {
	let url = config
		.network
		.rpc_url
		.parse()
		.context("Invalid RPC URL")?;
	let provider: DynProvider = Arc::new(ProviderBuilder::new().on_http(url));

	let weth = parse_address(&config.tokens.weth).context("tokens.weth")?;
	let lst = parse_address(&config.tokens.lst).context("tokens.lst")?;

	let uniswap = UniswapVenue::new(
		provider.clone(),
		parse_address(&config.venues.uniswap.pool).context("venues.uniswap.pool")?,
		parse_address(&config.venues.uniswap.quoter).context("venues.uniswap.quoter")?,
		weth,
		lst,
	);

	let balancer = BalancerVenue::new(
		provider.clone(),
		parse_address(&config.venues.balancer.vault).context("venues.balancer.vault")?,
		parse_pool_id(&config.venues.balancer.pool_id).context("venues.balancer.pool_id")?,
		weth,
		lst,
	);

	let venues: Vec<Arc<dyn VenueInterface>> = vec![Arc::new(uniswap), Arc::new(balancer)];

	let delivery: Arc<dyn DeliveryInterface> = Arc::new(AlloyDelivery::new(
		&config.network.rpc_url,
		config.network.chain_id,
		&config.wallet.private_key,
	)?);

	let router = SwapRouter::new(
		venues,
		provider,
		delivery.clone(),
		SwapRouterConfig {
			address: parse_address(&config.router.address).context("router.address")?,
			chain_id: config.network.chain_id,
			gas_limit: config.router.gas_limit,
			default_steps: config.router.steps,
		},
	);

	Ok(Services { router, delivery })
}

async fn quote(
	config_path: &Path,
	direction: &str,
	amount: &str,
	steps: Option<u32>,
	on_chain: bool,
) -> Result<()> {
	let config = load_config(config_path).await?;
	let services = build_services(&config)?;

	let direction: SwapDirection = direction.parse()?;
	let amount_in = parse_amount(amount)?;

	let route = if on_chain {
		services
			.router
			.optimize_on_chain(direction, amount_in, steps)
			.await?
	} else {
		services.router.optimize(direction, amount_in, steps).await?
	};

	print_route(&services.router, &route);
	Ok(())
}

async fn swap(
	config_path: &Path,
	direction: &str,
	amount: &str,
	steps: Option<u32>,
	slippage_bps: u64,
	confirmations: u64,
) -> Result<()> {
	let config = load_config(config_path).await?;
	let services = build_services(&config)?;

	let direction: SwapDirection = direction.parse()?;
	let amount_in = parse_amount(amount)?;

	let route = services
		.router
		.optimize(direction, amount_in, steps)
		.await?
		.with_slippage_bps(slippage_bps);

	print_route(&services.router, &route);

	let hash = services.router.execute(&route).await?;
	println!("submitted:   {}", hash);

	let receipt = services
		.delivery
		.wait_for_confirmation(&hash, confirmations)
		.await?;

	println!("included in: block {}", receipt.block_number);
	println!("status:      {}", if receipt.success { "success" } else { "failed" });

	Ok(())
}

async fn validate(config_path: &Path) -> Result<()> {
	let config = load_config(config_path).await?;

	info!("Configuration is valid");
	println!("chain id: {}", config.network.chain_id);
	println!("router:   {}", config.router.address);
	println!("steps:    {}", config.router.steps);

	Ok(())
}

async fn load_config(config_path: &Path) -> Result<Config> {
	ConfigLoader::new()
		.with_file(config_path)
		.load()
		.await
		.context("Failed to load configuration")
}

fn parse_address(value: &str) -> Result<Address> {
	value
		.parse::<Address>()
		.with_context(|| format!("invalid address: {}", value))
}

fn parse_pool_id(value: &str) -> Result<B256> {
	value
		.parse::<B256>()
		.with_context(|| format!("invalid pool id: {}", value))
}

fn parse_amount(value: &str) -> Result<U256> {
	parse_ether(value).with_context(|| format!("invalid amount: {}", value))
}

fn print_route(router: &SwapRouter, route: &SwapRoute) {
	println!("direction:   {}", route.direction);
	println!("amount in:   {}", format_ether(route.amount_in));
	for (venue, portion) in router.venues().iter().zip(&route.portions) {
		println!("  {:<9} {} steps", venue.name(), portion);
	}
	println!("expected:    {}", format_ether(route.amount_out));
	println!("minimum:     {}", format_ether(route.min_amount_out));
}
