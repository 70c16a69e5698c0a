//! Configuration loading for the swap router.
//!
//! Configuration is TOML with `${VAR_NAME}` environment substitution, so
//! secrets like the signing key never land in the file itself.

use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution.
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub async fn load(&self) -> Result<Config, ConfigError> {
		let file_path = self
			.file_path
			.as_ref()
			.ok_or_else(|| ConfigError::FileNotFound("No configuration file specified".to_string()))?;

		let config = self.load_from_file(file_path).await?;

		validate_config(&config)?;

		debug!(path = %file_path, "configuration loaded");
		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<Config, ConfigError> {
		let content = tokio::fs::read_to_string(file_path).await?;

		// Substitute environment variables
		let substituted_content = substitute_env_vars(&content)?;

		// Parse TOML
		let config: Config = toml::from_str(&substituted_content)
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		Ok(config)
	}
}

/// Replaces every `${VAR_NAME}` occurrence with the variable's value.
fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
	let mut result = content.to_string();

	let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];

		let env_value =
			env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

		result = result.replace(full_match, &env_value);
	}

	Ok(result)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
	if !config.network.rpc_url.starts_with("http://")
		&& !config.network.rpc_url.starts_with("https://")
	{
		return Err(ConfigError::ValidationError(
			"network.rpc_url must start with http:// or https://".to_string(),
		));
	}

	if config.router.steps == 0 {
		return Err(ConfigError::ValidationError(
			"router.steps must be greater than zero".to_string(),
		));
	}

	validate_hex_bytes("router.address", &config.router.address, 20)?;
	validate_hex_bytes("tokens.weth", &config.tokens.weth, 20)?;
	validate_hex_bytes("tokens.lst", &config.tokens.lst, 20)?;
	validate_hex_bytes("venues.uniswap.pool", &config.venues.uniswap.pool, 20)?;
	validate_hex_bytes("venues.uniswap.quoter", &config.venues.uniswap.quoter, 20)?;
	validate_hex_bytes("venues.balancer.vault", &config.venues.balancer.vault, 20)?;
	validate_hex_bytes("venues.balancer.pool_id", &config.venues.balancer.pool_id, 32)?;
	validate_hex_bytes("wallet.private_key", &config.wallet.private_key, 32)?;

	Ok(())
}

fn validate_hex_bytes(field: &str, value: &str, expected_len: usize) -> Result<(), ConfigError> {
	let stripped = value.trim_start_matches("0x");

	let bytes = hex::decode(stripped)
		.map_err(|_| ConfigError::ValidationError(format!("{} must be valid hex", field)))?;

	if bytes.len() != expected_len {
		return Err(ConfigError::ValidationError(format!(
			"{} must be {} bytes, got {}",
			field,
			expected_len,
			bytes.len()
		)));
	}

	Ok(())
}
