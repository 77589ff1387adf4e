//! Configuration module for applications embedding the marketplace SDK.
//!
//! The SDK core is constructed from values, never from files. This crate is
//! the optional layer that reads a TOML file (or string), substitutes
//! `${VAR}` / `${VAR:-default}` environment references, and validates the
//! result before anything connects to a node.

use marketplace_types::{parse_address, Address, SecretString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the marketplace SDK.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Node endpoint and chain.
	pub network: NetworkConfig,
	/// The marketplace contract instance.
	pub contract: ContractConfig,
	/// The acting account.
	pub account: AccountConfig,
	/// How writes wait for their receipt.
	#[serde(default)]
	pub transactions: TransactionsConfig,
	/// Polling policy of the confirmation tracker.
	#[serde(default)]
	pub confirmation: ConfirmationConfig,
}

/// Node endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP(S) or WebSocket endpoint of the node.
	pub rpc_url: String,
	/// Chain id the signer is bound to (EIP-155). Left unbound if absent.
	pub chain_id: Option<u64>,
}

/// Marketplace contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractConfig {
	/// Mixed-case addresses must carry a valid EIP-55 checksum.
	#[serde(deserialize_with = "deserialize_address")]
	pub address: Address,
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
	D: serde::Deserializer<'de>,
{
	use serde::de::Error;

	let s = String::deserialize(deserializer)?;
	parse_address(s.trim()).map_err(Error::custom)
}

/// Acting account configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Hex private key, usually given as `${ENV_VAR}`.
	pub private_key: SecretString,
}

/// Settings for write submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransactionsConfig {
	/// Blocks required (inclusion block included) before a write returns.
	/// Defaults to 1.
	#[serde(default = "default_required_confirmations")]
	pub required_confirmations: u64,
	/// Upper bound on the wait for a write's receipt, in seconds.
	/// Defaults to 300.
	#[serde(default = "default_receipt_timeout_seconds")]
	pub receipt_timeout_seconds: u64,
}

impl Default for TransactionsConfig {
	fn default() -> Self {
		Self {
			required_confirmations: default_required_confirmations(),
			receipt_timeout_seconds: default_receipt_timeout_seconds(),
		}
	}
}

impl TransactionsConfig {
	pub fn receipt_timeout(&self) -> Duration {
		Duration::from_secs(self.receipt_timeout_seconds)
	}
}

/// Polling policy for the confirmation tracker.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfirmationConfig {
	/// Wait before the second poll, in milliseconds. Defaults to 500.
	#[serde(default = "default_initial_poll_interval_ms")]
	pub initial_poll_interval_ms: u64,
	/// Cap on the wait between polls, in milliseconds. Defaults to 8000.
	#[serde(default = "default_max_poll_interval_ms")]
	pub max_poll_interval_ms: u64,
	/// Overall deadline for one wait, in seconds. Defaults to 600.
	#[serde(default = "default_confirmation_timeout_seconds")]
	pub timeout_seconds: u64,
}

impl Default for ConfirmationConfig {
	fn default() -> Self {
		Self {
			initial_poll_interval_ms: default_initial_poll_interval_ms(),
			max_poll_interval_ms: default_max_poll_interval_ms(),
			timeout_seconds: default_confirmation_timeout_seconds(),
		}
	}
}

impl ConfirmationConfig {
	pub fn initial_interval(&self) -> Duration {
		Duration::from_millis(self.initial_poll_interval_ms)
	}

	pub fn max_interval(&self) -> Duration {
		Duration::from_millis(self.max_poll_interval_ms)
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_seconds)
	}
}

fn default_required_confirmations() -> u64 {
	1
}

fn default_receipt_timeout_seconds() -> u64 {
	300
}

fn default_initial_poll_interval_ms() -> u64 {
	500
}

fn default_max_poll_interval_ms() -> u64 {
	8_000
}

fn default_confirmation_timeout_seconds() -> u64 {
	600
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to bound regex work.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				}
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file, resolving environment variables.
	pub async fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		content.parse()
	}

	/// Validates the configuration before any connection is attempted.
	fn validate(&self) -> Result<(), ConfigError> {
		let url = self.network.rpc_url.trim();
		if url.is_empty() {
			return Err(ConfigError::Validation("network.rpc_url cannot be empty".into()));
		}
		let scheme = url
			.split_once("://")
			.map(|(scheme, _)| scheme.to_ascii_lowercase())
			.unwrap_or_default();
		if !matches!(scheme.as_str(), "http" | "https" | "ws" | "wss") {
			return Err(ConfigError::Validation(format!(
				"network.rpc_url '{}' must use http, https, ws or wss",
				url
			)));
		}

		if self.contract.address == Address::ZERO {
			return Err(ConfigError::Validation(
				"contract.address cannot be the zero address".into(),
			));
		}

		if self.account.private_key.is_blank() {
			return Err(ConfigError::Validation(
				"account.private_key cannot be empty".into(),
			));
		}

		if self.transactions.required_confirmations == 0 {
			return Err(ConfigError::Validation(
				"transactions.required_confirmations must be at least 1".into(),
			));
		}
		if self.transactions.receipt_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"transactions.receipt_timeout_seconds must be greater than 0".into(),
			));
		}

		let confirmation = &self.confirmation;
		if confirmation.initial_poll_interval_ms == 0 {
			return Err(ConfigError::Validation(
				"confirmation.initial_poll_interval_ms must be greater than 0".into(),
			));
		}
		if confirmation.max_poll_interval_ms < confirmation.initial_poll_interval_ms {
			return Err(ConfigError::Validation(format!(
				"confirmation.max_poll_interval_ms ({}) must not be below initial_poll_interval_ms ({})",
				confirmation.max_poll_interval_ms, confirmation.initial_poll_interval_ms
			)));
		}
		if confirmation.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"confirmation.timeout_seconds must be greater than 0".into(),
			));
		}

		Ok(())
	}
}

/// Parses a TOML string: resolves environment variables, deserializes and
/// validates.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MINIMAL: &str = r#"
[network]
rpc_url = "http://localhost:8545"

[contract]
address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"

[account]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("MKT_TEST_HOST", "localhost");
		std::env::set_var("MKT_TEST_PORT", "8545");

		let input = "url = \"http://${MKT_TEST_HOST}:${MKT_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "url = \"http://localhost:8545\"");

		std::env::remove_var("MKT_TEST_HOST");
		std::env::remove_var("MKT_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${MKT_MISSING_VAR:-fallback}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"fallback\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${MKT_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("MKT_MISSING_VAR"));
	}

	#[test]
	fn test_minimal_config_uses_defaults() {
		let config = Config::from_str(MINIMAL).unwrap();
		assert_eq!(config.network.chain_id, None);
		assert_eq!(config.transactions.required_confirmations, 1);
		assert_eq!(config.transactions.receipt_timeout(), Duration::from_secs(300));
		assert_eq!(config.confirmation.initial_interval(), Duration::from_millis(500));
		assert_eq!(config.confirmation.max_interval(), Duration::from_secs(8));
		assert_eq!(config.confirmation.timeout(), Duration::from_secs(600));
	}

	#[test]
	fn test_private_key_from_env() {
		std::env::set_var(
			"MKT_TEST_PRIVATE_KEY",
			"0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
		);
		let config_str = MINIMAL.replace(
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
			"${MKT_TEST_PRIVATE_KEY}",
		);

		let config = Config::from_str(&config_str).unwrap();
		assert!(config.account.private_key.with_exposed(|k| k.starts_with("0x59c6")));
		// Never leaks through Debug.
		assert!(!format!("{:?}", config).contains("0x59c6"));

		std::env::remove_var("MKT_TEST_PRIVATE_KEY");
	}

	#[test]
	fn test_overrides_and_websocket_endpoint() {
		let config_str = format!(
			r#"{}
[transactions]
required_confirmations = 3

[confirmation]
initial_poll_interval_ms = 250
max_poll_interval_ms = 1000
timeout_seconds = 30
"#,
			MINIMAL.replace("http://localhost:8545", "wss://node.example/ws")
		);

		let config = Config::from_str(&config_str).unwrap();
		assert_eq!(config.network.rpc_url, "wss://node.example/ws");
		assert_eq!(config.transactions.required_confirmations, 3);
		assert_eq!(config.confirmation.initial_interval(), Duration::from_millis(250));
		assert_eq!(config.confirmation.timeout(), Duration::from_secs(30));
	}

	#[test]
	fn test_invalid_scheme_rejected() {
		let config_str = MINIMAL.replace("http://localhost:8545", "localhost:8545");
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("must use http, https, ws or wss"));
	}

	#[test]
	fn test_zero_contract_rejected() {
		let config_str = MINIMAL.replace(
			"0x5FbDB2315678afecb367f032d93F642f64180aa3",
			"0x0000000000000000000000000000000000000000",
		);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("zero address"));
	}

	#[test]
	fn test_contract_address_checksum_enforced() {
		// Case of one letter flipped.
		let config_str = MINIMAL.replace(
			"0x5FbDB2315678afecb367f032d93F642f64180aa3",
			"0x5FbDB2315678afecb367f032d93F642f64180aA3",
		);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
		assert!(err.to_string().contains("checksummed"));

		let lowercase = MINIMAL.replace(
			"0x5FbDB2315678afecb367f032d93F642f64180aa3",
			"0x5fbdb2315678afecb367f032d93f642f64180aa3",
		);
		let config = Config::from_str(&lowercase).unwrap();
		assert_eq!(
			config.contract.address,
			"0x5FbDB2315678afecb367f032d93F642f64180aa3"
				.parse::<Address>()
				.unwrap()
		);

		let short = MINIMAL.replace("0x5FbDB2315678afecb367f032d93F642f64180aa3", "0x5FbDB2");
		assert!(matches!(
			Config::from_str(&short),
			Err(ConfigError::Parse(_))
		));
	}

	#[test]
	fn test_backoff_bounds_rejected() {
		let config_str = format!(
			"{}\n[confirmation]\ninitial_poll_interval_ms = 2000\nmax_poll_interval_ms = 1000\n",
			MINIMAL
		);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("max_poll_interval_ms"));
	}

	#[test]
	fn test_zero_confirmations_rejected() {
		let config_str = format!("{}\n[transactions]\nrequired_confirmations = 0\n", MINIMAL);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("required_confirmations"));
	}

	#[test]
	fn test_missing_section_is_parse_error() {
		let config_str = "[network]\nrpc_url = \"http://localhost:8545\"\n";
		assert!(matches!(
			Config::from_str(config_str),
			Err(ConfigError::Parse(_))
		));
	}

	#[tokio::test]
	async fn test_from_file() {
		let temp_dir = tempfile::TempDir::new().unwrap();
		let path = temp_dir.path().join("marketplace.toml");
		std::fs::write(&path, MINIMAL).unwrap();

		let config = Config::from_file(&path).await.unwrap();
		assert_eq!(config.network.rpc_url, "http://localhost:8545");
	}

	#[tokio::test]
	async fn test_from_missing_file() {
		let result = Config::from_file("/nonexistent/marketplace.toml").await;
		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
