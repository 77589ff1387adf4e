//! Parsing of caller-supplied addresses and transaction hashes.
//!
//! Both helpers return a plain message on failure; callers attach the
//! argument name and method when building their own error.

use super::formatting::without_0x_prefix;
use crate::TransactionHash;
use alloy::primitives::{Address, B256};

/// Parses a 20-byte hex address, with or without `0x` prefix.
///
/// Mixed-case input must carry a valid EIP-55 checksum; all-lowercase and
/// all-uppercase input is accepted as is.
pub fn parse_address(value: &str) -> Result<Address, String> {
	let digits = without_0x_prefix(value);
	if digits.len() != 40 {
		return Err(format!(
			"expected 40 hex characters, got {} in '{}'",
			digits.len(),
			value
		));
	}

	let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
	let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
	if has_lower && has_upper {
		Address::parse_checksummed(format!("0x{}", digits), None)
			.map_err(|e| format!("invalid checksummed address '{}': {}", value, e))
	} else {
		digits
			.parse::<Address>()
			.map_err(|e| format!("invalid address '{}': {}", value, e))
	}
}

/// Parses a 32-byte transaction hash, with or without `0x` prefix.
pub fn parse_tx_hash(value: &str) -> Result<TransactionHash, String> {
	if value.is_empty() {
		return Err("transaction hash is empty".to_string());
	}
	let digits = without_0x_prefix(value);
	if digits.len() != 64 {
		return Err(format!(
			"expected 64 hex characters, got {} in '{}'",
			digits.len(),
			value
		));
	}
	digits
		.parse::<B256>()
		.map(TransactionHash)
		.map_err(|e| format!("invalid transaction hash '{}': {}", value, e))
}
