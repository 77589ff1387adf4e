//! Account management module for the marketplace SDK.
//!
//! This module provides the acting account every write operation is sent
//! from. It defines the interface an account implementation must provide and
//! a service wrapping the configured implementation.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for account implementations.
///
/// The chain client uses the signer to build its wallet; the gateway uses the
/// address as the sender of every write.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Retrieves the address associated with this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Returns a signer for transaction signing, optionally bound to a chain id.
	fn signer(&self, chain_id: Option<u64>) -> Result<PrivateKeySigner, AccountError>;
}

/// Service that manages account operations.
///
/// This struct provides a high-level interface for account management,
/// wrapping an underlying account implementation.
pub struct AccountService {
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Retrieves the address of the acting account.
	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Returns the signer the chain client should attach to its wallet.
	pub fn signer(&self, chain_id: Option<u64>) -> Result<PrivateKeySigner, AccountError> {
		self.implementation.signer(chain_id)
	}
}
