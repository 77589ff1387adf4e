//! Local private-key account.
//!
//! Holds the key in memory as a parsed `PrivateKeySigner`. Suitable for
//! scripts and services that receive the key through configuration.

use crate::{AccountError, AccountInterface};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use marketplace_types::SecretString;

/// Account backed by a private key held in process memory.
pub struct LocalAccount {
	signer: PrivateKeySigner,
}

impl LocalAccount {
	/// Parses a hex private key (with or without `0x` prefix).
	pub fn new(private_key: &SecretString) -> Result<Self, AccountError> {
		if private_key.is_blank() {
			return Err(AccountError::InvalidKey("Private key is empty".to_string()));
		}

		let signer: PrivateKeySigner = private_key.with_exposed(|key| {
			key.trim()
				.parse()
				.map_err(|_| AccountError::InvalidKey("Invalid private key format".to_string()))
		})?;

		tracing::debug!(address = %signer.address(), "Loaded local account");
		Ok(Self { signer })
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	fn signer(&self, chain_id: Option<u64>) -> Result<PrivateKeySigner, AccountError> {
		Ok(self.signer.clone().with_chain_id(chain_id))
	}
}

/// Factory function to create a boxed local account.
pub fn create_account(
	private_key: &SecretString,
) -> Result<Box<dyn AccountInterface>, AccountError> {
	Ok(Box::new(LocalAccount::new(private_key)?))
}
