//! Chain boundary for the marketplace SDK.
//!
//! Everything the SDK knows about the chain goes through [`ChainInterface`]:
//! submitting a write and waiting for its receipt, executing a read call, and
//! looking up the receipt of an already submitted transaction. The contract
//! itself is a black box behind these three operations.

use alloy::primitives::Address;
use async_trait::async_trait;
use marketplace_types::{
	MarketplaceCall, MarketplaceQuery, QueryData, TransactionHash, TransactionReceipt,
};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
	pub mod mock;
}

/// Errors that can occur at the chain boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
	/// Transport failure: the endpoint could not be reached or did not answer.
	#[error("Network error: {0}")]
	Network(String),
	/// The node answered with an error, e.g. a revert during gas estimation
	/// or a rejected signature.
	#[error("Rejected by node: {0}")]
	Rejected(String),
	/// The node answered but the payload could not be decoded.
	#[error("Decode error: {0}")]
	Decode(String),
	/// The client was configured with an unusable endpoint or option.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for chain clients.
///
/// Implementations own the contract ABI and the transport. They perform no
/// retries: one call on this trait is at most one request to the node.
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// Submits a write to `contract` from `sender` and waits for the client's
	/// own confirmation semantics before returning the receipt.
	async fn submit(
		&self,
		contract: Address,
		sender: Address,
		call: &MarketplaceCall,
	) -> Result<TransactionReceipt, ChainError>;

	/// Executes a read-only call against `contract` at the latest block.
	async fn call(
		&self,
		contract: Address,
		query: &MarketplaceQuery,
	) -> Result<QueryData, ChainError>;

	/// Looks up the receipt of a transaction.
	///
	/// Returns `Ok(None)` while the transaction is unknown or not yet mined.
	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, ChainError>;
}
