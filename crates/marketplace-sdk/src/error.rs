//! Error types returned by the gateway and the confirmation tracker.

use marketplace_account::AccountError;
use marketplace_chain::ChainError;
use marketplace_config::ConfigError;
use marketplace_types::{TransactionHash, TransactionReceipt};
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`MarketplaceError`] for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// An argument could not be encoded; nothing was sent.
	Validation,
	/// The node could not be reached or did not answer.
	Network,
	/// The node answered with an error (revert during estimation, bad nonce...).
	Rejected,
	/// The node's answer could not be decoded.
	Decode,
	/// The transaction was mined and its execution failed.
	Reverted,
	/// The confirmation deadline passed.
	Timeout,
	/// The caller cancelled the wait.
	Cancelled,
	/// Construction failed: account, configuration or endpoint.
	Setup,
}

/// Errors surfaced by every SDK operation.
///
/// Each variant keeps the method and arguments involved and, where one
/// exists, the underlying cause as its `source`.
#[derive(Debug, Error)]
pub enum MarketplaceError {
	#[error("Invalid argument '{argument}' for {method}: {reason}")]
	InvalidArgument {
		method: &'static str,
		argument: &'static str,
		reason: String,
	},
	#[error("Operation {method}({}) failed: {source}", .args.join(", "))]
	OperationFailed {
		method: &'static str,
		args: Vec<String>,
		#[source]
		source: ChainError,
	},
	#[error("Query {method}({}) failed: {source}", .args.join(", "))]
	QueryFailed {
		method: &'static str,
		args: Vec<String>,
		#[source]
		source: ChainError,
	},
	#[error("Transaction {hash} for {method} was mined but failed", hash = .receipt.hash)]
	MiningFailed {
		method: &'static str,
		receipt: TransactionReceipt,
	},
	#[error("Failed to query receipt of {hash}: {source}")]
	ConfirmationQuery {
		hash: TransactionHash,
		#[source]
		source: ChainError,
	},
	#[error("Timed out after {elapsed:?} waiting for {hash} to be mined")]
	Timeout {
		hash: TransactionHash,
		elapsed: Duration,
	},
	#[error("Stopped waiting for {hash}: cancelled")]
	Cancelled { hash: TransactionHash },
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	#[error("Configuration error: {0}")]
	Configuration(#[from] ConfigError),
	#[error("Failed to set up chain client: {0}")]
	Connection(#[source] ChainError),
}

impl MarketplaceError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::InvalidArgument { .. } => ErrorKind::Validation,
			Self::OperationFailed { source, .. }
			| Self::QueryFailed { source, .. }
			| Self::ConfirmationQuery { source, .. } => match source {
				ChainError::Network(_) => ErrorKind::Network,
				ChainError::Rejected(_) => ErrorKind::Rejected,
				ChainError::Decode(_) => ErrorKind::Decode,
				ChainError::Configuration(_) => ErrorKind::Setup,
			},
			Self::MiningFailed { .. } => ErrorKind::Reverted,
			Self::Timeout { .. } => ErrorKind::Timeout,
			Self::Cancelled { .. } => ErrorKind::Cancelled,
			Self::Account(_) | Self::Configuration(_) | Self::Connection(_) => ErrorKind::Setup,
		}
	}

	/// The receipt, for failures that happened after the transaction was mined.
	pub fn receipt(&self) -> Option<&TransactionReceipt> {
		match self {
			Self::MiningFailed { receipt, .. } => Some(receipt),
			_ => None,
		}
	}
}
