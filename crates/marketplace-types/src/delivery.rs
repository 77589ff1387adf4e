//! Transaction delivery types for the marketplace SDK.
//!
//! This module defines types related to transaction submission and
//! confirmation: hashes, receipts and the outcome reported to callers.

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Blockchain transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(pub B256);

impl TransactionHash {
	/// Returns the `0x`-prefixed lowercase hex form of the hash.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(self.0))
	}
}

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl From<B256> for TransactionHash {
	fn from(hash: B256) -> Self {
		Self(hash)
	}
}

/// Transaction receipt containing execution details.
///
/// Provides information about a transaction after it has been included in a block,
/// including its success status and block number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Gas consumed by the transaction.
	pub gas_used: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
}

/// Disposition of a transaction that has reached the chain.
///
/// An outcome only exists once a receipt exists, so it is never partially
/// populated: `mined` is always true and `succeeded` mirrors the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
	pub mined: bool,
	pub succeeded: bool,
	pub receipt: TransactionReceipt,
}

impl From<TransactionReceipt> for TransactionOutcome {
	fn from(receipt: TransactionReceipt) -> Self {
		Self {
			mined: true,
			succeeded: receipt.success,
			receipt,
		}
	}
}
