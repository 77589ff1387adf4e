//! Common types module for the marketplace SDK.
//!
//! This module defines the data types shared by the chain boundary and the
//! operation gateway: identifiers and their on-chain encoding, transaction
//! hashes and receipts, operation outcomes and the marketplace's own records.

/// Transaction hashes, receipts and outcomes.
pub mod delivery;
/// Numeric identifier conversion into the on-chain `uint256` encoding.
pub mod identifier;
/// Marketplace calls, queries and the records they return.
pub mod marketplace;
/// Zeroizing string wrapper for private keys.
pub mod secret_string;
/// Utility functions for common type conversions.
pub mod utils;

// Re-export all types for convenient access
pub use alloy::primitives::{Address, U256};
pub use delivery::*;
pub use identifier::{parse_uint256, IdentifierError, ToUint256};
pub use marketplace::*;
pub use secret_string::SecretString;
pub use utils::{parse_address, parse_tx_hash, truncate_id, without_0x_prefix};
