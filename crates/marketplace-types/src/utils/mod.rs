//! Utility functions for hex formatting and argument parsing.

pub mod conversion;
pub mod formatting;

pub use conversion::{parse_address, parse_tx_hash};
pub use formatting::{truncate_id, without_0x_prefix};
