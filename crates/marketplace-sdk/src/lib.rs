//! Client SDK for the NFT marketplace contract.
//!
//! The [`MarketplaceGateway`] exposes every marketplace action as one async
//! method. Writes are submitted once from the acting account and resolve to
//! a [`TransactionOutcome`] once the chain client reports a receipt; reads
//! resolve to a [`ReadResult`] that separates an absent record from a failed
//! query. The [`ConfirmationTracker`] resolves the disposition of a
//! transaction hash obtained elsewhere.
//!
//! A gateway is built either from a [`Config`] through [`SdkBuilder`], or
//! directly from a [`ConnectionContext`] over any [`ChainInterface`].

pub mod builder;
pub mod confirmation;
pub mod context;
pub mod error;
pub mod gateway;

pub use builder::SdkBuilder;
pub use confirmation::{wait_for_mining, ConfirmationTracker, PollPolicy, MIN_POLL_INTERVAL};
pub use context::ConnectionContext;
pub use error::{ErrorKind, MarketplaceError};
pub use gateway::{MarketplaceGateway, WriteState};

pub use marketplace_chain::{ChainError, ChainInterface};
pub use marketplace_config::Config;
pub use marketplace_types::{
	Address, Bid, ReadResult, SellOrder, ToUint256, TransactionHash, TransactionOutcome,
	TransactionReceipt, U256,
};
pub use tokio_util::sync::CancellationToken;
