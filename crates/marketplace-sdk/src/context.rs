//! Immutable connection bundle shared by every operation.

use alloy::primitives::Address;
use marketplace_chain::ChainInterface;
use std::fmt;
use std::sync::Arc;

/// Contract address, chain client and acting account, fixed at construction.
///
/// Cloning is cheap and clones share the same client. Nothing in the
/// context can be changed after it is built, so it can be used from any
/// number of concurrent operations without locking.
#[derive(Clone)]
pub struct ConnectionContext {
	inner: Arc<ContextInner>,
}

struct ContextInner {
	contract: Address,
	sender: Address,
	chain: Arc<dyn ChainInterface>,
}

impl ConnectionContext {
	pub fn new(contract: Address, sender: Address, chain: Arc<dyn ChainInterface>) -> Self {
		Self {
			inner: Arc::new(ContextInner {
				contract,
				sender,
				chain,
			}),
		}
	}

	/// Address of the marketplace contract.
	pub fn contract(&self) -> Address {
		self.inner.contract
	}

	/// Acting account every write is sent from.
	pub fn sender(&self) -> Address {
		self.inner.sender
	}

	pub fn chain(&self) -> &Arc<dyn ChainInterface> {
		&self.inner.chain
	}
}

impl fmt::Debug for ConnectionContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConnectionContext")
			.field("contract", &self.inner.contract)
			.field("sender", &self.inner.sender)
			.finish_non_exhaustive()
	}
}
