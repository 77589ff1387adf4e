//! Builder wiring a configuration into a ready gateway.
//!
//! Loads the acting account from the configured key, connects an Alloy
//! client whose wallet signs with that account, and binds both to the
//! marketplace contract address.

use crate::confirmation::PollPolicy;
use crate::context::ConnectionContext;
use crate::error::MarketplaceError;
use crate::gateway::MarketplaceGateway;
use alloy::network::EthereumWallet;
use marketplace_account::implementations::local::create_account;
use marketplace_account::AccountService;
use marketplace_chain::implementations::evm::alloy::{AlloyChain, SubmitOptions};
use marketplace_chain::ChainInterface;
use marketplace_config::Config;
use std::sync::Arc;

/// Builder for constructing a [`MarketplaceGateway`] from a [`Config`].
pub struct SdkBuilder {
	config: Config,
	chain: Option<Arc<dyn ChainInterface>>,
}

impl SdkBuilder {
	/// Creates a new SdkBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			chain: None,
		}
	}

	/// Uses `chain` instead of connecting an Alloy client to the configured
	/// endpoint. The account is still loaded from the configuration.
	pub fn with_chain(mut self, chain: Arc<dyn ChainInterface>) -> Self {
		self.chain = Some(chain);
		self
	}

	pub async fn build(self) -> Result<MarketplaceGateway, MarketplaceError> {
		let account = AccountService::new(create_account(&self.config.account.private_key)?);
		let sender = account.get_address().await?;

		let chain = match self.chain {
			Some(chain) => chain,
			None => {
				let signer = account.signer(self.config.network.chain_id)?;
				let options = SubmitOptions {
					required_confirmations: self.config.transactions.required_confirmations,
					receipt_timeout: self.config.transactions.receipt_timeout(),
				};
				let chain = AlloyChain::connect(
					&self.config.network.rpc_url,
					EthereumWallet::from(signer),
					options,
				)
				.await
				.map_err(MarketplaceError::Connection)?;
				Arc::new(chain)
			}
		};

		tracing::info!(
			contract = %self.config.contract.address,
			sender = %sender,
			"Marketplace gateway ready"
		);

		let context = ConnectionContext::new(self.config.contract.address, sender, chain);
		Ok(MarketplaceGateway::new(context)
			.with_poll_policy(PollPolicy::from(&self.config.confirmation)))
	}
}
