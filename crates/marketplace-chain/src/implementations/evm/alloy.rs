//! Alloy-based EVM chain client.
//!
//! Encodes marketplace calls with the contract ABI declared below, sends them
//! through an Alloy provider whose wallet signs on behalf of the acting
//! account, and decodes read results into the SDK's record types.

use crate::{ChainError, ChainInterface};
use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, PendingTransactionError, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use marketplace_types::{
	truncate_id, Bid, MarketplaceCall, MarketplaceQuery, QueryData, SellOrder, TransactionHash,
	TransactionReceipt,
};
use std::time::Duration;

// Marketplace contract ABI.
//
// `sellOrder` and `bid` are public mapping getters; a struct made only of
// static fields encodes exactly like the getter's flattened return tuple.
sol! {
	interface IMarketplace {
		struct SellOrderData {
			address seller;
			address token;
			address contractAddr;
			uint256 nftId;
			address buyer;
			uint256 price;
			uint256 startedAt;
			uint256 endedAt;
			bool isCanceled;
			bool isEnded;
		}

		struct BidData {
			address bidder;
			address token;
			address nftOwner;
			uint256 sellOrderId;
			uint256 price;
			uint256 biddedAt;
			uint256 bidEndedAt;
			bool isCanceled;
			bool isEnded;
		}

		function createSellOrder(address contractAddress, uint256 nftId, address token, uint256 price) external;
		function createBid(uint256 sellOrderId, address token, uint256 price) external;
		function acceptBid(uint256 bidId, uint256 sellOrderId) external;
		function cancelBid(uint256 bidId) external;
		function cancelSellOrder(uint256 sellOrderId) external;
		function createERC721Contract(string name, string symbol, string description, address factory) external;

		function sellOrder(uint256 sellOrderId) external view returns (SellOrderData memory);
		function bid(uint256 bidId) external view returns (BidData memory);
		function getUserContract(address user) external view returns (address);
	}
}

/// Options controlling how long `submit` waits for a receipt.
#[derive(Debug, Clone, Copy)]
pub struct SubmitOptions {
	/// Number of blocks (including the inclusion block) before the receipt
	/// is returned.
	pub required_confirmations: u64,
	/// Upper bound on the wait for the receipt after the send succeeded.
	pub receipt_timeout: Duration,
}

impl Default for SubmitOptions {
	fn default() -> Self {
		Self {
			required_confirmations: 1,
			receipt_timeout: Duration::from_secs(300),
		}
	}
}

/// Alloy-based chain client for the marketplace contract.
///
/// Works over HTTP(S) and WebSocket endpoints. Writes require a provider with
/// a wallet; a read-only client can still serve calls and receipt lookups.
pub struct AlloyChain {
	provider: DynProvider,
	options: SubmitOptions,
}

impl AlloyChain {
	/// Connects to `endpoint` with a wallet that signs every write.
	pub async fn connect(
		endpoint: &str,
		wallet: EthereumWallet,
		options: SubmitOptions,
	) -> Result<Self, ChainError> {
		check_endpoint(endpoint)?;

		let provider = ProviderBuilder::new()
			.wallet(wallet)
			.connect(endpoint)
			.await
			.map_err(|e| {
				ChainError::Network(format!("Failed to connect to {}: {}", endpoint, e))
			})?
			.erased();

		tracing::info!(endpoint = %endpoint, "Connected chain client");
		Ok(Self::from_provider(provider, options))
	}

	/// Connects to `endpoint` without a wallet, for receipt lookups and reads.
	pub async fn connect_read_only(endpoint: &str) -> Result<Self, ChainError> {
		check_endpoint(endpoint)?;

		let provider = ProviderBuilder::new()
			.connect(endpoint)
			.await
			.map_err(|e| {
				ChainError::Network(format!("Failed to connect to {}: {}", endpoint, e))
			})?
			.erased();

		Ok(Self::from_provider(provider, SubmitOptions::default()))
	}

	/// Wraps an already configured provider.
	pub fn from_provider(provider: DynProvider, options: SubmitOptions) -> Self {
		Self { provider, options }
	}
}

/// Accepts only the schemes the provider builder can connect over.
fn check_endpoint(endpoint: &str) -> Result<(), ChainError> {
	let scheme = endpoint
		.split_once("://")
		.map(|(scheme, _)| scheme.to_ascii_lowercase())
		.ok_or_else(|| {
			ChainError::Configuration(format!("Endpoint '{}' has no URL scheme", endpoint))
		})?;

	match scheme.as_str() {
		"http" | "https" | "ws" | "wss" => Ok(()),
		other => Err(ChainError::Configuration(format!(
			"Unsupported endpoint scheme '{}' (expected http, https, ws or wss)",
			other
		))),
	}
}

/// Splits transport failures from answers in which the node refused the request.
fn classify_transport_error(context: &str, error: TransportError) -> ChainError {
	match error {
		RpcError::ErrorResp(payload) => ChainError::Rejected(format!("{}: {}", context, payload)),
		RpcError::DeserError { err, .. } => ChainError::Decode(format!("{}: {}", context, err)),
		other => ChainError::Network(format!("{}: {}", context, other)),
	}
}

fn encode_call(call: &MarketplaceCall) -> Bytes {
	let data = match call.clone() {
		MarketplaceCall::CreateSellOrder {
			contract_address,
			nft_id,
			token,
			price,
		} => IMarketplace::createSellOrderCall {
			contractAddress: contract_address,
			nftId: nft_id,
			token,
			price,
		}
		.abi_encode(),
		MarketplaceCall::CreateBid {
			sell_order_id,
			token,
			price,
		} => IMarketplace::createBidCall {
			sellOrderId: sell_order_id,
			token,
			price,
		}
		.abi_encode(),
		MarketplaceCall::AcceptBid {
			bid_id,
			sell_order_id,
		} => IMarketplace::acceptBidCall {
			bidId: bid_id,
			sellOrderId: sell_order_id,
		}
		.abi_encode(),
		MarketplaceCall::CancelBid { bid_id } => {
			IMarketplace::cancelBidCall { bidId: bid_id }.abi_encode()
		}
		MarketplaceCall::CancelSellOrder { sell_order_id } => {
			IMarketplace::cancelSellOrderCall {
				sellOrderId: sell_order_id,
			}
			.abi_encode()
		}
		MarketplaceCall::CreateErc721Contract {
			name,
			symbol,
			description,
			factory,
		} => IMarketplace::createERC721ContractCall {
			name,
			symbol,
			description,
			factory,
		}
		.abi_encode(),
	};
	data.into()
}

fn encode_query(query: &MarketplaceQuery) -> Bytes {
	let data = match *query {
		MarketplaceQuery::SellOrder { sell_order_id } => IMarketplace::sellOrderCall {
			sellOrderId: sell_order_id,
		}
		.abi_encode(),
		MarketplaceQuery::Bid { bid_id } => IMarketplace::bidCall { bidId: bid_id }.abi_encode(),
		MarketplaceQuery::UserContract { user } => {
			IMarketplace::getUserContractCall { user }.abi_encode()
		}
	};
	data.into()
}

fn decode_query(query: &MarketplaceQuery, output: &[u8]) -> Result<QueryData, ChainError> {
	let decode_error =
		|e: alloy::sol_types::Error| ChainError::Decode(format!("{}: {}", query.method(), e));

	match query {
		MarketplaceQuery::SellOrder { .. } => {
			let order = IMarketplace::sellOrderCall::abi_decode_returns(output)
				.map_err(decode_error)?;
			Ok(QueryData::SellOrder(SellOrder {
				seller: order.seller,
				token: order.token,
				contract_addr: order.contractAddr,
				nft_id: order.nftId,
				buyer: order.buyer,
				price: order.price,
				started_at: order.startedAt,
				ended_at: order.endedAt,
				is_canceled: order.isCanceled,
				is_ended: order.isEnded,
			}))
		}
		MarketplaceQuery::Bid { .. } => {
			let bid = IMarketplace::bidCall::abi_decode_returns(output).map_err(decode_error)?;
			Ok(QueryData::Bid(Bid {
				bidder: bid.bidder,
				token: bid.token,
				nft_owner: bid.nftOwner,
				sell_order_id: bid.sellOrderId,
				price: bid.price,
				bidded_at: bid.biddedAt,
				bid_ended_at: bid.bidEndedAt,
				is_canceled: bid.isCanceled,
				is_ended: bid.isEnded,
			}))
		}
		MarketplaceQuery::UserContract { .. } => {
			let contract =
				IMarketplace::getUserContractCall::abi_decode_returns(output).map_err(decode_error)?;
			Ok(QueryData::UserContract(contract))
		}
	}
}

fn to_receipt<R: ReceiptResponse>(receipt: &R) -> TransactionReceipt {
	TransactionReceipt {
		hash: TransactionHash(receipt.transaction_hash()),
		block_number: receipt.block_number().unwrap_or(0),
		gas_used: receipt.gas_used(),
		success: receipt.status(),
	}
}

#[async_trait]
impl ChainInterface for AlloyChain {
	async fn submit(
		&self,
		contract: Address,
		sender: Address,
		call: &MarketplaceCall,
	) -> Result<TransactionReceipt, ChainError> {
		let request = TransactionRequest::default()
			.with_from(sender)
			.with_to(contract)
			.with_input(encode_call(call));

		// The provider's wallet fills nonce, gas and fees and signs.
		let pending = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| classify_transport_error("Failed to send transaction", e))?;

		let tx_hash = TransactionHash(*pending.tx_hash());
		tracing::info!(
			method = call.method(),
			tx_hash = %truncate_id(&tx_hash.to_hex()),
			"Submitted transaction"
		);

		let receipt = pending
			.with_required_confirmations(self.options.required_confirmations)
			.with_timeout(Some(self.options.receipt_timeout))
			.get_receipt()
			.await
			.map_err(|e| match e {
				PendingTransactionError::TransportError(e) => {
					classify_transport_error("Failed to get receipt", e)
				}
				other => ChainError::Network(format!(
					"Failed to get receipt for {}: {}",
					tx_hash, other
				)),
			})?;

		Ok(to_receipt(&receipt))
	}

	async fn call(
		&self,
		contract: Address,
		query: &MarketplaceQuery,
	) -> Result<QueryData, ChainError> {
		let request = TransactionRequest::default()
			.with_to(contract)
			.with_input(encode_query(query));

		let output = self
			.provider
			.call(request)
			.await
			.map_err(|e| classify_transport_error("Failed to execute call", e))?;

		decode_query(query, &output)
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, ChainError> {
		let receipt = self
			.provider
			.get_transaction_receipt(hash.0)
			.await
			.map_err(|e| classify_transport_error("Failed to get receipt", e))?;

		Ok(receipt.as_ref().map(to_receipt))
	}
}
