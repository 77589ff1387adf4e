//! Marketplace contract calls and the records they return.
//!
//! Calls and queries are validated, typed descriptions of a single contract
//! method invocation. They are built by the gateway and encoded by the chain
//! implementation, so neither side deals with loosely typed arguments.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A state-changing marketplace method with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketplaceCall {
	CreateSellOrder {
		contract_address: Address,
		nft_id: U256,
		token: Address,
		price: U256,
	},
	CreateBid {
		sell_order_id: U256,
		token: Address,
		price: U256,
	},
	AcceptBid {
		bid_id: U256,
		sell_order_id: U256,
	},
	CancelBid {
		bid_id: U256,
	},
	CancelSellOrder {
		sell_order_id: U256,
	},
	CreateErc721Contract {
		name: String,
		symbol: String,
		description: String,
		factory: Address,
	},
}

impl MarketplaceCall {
	/// Contract method name as it appears in the ABI.
	pub fn method(&self) -> &'static str {
		match self {
			Self::CreateSellOrder { .. } => "createSellOrder",
			Self::CreateBid { .. } => "createBid",
			Self::AcceptBid { .. } => "acceptBid",
			Self::CancelBid { .. } => "cancelBid",
			Self::CancelSellOrder { .. } => "cancelSellOrder",
			Self::CreateErc721Contract { .. } => "createERC721Contract",
		}
	}

	/// Arguments rendered for diagnostics, in ABI order.
	pub fn args(&self) -> Vec<String> {
		match self {
			Self::CreateSellOrder {
				contract_address,
				nft_id,
				token,
				price,
			} => vec![
				contract_address.to_string(),
				nft_id.to_string(),
				token.to_string(),
				price.to_string(),
			],
			Self::CreateBid {
				sell_order_id,
				token,
				price,
			} => vec![sell_order_id.to_string(), token.to_string(), price.to_string()],
			Self::AcceptBid {
				bid_id,
				sell_order_id,
			} => vec![bid_id.to_string(), sell_order_id.to_string()],
			Self::CancelBid { bid_id } => vec![bid_id.to_string()],
			Self::CancelSellOrder { sell_order_id } => vec![sell_order_id.to_string()],
			Self::CreateErc721Contract {
				name,
				symbol,
				description,
				factory,
			} => vec![
				name.clone(),
				symbol.clone(),
				description.clone(),
				factory.to_string(),
			],
		}
	}
}

/// A read-only marketplace method with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketplaceQuery {
	SellOrder { sell_order_id: U256 },
	Bid { bid_id: U256 },
	UserContract { user: Address },
}

impl MarketplaceQuery {
	pub fn method(&self) -> &'static str {
		match self {
			Self::SellOrder { .. } => "sellOrder",
			Self::Bid { .. } => "bid",
			Self::UserContract { .. } => "getUserContract",
		}
	}

	pub fn args(&self) -> Vec<String> {
		match self {
			Self::SellOrder { sell_order_id } => vec![sell_order_id.to_string()],
			Self::Bid { bid_id } => vec![bid_id.to_string()],
			Self::UserContract { user } => vec![user.to_string()],
		}
	}
}

/// Decoded return value of a [`MarketplaceQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryData {
	SellOrder(SellOrder),
	Bid(Bid),
	UserContract(Address),
}

/// A sell order as stored by the marketplace contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOrder {
	pub seller: Address,
	pub token: Address,
	pub contract_addr: Address,
	pub nft_id: U256,
	pub buyer: Address,
	pub price: U256,
	pub started_at: U256,
	pub ended_at: U256,
	pub is_canceled: bool,
	pub is_ended: bool,
}

impl SellOrder {
	/// Storage slots for unknown ids read back as zero; a real order always
	/// has a seller.
	pub fn exists(&self) -> bool {
		self.seller != Address::ZERO
	}
}

/// A bid against a sell order as stored by the marketplace contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
	pub bidder: Address,
	pub token: Address,
	pub nft_owner: Address,
	pub sell_order_id: U256,
	pub price: U256,
	pub bidded_at: U256,
	pub bid_ended_at: U256,
	pub is_canceled: bool,
	pub is_ended: bool,
}

impl Bid {
	pub fn exists(&self) -> bool {
		self.bidder != Address::ZERO
	}
}

/// Result of a read operation that reached the chain.
///
/// Query failures are reported through the surrounding `Result`, so callers
/// can tell an absent record apart from a failed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadResult<T> {
	Found { data: T },
	NotFound,
}

impl<T> ReadResult<T> {
	pub fn data(&self) -> Option<&T> {
		match self {
			Self::Found { data } => Some(data),
			Self::NotFound => None,
		}
	}

	pub fn into_data(self) -> Option<T> {
		match self {
			Self::Found { data } => Some(data),
			Self::NotFound => None,
		}
	}

	pub fn is_found(&self) -> bool {
		matches!(self, Self::Found { .. })
	}
}
