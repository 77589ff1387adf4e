//! Scripted in-memory chain client for testing and local development.
//!
//! Behaves like a marketplace contract whose storage starts empty: unknown
//! ids read back as zero records, every submission is mined immediately with
//! a success receipt, and receipts become visible once submitted. Responses
//! can be scripted to simulate node failures, reverts and slow mining.

use crate::{ChainError, ChainInterface};
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use marketplace_types::{
	Bid, MarketplaceCall, MarketplaceQuery, QueryData, SellOrder, TransactionHash,
	TransactionReceipt,
};
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

/// A submission recorded by [`MockChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
	pub contract: Address,
	pub sender: Address,
	pub call: MarketplaceCall,
}

#[derive(Default)]
struct MockState {
	submissions: Vec<RecordedSubmission>,
	submit_script: VecDeque<Result<TransactionReceipt, ChainError>>,
	call_failure: Option<ChainError>,
	calls: usize,
	sell_orders: HashMap<U256, SellOrder>,
	bids: HashMap<U256, Bid>,
	user_contracts: HashMap<Address, Address>,
	receipt_script: HashMap<TransactionHash, VecDeque<Result<Option<TransactionReceipt>, ChainError>>>,
	mined: HashMap<TransactionHash, TransactionReceipt>,
	receipt_queries: usize,
	block_number: u64,
}

/// Scripted chain client.
#[derive(Default)]
pub struct MockChain {
	state: Mutex<MockState>,
}

impl MockChain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues the response for the next `submit`. Once the queue is empty,
	/// submissions succeed again.
	pub async fn push_submit_response(&self, response: Result<TransactionReceipt, ChainError>) {
		self.state.lock().await.submit_script.push_back(response);
	}

	/// Makes every subsequent read call fail with `error`.
	pub async fn fail_calls(&self, error: ChainError) {
		self.state.lock().await.call_failure = Some(error);
	}

	pub async fn set_sell_order(&self, id: U256, order: SellOrder) {
		self.state.lock().await.sell_orders.insert(id, order);
	}

	pub async fn set_bid(&self, id: U256, bid: Bid) {
		self.state.lock().await.bids.insert(id, bid);
	}

	pub async fn set_user_contract(&self, user: Address, contract: Address) {
		self.state.lock().await.user_contracts.insert(user, contract);
	}

	/// Scripts successive `get_receipt` answers for `hash`. The last entry
	/// keeps being returned once the others are used up.
	pub async fn script_receipts(
		&self,
		hash: TransactionHash,
		responses: Vec<Result<Option<TransactionReceipt>, ChainError>>,
	) {
		self.state
			.lock()
			.await
			.receipt_script
			.insert(hash, responses.into());
	}

	pub async fn submissions(&self) -> Vec<RecordedSubmission> {
		self.state.lock().await.submissions.clone()
	}

	pub async fn call_count(&self) -> usize {
		self.state.lock().await.calls
	}

	pub async fn receipt_queries(&self) -> usize {
		self.state.lock().await.receipt_queries
	}
}

#[async_trait]
impl ChainInterface for MockChain {
	async fn submit(
		&self,
		contract: Address,
		sender: Address,
		call: &MarketplaceCall,
	) -> Result<TransactionReceipt, ChainError> {
		let mut state = self.state.lock().await;
		state.submissions.push(RecordedSubmission {
			contract,
			sender,
			call: call.clone(),
		});

		let response = match state.submit_script.pop_front() {
			Some(response) => response,
			None => {
				state.block_number += 1;
				let nonce = state.submissions.len() as u64;
				Ok(TransactionReceipt {
					hash: TransactionHash(B256::left_padding_from(&nonce.to_be_bytes())),
					block_number: state.block_number,
					gas_used: 21_000,
					success: true,
				})
			}
		};

		if let Ok(receipt) = &response {
			state.mined.insert(receipt.hash, receipt.clone());
		}
		response
	}

	async fn call(
		&self,
		_contract: Address,
		query: &MarketplaceQuery,
	) -> Result<QueryData, ChainError> {
		let mut state = self.state.lock().await;
		state.calls += 1;

		if let Some(error) = &state.call_failure {
			return Err(error.clone());
		}

		// Solidity mappings read back zeroed structs for unknown keys.
		let data = match query {
			MarketplaceQuery::SellOrder { sell_order_id } => QueryData::SellOrder(
				state
					.sell_orders
					.get(sell_order_id)
					.cloned()
					.unwrap_or_else(empty_sell_order),
			),
			MarketplaceQuery::Bid { bid_id } => {
				QueryData::Bid(state.bids.get(bid_id).cloned().unwrap_or_else(empty_bid))
			}
			MarketplaceQuery::UserContract { user } => QueryData::UserContract(
				state
					.user_contracts
					.get(user)
					.copied()
					.unwrap_or(Address::ZERO),
			),
		};
		Ok(data)
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, ChainError> {
		let mut state = self.state.lock().await;
		state.receipt_queries += 1;

		if let Some(script) = state.receipt_script.get_mut(hash) {
			let response = if script.len() > 1 {
				script.pop_front()
			} else {
				script.front().cloned()
			};
			if let Some(response) = response {
				return response;
			}
		}

		Ok(state.mined.get(hash).cloned())
	}
}

fn empty_sell_order() -> SellOrder {
	SellOrder {
		seller: Address::ZERO,
		token: Address::ZERO,
		contract_addr: Address::ZERO,
		nft_id: U256::ZERO,
		buyer: Address::ZERO,
		price: U256::ZERO,
		started_at: U256::ZERO,
		ended_at: U256::ZERO,
		is_canceled: false,
		is_ended: false,
	}
}

fn empty_bid() -> Bid {
	Bid {
		bidder: Address::ZERO,
		token: Address::ZERO,
		nft_owner: Address::ZERO,
		sell_order_id: U256::ZERO,
		price: U256::ZERO,
		bidded_at: U256::ZERO,
		bid_ended_at: U256::ZERO,
		is_canceled: false,
		is_ended: false,
	}
}
