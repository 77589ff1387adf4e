//! Operation gateway for the marketplace contract.
//!
//! Every write goes through the same lifecycle: arguments are validated into
//! a typed [`MarketplaceCall`], the call is submitted once from the acting
//! account, and the chain client's receipt is turned into an outcome or a
//! structured error. Reads are validated the same way and distinguish an
//! absent record from a failed query.

use crate::confirmation::{ConfirmationTracker, PollPolicy};
use crate::context::ConnectionContext;
use crate::error::MarketplaceError;
use alloy::primitives::{Address, U256};
use marketplace_chain::ChainError;
use marketplace_types::{
	parse_address, truncate_id, Bid, MarketplaceCall, MarketplaceQuery, QueryData, ReadResult,
	SellOrder, ToUint256, TransactionOutcome,
};
use std::fmt;
use tracing::instrument;

const CREATE_SELL_ORDER: &str = "createSellOrder";
const CREATE_BID: &str = "createBid";
const ACCEPT_BID: &str = "acceptBid";
const CANCEL_BID: &str = "cancelBid";
const CANCEL_SELL_ORDER: &str = "cancelSellOrder";
const CREATE_ERC721_CONTRACT: &str = "createERC721Contract";
const SELL_ORDER: &str = "sellOrder";
const BID: &str = "bid";
const GET_USER_CONTRACT: &str = "getUserContract";

/// Lifecycle of a single write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
	/// Arguments received, call not yet built.
	Constructed,
	/// Call handed to the chain client, waiting for its receipt.
	Submitting,
	ConfirmedSuccess,
	ConfirmedFailure,
	/// Validation or chain error.
	Errored,
}

impl WriteState {
	pub fn can_transition_to(self, next: WriteState) -> bool {
		use WriteState::*;
		matches!(
			(self, next),
			(Constructed, Submitting)
				| (Constructed, Errored)
				| (Submitting, ConfirmedSuccess)
				| (Submitting, ConfirmedFailure)
				| (Submitting, Errored)
		)
	}

	pub fn is_terminal(self) -> bool {
		matches!(
			self,
			Self::ConfirmedSuccess | Self::ConfirmedFailure | Self::Errored
		)
	}
}

impl fmt::Display for WriteState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Constructed => "constructed",
			Self::Submitting => "submitting",
			Self::ConfirmedSuccess => "confirmed_success",
			Self::ConfirmedFailure => "confirmed_failure",
			Self::Errored => "errored",
		};
		f.write_str(name)
	}
}

fn transition(method: &str, from: WriteState, to: WriteState) -> WriteState {
	debug_assert!(from.can_transition_to(to), "{from} -> {to}");
	tracing::debug!(method, from = %from, to = %to, "Write state changed");
	to
}

/// Entry point for every marketplace operation.
///
/// Cheap to clone; clones share the connection context and may run
/// operations concurrently.
#[derive(Clone, Debug)]
pub struct MarketplaceGateway {
	context: ConnectionContext,
	poll_policy: PollPolicy,
}

impl MarketplaceGateway {
	pub fn new(context: ConnectionContext) -> Self {
		Self {
			context,
			poll_policy: PollPolicy::default(),
		}
	}

	/// Sets the policy used by trackers obtained from
	/// [`confirmation_tracker`](Self::confirmation_tracker).
	pub fn with_poll_policy(mut self, poll_policy: PollPolicy) -> Self {
		self.poll_policy = poll_policy;
		self
	}

	pub fn context(&self) -> &ConnectionContext {
		&self.context
	}

	/// Tracker over the same chain client, for hashes obtained elsewhere.
	pub fn confirmation_tracker(&self) -> ConfirmationTracker {
		ConfirmationTracker::new(self.context.chain().clone(), self.poll_policy.clone())
	}

	/// Lists `nft_id` of collection `contract_address` for `price` units of
	/// `token`.
	pub async fn create_sell_order(
		&self,
		contract_address: &str,
		nft_id: impl ToUint256,
		token: &str,
		price: impl ToUint256,
	) -> Result<TransactionOutcome, MarketplaceError> {
		let call = write_call(CREATE_SELL_ORDER, || {
			Ok(MarketplaceCall::CreateSellOrder {
				contract_address: address_arg(
					CREATE_SELL_ORDER,
					"contract_address",
					contract_address,
				)?,
				nft_id: uint_arg(CREATE_SELL_ORDER, "nft_id", &nft_id)?,
				token: address_arg(CREATE_SELL_ORDER, "token", token)?,
				price: uint_arg(CREATE_SELL_ORDER, "price", &price)?,
			})
		})?;
		self.execute(call).await
	}

	pub async fn create_bid(
		&self,
		sell_order_id: impl ToUint256,
		token: &str,
		price: impl ToUint256,
	) -> Result<TransactionOutcome, MarketplaceError> {
		let call = write_call(CREATE_BID, || {
			Ok(MarketplaceCall::CreateBid {
				sell_order_id: uint_arg(CREATE_BID, "sell_order_id", &sell_order_id)?,
				token: address_arg(CREATE_BID, "token", token)?,
				price: uint_arg(CREATE_BID, "price", &price)?,
			})
		})?;
		self.execute(call).await
	}

	pub async fn accept_bid(
		&self,
		bid_id: impl ToUint256,
		sell_order_id: impl ToUint256,
	) -> Result<TransactionOutcome, MarketplaceError> {
		let call = write_call(ACCEPT_BID, || {
			Ok(MarketplaceCall::AcceptBid {
				bid_id: uint_arg(ACCEPT_BID, "bid_id", &bid_id)?,
				sell_order_id: uint_arg(ACCEPT_BID, "sell_order_id", &sell_order_id)?,
			})
		})?;
		self.execute(call).await
	}

	pub async fn cancel_bid(
		&self,
		bid_id: impl ToUint256,
	) -> Result<TransactionOutcome, MarketplaceError> {
		let call = write_call(CANCEL_BID, || {
			Ok(MarketplaceCall::CancelBid {
				bid_id: uint_arg(CANCEL_BID, "bid_id", &bid_id)?,
			})
		})?;
		self.execute(call).await
	}

	pub async fn cancel_sell_order(
		&self,
		sell_order_id: impl ToUint256,
	) -> Result<TransactionOutcome, MarketplaceError> {
		let call = write_call(CANCEL_SELL_ORDER, || {
			Ok(MarketplaceCall::CancelSellOrder {
				sell_order_id: uint_arg(CANCEL_SELL_ORDER, "sell_order_id", &sell_order_id)?,
			})
		})?;
		self.execute(call).await
	}

	/// Deploys a new ERC-721 collection through `factory`.
	pub async fn create_erc721_contract(
		&self,
		name: &str,
		symbol: &str,
		description: &str,
		factory: &str,
	) -> Result<TransactionOutcome, MarketplaceError> {
		let call = write_call(CREATE_ERC721_CONTRACT, || {
			Ok(MarketplaceCall::CreateErc721Contract {
				name: name.to_string(),
				symbol: symbol.to_string(),
				description: description.to_string(),
				factory: address_arg(CREATE_ERC721_CONTRACT, "factory", factory)?,
			})
		})?;
		self.execute(call).await
	}

	pub async fn get_sell_order_details(
		&self,
		sell_order_id: impl ToUint256,
	) -> Result<ReadResult<SellOrder>, MarketplaceError> {
		let query = MarketplaceQuery::SellOrder {
			sell_order_id: uint_arg(SELL_ORDER, "sell_order_id", &sell_order_id)?,
		};
		match self.query(&query).await? {
			QueryData::SellOrder(order) if order.exists() => Ok(ReadResult::Found { data: order }),
			QueryData::SellOrder(_) => Ok(ReadResult::NotFound),
			other => Err(unexpected_data(&query, other)),
		}
	}

	pub async fn get_bid_details(
		&self,
		bid_id: impl ToUint256,
	) -> Result<ReadResult<Bid>, MarketplaceError> {
		let query = MarketplaceQuery::Bid {
			bid_id: uint_arg(BID, "bid_id", &bid_id)?,
		};
		match self.query(&query).await? {
			QueryData::Bid(bid) if bid.exists() => Ok(ReadResult::Found { data: bid }),
			QueryData::Bid(_) => Ok(ReadResult::NotFound),
			other => Err(unexpected_data(&query, other)),
		}
	}

	/// Collection contract deployed by `user`, if any.
	pub async fn get_user_contract(
		&self,
		user: &str,
	) -> Result<ReadResult<Address>, MarketplaceError> {
		let query = MarketplaceQuery::UserContract {
			user: address_arg(GET_USER_CONTRACT, "user", user)?,
		};
		match self.query(&query).await? {
			QueryData::UserContract(contract) if contract != Address::ZERO => {
				Ok(ReadResult::Found { data: contract })
			}
			QueryData::UserContract(_) => Ok(ReadResult::NotFound),
			other => Err(unexpected_data(&query, other)),
		}
	}

	#[instrument(skip_all, fields(method = call.method()))]
	async fn execute(&self, call: MarketplaceCall) -> Result<TransactionOutcome, MarketplaceError> {
		let method = call.method();
		let state = transition(method, WriteState::Constructed, WriteState::Submitting);

		let submitted = self
			.context
			.chain()
			.submit(self.context.contract(), self.context.sender(), &call)
			.await;

		match submitted {
			Ok(receipt) if receipt.success => {
				transition(method, state, WriteState::ConfirmedSuccess);
				tracing::info!(
					tx_hash = %truncate_id(&receipt.hash.to_hex()),
					block_number = receipt.block_number,
					"Transaction confirmed"
				);
				Ok(TransactionOutcome::from(receipt))
			}
			Ok(receipt) => {
				transition(method, state, WriteState::ConfirmedFailure);
				tracing::warn!(
					tx_hash = %truncate_id(&receipt.hash.to_hex()),
					block_number = receipt.block_number,
					"Transaction mined but execution failed"
				);
				Err(MarketplaceError::MiningFailed { method, receipt })
			}
			Err(source) => {
				transition(method, state, WriteState::Errored);
				let args = call.args();
				tracing::error!(args = %args.join(", "), error = %source, "Operation failed");
				Err(MarketplaceError::OperationFailed {
					method,
					args,
					source,
				})
			}
		}
	}

	async fn query(&self, query: &MarketplaceQuery) -> Result<QueryData, MarketplaceError> {
		self.context
			.chain()
			.call(self.context.contract(), query)
			.await
			.map_err(|source| {
				let args = query.args();
				tracing::error!(
					method = query.method(),
					args = %args.join(", "),
					error = %source,
					"Query failed"
				);
				MarketplaceError::QueryFailed {
					method: query.method(),
					args,
					source,
				}
			})
	}
}

/// Builds the call of a write, moving its lifecycle to `Errored` when an
/// argument is rejected.
fn write_call(
	method: &'static str,
	build: impl FnOnce() -> Result<MarketplaceCall, MarketplaceError>,
) -> Result<MarketplaceCall, MarketplaceError> {
	build().inspect_err(|_| {
		transition(method, WriteState::Constructed, WriteState::Errored);
	})
}

fn address_arg(
	method: &'static str,
	argument: &'static str,
	value: &str,
) -> Result<Address, MarketplaceError> {
	parse_address(value).map_err(|reason| invalid_argument(method, argument, reason))
}

fn uint_arg<T: ToUint256 + ?Sized>(
	method: &'static str,
	argument: &'static str,
	value: &T,
) -> Result<U256, MarketplaceError> {
	value
		.to_uint256()
		.map_err(|e| invalid_argument(method, argument, e.to_string()))
}

fn invalid_argument(
	method: &'static str,
	argument: &'static str,
	reason: String,
) -> MarketplaceError {
	tracing::warn!(method, argument, reason = %reason, "Rejected argument");
	MarketplaceError::InvalidArgument {
		method,
		argument,
		reason,
	}
}

fn unexpected_data(query: &MarketplaceQuery, data: QueryData) -> MarketplaceError {
	MarketplaceError::QueryFailed {
		method: query.method(),
		args: query.args(),
		source: ChainError::Decode(format!("Unexpected return data: {:?}", data)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;
	use alloy::primitives::B256;
	use marketplace_chain::implementations::mock::MockChain;
	use marketplace_types::{TransactionHash, TransactionReceipt};
	use std::sync::Arc;

	const U256_MAX: &str =
		"115792089237316195423570985008687907853269984665640564039457584007913129639935";
	const U256_MAX_PLUS_ONE: &str =
		"115792089237316195423570985008687907853269984665640564039457584007913129639936";

	fn contract() -> Address {
		Address::repeat_byte(0x11)
	}

	fn sender() -> Address {
		Address::repeat_byte(0x22)
	}

	fn nft() -> String {
		Address::repeat_byte(0x33).to_string()
	}

	fn token() -> String {
		Address::repeat_byte(0x44).to_string()
	}

	fn gateway() -> (MarketplaceGateway, Arc<MockChain>) {
		let chain = Arc::new(MockChain::new());
		let context = ConnectionContext::new(contract(), sender(), chain.clone());
		(MarketplaceGateway::new(context), chain)
	}

	fn receipt(success: bool) -> TransactionReceipt {
		TransactionReceipt {
			hash: TransactionHash(B256::repeat_byte(0xab)),
			block_number: 100,
			gas_used: 85_000,
			success,
		}
	}

	fn sell_order(seller: Address) -> SellOrder {
		SellOrder {
			seller,
			token: Address::repeat_byte(0x44),
			contract_addr: Address::repeat_byte(0x33),
			nft_id: U256::from(42u64),
			buyer: Address::ZERO,
			price: U256::from(1000u64),
			started_at: U256::from(1_700_000_000u64),
			ended_at: U256::ZERO,
			is_canceled: false,
			is_ended: false,
		}
	}

	#[tokio::test]
	async fn test_create_sell_order_success() {
		let (gateway, chain) = gateway();
		chain.push_submit_response(Ok(receipt(true))).await;

		let outcome = gateway
			.create_sell_order(&nft(), 42, &token(), 1000)
			.await
			.unwrap();

		assert!(outcome.mined);
		assert!(outcome.succeeded);
		assert_eq!(outcome.receipt.hash, TransactionHash(B256::repeat_byte(0xab)));

		let submissions = chain.submissions().await;
		assert_eq!(submissions.len(), 1);
		assert_eq!(submissions[0].contract, contract());
		assert_eq!(submissions[0].sender, sender());
		assert_eq!(
			submissions[0].call,
			MarketplaceCall::CreateSellOrder {
				contract_address: Address::repeat_byte(0x33),
				nft_id: U256::from(42u64),
				token: Address::repeat_byte(0x44),
				price: U256::from(1000u64),
			}
		);
	}

	#[tokio::test]
	async fn test_cancel_bid_transport_error() {
		let (gateway, chain) = gateway();
		chain
			.push_submit_response(Err(ChainError::Network("connection refused".into())))
			.await;

		let err = gateway.cancel_bid(7).await.unwrap_err();

		match &err {
			MarketplaceError::OperationFailed { method, args, source } => {
				assert_eq!(*method, "cancelBid");
				assert_eq!(args, &vec!["7".to_string()]);
				assert_eq!(source, &ChainError::Network("connection refused".into()));
			}
			other => panic!("unexpected error: {other:?}"),
		}
		assert_eq!(err.kind(), ErrorKind::Network);
		assert!(err.receipt().is_none());
		assert_eq!(chain.submissions().await.len(), 1);
	}

	#[tokio::test]
	async fn test_rejected_by_node() {
		let (gateway, chain) = gateway();
		chain
			.push_submit_response(Err(ChainError::Rejected("execution reverted".into())))
			.await;

		let err = gateway.accept_bid(3, 1).await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Rejected);
	}

	#[tokio::test]
	async fn test_failed_receipt_is_mining_failed() {
		let (gateway, chain) = gateway();
		chain.push_submit_response(Ok(receipt(false))).await;

		let err = gateway.cancel_sell_order(5u64).await.unwrap_err();

		assert_eq!(err.kind(), ErrorKind::Reverted);
		assert_eq!(err.receipt(), Some(&receipt(false)));
	}

	#[tokio::test]
	async fn test_single_submission_per_call() {
		let (gateway, chain) = gateway();
		chain
			.push_submit_response(Err(ChainError::Network("timeout".into())))
			.await;

		assert!(gateway.cancel_bid(1).await.is_err());
		assert!(gateway.cancel_bid(1).await.is_ok());
		assert_eq!(chain.submissions().await.len(), 2);
	}

	#[tokio::test]
	async fn test_identifier_representations_encode_identically() {
		let (gateway, chain) = gateway();

		gateway.create_bid(42u64, &token(), 1000u32).await.unwrap();
		gateway.create_bid("42", &token(), "1000").await.unwrap();
		gateway.create_bid("0x2a", &token(), "0x3e8").await.unwrap();
		gateway
			.create_bid(U256::from(42u64), &token(), U256::from(1000u64))
			.await
			.unwrap();
		gateway.create_bid(42i32, &token(), 1000.0f64).await.unwrap();

		let submissions = chain.submissions().await;
		assert_eq!(submissions.len(), 5);
		for submission in &submissions[1..] {
			assert_eq!(submission.call, submissions[0].call);
		}
	}

	#[tokio::test]
	async fn test_large_identifiers_are_not_truncated() {
		let (gateway, chain) = gateway();

		gateway.cancel_sell_order(U256_MAX).await.unwrap();
		gateway.cancel_sell_order(u128::MAX).await.unwrap();

		let submissions = chain.submissions().await;
		assert_eq!(
			submissions[0].call,
			MarketplaceCall::CancelSellOrder {
				sell_order_id: U256::MAX
			}
		);
		assert_eq!(
			submissions[1].call,
			MarketplaceCall::CancelSellOrder {
				sell_order_id: U256::from(u128::MAX)
			}
		);
	}

	#[tokio::test]
	async fn test_invalid_arguments_are_never_submitted() {
		let (gateway, chain) = gateway();

		let err = gateway.cancel_bid(-1).await.unwrap_err();
		assert!(matches!(
			err,
			MarketplaceError::InvalidArgument {
				method: "cancelBid",
				argument: "bid_id",
				..
			}
		));
		assert_eq!(err.kind(), ErrorKind::Validation);

		assert!(gateway.cancel_bid(1.5f64).await.is_err());
		assert!(gateway.cancel_bid(f64::NAN).await.is_err());
		assert!(gateway.cancel_bid("").await.is_err());
		assert!(gateway.cancel_bid("12abc").await.is_err());
		assert!(gateway.cancel_bid(U256_MAX_PLUS_ONE).await.is_err());
		assert!(gateway.create_bid(1, "0x1234", 10).await.is_err());
		assert!(gateway
			.create_erc721_contract("Name", "SYM", "desc", "not-an-address")
			.await
			.is_err());

		let err = gateway
			.create_sell_order(&nft(), 1, &token(), -5i64)
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			MarketplaceError::InvalidArgument {
				argument: "price",
				..
			}
		));

		assert!(chain.submissions().await.is_empty());
	}

	#[tokio::test]
	async fn test_create_erc721_contract() {
		let (gateway, chain) = gateway();
		let factory = Address::repeat_byte(0x55);

		gateway
			.create_erc721_contract("Kittens", "KIT", "A collection", &factory.to_string())
			.await
			.unwrap();

		let submissions = chain.submissions().await;
		assert_eq!(submissions[0].call.method(), "createERC721Contract");
		assert_eq!(
			submissions[0].call,
			MarketplaceCall::CreateErc721Contract {
				name: "Kittens".into(),
				symbol: "KIT".into(),
				description: "A collection".into(),
				factory,
			}
		);
	}

	#[tokio::test]
	async fn test_sell_order_found_and_not_found() {
		let (gateway, chain) = gateway();
		let order = sell_order(Address::repeat_byte(0x66));
		chain.set_sell_order(U256::from(9u64), order.clone()).await;

		let found = gateway.get_sell_order_details(9).await.unwrap();
		assert_eq!(found, ReadResult::Found { data: order });

		let missing = gateway.get_sell_order_details(10).await.unwrap();
		assert_eq!(missing, ReadResult::NotFound);
	}

	#[tokio::test]
	async fn test_consecutive_reads_are_identical() {
		let (gateway, chain) = gateway();
		chain
			.set_sell_order(U256::from(1u64), sell_order(Address::repeat_byte(0x66)))
			.await;

		let first = gateway.get_sell_order_details(1).await.unwrap();
		let second = gateway.get_sell_order_details("1").await.unwrap();
		assert_eq!(first, second);
		assert_eq!(chain.call_count().await, 2);
	}

	#[tokio::test]
	async fn test_bid_details() {
		let (gateway, chain) = gateway();
		let bid = Bid {
			bidder: Address::repeat_byte(0x77),
			token: Address::repeat_byte(0x44),
			nft_owner: Address::repeat_byte(0x66),
			sell_order_id: U256::from(9u64),
			price: U256::from(900u64),
			bidded_at: U256::from(1_700_000_100u64),
			bid_ended_at: U256::ZERO,
			is_canceled: false,
			is_ended: false,
		};
		chain.set_bid(U256::from(2u64), bid.clone()).await;

		assert_eq!(
			gateway.get_bid_details(2).await.unwrap().into_data(),
			Some(bid)
		);
		assert!(!gateway.get_bid_details(3).await.unwrap().is_found());
	}

	#[tokio::test]
	async fn test_user_contract() {
		let (gateway, chain) = gateway();
		let user = Address::repeat_byte(0x66);
		let collection = Address::repeat_byte(0x88);
		chain.set_user_contract(user, collection).await;

		let found = gateway.get_user_contract(&user.to_string()).await.unwrap();
		assert_eq!(found.data(), Some(&collection));

		let other = Address::repeat_byte(0x99).to_string().to_lowercase();
		assert_eq!(
			gateway.get_user_contract(&other).await.unwrap(),
			ReadResult::NotFound
		);

		let err = gateway.get_user_contract("0xzz").await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Validation);
	}

	#[tokio::test]
	async fn test_query_error_is_distinct_from_not_found() {
		let (gateway, chain) = gateway();
		chain
			.fail_calls(ChainError::Decode("unexpected return length".into()))
			.await;

		let err = gateway.get_bid_details(1).await.unwrap_err();
		match &err {
			MarketplaceError::QueryFailed { method, args, .. } => {
				assert_eq!(*method, "bid");
				assert_eq!(args, &vec!["1".to_string()]);
			}
			other => panic!("unexpected error: {other:?}"),
		}
		assert_eq!(err.kind(), ErrorKind::Decode);
	}

	#[tokio::test]
	async fn test_concurrent_operations() {
		let (gateway, chain) = gateway();
		let other = gateway.clone();

		let (a, b, c) = tokio::join!(
			gateway.cancel_bid(1),
			other.cancel_sell_order(2),
			gateway.accept_bid(3, 4),
		);
		let hashes = [a.unwrap(), b.unwrap(), c.unwrap()].map(|o| o.receipt.hash);

		assert_ne!(hashes[0], hashes[1]);
		assert_ne!(hashes[1], hashes[2]);
		assert_eq!(chain.submissions().await.len(), 3);
	}

	#[tokio::test]
	async fn test_tracker_sees_submitted_transaction() {
		let (gateway, _chain) = gateway();

		let outcome = gateway.cancel_bid(1).await.unwrap();
		let tracked = gateway
			.confirmation_tracker()
			.wait_for_mining(&outcome.receipt.hash.to_hex())
			.await
			.unwrap();
		assert_eq!(tracked, outcome);
	}

	#[derive(Clone, Default)]
	struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

	impl CapturedLogs {
		fn contents(&self) -> String {
			String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
		}
	}

	impl std::io::Write for CapturedLogs {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	#[tokio::test]
	async fn test_write_lifecycle_is_logged_for_writes_only() {
		let logs = CapturedLogs::default();
		let writer = logs.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_max_level(tracing::Level::DEBUG)
			.with_ansi(false)
			.with_writer(move || writer.clone())
			.finish();
		let _guard = tracing::subscriber::set_default(subscriber);

		let (gateway, _chain) = gateway();
		assert!(gateway.get_sell_order_details(-1).await.is_err());
		assert!(gateway.get_bid_details("1.5").await.is_err());
		assert!(gateway.get_user_contract("0x12").await.is_err());

		let reads = logs.contents();
		assert_eq!(reads.matches("Rejected argument").count(), 3);
		assert!(!reads.contains("Write state changed"));

		assert!(gateway.cancel_bid(-1).await.is_err());
		let writes = logs.contents();
		assert_eq!(writes.matches("Write state changed").count(), 1);
		assert!(writes.contains("to=errored"));
	}

	#[test]
	fn test_gateway_is_shareable() {
		fn assert_shareable<T: Clone + Send + Sync + 'static>() {}
		assert_shareable::<MarketplaceGateway>();
	}

	#[test]
	fn test_write_state_transitions() {
		use WriteState::*;

		assert!(Constructed.can_transition_to(Submitting));
		assert!(Constructed.can_transition_to(Errored));
		assert!(Submitting.can_transition_to(ConfirmedFailure));
		assert!(!Constructed.can_transition_to(ConfirmedSuccess));
		assert!(!Errored.can_transition_to(Submitting));
		assert!(!ConfirmedSuccess.can_transition_to(Submitting));

		assert!(ConfirmedSuccess.is_terminal());
		assert!(Errored.is_terminal());
		assert!(!Submitting.is_terminal());
		assert_eq!(ConfirmedFailure.to_string(), "confirmed_failure");
	}
}
