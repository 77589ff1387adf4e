//! Confirmation tracking for already submitted transactions.
//!
//! Polls the receipt of a transaction until the chain reports it mined,
//! backing off exponentially between polls. Every wait is bounded by a
//! deadline and can be cancelled by the caller.

use crate::error::MarketplaceError;
use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use marketplace_chain::implementations::evm::alloy::AlloyChain;
use marketplace_chain::ChainInterface;
use marketplace_config::ConfirmationConfig;
use marketplace_types::{parse_tx_hash, truncate_id, TransactionHash, TransactionOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

const WAIT_METHOD: &str = "waitForMining";

/// Lower bound on the wait between two polls of the same hash.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timing of the receipt polls.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
	/// Wait after the first unanswered poll.
	pub initial_interval: Duration,
	/// Cap on the wait between polls.
	pub max_interval: Duration,
	/// Growth factor of the wait after every unanswered poll.
	pub multiplier: f64,
	/// Overall deadline of one wait.
	pub timeout: Duration,
}

impl Default for PollPolicy {
	fn default() -> Self {
		Self {
			initial_interval: Duration::from_millis(500),
			max_interval: Duration::from_secs(8),
			multiplier: 2.0,
			timeout: Duration::from_secs(600),
		}
	}
}

impl From<&ConfirmationConfig> for PollPolicy {
	fn from(config: &ConfirmationConfig) -> Self {
		Self {
			initial_interval: config.initial_interval(),
			max_interval: config.max_interval(),
			timeout: config.timeout(),
			..Self::default()
		}
	}
}

impl PollPolicy {
	/// Raises the intervals to [`MIN_POLL_INTERVAL`], keeps the cap at or
	/// above the initial interval and the multiplier at or above 1.
	pub fn normalized(self) -> Self {
		let initial_interval = self.initial_interval.max(MIN_POLL_INTERVAL);
		let multiplier = if self.multiplier.is_finite() && self.multiplier >= 1.0 {
			self.multiplier
		} else {
			1.0
		};
		Self {
			initial_interval,
			max_interval: self.max_interval.max(initial_interval),
			multiplier,
			timeout: self.timeout,
		}
	}

	/// Deterministic schedule: no jitter, and the deadline is enforced by
	/// the tracker rather than by the backoff.
	fn backoff(&self) -> ExponentialBackoff {
		ExponentialBackoffBuilder::new()
			.with_initial_interval(self.initial_interval)
			.with_max_interval(self.max_interval)
			.with_multiplier(self.multiplier)
			.with_randomization_factor(0.0)
			.with_max_elapsed_time(None)
			.build()
	}
}

/// Resolves the on-chain disposition of submitted transactions.
#[derive(Clone)]
pub struct ConfirmationTracker {
	chain: Arc<dyn ChainInterface>,
	policy: PollPolicy,
}

impl ConfirmationTracker {
	/// The policy is [normalized](PollPolicy::normalized) so that polls are
	/// always spaced apart.
	pub fn new(chain: Arc<dyn ChainInterface>, policy: PollPolicy) -> Self {
		Self {
			chain,
			policy: policy.normalized(),
		}
	}

	pub fn policy(&self) -> &PollPolicy {
		&self.policy
	}

	/// Waits until `tx_hash` is mined or the policy's deadline passes.
	///
	/// A mined transaction is reported as an outcome whether its execution
	/// succeeded or not; `succeeded` carries the receipt status.
	pub async fn wait_for_mining(&self, tx_hash: &str) -> Result<TransactionOutcome, MarketplaceError> {
		self.wait_for_mining_with_cancel(tx_hash, &CancellationToken::new())
			.await
	}

	/// Same as [`wait_for_mining`](Self::wait_for_mining), stopping early
	/// with `Cancelled` once `cancel` fires.
	pub async fn wait_for_mining_with_cancel(
		&self,
		tx_hash: &str,
		cancel: &CancellationToken,
	) -> Result<TransactionOutcome, MarketplaceError> {
		let hash = parse_hash(tx_hash)?;
		self.wait_for_hash(hash, cancel).await
	}

	#[instrument(skip_all, fields(tx_hash = %truncate_id(&hash.to_hex())))]
	pub async fn wait_for_hash(
		&self,
		hash: TransactionHash,
		cancel: &CancellationToken,
	) -> Result<TransactionOutcome, MarketplaceError> {
		let start = Instant::now();
		let deadline = start + self.policy.timeout;
		let mut backoff = self.policy.backoff();

		loop {
			let polled = tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(MarketplaceError::Cancelled { hash }),
				_ = tokio::time::sleep_until(deadline) => return Err(timeout(hash, start)),
				polled = self.chain.get_receipt(&hash) => polled,
			};

			match polled {
				Ok(Some(receipt)) => {
					if receipt.success {
						tracing::info!(block_number = receipt.block_number, "Transaction mined");
					} else {
						tracing::warn!(
							block_number = receipt.block_number,
							"Transaction mined but execution failed"
						);
					}
					return Ok(TransactionOutcome::from(receipt));
				}
				Ok(None) => {
					tracing::debug!(
						elapsed_secs = start.elapsed().as_secs(),
						"Waiting for transaction to be mined"
					);
				}
				Err(source) => {
					tracing::error!(error = %source, "Failed to query transaction receipt");
					return Err(MarketplaceError::ConfirmationQuery { hash, source });
				}
			}

			let delay = backoff.next_backoff().unwrap_or(self.policy.max_interval);
			let wake = (Instant::now() + delay).min(deadline);

			tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(MarketplaceError::Cancelled { hash }),
				_ = tokio::time::sleep_until(wake) => {}
			}

			if Instant::now() >= deadline {
				return Err(timeout(hash, start));
			}
		}
	}
}

fn parse_hash(tx_hash: &str) -> Result<TransactionHash, MarketplaceError> {
	parse_tx_hash(tx_hash).map_err(|reason| MarketplaceError::InvalidArgument {
		method: WAIT_METHOD,
		argument: "tx_hash",
		reason,
	})
}

fn timeout(hash: TransactionHash, start: Instant) -> MarketplaceError {
	let elapsed = start.elapsed();
	tracing::warn!(elapsed_secs = elapsed.as_secs(), "Gave up waiting for transaction");
	MarketplaceError::Timeout { hash, elapsed }
}

/// Waits for `tx_hash` to be mined using a read-only client for `endpoint`.
///
/// For callers that only hold a hash and an endpoint, e.g. a transaction
/// submitted by another process.
pub async fn wait_for_mining(
	tx_hash: &str,
	endpoint: &str,
	policy: PollPolicy,
) -> Result<TransactionOutcome, MarketplaceError> {
	let hash = parse_hash(tx_hash)?;
	let chain = AlloyChain::connect_read_only(endpoint)
		.await
		.map_err(MarketplaceError::Connection)?;

	ConfirmationTracker::new(Arc::new(chain), policy)
		.wait_for_hash(hash, &CancellationToken::new())
		.await
}
