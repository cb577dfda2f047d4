//! Exponential backoff for transient query failures

use polyglot_http::ApiResult;
use std::future::Future;
use std::time::Duration;

/// Backoff schedule for queries.
///
/// The delay before retry `n` (0-based) is `min(base_delay * 2^n, max_delay)`.
/// Only errors reporting [`ApiError::is_retryable`](polyglot_http::ApiError::is_retryable) are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Retries after the first attempt
	pub max_retries: u32,
	/// Delay before the first retry
	pub base_delay: Duration,
	/// Upper bound on any single delay
	pub max_delay: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_retries: 3,
			base_delay: Duration::from_millis(1000),
			max_delay: Duration::from_millis(30_000),
		}
	}
}

impl RetryPolicy {
	/// Never retry
	pub fn none() -> Self {
		Self {
			max_retries: 0,
			..Self::default()
		}
	}

	/// Set the number of retries
	pub fn with_max_retries(mut self, max_retries: u32) -> Self {
		self.max_retries = max_retries;
		self
	}

	/// Delay before retry number `attempt` (0-based)
	///
	/// # Examples
	///
	/// ```
	/// use polyglot_query::RetryPolicy;
	/// use std::time::Duration;
	///
	/// let policy = RetryPolicy::default();
	/// assert_eq!(policy.delay_for(0), Duration::from_secs(1));
	/// assert_eq!(policy.delay_for(2), Duration::from_secs(4));
	/// assert_eq!(policy.delay_for(10), Duration::from_secs(30));
	/// ```
	pub fn delay_for(&self, attempt: u32) -> Duration {
		let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
		self.base_delay
			.checked_mul(factor)
			.map_or(self.max_delay, |delay| delay.min(self.max_delay))
	}

	/// Run `operation` until it succeeds, fails terminally, or retries run out
	pub async fn run<T, F, Fut>(&self, mut operation: F) -> ApiResult<T>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = ApiResult<T>>,
	{
		let mut attempt = 0;
		loop {
			match operation().await {
				Ok(value) => return Ok(value),
				Err(error) if attempt < self.max_retries && error.is_retryable() => {
					let delay = self.delay_for(attempt);
					tracing::warn!(
						attempt = attempt + 1,
						delay_ms = delay.as_millis() as u64,
						"Transient failure, retrying: {}",
						error
					);
					tokio::time::sleep(delay).await;
					attempt += 1;
				}
				Err(error) => return Err(error),
			}
		}
	}
}
