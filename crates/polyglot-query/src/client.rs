//! Query client: cache, freshness window and retry policy in one handle

use crate::cache::{CacheStatistics, QueryCache};
use crate::mutation::{Mutation, MutationOptions};
use crate::query::Query;
use crate::retry::RetryPolicy;
use crate::toast::{Toaster, TracingToaster};
use polyglot_http::{ApiClient, ApiError, ApiResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default freshness window: six minutes
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(6 * 60);

/// Tuning for reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
	/// How long fetched data is served without a network call
	pub stale_time: Duration,
	/// Backoff for transient read failures
	pub retry: RetryPolicy,
}

impl Default for QueryConfig {
	fn default() -> Self {
		Self {
			stale_time: DEFAULT_STALE_TIME,
			retry: RetryPolicy::default(),
		}
	}
}

/// Entry point for reads and writes against cached resources.
///
/// Clones share the cache, the API client and the toaster.
///
/// # Example
///
/// ```rust,no_run
/// use polyglot_http::ApiClient;
/// use polyglot_query::{MutationOptions, QueryClient};
/// use serde_json::{json, Value};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = ApiClient::builder().base_url("https://api.example.com").build()?;
/// let client = QueryClient::new(api);
///
/// let tags = client.query::<Vec<Value>>("/Tags/GetAll", "tags");
/// tags.load().await?;
///
/// client
///     .mutation(MutationOptions::post("/Tags/Create").invalidates("tags"))
///     .mutate(&json!({ "tagName": { "uz": "Yangilik", "ru": "", "en": "News", "ger": "" } }))
///     .await?;
///
/// // Invalidated: this goes back to the network.
/// tags.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QueryClient {
	api: ApiClient,
	cache: QueryCache,
	config: QueryConfig,
	toaster: Arc<dyn Toaster>,
}

impl QueryClient {
	/// Client with default configuration, logging toasts through `tracing`
	pub fn new(api: ApiClient) -> Self {
		Self {
			api,
			cache: QueryCache::new(),
			config: QueryConfig::default(),
			toaster: Arc::new(TracingToaster),
		}
	}

	/// Replace the read configuration
	pub fn with_config(mut self, config: QueryConfig) -> Self {
		self.config = config;
		self
	}

	/// Send notifications to `toaster`
	pub fn with_toaster(mut self, toaster: Arc<dyn Toaster>) -> Self {
		self.toaster = toaster;
		self
	}

	/// Underlying API client
	pub fn api(&self) -> &ApiClient {
		&self.api
	}

	/// Shared cache
	pub fn cache(&self) -> &QueryCache {
		&self.cache
	}

	/// Read configuration
	pub fn config(&self) -> &QueryConfig {
		&self.config
	}

	pub(crate) fn toaster(&self) -> &dyn Toaster {
		self.toaster.as_ref()
	}

	/// Observer for the resource at `path`, cached under `key`
	pub fn query<T>(&self, path: impl Into<String>, key: impl Into<String>) -> Query<T>
	where
		T: DeserializeOwned + Clone + Send + 'static,
	{
		Query::new(self.clone(), path.into(), key.into())
	}

	/// Cached data for `key` when fresh, otherwise a network fetch
	pub async fn fetch(&self, path: &str, key: &str) -> ApiResult<Value> {
		match self.cache.fresh(key, self.config.stale_time) {
			Some(data) => Ok(data),
			None => self.fetch_network(path, key).await,
		}
	}

	/// Network fetch with retries.
	///
	/// The response is cached unless `key` was invalidated, written or removed
	/// while the request was in flight. A response superseded that way is not
	/// returned when the cache already holds newer data.
	pub async fn fetch_network(&self, path: &str, key: &str) -> ApiResult<Value> {
		self.fetch_resolved(path, key).await.map(|fetched| fetched.data)
	}

	pub(crate) async fn fetch_resolved(&self, path: &str, key: &str) -> ApiResult<Fetched> {
		let ticket = self.cache.begin_fetch(key);
		let envelope = self.config.retry.run(|| self.api.get(path)).await?;
		let data = envelope.into_content().unwrap_or(Value::Null);
		if self.cache.complete(&ticket, data.clone()) {
			return Ok(Fetched { data, current: true });
		}
		Ok(match self.cache.peek(key) {
			Some(newer) => Fetched {
				data: newer,
				current: true,
			},
			None => Fetched { data, current: false },
		})
	}

	/// Warm the cache for `key` without an observer
	pub async fn prefetch(&self, path: &str, key: &str) -> ApiResult<()> {
		self.fetch(path, key).await.map(|_| ())
	}

	/// Overwrite the cached data for `key`
	pub fn set_query_data<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> ApiResult<()> {
		self.cache.set(key, serde_json::to_value(data)?);
		Ok(())
	}

	/// Cached data for `key` regardless of age
	pub fn get_query_data<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		let value = self.cache.peek(key)?;
		match serde_json::from_value(value) {
			Ok(data) => Some(data),
			Err(e) => {
				tracing::warn!(key, "Cached data does not match the requested type: {}", e);
				None
			}
		}
	}

	/// Mark each key stale so its next read goes to the network
	pub fn invalidate_queries<I, K>(&self, keys: I)
	where
		I: IntoIterator<Item = K>,
		K: AsRef<str>,
	{
		for key in keys {
			self.cache.invalidate(key.as_ref());
		}
	}

	/// Forget `key`
	pub fn remove(&self, key: &str) {
		self.cache.remove(key);
	}

	/// Forget everything (a new session must not see the previous one's data)
	pub fn clear(&self) {
		self.cache.clear();
	}

	/// Cache hit/miss counters
	pub fn statistics(&self) -> CacheStatistics {
		self.cache.statistics()
	}

	/// Prepare a write described by `options`
	pub fn mutation(&self, options: MutationOptions) -> Mutation {
		Mutation::new(self.clone(), options)
	}
}

impl fmt::Debug for QueryClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QueryClient")
			.field("base_url", &self.api.base_url())
			.field("cache", &self.cache)
			.field("config", &self.config)
			.finish()
	}
}

/// Outcome of a network read.
///
/// `current` is false when the response was superseded by an invalidation and
/// no newer data has landed yet; such data must not reach an observer.
pub(crate) struct Fetched {
	pub(crate) data: Value,
	pub(crate) current: bool,
}

/// Decode cached or fetched data into the observer's type
pub(crate) fn decode<T: DeserializeOwned>(data: Value) -> ApiResult<T> {
	match serde_json::from_value(data) {
		Ok(decoded) => Ok(decoded),
		Err(e) => Err(ApiError::Decode(e.to_string())),
	}
}
