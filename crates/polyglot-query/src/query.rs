//! Observer handle for one cached resource

use crate::client::{QueryClient, decode};
use parking_lot::Mutex;
use polyglot_http::ApiError;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Result of a query load; errors are shared with the observer state
pub type QueryResult<T> = Result<T, Arc<ApiError>>;

struct State<T> {
	data: Option<T>,
	is_loading: bool,
	error: Option<Arc<ApiError>>,
}

struct Shared<T> {
	state: Mutex<State<T>>,
	mounted: AtomicBool,
}

impl<T: Clone> Shared<T> {
	fn begin(&self) {
		if self.mounted.load(Ordering::Acquire) {
			self.state.lock().is_loading = true;
		}
	}

	/// End a load without touching data or error
	fn finish(&self) {
		if self.mounted.load(Ordering::Acquire) {
			self.state.lock().is_loading = false;
		}
	}

	/// Apply a finished load unless the observer went away meanwhile
	fn settle(&self, result: QueryResult<T>) -> QueryResult<T> {
		if !self.mounted.load(Ordering::Acquire) {
			return result;
		}
		let mut state = self.state.lock();
		state.is_loading = false;
		match &result {
			Ok(data) => {
				state.data = Some(data.clone());
				state.error = None;
			}
			Err(error) => state.error = Some(error.clone()),
		}
		result
	}
}

/// A mounted view of the resource at `path`, cached under `key`.
///
/// Mirrors the `{ data, isLoading, error, refetch }` contract of a table
/// screen. Dropping the handle unmounts it: a response that lands afterwards
/// may still refresh the shared cache but is never applied to this observer.
pub struct Query<T> {
	client: QueryClient,
	path: String,
	key: String,
	shared: Arc<Shared<T>>,
	revisions: watch::Receiver<u64>,
}

impl<T> Query<T>
where
	T: DeserializeOwned + Clone + Send + 'static,
{
	pub(crate) fn new(client: QueryClient, path: String, key: String) -> Self {
		let revisions = client.cache().subscribe(&key);
		let data = client.get_query_data::<T>(&key);
		Self {
			client,
			path,
			key,
			shared: Arc::new(Shared {
				state: Mutex::new(State {
					data,
					is_loading: false,
					error: None,
				}),
				mounted: AtomicBool::new(true),
			}),
			revisions,
		}
	}

	/// Resource path, e.g. `/Tags/GetAll`
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Cache key, e.g. `tags`
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Last successfully loaded data
	pub fn data(&self) -> Option<T> {
		self.shared.state.lock().data.clone()
	}

	/// Whether a network fetch is in progress
	pub fn is_loading(&self) -> bool {
		self.shared.state.lock().is_loading
	}

	/// Error of the last load, cleared by the next success
	pub fn error(&self) -> Option<Arc<ApiError>> {
		self.shared.state.lock().error.clone()
	}

	/// Whether the handle is still mounted
	pub fn is_mounted(&self) -> bool {
		self.shared.mounted.load(Ordering::Acquire)
	}

	/// Serve fresh cached data, or fetch when absent or stale
	pub async fn load(&self) -> QueryResult<T> {
		let stale_time = self.client.config().stale_time;
		if let Some(data) = self.client.cache().fresh(&self.key, stale_time) {
			return self.shared.settle(decode(data).map_err(Arc::new));
		}
		run(&self.client, &self.path, &self.key, &self.shared).await
	}

	/// Fetch from the network regardless of freshness and update the cache
	pub async fn refetch(&self) -> QueryResult<T> {
		run(&self.client, &self.path, &self.key, &self.shared).await
	}

	/// Load in the background, the way a screen loads on mount
	pub fn spawn_load(&self) -> JoinHandle<()> {
		let client = self.client.clone();
		let path = self.path.clone();
		let key = self.key.clone();
		let shared = self.shared.clone();
		tokio::spawn(async move {
			let stale_time = client.config().stale_time;
			match client.cache().fresh(&key, stale_time) {
				Some(data) => {
					let _ = shared.settle(decode(data).map_err(Arc::new));
				}
				None => {
					let _ = run(&client, &path, &key, &shared).await;
				}
			}
		})
	}

	/// Wait until the cache entry for this key is written, invalidated or
	/// removed.
	///
	/// Returns `false` when the entry was removed; the handle re-subscribes so
	/// later calls keep working.
	pub async fn changed(&mut self) -> bool {
		match self.revisions.changed().await {
			Ok(()) => true,
			Err(_) => {
				self.revisions = self.client.cache().subscribe(&self.key);
				false
			}
		}
	}

	/// Detach the observer
	pub fn unmount(self) {
		drop(self);
	}
}

// Fetches superseded before newer data landed are retried this many times
const SUPERSEDED_REFETCHES: usize = 2;

async fn run<T>(client: &QueryClient, path: &str, key: &str, shared: &Shared<T>) -> QueryResult<T>
where
	T: DeserializeOwned + Clone,
{
	shared.begin();
	let mut refetches = 0;
	loop {
		let fetched = match client.fetch_resolved(path, key).await {
			Ok(fetched) => fetched,
			Err(e) => {
				tracing::warn!(key, path, "Query failed: {}", e);
				return shared.settle(Err(Arc::new(e)));
			}
		};
		if fetched.current {
			return shared.settle(decode(fetched.data).map_err(Arc::new));
		}
		if refetches == SUPERSEDED_REFETCHES {
			tracing::debug!(key, path, "Response superseded; observer left unchanged");
			shared.finish();
			return decode(fetched.data).map_err(Arc::new);
		}
		refetches += 1;
		tracing::debug!(key, path, "Response superseded by an invalidation; refetching");
	}
}

impl<T> Drop for Query<T> {
	fn drop(&mut self) {
		self.shared.mounted.store(false, Ordering::Release);
	}
}

impl<T> fmt::Debug for Query<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.shared.state.lock();
		f.debug_struct("Query")
			.field("path", &self.path)
			.field("key", &self.key)
			.field("has_data", &state.data.is_some())
			.field("is_loading", &state.is_loading)
			.field("error", &state.error)
			.finish()
	}
}
