//! Keyed response cache with generation-guarded writes

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatistics {
	/// Reads served from fresh cached data
	pub hits: u64,
	/// Reads that had to go to the network
	pub misses: u64,
	/// `hits + misses`
	pub total_requests: u64,
	/// Keys currently holding data
	pub entry_count: u64,
}

impl CacheStatistics {
	/// Fraction of reads served from cache (0.0 to 1.0)
	pub fn hit_rate(&self) -> f64 {
		if self.total_requests == 0 {
			0.0
		} else {
			self.hits as f64 / self.total_requests as f64
		}
	}

	/// Fraction of reads that missed (0.0 to 1.0)
	pub fn miss_rate(&self) -> f64 {
		if self.total_requests == 0 {
			0.0
		} else {
			self.misses as f64 / self.total_requests as f64
		}
	}
}

struct Slot {
	data: Option<Value>,
	fetched_at: Option<Instant>,
	generation: u64,
	revision: watch::Sender<u64>,
}

impl Slot {
	fn new(generation: u64) -> Self {
		let (revision, _) = watch::channel(0);
		Self {
			data: None,
			fetched_at: None,
			generation,
			revision,
		}
	}

	fn notify(&self) {
		self.revision.send_modify(|revision| *revision += 1);
	}
}

/// Proof that a fetch started at a given generation of a key.
///
/// Hand it back to [`QueryCache::complete`]; the write is dropped if the key
/// was invalidated, removed or cleared in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
	key: String,
	generation: u64,
}

impl FetchTicket {
	/// Key the fetch is for
	pub fn key(&self) -> &str {
		&self.key
	}
}

/// Shared cache of decoded response payloads, keyed by logical resource name.
///
/// Each key carries a generation. Invalidation empties the entry and moves the
/// generation forward, so a response requested before the invalidation can no
/// longer be written.
#[derive(Clone)]
pub struct QueryCache {
	slots: Arc<Mutex<HashMap<String, Slot>>>,
	generations: Arc<AtomicU64>,
	hits: Arc<AtomicU64>,
	misses: Arc<AtomicU64>,
}

impl QueryCache {
	/// Empty cache
	pub fn new() -> Self {
		Self {
			slots: Arc::new(Mutex::new(HashMap::new())),
			generations: Arc::new(AtomicU64::new(0)),
			hits: Arc::new(AtomicU64::new(0)),
			misses: Arc::new(AtomicU64::new(0)),
		}
	}

	fn next_generation(&self) -> u64 {
		self.generations.fetch_add(1, Ordering::Relaxed) + 1
	}

	/// Data for `key` if it was fetched less than `stale_time` ago.
	///
	/// Counts as a hit or a miss in [`statistics`](Self::statistics).
	pub fn fresh(&self, key: &str, stale_time: Duration) -> Option<Value> {
		let slots = self.slots.lock();
		let fresh = slots.get(key).and_then(|slot| match (&slot.data, slot.fetched_at) {
			(Some(data), Some(at)) if at.elapsed() < stale_time => Some(data.clone()),
			_ => None,
		});
		drop(slots);

		if fresh.is_some() {
			self.hits.fetch_add(1, Ordering::Relaxed);
			tracing::debug!(key, "Query cache hit");
		} else {
			self.misses.fetch_add(1, Ordering::Relaxed);
			tracing::debug!(key, "Query cache miss");
		}
		fresh
	}

	/// Data for `key` regardless of age
	pub fn peek(&self, key: &str) -> Option<Value> {
		self.slots.lock().get(key).and_then(|slot| slot.data.clone())
	}

	/// Register the start of a network fetch for `key`
	pub fn begin_fetch(&self, key: &str) -> FetchTicket {
		let mut slots = self.slots.lock();
		let generation = match slots.get(key) {
			Some(slot) => slot.generation,
			None => {
				let generation = self.next_generation();
				slots.insert(key.to_string(), Slot::new(generation));
				generation
			}
		};
		FetchTicket {
			key: key.to_string(),
			generation,
		}
	}

	/// Store the result of the fetch identified by `ticket`.
	///
	/// Returns `false` and leaves the cache untouched when the key changed
	/// generation since [`begin_fetch`](Self::begin_fetch).
	pub fn complete(&self, ticket: &FetchTicket, data: Value) -> bool {
		let mut slots = self.slots.lock();
		match slots.get_mut(&ticket.key) {
			Some(slot) if slot.generation == ticket.generation => {
				slot.data = Some(data);
				slot.fetched_at = Some(Instant::now());
				slot.notify();
				true
			}
			_ => {
				tracing::debug!(key = %ticket.key, "Discarding response fetched before invalidation");
				false
			}
		}
	}

	/// Write `data` for `key` as if it had just been fetched.
	///
	/// Fetches already in flight for `key` can no longer overwrite it.
	pub fn set(&self, key: &str, data: Value) {
		let mut slots = self.slots.lock();
		let generation = self.next_generation();
		let slot = slots
			.entry(key.to_string())
			.or_insert_with(|| Slot::new(generation));
		slot.generation = generation;
		slot.data = Some(data);
		slot.fetched_at = Some(Instant::now());
		slot.notify();
	}

	/// Empty `key` and refuse writes from fetches already in flight.
	///
	/// Returns whether the key was known.
	pub fn invalidate(&self, key: &str) -> bool {
		let mut slots = self.slots.lock();
		match slots.get_mut(key) {
			Some(slot) => {
				slot.data = None;
				slot.fetched_at = None;
				slot.generation = self.next_generation();
				slot.notify();
				tracing::debug!(key, "Query invalidated");
				true
			}
			None => false,
		}
	}

	/// Forget `key` entirely; its subscribers see the channel close
	pub fn remove(&self, key: &str) {
		self.slots.lock().remove(key);
	}

	/// Forget every key
	pub fn clear(&self) {
		let mut slots = self.slots.lock();
		let entries = slots.len();
		slots.clear();
		tracing::debug!(entries, "Query cache cleared");
	}

	/// Receive a notification whenever `key` is written, invalidated or removed
	pub fn subscribe(&self, key: &str) -> watch::Receiver<u64> {
		let mut slots = self.slots.lock();
		slots
			.entry(key.to_string())
			.or_insert_with(|| Slot::new(self.next_generation()))
			.revision
			.subscribe()
	}

	/// Cached keys, in no particular order
	pub fn keys(&self) -> Vec<String> {
		self.slots.lock().keys().cloned().collect()
	}

	/// Hit/miss counters and entry count
	pub fn statistics(&self) -> CacheStatistics {
		let hits = self.hits.load(Ordering::Relaxed);
		let misses = self.misses.load(Ordering::Relaxed);
		let entry_count = self
			.slots
			.lock()
			.values()
			.filter(|slot| slot.data.is_some())
			.count() as u64;
		CacheStatistics {
			hits,
			misses,
			total_requests: hits + misses,
			entry_count,
		}
	}
}

impl Default for QueryCache {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for QueryCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("QueryCache")
			.field("keys", &self.slots.lock().len())
			.finish()
	}
}
