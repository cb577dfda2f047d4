//! Storage backends

use parking_lot::RwLock;
use std::sync::Arc;

/// Raw string storage area, shaped after the Web Storage API.
///
/// Implementations must be cheap to call from any task; none of the methods
/// are allowed to block on I/O.
pub trait Storage: Send + Sync {
	/// Return the value stored under `key`
	fn get_item(&self, key: &str) -> Option<String>;

	/// Store `value` under `key`, replacing any previous value
	fn set_item(&self, key: &str, value: String);

	/// Remove `key` if present
	fn remove_item(&self, key: &str);

	/// Remove every entry
	fn clear(&self);

	/// Name of the key at `index` in insertion order
	fn key(&self, index: usize) -> Option<String>;

	/// Number of stored entries
	fn len(&self) -> usize;

	/// Whether the storage area holds no entries
	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// In-memory storage area.
///
/// Clones share the same area, so a clone handed to the HTTP client sees the
/// token written by the sign-in flow. Two separately constructed instances are
/// isolated from each other, the same way two browser tabs are.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	entries: Arc<RwLock<Vec<(String, String)>>>,
}

impl MemoryStorage {
	/// Create an empty storage area
	pub fn new() -> Self {
		Self::default()
	}
}

impl Storage for MemoryStorage {
	fn get_item(&self, key: &str) -> Option<String> {
		self.entries
			.read()
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.clone())
	}

	fn set_item(&self, key: &str, value: String) {
		let mut entries = self.entries.write();
		match entries.iter_mut().find(|(k, _)| k == key) {
			Some(entry) => entry.1 = value,
			None => entries.push((key.to_string(), value)),
		}
	}

	fn remove_item(&self, key: &str) {
		self.entries.write().retain(|(k, _)| k != key);
	}

	fn clear(&self) {
		self.entries.write().clear();
	}

	fn key(&self, index: usize) -> Option<String> {
		self.entries.read().get(index).map(|(k, _)| k.clone())
	}

	fn len(&self) -> usize {
		self.entries.read().len()
	}
}
