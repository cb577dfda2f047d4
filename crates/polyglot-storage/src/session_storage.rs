//! Session storage adapter

use crate::backend::{MemoryStorage, Storage};
use crate::error::{StorageError, StorageResult};
use crate::session::{SESSION_DATA_KEY, Session, SessionData, TOKEN_KEY};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Adapter over a [`Storage`] backend with the admin panel's write rules.
///
/// Writes of absent or empty values are ignored instead of clearing the key,
/// strings are stored verbatim and every other value is stored as JSON text.
#[derive(Clone)]
pub struct SessionStorage {
	backend: Arc<dyn Storage>,
}

impl SessionStorage {
	/// Wrap a storage backend
	pub fn new(backend: impl Storage + 'static) -> Self {
		Self {
			backend: Arc::new(backend),
		}
	}

	/// Wrap an already shared backend
	pub fn from_shared(backend: Arc<dyn Storage>) -> Self {
		Self { backend }
	}

	/// Fresh, isolated in-memory storage (one "tab")
	pub fn in_memory() -> Self {
		Self::new(MemoryStorage::new())
	}

	/// Store `value` under `key`.
	///
	/// Does nothing when the key is empty or the value is `null`, `false`,
	/// `0`, an empty string or an empty array.
	///
	/// # Examples
	///
	/// ```
	/// use polyglot_storage::SessionStorage;
	///
	/// let storage = SessionStorage::in_memory();
	/// storage.set("token", "abc").unwrap();
	/// storage.set("token", "").unwrap();
	/// assert_eq!(storage.get("token").as_deref(), Some("abc"));
	///
	/// storage.set("data", &serde_json::json!({ "id": 1 })).unwrap();
	/// assert_eq!(storage.get("data").as_deref(), Some(r#"{"id":1}"#));
	/// ```
	pub fn set<V>(&self, key: &str, value: &V) -> StorageResult<()>
	where
		V: Serialize + ?Sized,
	{
		if key.is_empty() {
			return Ok(());
		}

		let value = serde_json::to_value(value).map_err(|source| StorageError::Serialize {
			key: key.to_string(),
			source,
		})?;

		if is_absent(&value) {
			tracing::trace!(key, "Skipping write of empty value");
			return Ok(());
		}

		let text = match value {
			Value::String(text) => text,
			other => other.to_string(),
		};
		self.backend.set_item(key, text);
		Ok(())
	}

	/// Raw stored string
	pub fn get(&self, key: &str) -> Option<String> {
		if key.is_empty() {
			return None;
		}
		self.backend.get_item(key)
	}

	/// Decode the JSON text stored under `key`
	pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
		match self.get(key) {
			Some(text) => serde_json::from_str(&text)
				.map(Some)
				.map_err(|source| StorageError::Decode {
					key: key.to_string(),
					source,
				}),
			None => Ok(None),
		}
	}

	/// Remove `key`
	pub fn remove(&self, key: &str) {
		self.backend.remove_item(key);
	}

	/// Remove every entry
	pub fn clear(&self) {
		self.backend.clear();
	}

	/// Key at position `index`
	pub fn key(&self, index: usize) -> Option<String> {
		self.backend.key(index)
	}

	/// Number of stored entries
	pub fn len(&self) -> usize {
		self.backend.len()
	}

	/// Whether nothing is stored
	pub fn is_empty(&self) -> bool {
		self.backend.is_empty()
	}

	/// Bearer token of the current session
	pub fn token(&self) -> Option<String> {
		self.get(TOKEN_KEY)
	}

	/// Persist a freshly signed-in session
	pub fn save_session(&self, session: &Session) -> StorageResult<()> {
		self.set(TOKEN_KEY, &session.token)?;
		self.set(
			SESSION_DATA_KEY,
			&SessionData {
				user_name: session.user_name.clone(),
				id: session.user_id.clone(),
			},
		)?;
		tracing::debug!(user = %session.user_name, "Session stored");
		Ok(())
	}

	/// Current session, if a token and a readable user descriptor exist
	pub fn session(&self) -> Option<Session> {
		let token = self.token()?;
		let data = match self.get_json::<SessionData>(SESSION_DATA_KEY) {
			Ok(data) => data?,
			Err(e) => {
				tracing::warn!("Ignoring unreadable session data: {}", e);
				return None;
			}
		};
		Some(Session {
			token,
			user_id: data.id,
			user_name: data.user_name,
		})
	}
}

impl Default for SessionStorage {
	fn default() -> Self {
		Self::in_memory()
	}
}

impl fmt::Debug for SessionStorage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionStorage")
			.field("len", &self.backend.len())
			.finish()
	}
}

fn is_absent(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::String(s) => s.is_empty(),
		Value::Array(items) => items.is_empty(),
		Value::Object(_) => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null))]
	#[case(json!(false))]
	#[case(json!(0))]
	#[case(json!(""))]
	#[case(json!([]))]
	fn test_set_ignores_absent_values(#[case] value: Value) {
		let storage = SessionStorage::in_memory();
		storage.set("key", "kept").unwrap();

		storage.set("key", &value).unwrap();

		assert_eq!(storage.get("key").as_deref(), Some("kept"));
	}

	#[rstest]
	fn test_set_ignores_empty_key() {
		let storage = SessionStorage::in_memory();
		storage.set("", "value").unwrap();
		assert!(storage.is_empty());
	}

	#[rstest]
	#[case(json!(true), "true")]
	#[case(json!(12), "12")]
	#[case(json!([1, 2]), "[1,2]")]
	#[case(json!({ "a": 1 }), r#"{"a":1}"#)]
	fn test_set_serializes_non_strings(#[case] value: Value, #[case] expected: &str) {
		let storage = SessionStorage::in_memory();
		storage.set("key", &value).unwrap();
		assert_eq!(storage.get("key").as_deref(), Some(expected));
	}

	#[rstest]
	fn test_strings_are_stored_verbatim() {
		let storage = SessionStorage::in_memory();
		storage.set("token", "eyJhbGciOi").unwrap();
		assert_eq!(storage.get("token").as_deref(), Some("eyJhbGciOi"));
	}

	#[rstest]
	fn test_get_json_reports_corrupt_text() {
		let storage = SessionStorage::in_memory();
		storage.set("data", "not json").unwrap();

		let result = storage.get_json::<Value>("data");

		assert!(matches!(result, Err(StorageError::Decode { .. })));
	}

	#[rstest]
	fn test_session_requires_token_and_data() {
		let storage = SessionStorage::in_memory();
		assert!(storage.session().is_none());

		storage.set(TOKEN_KEY, "abc").unwrap();
		assert!(storage.session().is_none());

		storage
			.set(SESSION_DATA_KEY, &json!({ "userName": "admin", "id": 3 }))
			.unwrap();
		assert_eq!(storage.session(), Some(Session::new("abc", "3", "admin")));
	}
}
