//! Storage error types

use thiserror::Error;

/// Errors raised while encoding or decoding stored values
#[derive(Debug, Error)]
pub enum StorageError {
	/// Value could not be serialized to JSON text
	#[error("Failed to serialize value for key '{key}': {source}")]
	Serialize {
		/// Storage key being written
		key: String,
		/// Underlying serde error
		#[source]
		source: serde_json::Error,
	},

	/// Stored text is not valid JSON for the requested type
	#[error("Failed to decode value stored under '{key}': {source}")]
	Decode {
		/// Storage key being read
		key: String,
		/// Underlying serde error
		#[source]
		source: serde_json::Error,
	},
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
