//! Error types for the API client

use crate::envelope::ValidationErrors;
use polyglot_storage::StorageError;
use thiserror::Error;

/// Errors produced by [`ApiClient`](crate::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The request never produced a response (connect, timeout, TLS, body)
	#[error("Network error: {0}")]
	Transport(#[from] reqwest::Error),

	/// The configured base URL or a built request URL is not valid
	#[error("Invalid URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	/// The server answered 401; the local session has been destroyed
	#[error("Session expired, sign in again")]
	SessionExpired,

	/// Sign-in refused the supplied credentials
	#[error("Unauthorized: {0}")]
	Unauthorized(String),

	/// The addressed record does not exist
	#[error("Not found: {0}")]
	NotFound(String),

	/// Field-level validation failures
	#[error("Validation failed: {0}")]
	Validation(ValidationErrors),

	/// The server returned 2xx but reported an application error in the envelope
	#[error("Request rejected ({code}): {message}")]
	Rejected {
		/// Envelope status code (0 when absent)
		code: i64,
		/// Server-provided description
		message: String,
	},

	/// Non-2xx HTTP status not covered by a more specific variant
	#[error("Server error {status}: {message}")]
	Status {
		/// HTTP status code
		status: u16,
		/// Server-provided description, or the canonical reason
		message: String,
	},

	/// The response body was not the expected shape
	#[error("Invalid response: {0}")]
	Decode(String),

	/// A request body could not be serialized, or content could not be decoded
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// The session store failed
	#[error(transparent)]
	Storage(#[from] StorageError),
}

impl ApiError {
	/// Whether repeating the same request may succeed.
	///
	/// Transport failures (timeouts, refused connections), `408`, `429` and
	/// `5xx` are transient; everything else is terminal.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
			Self::Status { status, .. } => {
				*status >= 500 || *status == 429 || *status == 408
			}
			_ => false,
		}
	}

	/// Whether the error means the addressed record is absent
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::NotFound(_) => true,
			Self::Status { status, .. } => *status == 404,
			Self::Rejected { code, .. } => *code == 404,
			_ => false,
		}
	}

	/// HTTP status associated with the error, if any
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Transport(e) => e.status().map(|s| s.as_u16()),
			Self::SessionExpired | Self::Unauthorized(_) => Some(401),
			Self::NotFound(_) => Some(404),
			Self::Validation(_) => Some(400),
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Field-level errors, when the failure was a validation failure
	pub fn validation_errors(&self) -> Option<&ValidationErrors> {
		match self {
			Self::Validation(errors) => Some(errors),
			_ => None,
		}
	}
}

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;
