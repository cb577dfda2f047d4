//! Error types for resource operations

use polyglot_http::{ApiError, ValidationErrors};
use polyglot_i18n::DraftError;
use thiserror::Error;

/// Errors raised by [`ResourceApi`](crate::ResourceApi)
#[derive(Debug, Error)]
pub enum ResourceError {
	/// The request failed or the server rejected it
	#[error(transparent)]
	Api(#[from] ApiError),

	/// The draft could not be used
	#[error(transparent)]
	Draft(#[from] DraftError),

	/// The entity failed client-side validation; nothing was sent
	#[error("Validation failed: {0}")]
	Invalid(ValidationErrors),

	/// An update was requested for an entity without an identifier
	#[error("{0} has no identifier to update")]
	MissingId(&'static str),
}

impl ResourceError {
	/// Per-field messages, from client-side or server-side validation
	pub fn validation_errors(&self) -> Option<&ValidationErrors> {
		match self {
			Self::Invalid(errors) => Some(errors),
			Self::Api(error) => error.validation_errors(),
			_ => None,
		}
	}
}

/// Result type for resource operations
pub type ResourceResult<T> = Result<T, ResourceError>;
