//! Errors raised while wiring the panel together

use polyglot_conf::ConfigError;
use polyglot_http::ApiError;

/// Failure to assemble an [`AdminPanel`](crate::AdminPanel) or its logging
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
	/// Settings could not be loaded or are invalid
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The API client could not be built
	#[error(transparent)]
	Api(#[from] ApiError),

	/// The log filter directive does not parse
	#[error("Invalid log filter {filter:?}: {message}")]
	LogFilter {
		/// The rejected directive
		filter: String,
		/// Parser message
		message: String,
	},

	/// A global subscriber is already installed
	#[error("Logging already initialized: {0}")]
	LoggingInstalled(String),
}

/// Result alias for panel wiring
pub type PanelResult<T> = Result<T, PanelError>;
