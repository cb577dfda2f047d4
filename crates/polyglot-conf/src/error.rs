//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading settings
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A settings file exists but could not be read
	#[error("Cannot read {path}: {source}")]
	Io {
		/// File that failed
		path: PathBuf,
		/// Underlying error
		#[source]
		source: std::io::Error,
	},

	/// A settings file is not valid TOML
	#[error("TOML error in {path}: {source}")]
	Toml {
		/// File that failed
		path: PathBuf,
		/// Underlying error
		#[source]
		source: toml::de::Error,
	},

	/// The merged settings do not match the settings schema
	#[error("Invalid settings: {0}")]
	Schema(#[from] serde_json::Error),

	/// A value is well-formed but unusable
	#[error("Invalid value for {key}: {message}")]
	Invalid {
		/// Dotted settings key, e.g. `api.base_url`
		key: String,
		/// What is wrong with it
		message: String,
	},
}

impl ConfigError {
	pub(crate) fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Invalid {
			key: key.into(),
			message: message.into(),
		}
	}
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;
