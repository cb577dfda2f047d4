//! Settings schema and the layered builder

use crate::duration;
use crate::error::{ConfigError, ConfigResult};
use crate::sources::{ConfigSource, DefaultSource, EnvSource, TomlFileSource, deep_merge};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;

/// Everything the data layer can be configured with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Backend connection
	pub api: ApiSettings,
	/// Read cache and retries
	pub query: QuerySettings,
	/// Log output
	pub logging: LoggingSettings,
}

/// Backend connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
	/// Origin (and optional path prefix) every request path is appended to
	pub base_url: String,
	/// Per-request timeout
	#[serde(with = "duration")]
	pub timeout: Duration,
	/// `User-Agent` header; the HTTP client's default when unset
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_agent: Option<String>,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:8080".to_string(),
			timeout: Duration::from_secs(30),
			user_agent: None,
		}
	}
}

/// Read cache and retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
	/// How long fetched data is served without a network call
	#[serde(with = "duration")]
	pub stale_time: Duration,
	/// Backoff for failed reads
	pub retry: RetrySettings,
}

impl Default for QuerySettings {
	fn default() -> Self {
		Self {
			stale_time: Duration::from_secs(6 * 60),
			retry: RetrySettings::default(),
		}
	}
}

/// Backoff for failed reads: `min(base_delay * 2^n, max_delay)` before retry `n`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
	/// Retries after the first attempt
	pub max_retries: u32,
	/// Delay before the first retry
	#[serde(with = "duration")]
	pub base_delay: Duration,
	/// Upper bound on a single delay
	#[serde(with = "duration")]
	pub max_delay: Duration,
}

impl Default for RetrySettings {
	fn default() -> Self {
		Self {
			max_retries: 3,
			base_delay: Duration::from_secs(1),
			max_delay: Duration::from_secs(30),
		}
	}
}

/// Output format of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	/// Human-readable lines
	#[default]
	Pretty,
	/// Compact single lines
	Compact,
	/// One JSON object per line
	Json,
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// `tracing` filter directive, e.g. `info,polyglot_query=debug`
	pub filter: String,
	/// Line format
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
			format: LogFormat::default(),
		}
	}
}

impl Settings {
	/// Empty builder; add sources, then [`build`](SettingsBuilder::build)
	pub fn builder() -> SettingsBuilder {
		SettingsBuilder::default()
	}

	/// Defaults, then `path` if it exists, then `POLYGLOT_*` variables
	pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
		Self::builder()
			.add_source(DefaultSource)
			.add_source(TomlFileSource::new(path.as_ref()))
			.add_source(EnvSource::new())
			.build()
	}

	/// Defaults overridden by `POLYGLOT_*` variables
	pub fn from_env() -> ConfigResult<Self> {
		Self::builder()
			.add_source(DefaultSource)
			.add_source(EnvSource::new())
			.build()
	}

	/// Reject values that parse but cannot work
	pub fn validate(&self) -> ConfigResult<()> {
		let url = url::Url::parse(&self.api.base_url)
			.map_err(|e| ConfigError::invalid("api.base_url", e.to_string()))?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::invalid(
				"api.base_url",
				format!("unsupported scheme {:?}", url.scheme()),
			));
		}
		if self.api.timeout.is_zero() {
			return Err(ConfigError::invalid("api.timeout", "must be greater than zero"));
		}
		let retry = &self.query.retry;
		if retry.max_delay < retry.base_delay {
			return Err(ConfigError::invalid(
				"query.retry.max_delay",
				"must not be shorter than query.retry.base_delay",
			));
		}
		Ok(())
	}
}

/// Merges [`ConfigSource`]s by priority and decodes the result
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Add a layer
	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge, decode and validate
	pub fn build(mut self) -> ConfigResult<Settings> {
		self.sources.sort_by_key(|source| source.priority());
		let mut merged = Map::new();
		for source in &self.sources {
			let layer = source.load()?;
			tracing::debug!(source = %source.description(), keys = layer.len(), "Loaded settings layer");
			deep_merge(&mut merged, layer);
		}
		let settings: Settings = serde_json::from_value(Value::Object(merged))?;
		settings.validate()?;
		Ok(settings)
	}
}

impl std::fmt::Debug for SettingsBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let sources: Vec<String> = self.sources.iter().map(|s| s.description()).collect();
		f.debug_struct("SettingsBuilder").field("sources", &sources).finish()
	}
}
