//! Configuration sources for layered settings.
//!
//! Sources are merged in priority order (environment > TOML file >
//! defaults). Each one produces a partial JSON object; nested objects are
//! merged key by key, so a file that only sets `api.base_url` keeps the
//! default `api.timeout`.

use crate::error::{ConfigError, ConfigResult};
use crate::settings::Settings;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// Prefix of the environment variables read by [`EnvSource`]
pub const ENV_PREFIX: &str = "POLYGLOT_";

/// A layer of settings
pub trait ConfigSource: Send + Sync {
	/// Load this layer as a (possibly partial) settings object
	fn load(&self) -> ConfigResult<Map<String, Value>>;

	/// Higher wins
	fn priority(&self) -> u8;

	/// For logs
	fn description(&self) -> String;
}

/// The built-in defaults
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSource;

impl ConfigSource for DefaultSource {
	fn load(&self) -> ConfigResult<Map<String, Value>> {
		match serde_json::to_value(Settings::default())? {
			Value::Object(map) => Ok(map),
			_ => Ok(Map::new()),
		}
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Defaults".to_string()
	}
}

/// A TOML settings file; a missing file contributes nothing
#[derive(Debug, Clone)]
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// Source reading `path`
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> ConfigResult<Map<String, Value>> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "Settings file not found, skipping");
			return Ok(Map::new());
		}

		let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
			path: self.path.clone(),
			source,
		})?;
		let table: Map<String, Value> = toml::from_str(&content).map_err(|source| ConfigError::Toml {
			path: self.path.clone(),
			source,
		})?;
		Ok(table)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

// Environment name (after the prefix) -> dotted settings key
const ENV_KEYS: &[(&str, &str)] = &[
	("API_URL", "api.base_url"),
	("API_BASE_URL", "api.base_url"),
	("API_TIMEOUT", "api.timeout"),
	("API_USER_AGENT", "api.user_agent"),
	("QUERY_STALE_TIME", "query.stale_time"),
	("QUERY_RETRY_MAX_RETRIES", "query.retry.max_retries"),
	("QUERY_RETRY_BASE_DELAY", "query.retry.base_delay"),
	("QUERY_RETRY_MAX_DELAY", "query.retry.max_delay"),
	("LOG", "logging.filter"),
	("LOG_FILTER", "logging.filter"),
	("LOG_FORMAT", "logging.format"),
];

/// `POLYGLOT_*` environment variables.
///
/// | Variable | Key |
/// |---|---|
/// | `POLYGLOT_API_URL`, `POLYGLOT_API_BASE_URL` | `api.base_url` |
/// | `POLYGLOT_API_TIMEOUT` | `api.timeout` |
/// | `POLYGLOT_API_USER_AGENT` | `api.user_agent` |
/// | `POLYGLOT_QUERY_STALE_TIME` | `query.stale_time` |
/// | `POLYGLOT_QUERY_RETRY_MAX_RETRIES` | `query.retry.max_retries` |
/// | `POLYGLOT_QUERY_RETRY_BASE_DELAY` | `query.retry.base_delay` |
/// | `POLYGLOT_QUERY_RETRY_MAX_DELAY` | `query.retry.max_delay` |
/// | `POLYGLOT_LOG`, `POLYGLOT_LOG_FILTER` | `logging.filter` |
/// | `POLYGLOT_LOG_FORMAT` | `logging.format` |
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// Read the process environment
	pub fn new() -> Self {
		Self::default()
	}

	/// Read the given variables instead of the process environment
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
		}
	}

	fn vars(&self) -> Vec<(String, String)> {
		match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		}
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> ConfigResult<Map<String, Value>> {
		let mut config = Map::new();
		for (name, raw) in self.vars() {
			let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
				continue;
			};
			let Some((_, key)) = ENV_KEYS.iter().find(|(env, _)| *env == suffix) else {
				tracing::debug!(variable = %name, "Ignoring unknown settings variable");
				continue;
			};
			insert_dotted(&mut config, key, env_value(key, raw));
		}
		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", ENV_PREFIX)
	}
}

fn env_value(key: &str, raw: String) -> Value {
	if key == "query.retry.max_retries"
		&& let Ok(n) = raw.trim().parse::<u64>()
	{
		return Value::from(n);
	}
	Value::String(raw)
}

fn insert_dotted(config: &mut Map<String, Value>, key: &str, value: Value) {
	match key.split_once('.') {
		None => {
			config.insert(key.to_string(), value);
		}
		Some((head, rest)) => {
			let child = config
				.entry(head.to_string())
				.or_insert_with(|| Value::Object(Map::new()));
			if !child.is_object() {
				*child = Value::Object(Map::new());
			}
			if let Value::Object(child) = child {
				insert_dotted(child, rest, value);
			}
		}
	}
}

/// Merge `overlay` into `base`, recursing into objects
pub(crate) fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
	for (key, value) in overlay {
		match (base.get_mut(&key), value) {
			(Some(Value::Object(existing)), Value::Object(incoming)) => deep_merge(existing, incoming),
			(_, value) => {
				base.insert(key, value);
			}
		}
	}
}
