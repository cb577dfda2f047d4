//! # Polyglot Conf
//!
//! Settings for the admin data layer, merged from layers in priority order:
//!
//! 1. built-in defaults ([`DefaultSource`])
//! 2. an optional TOML file ([`TomlFileSource`])
//! 3. `POLYGLOT_*` environment variables ([`EnvSource`])
//!
//! ```toml
//! [api]
//! base_url = "https://back.example.uz"
//! timeout = "30s"
//!
//! [query]
//! stale_time = "6m"
//!
//! [query.retry]
//! max_retries = 3
//! base_delay = "1s"
//! max_delay = "30s"
//!
//! [logging]
//! filter = "info,polyglot_query=debug"
//! format = "compact"
//! ```
//!
//! Durations are integers (milliseconds) or strings with a unit (`ms`, `s`,
//! `m`, `h`).

#![warn(missing_docs)]

pub mod duration;
pub mod error;
pub mod settings;
pub mod sources;

pub use error::{ConfigError, ConfigResult};
pub use settings::{
	ApiSettings, LogFormat, LoggingSettings, QuerySettings, RetrySettings, Settings, SettingsBuilder,
};
pub use sources::{ConfigSource, DefaultSource, ENV_PREFIX, EnvSource, TomlFileSource};
