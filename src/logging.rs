//! Log output for applications embedding the panel.
//!
//! Call [`init`] once at startup. `RUST_LOG`, when set, replaces the filter
//! from [`LoggingSettings`].

use crate::error::{PanelError, PanelResult};
use polyglot_conf::{LogFormat, LoggingSettings};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Install a global `tracing` subscriber
pub fn init(settings: &LoggingSettings) -> PanelResult<()> {
	let directive = std::env::var("RUST_LOG")
		.ok()
		.filter(|value| !value.trim().is_empty())
		.unwrap_or_else(|| settings.filter.clone());
	let filter = env_filter(&directive)?;

	let registry = tracing_subscriber::registry().with(filter);
	let installed = match settings.format {
		LogFormat::Pretty => registry
			.with(tracing_subscriber::fmt::layer().pretty().with_target(true))
			.try_init(),
		LogFormat::Compact => registry
			.with(tracing_subscriber::fmt::layer().compact().with_target(true))
			.try_init(),
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json().with_current_span(false))
			.try_init(),
	};
	installed.map_err(|e| PanelError::LoggingInstalled(e.to_string()))?;

	tracing::debug!(filter = %directive, format = ?settings.format, "Logging initialized");
	Ok(())
}

/// Parse a filter directive such as `info,polyglot_query=debug`
pub fn env_filter(directive: &str) -> PanelResult<EnvFilter> {
	EnvFilter::try_new(directive).map_err(|e| PanelError::LogFilter {
		filter: directive.to_string(),
		message: e.to_string(),
	})
}
