//! Durations in settings files.
//!
//! A duration is written either as an integer number of milliseconds or as a
//! string with a unit: `"1500ms"`, `"30s"`, `"6m"`, `"1h"`.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use std::fmt;
use std::time::Duration;

/// Parse `"30s"`-style text
pub fn parse(text: &str) -> Result<Duration, String> {
	let text = text.trim();
	let split = text
		.find(|c: char| !c.is_ascii_digit())
		.unwrap_or(text.len());
	let (digits, unit) = text.split_at(split);
	let amount: u64 = digits
		.parse()
		.map_err(|_| format!("invalid duration: {:?}", text))?;
	let millis = match unit.trim() {
		"" | "ms" => Some(amount),
		"s" => amount.checked_mul(1_000),
		"m" => amount.checked_mul(60_000),
		"h" => amount.checked_mul(3_600_000),
		other => return Err(format!("unknown duration unit {:?} in {:?}", other, text)),
	};
	millis
		.map(Duration::from_millis)
		.ok_or_else(|| format!("duration out of range: {:?}", text))
}

/// Render as the largest whole unit
pub fn format(duration: &Duration) -> String {
	let millis = duration.as_millis();
	if millis != 0 && millis % 3_600_000 == 0 {
		format!("{}h", millis / 3_600_000)
	} else if millis != 0 && millis % 60_000 == 0 {
		format!("{}m", millis / 60_000)
	} else if millis != 0 && millis % 1_000 == 0 {
		format!("{}s", millis / 1_000)
	} else {
		format!("{}ms", millis)
	}
}

pub(crate) fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&format(duration))
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
	deserializer.deserialize_any(DurationVisitor)
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
	type Value = Duration;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("milliseconds or a string like \"30s\"")
	}

	fn visit_u64<E: de::Error>(self, value: u64) -> Result<Duration, E> {
		Ok(Duration::from_millis(value))
	}

	fn visit_i64<E: de::Error>(self, value: i64) -> Result<Duration, E> {
		u64::try_from(value)
			.map(Duration::from_millis)
			.map_err(|_| E::custom("duration must not be negative"))
	}

	fn visit_str<E: de::Error>(self, value: &str) -> Result<Duration, E> {
		parse(value).map_err(E::custom)
	}
}
