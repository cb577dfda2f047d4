//! Identifiers used on the wire

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a content entity.
///
/// The API mixes numeric and string identifiers, so both are accepted. A new
/// entity has no identifier yet (or `0`); the server assigns one on create.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
	/// Numeric identifier
	Int(i64),
	/// String identifier (GUIDs and the like)
	Text(String),
}

impl EntityId {
	/// Whether this is the "not yet assigned" placeholder (`0` or `""`)
	pub fn is_unassigned(&self) -> bool {
		match self {
			Self::Int(n) => *n == 0,
			Self::Text(s) => s.is_empty() || s == "0",
		}
	}

	/// Numeric value, if the identifier is numeric or a numeric string
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Int(n) => Some(*n),
			Self::Text(s) => s.parse().ok(),
		}
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(n) => write!(f, "{}", n),
			Self::Text(s) => f.write_str(s),
		}
	}
}

impl From<i64> for EntityId {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for EntityId {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<u32> for EntityId {
	fn from(value: u32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<&str> for EntityId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for EntityId {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

/// Opaque identifier of an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
	/// Wrap a raw identifier
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Raw identifier
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for FileId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for FileId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for FileId {
	fn from(value: String) -> Self {
		Self(value)
	}
}
