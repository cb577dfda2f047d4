//! Signed-in session record

use serde::{Deserialize, Deserializer, Serialize};

/// Storage key holding the raw bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the serialized user descriptor
pub const SESSION_DATA_KEY: &str = "data";

/// The signed-in user of a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
	/// Bearer token sent with every request
	pub token: String,
	/// Server-side identifier of the user
	pub user_id: String,
	/// Display name of the user
	pub user_name: String,
}

impl Session {
	/// Build a session record
	pub fn new(
		token: impl Into<String>,
		user_id: impl Into<String>,
		user_name: impl Into<String>,
	) -> Self {
		Self {
			token: token.into(),
			user_id: user_id.into(),
			user_name: user_name.into(),
		}
	}
}

/// Shape of the `data` entry: `{ "userName": .., "id": .. }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionData {
	pub(crate) user_name: String,
	#[serde(deserialize_with = "string_or_number")]
	pub(crate) id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Text(String),
		Number(serde_json::Number),
	}

	Ok(match Raw::deserialize(deserializer)? {
		Raw::Text(s) => s,
		Raw::Number(n) => n.to_string(),
	})
}
