//! Server response envelope and structured validation errors

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Uniform wrapper around every API response:
/// `{ id, code, content, error, total, modelStateError }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T = Value> {
	/// Request or record identifier echoed by the server
	#[serde(default)]
	pub id: Option<Value>,
	/// Application status code
	#[serde(default)]
	pub code: Option<i64>,
	/// The usable payload
	#[serde(default = "Option::default")]
	pub content: Option<T>,
	/// Error description, `null` on success
	#[serde(default)]
	pub error: Option<Value>,
	/// Total number of records for list endpoints
	#[serde(default)]
	pub total: Option<u64>,
	/// Field-level validation failures
	#[serde(default)]
	pub model_state_error: Option<Value>,
}

impl<T> Envelope<T> {
	/// Envelope with only a payload
	pub fn with_content(content: T) -> Self {
		Self {
			id: None,
			code: None,
			content: Some(content),
			error: None,
			total: None,
			model_state_error: None,
		}
	}

	/// Unwrap the payload
	pub fn into_content(self) -> Option<T> {
		self.content
	}

	/// Whether the server reported an error
	pub fn is_error(&self) -> bool {
		matches!(&self.error, Some(e) if !e.is_null())
	}

	/// Human-readable error description, if any
	pub fn error_message(&self) -> Option<String> {
		self.error.as_ref().and_then(message_of)
	}

	/// Structured validation failures, if the server sent any
	pub fn validation_errors(&self) -> Option<ValidationErrors> {
		self.model_state_error
			.as_ref()
			.map(ValidationErrors::from_model_state)
			.filter(|errors| !errors.is_empty())
	}
}

impl Envelope<Value> {
	/// Empty envelope (used for bodiless 2xx responses)
	pub fn empty() -> Self {
		Self {
			id: None,
			code: None,
			content: None,
			error: None,
			total: None,
			model_state_error: None,
		}
	}

	/// Decode the payload into a typed envelope
	pub fn decode<T: DeserializeOwned>(self) -> Result<Envelope<T>, serde_json::Error> {
		let content = match self.content {
			Some(value) => Some(serde_json::from_value(value)?),
			None => None,
		};
		Ok(Envelope {
			id: self.id,
			code: self.code,
			content,
			error: self.error,
			total: self.total,
			model_state_error: self.model_state_error,
		})
	}
}

/// Extract a message from an error value (string, `{message}` object, or anything else)
pub(crate) fn message_of(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(s) => Some(s.clone()),
		Value::Object(map) => ["message", "errorMessage", "title", "detail"]
			.iter()
			.find_map(|k| map.get(*k).and_then(Value::as_str))
			.map(str::to_string)
			.or_else(|| Some(value.to_string())),
		other => Some(other.to_string()),
	}
}

/// Field name -> messages, as reported by the server or by client-side checks.
///
/// The empty field name `""` collects errors that do not belong to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
	fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
	/// No errors
	pub fn new() -> Self {
		Self::default()
	}

	/// Record an error for `field`
	pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.fields
			.entry(field.into())
			.or_default()
			.push(message.into());
	}

	/// Builder form of [`add`](Self::add)
	pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
		self.add(field, message);
		self
	}

	/// Messages recorded for `field`
	pub fn field(&self, field: &str) -> &[String] {
		self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Iterate over `(field, messages)` pairs
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}

	/// Whether no error was recorded
	pub fn is_empty(&self) -> bool {
		self.fields.values().all(Vec::is_empty)
	}

	/// Turn into a `Result`
	pub fn into_result(self) -> Result<(), Self> {
		if self.is_empty() { Ok(()) } else { Err(self) }
	}

	/// Parse the server's `modelStateError` value.
	///
	/// Accepted shapes:
	/// - `{ "Title": ["required"], "Email": "invalid" }`
	/// - `[{ "key": "Title", "errors": ["required"] }]` (also `field`,
	///   `propertyName`, `message`, `errorMessage`)
	/// - a bare string, recorded under `""`
	pub fn from_model_state(value: &Value) -> Self {
		let mut errors = Self::new();
		match value {
			Value::Object(map) => {
				for (field, messages) in map {
					for message in messages_of(messages) {
						errors.add(field.clone(), message);
					}
				}
			}
			Value::Array(items) => {
				for item in items {
					let field = ["key", "field", "propertyName", "memberName"]
						.iter()
						.find_map(|k| item.get(*k).and_then(Value::as_str))
						.unwrap_or_default()
						.to_string();
					let messages = match item {
						Value::Object(map) => ["errors", "message", "errorMessage"]
							.iter()
							.find_map(|k| map.get(*k))
							.map(messages_of)
							.unwrap_or_default(),
						other => messages_of(other),
					};
					for message in messages {
						errors.add(field.clone(), message);
					}
				}
			}
			Value::Null => {}
			other => {
				for message in messages_of(other) {
					errors.add("", message);
				}
			}
		}
		errors
	}
}

fn messages_of(value: &Value) -> Vec<String> {
	match value {
		Value::Array(items) => items.iter().filter_map(message_of).collect(),
		other => message_of(other).into_iter().collect(),
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for (field, messages) in self.iter() {
			for message in messages {
				if !first {
					f.write_str("; ")?;
				}
				first = false;
				if field.is_empty() {
					f.write_str(message)?;
				} else {
					write!(f, "{}: {}", field, message)?;
				}
			}
		}
		Ok(())
	}
}
