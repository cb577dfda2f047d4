//! The resource trait and the generic entity record

use polyglot_http::{EntityId, ValidationErrors};
use polyglot_i18n::{Multilingual, Translatable};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Message recorded for a multilingual field with no text in any language
pub const REQUIRED_MESSAGE: &str = "required in at least one language";

/// A server-owned collection the admin panel manages.
///
/// Endpoints are `{BASE_PATH}/{action}`: `GetAll`, `GetById`, `Create`,
/// `Update` and `Delete` unless the resource overrides an action. The list is
/// cached under [`CACHE_KEY`](Self::CACHE_KEY); every write invalidates it.
pub trait Resource:
	Serialize + DeserializeOwned + Translatable + Default + Clone + Send + Sync + 'static
{
	/// Path prefix, e.g. `/Tags`
	const BASE_PATH: &'static str;

	/// Cache key of the list, e.g. `tags`
	const CACHE_KEY: &'static str;

	/// Human name used in notifications
	const NAME: &'static str;

	/// Action that lists the collection
	const LIST_ACTION: &'static str = "GetAll";

	/// Action that loads one record by `?id=`
	const GET_ACTION: &'static str = "GetById";

	/// Action that creates a record
	const CREATE_ACTION: &'static str = "Create";

	/// Action that replaces a record
	const UPDATE_ACTION: &'static str = "Update";

	/// Action that deletes a record by `?id=`
	const DELETE_ACTION: &'static str = "Delete";

	/// Other cache keys whose data embeds this resource
	const DEPENDENT_KEYS: &'static [&'static str] = &[];

	/// Client-side checks run before a create or update is sent.
	///
	/// By default every multilingual field must carry text in at least one
	/// language. Partially translated values are accepted.
	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_multilingual(self, &mut errors);
		errors.into_result()
	}
}

/// Record an error for each multilingual field of `entity` that is blank
pub fn require_multilingual<T: Translatable + ?Sized>(entity: &T, errors: &mut ValidationErrors) {
	for field in entity.blank_fields() {
		errors.add(field, REQUIRED_MESSAGE);
	}
}

/// Record `message` for `field` when `value` is blank
pub(crate) fn require_text(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
	if value.trim().is_empty() {
		errors.add(field, message);
	}
}

/// Path of `action` on resource `R`
pub fn action_path<R: Resource>(action: &str) -> String {
	format!("{}/{}", R::BASE_PATH, action)
}

/// A record of resource `T` as it travels on the wire.
///
/// The identifier is absent while creating; the server assigns it. The
/// resource fields are flattened next to it, and `Entity<T>` dereferences to
/// `T` so they read as if declared here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity<T> {
	/// Server-assigned identifier
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<EntityId>,

	/// Resource-specific fields
	#[serde(flatten)]
	pub fields: T,
}

impl<T> Entity<T> {
	/// A record not yet stored on the server
	pub fn new(fields: T) -> Self {
		Self { id: None, fields }
	}

	/// A stored record
	pub fn with_id(id: impl Into<EntityId>, fields: T) -> Self {
		Self {
			id: Some(id.into()),
			fields,
		}
	}

	/// Assigned identifier, ignoring the `0`/`""` placeholder
	pub fn assigned_id(&self) -> Option<&EntityId> {
		self.id.as_ref().filter(|id| !id.is_unassigned())
	}

	/// Whether the server has stored this record
	pub fn is_persisted(&self) -> bool {
		self.assigned_id().is_some()
	}
}

impl<T> Deref for Entity<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.fields
	}
}

impl<T> DerefMut for Entity<T> {
	fn deref_mut(&mut self) -> &mut T {
		&mut self.fields
	}
}

impl<T: Translatable> Translatable for Entity<T> {
	fn fields(&self) -> Vec<(String, &Multilingual)> {
		self.fields.fields()
	}

	fn field_mut(&mut self, name: &str) -> Option<&mut Multilingual> {
		self.fields.field_mut(name)
	}
}
