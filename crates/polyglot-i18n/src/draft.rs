//! Create/edit drafts of multilingual entities

use crate::error::{DraftError, DraftResult};
use crate::language::Language;
use crate::translatable::Translatable;

/// Lifecycle of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftState {
	/// A new entity, seeded with empty texts
	Creating,
	/// An existing entity, seeded from the server copy
	Editing,
	/// Submitted or dismissed
	Closed,
}

/// The in-progress copy of an entity behind a create or edit form.
///
/// The form shows one language at a time. Switching the language only changes
/// which slot [`input`](Self::input) writes to; text already typed in other
/// languages is never touched. The whole entity, every language included, is
/// what gets submitted.
///
/// ```
/// use polyglot_i18n::{translatable, DraftState, EntityDraft, Language, Multilingual};
///
/// #[derive(Debug, Default, Clone)]
/// struct Tag {
///     tag_name: Multilingual,
/// }
/// translatable!(Tag { tag_name: "tagName" });
///
/// let mut draft = EntityDraft::create(Tag::default());
/// draft.input("tagName", "Yangilik").unwrap();
/// draft.switch_language(Language::En).unwrap();
/// draft.input("tagName", "News").unwrap();
///
/// assert_eq!(draft.entity().tag_name, Multilingual::new("Yangilik", "", "News", ""));
///
/// draft.close();
/// assert_eq!(draft.state(), DraftState::Closed);
/// assert!(draft.input("tagName", "late").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct EntityDraft<E> {
	entity: E,
	state: DraftState,
	language: Language,
}

impl<E: Translatable> EntityDraft<E> {
	/// Draft for a new entity; `blank` is usually `E::default()`
	pub fn create(blank: E) -> Self {
		Self {
			entity: blank,
			state: DraftState::Creating,
			language: Language::default(),
		}
	}

	/// Draft for an existing entity as fetched from the server
	pub fn edit(existing: E) -> Self {
		Self {
			entity: existing,
			state: DraftState::Editing,
			language: Language::default(),
		}
	}

	/// Start editing in `language` instead of the default one
	pub fn in_language(mut self, language: Language) -> Self {
		self.language = language;
		self
	}

	/// Current lifecycle state
	pub fn state(&self) -> DraftState {
		self.state
	}

	/// Whether the draft still accepts input
	pub fn is_open(&self) -> bool {
		self.state != DraftState::Closed
	}

	/// Whether this draft creates a new entity
	pub fn is_creating(&self) -> bool {
		self.state == DraftState::Creating
	}

	/// Language [`input`](Self::input) writes to
	pub fn language(&self) -> Language {
		self.language
	}

	/// Show and edit another language
	pub fn switch_language(&mut self, language: Language) -> DraftResult<()> {
		self.ensure_open()?;
		self.language = language;
		Ok(())
	}

	/// Write `text` into the active language slot of `field`
	pub fn input(&mut self, field: &str, text: impl Into<String>) -> DraftResult<()> {
		self.ensure_open()?;
		let language = self.language;
		let slot = self
			.entity
			.field_mut(field)
			.ok_or_else(|| DraftError::UnknownField(field.to_string()))?;
		slot.set(language, text);
		Ok(())
	}

	/// Active-language text of `field`
	pub fn value(&self, field: &str) -> Option<&str> {
		self.entity
			.field(field)
			.map(|value| value.get(self.language))
	}

	/// The entity as edited so far
	pub fn entity(&self) -> &E {
		&self.entity
	}

	/// Edit the entity's other fields (foreign keys, file ids, ..)
	pub fn entity_mut(&mut self) -> DraftResult<&mut E> {
		self.ensure_open()?;
		Ok(&mut self.entity)
	}

	/// The complete payload to submit
	pub fn payload(&self) -> DraftResult<&E> {
		self.ensure_open()?;
		Ok(&self.entity)
	}

	/// Turn a create draft into an edit draft once the server has stored it
	pub fn mark_saved(&mut self) -> DraftResult<()> {
		match self.state {
			DraftState::Creating => {
				self.state = DraftState::Editing;
				Ok(())
			}
			DraftState::Editing => Ok(()),
			DraftState::Closed => Err(DraftError::InvalidState {
				action: "save",
				state: self.state,
			}),
		}
	}

	/// Stop accepting input
	pub fn close(&mut self) {
		self.state = DraftState::Closed;
	}

	/// Close the draft and take the entity
	pub fn into_entity(self) -> E {
		self.entity
	}

	fn ensure_open(&self) -> DraftResult<()> {
		if self.is_open() {
			Ok(())
		} else {
			Err(DraftError::Closed)
		}
	}
}
