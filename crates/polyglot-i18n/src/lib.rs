//! # Polyglot i18n
//!
//! Every human-readable field in the admin panel carries text in four
//! languages: Uzbek, Russian, English and German. This crate holds the value
//! type for such fields and the draft used by create/edit forms.
//!
//! ## Multilingual values
//!
//! [`Multilingual`] always has all four slots. Values written by older
//! versions of the panel may be a plain string, `null` or an object with some
//! keys missing; [`normalize`] (and therefore deserialization) turns each of
//! them into the four-slot form without failing.
//!
//! ## Drafts
//!
//! [`EntityDraft`] wraps the entity behind a form. The form edits one
//! [`Language`] at a time and switching languages never discards what was
//! typed in another one.

#![warn(missing_docs)]

pub mod draft;
pub mod error;
pub mod language;
pub mod multilingual;
pub mod translatable;

pub use draft::{DraftState, EntityDraft};
pub use error::{DraftError, DraftResult, UnknownLanguage};
pub use language::Language;
pub use multilingual::{Multilingual, normalize};
pub use translatable::Translatable;
