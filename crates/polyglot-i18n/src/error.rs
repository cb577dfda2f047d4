//! Error types for multilingual editing

use crate::draft::DraftState;
use thiserror::Error;

/// A language code outside `uz`, `ru`, `en`, `ger`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language code: {0}")]
pub struct UnknownLanguage(pub String);

/// Errors raised while editing an entity draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
	/// The draft was submitted or dismissed and accepts no more input
	#[error("draft is closed")]
	Closed,

	/// The entity has no multilingual field with this name
	#[error("unknown multilingual field: {0}")]
	UnknownField(String),

	/// The operation is not valid in the draft's current state
	#[error("cannot {action} a draft that is {state:?}")]
	InvalidState {
		/// What was attempted
		action: &'static str,
		/// State the draft was in
		state: DraftState,
	},
}

/// Result type for draft operations
pub type DraftResult<T> = Result<T, DraftError>;
