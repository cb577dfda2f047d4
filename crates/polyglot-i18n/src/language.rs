//! Content languages

use crate::error::UnknownLanguage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language every multilingual field carries a slot for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
	/// Uzbek, the default editing language
	#[default]
	Uz,
	/// Russian
	Ru,
	/// English
	En,
	/// German
	Ger,
}

impl Language {
	/// Every language, in tab order
	pub const ALL: [Language; 4] = [Language::Uz, Language::Ru, Language::En, Language::Ger];

	/// Wire code (`uz`, `ru`, `en`, `ger`)
	pub fn code(self) -> &'static str {
		match self {
			Self::Uz => "uz",
			Self::Ru => "ru",
			Self::En => "en",
			Self::Ger => "ger",
		}
	}
}

impl fmt::Display for Language {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

impl FromStr for Language {
	type Err = UnknownLanguage;

	/// Parse a wire code; `de` is accepted as an alias of `ger`
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"uz" => Ok(Self::Uz),
			"ru" => Ok(Self::Ru),
			"en" => Ok(Self::En),
			"ger" | "de" => Ok(Self::Ger),
			_ => Err(UnknownLanguage(s.to_string())),
		}
	}
}
