//! Four-language text values

use crate::language::Language;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::{Index, IndexMut};

/// One text per language.
///
/// Always carries exactly the four slots, so a serialized value is always
/// `{ "uz": .., "ru": .., "en": .., "ger": .. }`. Deserialization goes through
/// [`normalize`], which also accepts the legacy shapes stored by older
/// versions of the panel.
///
/// # Examples
///
/// ```
/// use polyglot_i18n::{Language, Multilingual};
///
/// let mut title = Multilingual::default();
/// title[Language::En] = "News".to_string();
/// title.set(Language::Uz, "Yangilik");
///
/// assert_eq!(title.get(Language::Uz), "Yangilik");
/// assert_eq!(title.missing(), [Language::Ru, Language::Ger]);
///
/// // A flat legacy string lands in the Uzbek slot.
/// let legacy: Multilingual = serde_json::from_str(r#""Sport""#).unwrap();
/// assert_eq!(legacy, Multilingual::new("Sport", "", "", ""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Multilingual {
	/// Uzbek
	pub uz: String,
	/// Russian
	pub ru: String,
	/// English
	pub en: String,
	/// German
	pub ger: String,
}

impl Multilingual {
	/// Build from the four texts, in `uz, ru, en, ger` order
	pub fn new(
		uz: impl Into<String>,
		ru: impl Into<String>,
		en: impl Into<String>,
		ger: impl Into<String>,
	) -> Self {
		Self {
			uz: uz.into(),
			ru: ru.into(),
			en: en.into(),
			ger: ger.into(),
		}
	}

	/// Text in `language`
	pub fn get(&self, language: Language) -> &str {
		&self[language]
	}

	/// Mutable text in `language`
	pub fn get_mut(&mut self, language: Language) -> &mut String {
		&mut self[language]
	}

	/// Replace the text in `language`; the other slots are untouched
	pub fn set(&mut self, language: Language, text: impl Into<String>) {
		self[language] = text.into();
	}

	/// Builder form of [`set`](Self::set)
	pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
		self.set(language, text);
		self
	}

	/// `(language, text)` pairs in tab order
	pub fn iter(&self) -> impl Iterator<Item = (Language, &str)> {
		Language::ALL.into_iter().map(move |language| (language, self.get(language)))
	}

	/// Whether every slot is empty or whitespace
	pub fn is_blank(&self) -> bool {
		self.iter().all(|(_, text)| text.trim().is_empty())
	}

	/// Whether every slot holds text
	pub fn is_complete(&self) -> bool {
		self.missing().is_empty()
	}

	/// Languages whose slot is empty or whitespace
	pub fn missing(&self) -> Vec<Language> {
		self.iter()
			.filter(|(_, text)| text.trim().is_empty())
			.map(|(language, _)| language)
			.collect()
	}

	/// Text in `language`, falling back to the first non-empty slot
	pub fn resolve(&self, language: Language) -> &str {
		let preferred = self.get(language);
		if !preferred.trim().is_empty() {
			return preferred;
		}
		self.iter()
			.map(|(_, text)| text)
			.find(|text| !text.trim().is_empty())
			.unwrap_or(preferred)
	}
}

impl Index<Language> for Multilingual {
	type Output = String;

	fn index(&self, language: Language) -> &String {
		match language {
			Language::Uz => &self.uz,
			Language::Ru => &self.ru,
			Language::En => &self.en,
			Language::Ger => &self.ger,
		}
	}
}

impl IndexMut<Language> for Multilingual {
	fn index_mut(&mut self, language: Language) -> &mut String {
		match language {
			Language::Uz => &mut self.uz,
			Language::Ru => &mut self.ru,
			Language::En => &mut self.en,
			Language::Ger => &mut self.ger,
		}
	}
}

impl From<Value> for Multilingual {
	fn from(value: Value) -> Self {
		normalize(&value)
	}
}

impl From<&str> for Multilingual {
	/// A single text, stored in the Uzbek slot
	fn from(text: &str) -> Self {
		Self {
			uz: text.to_string(),
			..Self::default()
		}
	}
}

/// Bring any stored shape of a multilingual value to the four-slot form.
///
/// - object: each of `uz`, `ru`, `en`, `ger` is read; absent or `null` slots
///   become `""`, numbers and booleans are stringified, other keys are ignored
/// - string: legacy single-language value, placed in the `uz` slot
/// - `null`: all slots empty
/// - number or boolean: stringified into the `uz` slot
/// - anything else: all slots empty
pub fn normalize(value: &Value) -> Multilingual {
	match value {
		Value::Object(map) => {
			let slot = |language: Language| map.get(language.code()).map(scalar_text).unwrap_or_default();
			Multilingual {
				uz: slot(Language::Uz),
				ru: slot(Language::Ru),
				en: slot(Language::En),
				ger: slot(Language::Ger),
			}
		}
		Value::String(text) => Multilingual::from(text.as_str()),
		Value::Number(_) | Value::Bool(_) => Multilingual::from(scalar_text(value).as_str()),
		Value::Null => Multilingual::default(),
		Value::Array(_) => {
			tracing::debug!("Ignoring array where a multilingual value was expected");
			Multilingual::default()
		}
	}
}

fn scalar_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		Value::Number(n) => n.to_string(),
		Value::Bool(b) => b.to_string(),
		_ => String::new(),
	}
}
