//! Entities with named multilingual fields

use crate::language::Language;
use crate::multilingual::Multilingual;

/// An entity whose multilingual fields can be addressed by name.
///
/// Field names are the wire names (`tagName`, `title`, ..). Most entities
/// implement this with [`translatable!`](crate::translatable); entities with
/// repeated fields implement it by hand.
pub trait Translatable {
	/// Every multilingual field with its name
	fn fields(&self) -> Vec<(String, &Multilingual)>;

	/// Mutable access to the field called `name`
	fn field_mut(&mut self, name: &str) -> Option<&mut Multilingual>;

	/// The field called `name`
	fn field(&self, name: &str) -> Option<&Multilingual> {
		self.fields()
			.into_iter()
			.find(|(field, _)| field == name)
			.map(|(_, value)| value)
	}

	/// Names of fields with no text in any language
	fn blank_fields(&self) -> Vec<String> {
		self.fields()
			.into_iter()
			.filter(|(_, value)| value.is_blank())
			.map(|(name, _)| name)
			.collect()
	}

	/// `(field, language)` pairs without text
	fn missing_translations(&self) -> Vec<(String, Language)> {
		self.fields()
			.into_iter()
			.flat_map(|(name, value)| {
				value
					.missing()
					.into_iter()
					.map(move |language| (name.clone(), language))
			})
			.collect()
	}
}

/// Implement [`Translatable`] for a struct from its multilingual fields.
///
/// Each field is listed with its wire name; lookups accept either the wire
/// name or the Rust field name. `translatable!(Ty {})` declares an entity
/// without multilingual fields.
///
/// ```
/// use polyglot_i18n::{translatable, Language, Multilingual, Translatable};
///
/// #[derive(Default)]
/// struct Partner {
///     name: Multilingual,
///     about: Multilingual,
///     link: String,
/// }
///
/// translatable!(Partner { name: "name", about: "about" });
///
/// let mut partner = Partner::default();
/// partner.field_mut("about").unwrap().set(Language::Ru, "О нас");
/// assert_eq!(partner.field("about").unwrap().ru, "О нас");
/// assert_eq!(partner.blank_fields(), ["name"]);
/// ```
#[macro_export]
macro_rules! translatable {
	($ty:ty {}) => {
		impl $crate::Translatable for $ty {
			fn fields(&self) -> ::std::vec::Vec<(::std::string::String, &$crate::Multilingual)> {
				::std::vec::Vec::new()
			}

			fn field_mut(&mut self, _name: &str) -> ::std::option::Option<&mut $crate::Multilingual> {
				::std::option::Option::None
			}
		}
	};
	($ty:ty { $($field:ident : $wire:literal),+ $(,)? }) => {
		impl $crate::Translatable for $ty {
			fn fields(&self) -> ::std::vec::Vec<(::std::string::String, &$crate::Multilingual)> {
				::std::vec![$(($wire.to_string(), &self.$field)),+]
			}

			#[allow(unreachable_patterns)]
			fn field_mut(&mut self, name: &str) -> ::std::option::Option<&mut $crate::Multilingual> {
				match name {
					$($wire => ::std::option::Option::Some(&mut self.$field),)+
					$(stringify!($field) => ::std::option::Option::Some(&mut self.$field),)+
					_ => ::std::option::Option::None,
				}
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Default)]
	struct Article {
		title: Multilingual,
		short_text: Multilingual,
	}

	translatable!(Article {
		title: "title",
		short_text: "shortText",
	});

	#[rstest]
	#[case("shortText")]
	#[case("short_text")]
	fn test_lookup_by_wire_or_rust_name(#[case] name: &str) {
		let mut article = Article::default();
		article.field_mut(name).unwrap().set(Language::En, "Hi");
		assert_eq!(article.short_text.en, "Hi");
	}

	#[rstest]
	fn test_unknown_field() {
		let mut article = Article::default();
		assert!(article.field_mut("body").is_none());
		assert!(article.field("body").is_none());
	}

	#[rstest]
	fn test_missing_translations_lists_each_gap() {
		let article = Article {
			title: Multilingual::new("a", "b", "c", ""),
			short_text: Multilingual::new("a", "b", "c", "d"),
		};

		assert_eq!(
			article.missing_translations(),
			vec![("title".to_string(), Language::Ger)]
		);
		assert!(article.blank_fields().is_empty());
	}
}
