//! Downloadable documents

use crate::resource::{Resource, require_multilingual};
use polyglot_http::{EntityId, FileId, ValidationErrors};
use polyglot_i18n::{Language, Multilingual, translatable};
use serde::{Deserialize, Serialize};

/// Category of the document library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceCategory {
	/// Category title
	pub category_name: Multilingual,
}

translatable!(ResourceCategory { category_name: "categoryName" });

impl Resource for ResourceCategory {
	const BASE_PATH: &'static str = "/ResourceCategory";
	const CACHE_KEY: &'static str = "resource-category";
	const NAME: &'static str = "Resource category";
	const DEPENDENT_KEYS: &'static [&'static str] = &["resource"];
}

/// Document published on the public "our resources" page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OurResource {
	/// Title
	pub title: Multilingual,
	/// Description
	pub description: Multilingual,
	/// Uploaded document
	pub file_id: Option<FileId>,
	/// Original file name, reported by the server
	#[serde(skip_serializing)]
	pub file_name: Option<String>,
}

translatable!(OurResource {
	title: "title",
	description: "description",
});

impl Resource for OurResource {
	const BASE_PATH: &'static str = "/OurResources";
	const CACHE_KEY: &'static str = "ourResources";
	const NAME: &'static str = "Resource";
}

/// Library document with a separate file per language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LibraryResource {
	/// Display name of the document
	pub file_name: Multilingual,
	/// Subject line
	pub subject: Multilingual,
	/// [`ResourceCategory`] id
	pub resource_category_id: Option<EntityId>,
	/// ISO-8601 publication timestamp
	pub published_date: String,
	/// Uzbek file
	#[serde(rename = "fileIdUZ", skip_serializing_if = "Option::is_none")]
	pub file_id_uz: Option<FileId>,
	/// Russian file
	#[serde(rename = "fileIdRU", skip_serializing_if = "Option::is_none")]
	pub file_id_ru: Option<FileId>,
	/// English file
	#[serde(rename = "fileIdEN", skip_serializing_if = "Option::is_none")]
	pub file_id_en: Option<FileId>,
	/// German file
	#[serde(rename = "fileIdGER", skip_serializing_if = "Option::is_none")]
	pub file_id_ger: Option<FileId>,
	/// Extension or MIME type of the last uploaded file
	pub file_type: String,
	/// Human-readable size of each file
	pub size: Multilingual,
}

translatable!(LibraryResource {
	file_name: "fileName",
	subject: "subject",
});

impl LibraryResource {
	/// File uploaded for `language`
	pub fn file(&self, language: Language) -> Option<&FileId> {
		match language {
			Language::Uz => self.file_id_uz.as_ref(),
			Language::Ru => self.file_id_ru.as_ref(),
			Language::En => self.file_id_en.as_ref(),
			Language::Ger => self.file_id_ger.as_ref(),
		}
	}

	/// Attach the file uploaded for `language`
	pub fn set_file(&mut self, language: Language, file: FileId) {
		let slot = match language {
			Language::Uz => &mut self.file_id_uz,
			Language::Ru => &mut self.file_id_ru,
			Language::En => &mut self.file_id_en,
			Language::Ger => &mut self.file_id_ger,
		};
		*slot = Some(file);
	}
}

impl Resource for LibraryResource {
	const BASE_PATH: &'static str = "/Resource";
	const CACHE_KEY: &'static str = "resource";
	const NAME: &'static str = "Resource";

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_multilingual(self, &mut errors);
		if self.resource_category_id.is_none() {
			errors.add("resourceCategoryId", "a category must be selected");
		}
		if Language::ALL.iter().all(|language| self.file(*language).is_none()) {
			errors.add("fileIdUZ", "at least one file must be uploaded");
		}
		errors.into_result()
	}
}
