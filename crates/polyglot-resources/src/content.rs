//! Editorial content: news, blog posts and what they are classified by

use crate::resource::{Resource, require_multilingual, require_text};
use polyglot_http::{EntityId, FileId, ValidationErrors};
use polyglot_i18n::{Multilingual, translatable};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form label attached to news and blog posts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tag {
	/// Label text
	pub tag_name: Multilingual,
}

translatable!(Tag { tag_name: "tagName" });

impl Resource for Tag {
	const BASE_PATH: &'static str = "/Tags";
	const CACHE_KEY: &'static str = "tags";
	const NAME: &'static str = "Tag";
}

/// Category news and blog posts are filed under
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsCategory {
	/// Category title
	pub category_name: Multilingual,
}

translatable!(NewsCategory { category_name: "categoryName" });

impl Resource for NewsCategory {
	const BASE_PATH: &'static str = "/NewsCategory";
	const CACHE_KEY: &'static str = "categories";
	const NAME: &'static str = "Category";
}

/// Author or outlet credited on a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Publisher {
	/// Display name, not translated
	pub name: String,
	/// Uploaded logo or portrait
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image_id: Option<FileId>,
}

translatable!(Publisher {});

impl Resource for Publisher {
	const BASE_PATH: &'static str = "/Publisher";
	const CACHE_KEY: &'static str = "publishers";
	const NAME: &'static str = "Publisher";

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_text(&mut errors, "name", &self.name, "required");
		if self.image_id.is_none() {
			errors.add("imageId", "an image must be uploaded");
		}
		errors.into_result()
	}
}

/// A news article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct News {
	/// Short lead line
	pub subject: Multilingual,
	/// Headline
	pub title: Multilingual,
	/// Body
	pub text: Multilingual,
	/// [`NewsCategory`] ids
	pub categories: Vec<EntityId>,
	/// [`Tag`] ids
	pub tags: Vec<EntityId>,
	/// Uploaded pictures, in display order
	pub images: Vec<FileId>,
	/// Estimated reading time as entered (e.g. `5 min`)
	pub reading_time: String,
	/// ISO-8601 publication timestamp
	pub published_date: String,
	/// [`Publisher`] id
	pub publisher_id: Option<EntityId>,
}

translatable!(News {
	subject: "subject",
	title: "title",
	text: "text",
});

impl Resource for News {
	const BASE_PATH: &'static str = "/News";
	const CACHE_KEY: &'static str = "news";
	const NAME: &'static str = "News";

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_multilingual(self, &mut errors);
		validate_post(&mut errors, self.publisher_id.as_ref(), &self.published_date);
		errors.into_result()
	}
}

/// A blog post.
///
/// Same shape as [`News`] on writes. On reads the server also embeds the
/// resolved categories and tags, kept in [`categories`](Self::categories) and
/// [`tags`](Self::tags) but never sent back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Blog {
	/// Short lead line
	pub subject: Multilingual,
	/// Headline
	pub title: Multilingual,
	/// Body
	pub text: Multilingual,
	/// [`NewsCategory`] ids
	pub categories_ids: Vec<EntityId>,
	/// [`Tag`] ids
	pub tags_ids: Vec<EntityId>,
	/// Embedded categories as returned by the server
	#[serde(skip_serializing)]
	pub categories: Vec<Value>,
	/// Embedded tags as returned by the server
	#[serde(skip_serializing)]
	pub tags: Vec<Value>,
	/// Uploaded pictures, in display order
	pub images: Vec<FileId>,
	/// Estimated reading time as entered
	pub reading_time: String,
	/// ISO-8601 publication timestamp
	pub published_date: String,
	/// [`Publisher`] id
	pub publisher_id: Option<EntityId>,
}

translatable!(Blog {
	subject: "subject",
	title: "title",
	text: "text",
});

impl Resource for Blog {
	const BASE_PATH: &'static str = "/Blog";
	const CACHE_KEY: &'static str = "blog";
	const NAME: &'static str = "Blog post";
	const DEPENDENT_KEYS: &'static [&'static str] = &["reference-to-blog"];

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_multilingual(self, &mut errors);
		validate_post(&mut errors, self.publisher_id.as_ref(), &self.published_date);
		errors.into_result()
	}
}

fn validate_post(errors: &mut ValidationErrors, publisher: Option<&EntityId>, published: &str) {
	if publisher.is_none_or(EntityId::is_unassigned) {
		errors.add("publisherId", "a publisher must be selected");
	}
	require_text(errors, "publishedDate", published, "required");
}
