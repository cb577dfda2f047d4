//! Links between categories and content (blog posts, picture sets)

use crate::api::{ResourceApi, decode};
use crate::error::ResourceResult;
use crate::resource::{Entity, Resource, action_path};
use futures::future::try_join_all;
use polyglot_http::{EntityId, ValidationErrors};
use polyglot_i18n::translatable;
use polyglot_query::QueryClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::ops::Deref;

/// Action listing the references of one category (`?id=`)
pub const BY_CATEGORY_ACTION: &str = "GetReferencesByCategoryIds";

/// A resource linking a category to some content
pub trait Reference: Resource {
	/// Category the link belongs to
	fn category_id(&self) -> Option<&EntityId>;
}

/// Places a blog post under a category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferenceToBlog {
	/// Category id
	pub category_id: Option<EntityId>,
	/// [`Blog`](crate::Blog) id
	pub blog_id: Option<EntityId>,
	/// Resolved blog post, on expanded reads
	#[serde(skip_serializing)]
	pub blog: Option<Value>,
	/// Resolved categories, on expanded reads
	#[serde(skip_serializing)]
	pub categories: Vec<Value>,
}

translatable!(ReferenceToBlog {});

impl Resource for ReferenceToBlog {
	const BASE_PATH: &'static str = "/ReferenceToBlog";
	const CACHE_KEY: &'static str = "reference-to-blog";
	const NAME: &'static str = "Reference";
	const UPDATE_ACTION: &'static str = "UpdateModel";

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_id(&mut errors, "categoryId", self.category_id.as_ref());
		require_id(&mut errors, "blogId", self.blog_id.as_ref());
		errors.into_result()
	}
}

impl Reference for ReferenceToBlog {
	fn category_id(&self) -> Option<&EntityId> {
		self.category_id.as_ref()
	}
}

/// Places a [`PicturesModel`](crate::PicturesModel) under a category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferenceToPictures {
	/// Category id
	pub category_id: Option<EntityId>,
	/// Picture set id
	pub pictures_model_id: Option<EntityId>,
	/// Download links of the pictures, on expanded reads
	#[serde(skip_serializing)]
	pub download_links: Vec<String>,
}

translatable!(ReferenceToPictures {});

impl Resource for ReferenceToPictures {
	const BASE_PATH: &'static str = "/ReferenceToPictures";
	const CACHE_KEY: &'static str = "reference-to-pictures";
	const NAME: &'static str = "Reference";

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_id(&mut errors, "categoryId", self.category_id.as_ref());
		require_id(&mut errors, "picturesModelId", self.pictures_model_id.as_ref());
		errors.into_result()
	}
}

impl Reference for ReferenceToPictures {
	fn category_id(&self) -> Option<&EntityId> {
		self.category_id.as_ref()
	}
}

fn require_id(errors: &mut ValidationErrors, field: &str, id: Option<&EntityId>) {
	if id.is_none_or(EntityId::is_unassigned) {
		errors.add(field, "must be selected");
	}
}

/// [`ResourceApi`] for a reference resource, plus the per-category reads
#[derive(Debug, Clone)]
pub struct ReferenceApi<R> {
	resources: ResourceApi<R>,
}

impl<R: Reference> ReferenceApi<R> {
	/// Reference access over `client`
	pub fn new(client: QueryClient) -> Self {
		Self {
			resources: ResourceApi::new(client),
		}
	}

	/// Expanded references of one category, always from the network
	pub async fn by_category(&self, category_id: impl Into<EntityId>) -> ResourceResult<Vec<Entity<R>>> {
		let category_id = category_id.into();
		let path = action_path::<R>(BY_CATEGORY_ACTION);
		let query = [("id", category_id.to_string())];
		let client = self.resources.client();
		let envelope = client
			.config()
			.retry
			.run(|| client.api().get_query(&path, &query))
			.await?;
		tracing::debug!(path = %path, category = %category_id, "Loaded references by category");
		match envelope.into_content() {
			Some(Value::Null) | None => Ok(Vec::new()),
			Some(data) => Ok(decode(data)?),
		}
	}

	/// Expand plain references into their full form, one request per distinct
	/// category, in order of first appearance
	pub async fn expand(&self, references: &[Entity<R>]) -> ResourceResult<Vec<Entity<R>>> {
		let mut seen = HashSet::new();
		let categories: Vec<&EntityId> = references
			.iter()
			.filter_map(|reference| reference.category_id())
			.filter(|id| seen.insert(*id))
			.collect();
		let expanded = try_join_all(categories.into_iter().map(|id| self.by_category(id.clone()))).await?;
		Ok(expanded.into_iter().flatten().collect())
	}
}

impl<R> Deref for ReferenceApi<R> {
	type Target = ResourceApi<R>;

	fn deref(&self) -> &ResourceApi<R> {
		&self.resources
	}
}
