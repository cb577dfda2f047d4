//! Image galleries: categories, single images and picture sets

use crate::api::ResourceApi;
use crate::error::ResourceResult;
use crate::resource::{Resource, action_path, require_multilingual};
use polyglot_http::{EntityId, FileId, ValidationErrors};
use polyglot_i18n::{Multilingual, translatable};
use polyglot_query::{MutationOptions, MutationOutcome};
use serde::{Deserialize, Serialize};

/// Category a picture set belongs to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageCategory {
	/// Category title
	pub category: Multilingual,
}

translatable!(ImageCategory { category: "category" });

impl Resource for ImageCategory {
	const BASE_PATH: &'static str = "/ImageCategory";
	const CACHE_KEY: &'static str = "image-category";
	const NAME: &'static str = "Image category";
}

/// One uploaded image with a caption
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageModel {
	/// Caption, not translated
	pub image_name: String,
	/// Uploaded file
	pub file_id: Option<FileId>,
}

translatable!(ImageModel {});

impl Resource for ImageModel {
	const BASE_PATH: &'static str = "/ImageModel";
	const CACHE_KEY: &'static str = "image-model";
	const NAME: &'static str = "Image";
	const DEPENDENT_KEYS: &'static [&'static str] = &["pictures-model"];

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		if self.file_id.is_none() {
			errors.add("fileId", "an image must be uploaded");
		}
		errors.into_result()
	}
}

/// A set of [`ImageModel`]s shown together under an [`ImageCategory`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PicturesModel {
	/// [`ImageCategory`] id
	pub category_id: Option<EntityId>,
	/// Copy of the category title
	pub category_name: Multilingual,
	/// [`ImageModel`] ids, in display order
	pub images_ids: Vec<EntityId>,
	/// Resolved images as returned by the server
	#[serde(skip_serializing)]
	pub image_models: Vec<crate::Entity<ImageModel>>,
}

translatable!(PicturesModel { category_name: "categoryName" });

impl Resource for PicturesModel {
	const BASE_PATH: &'static str = "/PicturesModel";
	const CACHE_KEY: &'static str = "pictures-model";
	const NAME: &'static str = "Picture set";
	const UPDATE_ACTION: &'static str = "UpdateModel";
	const DEPENDENT_KEYS: &'static [&'static str] = &["reference-to-pictures"];

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_multilingual(self, &mut errors);
		if self.category_id.as_ref().is_none_or(EntityId::is_unassigned) {
			errors.add("categoryId", "a category must be selected");
		}
		errors.into_result()
	}
}

impl ResourceApi<PicturesModel> {
	/// Replace only the image list of the picture set `id`
	pub async fn update_images(
		&self,
		id: impl Into<EntityId>,
		images: &[EntityId],
	) -> ResourceResult<MutationOutcome> {
		let path = format!(
			"{}?picturesModelId={}",
			action_path::<PicturesModel>("UpdateImages"),
			id.into()
		);
		let options = MutationOptions::put(path)
			.invalidates(PicturesModel::CACHE_KEY)
			.success_text("Images updated successfully");
		Ok(self.client().mutation(options).mutate(images).await?)
	}
}

/// Showcase category with its cover pictures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OurCategory {
	/// Category title
	pub name: Multilingual,
	/// Cover picture
	pub pictures_id: Option<FileId>,
	/// All pictures, when the server returns more than the cover
	#[serde(skip_serializing)]
	pub images: Vec<FileId>,
}

translatable!(OurCategory { name: "name" });

impl OurCategory {
	/// Pictures to display: the full list, or just the cover
	pub fn pictures(&self) -> Vec<&FileId> {
		if self.images.is_empty() {
			self.pictures_id.iter().collect()
		} else {
			self.images.iter().collect()
		}
	}
}

impl Resource for OurCategory {
	const BASE_PATH: &'static str = "/OurCategory";
	const CACHE_KEY: &'static str = "ourCategory";
	const NAME: &'static str = "Category";

	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		require_multilingual(self, &mut errors);
		if self.pictures_id.is_none() {
			errors.add("picturesId", "a picture must be uploaded");
		}
		errors.into_result()
	}
}
