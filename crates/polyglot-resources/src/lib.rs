//! # Polyglot Resources
//!
//! Typed records for every collection the admin panel manages, and
//! [`ResourceApi`], the generic CRUD surface built on the query and mutation
//! hooks.
//!
//! Each collection is a [`Resource`]: it names its endpoint prefix and the
//! cache key its list lives under. Records travel as [`Entity<T>`], an
//! optional server-assigned id next to the flattened resource fields.
//!
//! ```no_run
//! use polyglot_http::ApiClient;
//! use polyglot_i18n::Language;
//! use polyglot_query::QueryClient;
//! use polyglot_resources::{ResourceApi, Tag};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = QueryClient::new(ApiClient::builder().base_url("https://api.example.uz").build()?);
//! let tags = ResourceApi::<Tag>::new(client);
//!
//! let mut draft = tags.new_draft();
//! draft.input("tagName", "Yangilik")?;
//! draft.switch_language(Language::En)?;
//! draft.input("tagName", "News")?;
//! tags.submit(&mut draft).await?;
//!
//! let all = tags.fetch_all().await?;
//! println!("{} tags", all.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod company;
pub mod content;
pub mod error;
pub mod gallery;
pub mod library;
pub mod reference;
pub mod resource;

pub use api::{Draft, ResourceApi};
pub use company::{Partner, Statistics, TeamMember, User};
pub use content::{Blog, News, NewsCategory, Publisher, Tag};
pub use error::{ResourceError, ResourceResult};
pub use gallery::{ImageCategory, ImageModel, OurCategory, PicturesModel};
pub use library::{LibraryResource, OurResource, ResourceCategory};
pub use reference::{BY_CATEGORY_ACTION, Reference, ReferenceApi, ReferenceToBlog, ReferenceToPictures};
pub use resource::{Entity, REQUIRED_MESSAGE, Resource, action_path, require_multilingual};
