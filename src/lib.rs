//! # Polyglot Admin
//!
//! Data-access layer for a multilingual content-management admin panel.
//!
//! Every admin screen follows the same loop: a cached query fills a table, the
//! user opens a create or edit draft, every multilingual field is edited in
//! four languages (`uz`, `ru`, `en`, `ger`), and a submit posts the full record
//! and invalidates the cached list so the table refetches.
//!
//! ## Crates
//!
//! - [`storage`]: tab-scoped session storage holding the bearer token
//! - [`http`]: the single API client (bearer injection, envelope unwrapping,
//!   central session expiry, sign-in)
//! - [`query`]: cached reads with a freshness window and retry backoff, and
//!   mutations that invalidate cache keys and raise toasts
//! - [`i18n`]: multilingual fields and entity drafts
//! - [`resources`]: typed records for every admin screen behind one generic
//!   [`ResourceApi`]
//! - [`conf`]: layered settings (defaults, TOML file, `POLYGLOT_*` variables)
//!
//! ## Feature Flags
//!
//! - `logging` (default): [`logging::init`] installs a `tracing-subscriber`
//!   formatter configured from [`LoggingSettings`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use polyglot::{AdminPanel, Credentials, Language, SessionStorage, Settings, Tag};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load("polyglot.toml")?;
//! # #[cfg(feature = "logging")]
//! polyglot::logging::init(&settings.logging)?;
//!
//! let panel = AdminPanel::new(&settings, SessionStorage::in_memory())?;
//! panel.sign_in(&Credentials::new("admin@example.uz", "secret")).await?;
//!
//! let tags = panel.resource::<Tag>();
//! let mut draft = tags.new_draft();
//! draft.input("tagName", "Yangilik")?;
//! draft.switch_language(Language::En)?;
//! draft.input("tagName", "News")?;
//! tags.submit(&mut draft).await?;
//!
//! let all = tags.list().load().await?;
//! # let _ = all;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod panel;

pub use polyglot_conf as conf;
pub use polyglot_http as http;
pub use polyglot_i18n as i18n;
pub use polyglot_query as query;
pub use polyglot_resources as resources;
pub use polyglot_storage as storage;

pub use error::{PanelError, PanelResult};
pub use panel::{AdminPanel, query_config};

pub use polyglot_conf::{LogFormat, LoggingSettings, Settings};
pub use polyglot_http::{ApiClient, ApiError, Credentials, EntityId, FileId, SessionEvent};
pub use polyglot_i18n::{DraftState, EntityDraft, Language, Multilingual, Translatable};
pub use polyglot_query::{
	MutationOptions, MutationOutcome, QueryClient, QueryConfig, RetryPolicy, Toast, ToastKind,
	ToastQueue, Toaster,
};
pub use polyglot_resources::{
	Blog, Draft, Entity, ImageCategory, ImageModel, LibraryResource, News, NewsCategory,
	OurCategory, OurResource, Partner, PicturesModel, Publisher, Reference, ReferenceApi,
	ReferenceToBlog, ReferenceToPictures, Resource, ResourceApi, ResourceCategory, ResourceError,
	Statistics, Tag, TeamMember, User,
};
pub use polyglot_storage::{Session, SessionStorage};
