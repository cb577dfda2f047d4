//! # Polyglot HTTP
//!
//! The single HTTP client every admin screen talks through.
//!
//! ## Request and response policy
//!
//! - Every request is built against one configured base URL.
//! - A bearer token found in [`SessionStorage`](polyglot_storage::SessionStorage)
//!   is attached as `Authorization: Bearer <token>`. Without a token the request
//!   goes out unauthenticated and the server decides.
//! - The server wraps every payload in an [`Envelope`]; callers unwrap
//!   `content`.
//! - A `401` ends the session in one place: storage is cleared and a
//!   [`SessionEvent::Expired`] is broadcast to whoever listens (usually the
//!   screen that redirects to sign-in).
//!
//! ## Example
//!
//! ```rust,no_run
//! use polyglot_http::{ApiClient, Credentials};
//! use polyglot_storage::SessionStorage;
//!
//! # async fn example() -> Result<(), polyglot_http::ApiError> {
//! let client = ApiClient::builder()
//!     .base_url("https://api.example.com")
//!     .storage(SessionStorage::in_memory())
//!     .build()?;
//!
//! client.sign_in(&Credentials::new("admin@example.com", "secret")).await?;
//!
//! let tags: serde_json::Value = client
//!     .get("/Tags/GetAll")
//!     .await?
//!     .into_content()
//!     .unwrap_or_default();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod events;
pub mod id;
pub mod upload;

pub use auth::{Credentials, SIGN_IN_PATH, SignInContent};
pub use client::{ApiClient, ApiClientBuilder};
pub use envelope::{Envelope, ValidationErrors};
pub use error::{ApiError, ApiResult};
pub use events::SessionEvent;
pub use id::{EntityId, FileId};
pub use reqwest::Method;
pub use upload::{DOWNLOAD_PATH, UPLOAD_PATH, UploadFile, UploadedFile};
