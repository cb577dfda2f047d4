//! # Polyglot Storage
//!
//! Tab-scoped key/value storage for the admin panel.
//!
//! A [`SessionStorage`] behaves like the browser's `sessionStorage`: it lives as
//! long as the tab (here: the storage instance and its clones), is never shared
//! with another tab, and stores plain strings. Structured values are written as
//! JSON text and decoded by the caller.
//!
//! The adapter holds two well-known entries:
//!
//! - `token`: the bearer token returned by sign-in, stored raw
//! - `data`: `{ "userName": .., "id": .. }` describing the signed-in user
//!
//! ## Example
//!
//! ```
//! use polyglot_storage::{Session, SessionStorage};
//!
//! let storage = SessionStorage::in_memory();
//! storage.save_session(&Session::new("t0k3n", "1", "admin")).unwrap();
//!
//! assert_eq!(storage.token().as_deref(), Some("t0k3n"));
//! assert_eq!(storage.session().unwrap().user_name, "admin");
//!
//! storage.clear();
//! assert!(storage.token().is_none());
//! ```

#![warn(missing_docs)]

mod backend;
mod error;
mod session;
mod session_storage;

pub use backend::{MemoryStorage, Storage};
pub use error::{StorageError, StorageResult};
pub use session::{SESSION_DATA_KEY, Session, TOKEN_KEY};
pub use session_storage::SessionStorage;
