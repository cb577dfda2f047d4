//! # Polyglot Query
//!
//! Read and write hooks for the admin REST resources.
//!
//! - [`Query`] loads a resource by path and caches the unwrapped `content`
//!   under a logical key. Within the freshness window (six minutes by default)
//!   a load is served from cache; [`Query::refetch`] always goes to the
//!   network. Transient failures are retried with exponential backoff.
//! - [`Mutation`] posts, puts or deletes. On success it invalidates the keys it
//!   names, so the next load of those keys refetches even inside the freshness
//!   window.
//!
//! Responses requested before an invalidation never overwrite the cache, and
//! responses that land after a [`Query`] was dropped are not applied to it.

#![warn(missing_docs)]

pub mod cache;
pub mod client;
pub mod mutation;
pub mod query;
pub mod retry;
pub mod toast;

pub use cache::{CacheStatistics, FetchTicket, QueryCache};
pub use client::{DEFAULT_STALE_TIME, QueryClient, QueryConfig};
pub use mutation::{
	ErrorCallback, Mutation, MutationOptions, MutationOutcome, SuccessCallback, notification_text,
};
pub use query::{Query, QueryResult};
pub use retry::RetryPolicy;
pub use toast::{Toast, ToastKind, ToastQueue, Toaster, TracingToaster};
