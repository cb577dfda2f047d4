//! Writes that invalidate cached resources

use crate::client::QueryClient;
use crate::toast::Toast;
use polyglot_http::{ApiError, ApiResult, EntityId, Envelope, Method};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Called with the server envelope after a successful write
pub type SuccessCallback = Arc<dyn Fn(&Envelope) + Send + Sync>;

/// Called with the failure of a write
pub type ErrorCallback = Arc<dyn Fn(&ApiError) + Send + Sync>;

/// What a write does and what happens after it
///
/// # Example
///
/// ```
/// use polyglot_query::MutationOptions;
///
/// let options = MutationOptions::put("/News/Update")
///     .invalidates("news")
///     .invalidates("news-categories")
///     .success_text("Saved");
/// assert_eq!(options.invalidated_keys(), ["news", "news-categories"]);
/// ```
#[derive(Clone)]
pub struct MutationOptions {
	method: Method,
	path: String,
	invalidates: Vec<String>,
	success_text: Option<String>,
	on_success: Option<SuccessCallback>,
	on_error: Option<ErrorCallback>,
}

impl MutationOptions {
	fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			invalidates: Vec::new(),
			success_text: None,
			on_success: None,
			on_error: None,
		}
	}

	/// `POST path`
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// `PUT path`
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// `DELETE path?id=..`
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Invalidate `key` after success
	pub fn invalidates(mut self, key: impl Into<String>) -> Self {
		self.invalidates.push(key.into());
		self
	}

	/// Show `text` as a success notification
	pub fn success_text(mut self, text: impl Into<String>) -> Self {
		self.success_text = Some(text.into());
		self
	}

	/// Run `callback` with the server envelope after success
	pub fn on_success(mut self, callback: impl Fn(&Envelope) + Send + Sync + 'static) -> Self {
		self.on_success = Some(Arc::new(callback));
		self
	}

	/// Run `callback` with the error after failure
	pub fn on_error(mut self, callback: impl Fn(&ApiError) + Send + Sync + 'static) -> Self {
		self.on_error = Some(Arc::new(callback));
		self
	}

	/// HTTP method
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Endpoint path
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Keys invalidated after success
	pub fn invalidated_keys(&self) -> &[String] {
		&self.invalidates
	}
}

impl fmt::Debug for MutationOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MutationOptions")
			.field("method", &self.method)
			.field("path", &self.path)
			.field("invalidates", &self.invalidates)
			.field("success_text", &self.success_text)
			.field("on_success", &self.on_success.is_some())
			.field("on_error", &self.on_error.is_some())
			.finish()
	}
}

/// How a write ended
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
	/// The server accepted the write
	Completed(Envelope),
	/// A delete found nothing to delete; treated as done
	AlreadyGone,
}

impl MutationOutcome {
	/// Server envelope of a completed write
	pub fn envelope(&self) -> Option<&Envelope> {
		match self {
			Self::Completed(envelope) => Some(envelope),
			Self::AlreadyGone => None,
		}
	}

	/// Take the server envelope of a completed write
	pub fn into_envelope(self) -> Option<Envelope> {
		match self {
			Self::Completed(envelope) => Some(envelope),
			Self::AlreadyGone => None,
		}
	}

	/// Whether a delete found nothing to delete
	pub fn is_already_gone(&self) -> bool {
		matches!(self, Self::AlreadyGone)
	}
}

/// A prepared write.
///
/// Each call performs exactly one request; writes are never retried.
#[derive(Debug)]
pub struct Mutation {
	client: QueryClient,
	options: MutationOptions,
	pending: AtomicBool,
}

impl Mutation {
	pub(crate) fn new(client: QueryClient, options: MutationOptions) -> Self {
		Self {
			client,
			options,
			pending: AtomicBool::new(false),
		}
	}

	/// Options this mutation was built with
	pub fn options(&self) -> &MutationOptions {
		&self.options
	}

	/// Whether a request is in flight
	pub fn is_pending(&self) -> bool {
		self.pending.load(Ordering::Acquire)
	}

	/// Send `payload` as the JSON body
	pub async fn mutate<B>(&self, payload: &B) -> ApiResult<MutationOutcome>
	where
		B: Serialize + ?Sized,
	{
		let pending = PendingGuard::new(&self.pending);
		let result = self
			.client
			.api()
			.send(self.options.method.clone(), &self.options.path, Some(payload))
			.await;
		drop(pending);
		self.settle(result, self.options.method == Method::DELETE)
	}

	/// Delete the record `id` (sent as `?id=`).
	///
	/// A record that is already gone yields [`MutationOutcome::AlreadyGone`]:
	/// the keys are still invalidated, but no error is reported or shown.
	pub async fn delete(&self, id: impl Into<EntityId>) -> ApiResult<MutationOutcome> {
		let id = id.into();
		let pending = PendingGuard::new(&self.pending);
		let result = self.client.api().delete(&self.options.path, &id).await;
		drop(pending);
		self.settle(result, true)
	}

	fn settle(&self, result: ApiResult<Envelope>, missing_is_done: bool) -> ApiResult<MutationOutcome> {
		let options = &self.options;
		match result {
			Ok(envelope) => {
				self.client.invalidate_queries(&options.invalidates);
				if let Some(text) = &options.success_text {
					self.client.toaster().show(Toast::success(text.clone()));
				}
				if let Some(callback) = &options.on_success {
					callback(&envelope);
				}
				tracing::info!(method = %options.method, path = %options.path, "Mutation succeeded");
				Ok(MutationOutcome::Completed(envelope))
			}
			Err(error) if missing_is_done && error.is_not_found() => {
				self.client.invalidate_queries(&options.invalidates);
				tracing::debug!(path = %options.path, "Record already deleted");
				Ok(MutationOutcome::AlreadyGone)
			}
			Err(error) => {
				if let Some(callback) = &options.on_error {
					callback(&error);
				}
				if !matches!(error, ApiError::SessionExpired) {
					self.client.toaster().show(Toast::error(notification_text(&error)));
				}
				tracing::warn!(method = %options.method, path = %options.path, "Mutation failed: {}", error);
				Err(error)
			}
		}
	}
}

/// Text shown to the user for a failed write
pub fn notification_text(error: &ApiError) -> String {
	match error {
		ApiError::Rejected { message, .. }
		| ApiError::Status { message, .. }
		| ApiError::NotFound(message)
		| ApiError::Unauthorized(message)
			if !message.is_empty() =>
		{
			message.clone()
		}
		ApiError::Validation(errors) => errors.to_string(),
		other => other.to_string(),
	}
}

/// Marks a mutation pending until dropped, including when the request
/// future is cancelled
struct PendingGuard<'a>(&'a AtomicBool);

impl<'a> PendingGuard<'a> {
	fn new(flag: &'a AtomicBool) -> Self {
		flag.store(true, Ordering::Release);
		Self(flag)
	}
}

impl Drop for PendingGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}
