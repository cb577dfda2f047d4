//! API client and its builder

use crate::envelope::{Envelope, message_of};
use crate::error::{ApiError, ApiResult};
use crate::events::SessionEvent;
use crate::id::EntityId;
use polyglot_storage::SessionStorage;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use url::Url;

const EVENT_CAPACITY: usize = 16;

/// How a `401` is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnUnauthorized {
	/// The token went stale: destroy the session and tell listeners
	ExpireSession,
	/// The credentials were refused; there is no session to destroy
	Refuse,
}

/// Builder for [`ApiClient`]
///
/// # Example
/// ```rust,no_run
/// use polyglot_http::ApiClientBuilder;
/// use std::time::Duration;
///
/// let client = ApiClientBuilder::new()
///     .base_url("https://api.example.com/api")
///     .timeout(Duration::from_secs(20))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
	base_url: String,
	timeout: Option<Duration>,
	storage: Option<SessionStorage>,
	user_agent: Option<String>,
}

impl ApiClientBuilder {
	/// Builder with no base URL set
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the base URL every path is appended to
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();
		self
	}

	/// Set the per-request timeout
	pub fn timeout(mut self, duration: Duration) -> Self {
		self.timeout = Some(duration);
		self
	}

	/// Use `storage` as the session store (defaults to a fresh in-memory tab)
	pub fn storage(mut self, storage: SessionStorage) -> Self {
		self.storage = Some(storage);
		self
	}

	/// Override the `User-Agent` header
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}

	/// Build the client.
	///
	/// # Errors
	///
	/// [`ApiError::InvalidUrl`] when the base URL does not parse and
	/// [`ApiError::Transport`] when the underlying HTTP client cannot be built.
	pub fn build(self) -> ApiResult<ApiClient> {
		let parsed = Url::parse(&self.base_url)?;
		let base_url = parsed.as_str().trim_end_matches('/').to_string();

		let mut http = reqwest::Client::builder().user_agent(
			self.user_agent
				.unwrap_or_else(|| concat!("polyglot-admin/", env!("CARGO_PKG_VERSION")).to_string()),
		);
		if let Some(timeout) = self.timeout {
			http = http.timeout(timeout);
		}

		let (events, _) = broadcast::channel(EVENT_CAPACITY);

		Ok(ApiClient {
			inner: Arc::new(Inner {
				http: http.build()?,
				base_url,
				storage: self.storage.unwrap_or_default(),
				events,
			}),
		})
	}
}

#[derive(Debug)]
struct Inner {
	http: reqwest::Client,
	base_url: String,
	storage: SessionStorage,
	events: broadcast::Sender<SessionEvent>,
}

/// Shared handle to the admin REST API.
///
/// Cloning is cheap; clones share the connection pool, the session store and
/// the event channel.
#[derive(Debug, Clone)]
pub struct ApiClient {
	inner: Arc<Inner>,
}

impl ApiClient {
	/// Start configuring a client
	pub fn builder() -> ApiClientBuilder {
		ApiClientBuilder::new()
	}

	/// Base URL without a trailing slash
	pub fn base_url(&self) -> &str {
		&self.inner.base_url
	}

	/// The session store this client reads its token from
	pub fn storage(&self) -> &SessionStorage {
		&self.inner.storage
	}

	/// Absolute URL for `path`.
	///
	/// Paths are appended to the base URL, so a base such as
	/// `https://host/api` keeps its `/api` prefix.
	pub fn url(&self, path: &str) -> String {
		format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
	}

	/// Subscribe to session lifecycle events
	pub fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
		self.inner.events.subscribe()
	}

	/// Start a request with the bearer token attached when one is stored
	pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
		let builder = self.inner.http.request(method, self.url(path));
		match self.inner.storage.token() {
			Some(token) => builder.bearer_auth(token),
			None => builder,
		}
	}

	/// Send a prepared request through the response policy
	pub async fn execute(&self, request: RequestBuilder) -> ApiResult<Envelope> {
		self.execute_with(request, OnUnauthorized::ExpireSession).await
	}

	/// `GET path`
	pub async fn get(&self, path: &str) -> ApiResult<Envelope> {
		self.send::<()>(Method::GET, path, None).await
	}

	/// `GET path?k=v&..`
	pub async fn get_query<Q>(&self, path: &str, query: &Q) -> ApiResult<Envelope>
	where
		Q: Serialize + ?Sized,
	{
		tracing::debug!(path, "GET");
		self.execute(self.request(Method::GET, path).query(query))
			.await
	}

	/// `POST path` with a JSON body
	pub async fn post<B>(&self, path: &str, body: &B) -> ApiResult<Envelope>
	where
		B: Serialize + ?Sized,
	{
		self.send(Method::POST, path, Some(body)).await
	}

	/// `PUT path` with a JSON body
	pub async fn put<B>(&self, path: &str, body: &B) -> ApiResult<Envelope>
	where
		B: Serialize + ?Sized,
	{
		self.send(Method::PUT, path, Some(body)).await
	}

	/// `DELETE path?id={id}`
	pub async fn delete(&self, path: &str, id: &EntityId) -> ApiResult<Envelope> {
		tracing::debug!(path, %id, "DELETE");
		self.execute(
			self.request(Method::DELETE, path)
				.query(&[("id", id.to_string())]),
		)
		.await
	}

	/// Send `method path` with an optional JSON body
	pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<Envelope>
	where
		B: Serialize + ?Sized,
	{
		tracing::debug!(%method, path, "Sending request");
		let mut request = self.request(method, path);
		if let Some(body) = body {
			request = request.json(body);
		}
		self.execute(request).await
	}

	pub(crate) async fn execute_with(
		&self,
		request: RequestBuilder,
		on_unauthorized: OnUnauthorized,
	) -> ApiResult<Envelope> {
		let response = request.send().await?;
		self.handle(response, on_unauthorized).await
	}

	async fn handle(&self, response: Response, on_unauthorized: OnUnauthorized) -> ApiResult<Envelope> {
		let status = response.status();
		let text = response.text().await?;
		let parsed = if text.trim().is_empty() {
			None
		} else {
			serde_json::from_str::<Envelope>(&text).ok()
		};

		if status == StatusCode::UNAUTHORIZED {
			let message = parsed
				.as_ref()
				.and_then(Envelope::error_message)
				.unwrap_or_else(|| reason(status));
			return Err(self.unauthorized(on_unauthorized, message));
		}

		if !status.is_success() {
			if let Some(errors) = parsed.as_ref().and_then(Envelope::validation_errors) {
				return Err(ApiError::Validation(errors));
			}
			let message = parsed
				.as_ref()
				.and_then(Envelope::error_message)
				.or_else(|| (!text.trim().is_empty() && parsed.is_none()).then(|| text.clone()))
				.unwrap_or_else(|| reason(status));
			if status == StatusCode::NOT_FOUND {
				return Err(ApiError::NotFound(message));
			}
			tracing::debug!(status = status.as_u16(), %message, "Request failed");
			return Err(ApiError::Status {
				status: status.as_u16(),
				message,
			});
		}

		let envelope = match parsed {
			Some(envelope) => envelope,
			None if text.trim().is_empty() => Envelope::empty(),
			None => {
				return Err(ApiError::Decode(format!(
					"expected a response envelope, got: {}",
					truncate(&text)
				)));
			}
		};

		if envelope.is_error() {
			return Err(self.envelope_error(envelope, on_unauthorized));
		}
		Ok(envelope)
	}

	fn envelope_error(&self, envelope: Envelope, on_unauthorized: OnUnauthorized) -> ApiError {
		if let Some(errors) = envelope.validation_errors() {
			return ApiError::Validation(errors);
		}
		let message = envelope
			.error
			.as_ref()
			.and_then(message_of)
			.unwrap_or_default();
		match envelope.code {
			Some(401) => self.unauthorized(on_unauthorized, message),
			Some(404) => ApiError::NotFound(message),
			code => ApiError::Rejected {
				code: code.unwrap_or_default(),
				message,
			},
		}
	}

	fn unauthorized(&self, on_unauthorized: OnUnauthorized, message: String) -> ApiError {
		match on_unauthorized {
			OnUnauthorized::ExpireSession => {
				tracing::warn!("Server rejected the session token; signing out");
				self.expire_session();
				ApiError::SessionExpired
			}
			OnUnauthorized::Refuse => ApiError::Unauthorized(message),
		}
	}

	fn expire_session(&self) {
		self.inner.storage.clear();
		self.emit(SessionEvent::Expired);
	}

	pub(crate) fn emit(&self, event: SessionEvent) {
		// No receivers is fine: nobody is listening yet.
		let _ = self.inner.events.send(event);
	}
}

fn reason(status: StatusCode) -> String {
	status
		.canonical_reason()
		.unwrap_or("unknown status")
		.to_string()
}

fn truncate(text: &str) -> String {
	const LIMIT: usize = 120;
	match text.char_indices().nth(LIMIT) {
		Some((end, _)) => format!("{}...", &text[..end]),
		None => text.to_string(),
	}
}
