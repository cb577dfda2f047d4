//! One handle wiring settings, session storage, the API client and the cache

use crate::error::PanelResult;
use polyglot_conf::{QuerySettings, Settings};
use polyglot_http::{ApiClient, ApiResult, Credentials, SessionEvent};
use polyglot_query::{QueryClient, QueryConfig, RetryPolicy, Toast, Toaster, TracingToaster, notification_text};
use polyglot_resources::{Reference, ReferenceApi, Resource, ResourceApi};
use polyglot_storage::{Session, SessionStorage};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Read tuning taken from settings
pub fn query_config(settings: &QuerySettings) -> QueryConfig {
	QueryConfig {
		stale_time: settings.stale_time,
		retry: RetryPolicy {
			max_retries: settings.retry.max_retries,
			base_delay: settings.retry.base_delay,
			max_delay: settings.retry.max_delay,
		},
	}
}

/// Entry point for an admin UI.
///
/// Clones share the session, the cache and the toaster. Signing out, or the
/// server expiring the session, empties the cache so no data from the old
/// session is served to the next one.
#[derive(Clone)]
pub struct AdminPanel {
	client: QueryClient,
	toaster: Arc<dyn Toaster>,
}

impl AdminPanel {
	/// Build from settings; toasts go to the log until [`with_toaster`](Self::with_toaster)
	pub fn new(settings: &Settings, storage: SessionStorage) -> PanelResult<Self> {
		let mut builder = ApiClient::builder()
			.base_url(settings.api.base_url.as_str())
			.timeout(settings.api.timeout)
			.storage(storage);
		if let Some(user_agent) = &settings.api.user_agent {
			builder = builder.user_agent(user_agent.as_str());
		}
		let api = builder.build()?;
		tracing::debug!(base_url = %api.base_url(), "Admin panel configured");
		Ok(Self::from_api(api, query_config(&settings.query)))
	}

	/// Wrap an already configured API client
	pub fn from_api(api: ApiClient, config: QueryConfig) -> Self {
		let toaster: Arc<dyn Toaster> = Arc::new(TracingToaster);
		Self {
			client: QueryClient::new(api)
				.with_config(config)
				.with_toaster(Arc::clone(&toaster)),
			toaster,
		}
	}

	/// Send notifications to `toaster`
	pub fn with_toaster(mut self, toaster: Arc<dyn Toaster>) -> Self {
		self.client = self.client.with_toaster(Arc::clone(&toaster));
		self.toaster = toaster;
		self
	}

	/// Cached reads and mutations
	pub fn client(&self) -> &QueryClient {
		&self.client
	}

	/// Raw API access
	pub fn api(&self) -> &ApiClient {
		self.client.api()
	}

	/// CRUD for one resource
	pub fn resource<T: Resource>(&self) -> ResourceApi<T> {
		ResourceApi::new(self.client.clone())
	}

	/// CRUD plus category lookups for a reference resource
	pub fn references<R: Reference>(&self) -> ReferenceApi<R> {
		ReferenceApi::new(self.client.clone())
	}

	/// Sign in; a failure raises an error toast and stores nothing
	pub async fn sign_in(&self, credentials: &Credentials) -> ApiResult<Session> {
		match self.api().sign_in(credentials).await {
			Ok(session) => {
				// Cached lists may belong to whoever was signed in before
				self.client.clear();
				Ok(session)
			}
			Err(error) => {
				tracing::warn!(email = %credentials.email, %error, "Sign-in failed");
				self.toaster.show(Toast::error(notification_text(&error)));
				Err(error)
			}
		}
	}

	/// Forget the session and everything cached under it
	pub fn sign_out(&self) {
		self.api().sign_out();
		self.client.clear();
	}

	/// The stored session, if any
	pub fn session(&self) -> Option<Session> {
		self.api().session()
	}

	/// Whether a token is stored
	pub fn is_authenticated(&self) -> bool {
		self.api().is_authenticated()
	}

	/// Empty the cache whenever the server expires the session.
	///
	/// The task ends once every clone of the API client is dropped.
	pub fn watch_session(&self) -> JoinHandle<()> {
		let mut events = self.api().session_events();
		let cache = self.client.cache().clone();
		tokio::spawn(async move {
			loop {
				match events.recv().await {
					Ok(SessionEvent::Expired) => {
						tracing::info!("Session expired; clearing cached queries");
						cache.clear();
					}
					Ok(_) => {}
					Err(RecvError::Lagged(skipped)) => {
						tracing::warn!(skipped, "Session events lagged");
					}
					Err(RecvError::Closed) => break,
				}
			}
		})
	}
}

impl fmt::Debug for AdminPanel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdminPanel")
			.field("client", &self.client)
			.finish_non_exhaustive()
	}
}
