//! Shared setup for cross-crate scenario tests
//!
//! Every scenario runs an [`AdminPanel`] against a mockito server that speaks
//! the backend's response envelope.

use mockito::{Server, ServerGuard};
use polyglot::{AdminPanel, QueryConfig, RetryPolicy, Session, SessionStorage, ToastQueue};
use serde_json::{Value, json};
use std::sync::Arc;

/// Token the mock backend hands out
pub const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.admin";

/// A panel wired to a mock backend, with toasts captured
pub struct Backend {
	pub server: ServerGuard,
	pub panel: AdminPanel,
	pub storage: SessionStorage,
	pub toasts: ToastQueue,
}

impl Backend {
	/// Signed-out panel with retries disabled
	pub async fn start() -> Self {
		Self::with_config(QueryConfig {
			retry: RetryPolicy::none(),
			..QueryConfig::default()
		})
		.await
	}

	/// Signed-out panel with custom read tuning
	pub async fn with_config(config: QueryConfig) -> Self {
		let server = Server::new_async().await;
		let storage = SessionStorage::in_memory();
		let api = polyglot::ApiClient::builder()
			.base_url(server.url())
			.storage(storage.clone())
			.build()
			.unwrap();
		let toasts = ToastQueue::new();
		let panel = AdminPanel::from_api(api, config).with_toaster(Arc::new(toasts.clone()));
		Self {
			server,
			panel,
			storage,
			toasts,
		}
	}

	/// Same as [`start`](Self::start) but with [`TOKEN`] already stored
	pub async fn signed_in() -> Self {
		let backend = Self::start().await;
		backend
			.storage
			.save_session(&Session::new(TOKEN, "1", "admin"))
			.unwrap();
		backend
	}
}

/// Successful envelope around `content`
pub fn envelope(content: Value) -> String {
	json!({ "id": null, "code": 200, "content": content, "error": null }).to_string()
}

/// Failed envelope carrying `message`
pub fn error_envelope(code: i64, message: &str) -> String {
	json!({ "id": null, "code": code, "content": null, "error": message }).to_string()
}
