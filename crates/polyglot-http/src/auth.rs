//! Sign-in and sign-out

use crate::client::{ApiClient, OnUnauthorized};
use crate::envelope::ValidationErrors;
use crate::error::{ApiError, ApiResult};
use crate::events::SessionEvent;
use crate::id::EntityId;
use polyglot_storage::Session;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign-in endpoint
pub const SIGN_IN_PATH: &str = "/Auth/Login";

/// Email and password submitted to [`SIGN_IN_PATH`]
#[derive(Clone, Serialize)]
pub struct Credentials {
	/// Account email
	pub email: String,
	/// Account password
	pub password: String,
}

impl Credentials {
	/// Bundle an email and a password
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			password: password.into(),
		}
	}

	/// Client-side required-field check
	pub fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		if self.email.trim().is_empty() {
			errors.add("email", "Email is required");
		}
		if self.password.is_empty() {
			errors.add("password", "Password is required");
		}
		errors.into_result()
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("email", &self.email)
			.field("password", &"[redacted]")
			.finish()
	}
}

/// `content` of a successful sign-in response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInContent {
	/// User identifier
	#[serde(default)]
	pub id: Option<EntityId>,
	/// Role name
	#[serde(default)]
	pub role: Option<String>,
	/// Account email
	#[serde(default)]
	pub email: Option<String>,
	/// Bearer token
	#[serde(default)]
	pub token: String,
	/// Display name
	#[serde(default)]
	pub user_name: Option<String>,
	/// Whether the server considers the user signed in
	#[serde(default)]
	pub is_signed: Option<bool>,
}

impl SignInContent {
	fn into_session(self) -> Session {
		let user_name = self
			.user_name
			.filter(|name| !name.is_empty())
			.or(self.email)
			.unwrap_or_default();
		let user_id = self.id.map(|id| id.to_string()).unwrap_or_default();
		Session::new(self.token, user_id, user_name)
	}
}

impl ApiClient {
	/// Sign in and persist the session.
	///
	/// Nothing is stored unless the server returns a token. Refused
	/// credentials surface as [`ApiError::Unauthorized`], never as
	/// [`ApiError::SessionExpired`].
	pub async fn sign_in(&self, credentials: &Credentials) -> ApiResult<Session> {
		credentials.validate().map_err(ApiError::Validation)?;

		let request = self.request(Method::POST, SIGN_IN_PATH).json(credentials);
		let envelope = self
			.execute_with(request, OnUnauthorized::Refuse)
			.await?
			.decode::<SignInContent>()?;

		let content = envelope
			.content
			.ok_or_else(|| ApiError::Decode("sign-in response has no content".to_string()))?;
		if content.is_signed == Some(false) {
			return Err(ApiError::Unauthorized("account is not signed in".to_string()));
		}
		if content.token.is_empty() {
			return Err(ApiError::Decode("sign-in response has no token".to_string()));
		}

		let session = content.into_session();
		self.storage().save_session(&session)?;
		tracing::info!(user = %session.user_name, "Signed in");
		self.emit(SessionEvent::SignedIn {
			user_name: session.user_name.clone(),
		});
		Ok(session)
	}

	/// Destroy the local session
	pub fn sign_out(&self) {
		self.storage().clear();
		tracing::info!("Signed out");
		self.emit(SessionEvent::SignedOut);
	}

	/// The stored session, if any
	pub fn session(&self) -> Option<Session> {
		self.storage().session()
	}

	/// Whether a token is stored
	pub fn is_authenticated(&self) -> bool {
		self.storage().token().is_some()
	}
}
