//! Signing in, authenticated requests and session expiry

use mockito::Matcher;
use polyglot::{ApiError, Credentials, News, ResourceError, SessionEvent, Tag, ToastKind};
use polyglot_integration_tests::{Backend, TOKEN, envelope, error_envelope};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test]
async fn test_sign_in_stores_token_used_by_later_requests() {
	// Arrange
	let mut backend = Backend::start().await;
	let login = backend
		.server
		.mock("POST", "/Auth/Login")
		.match_header("authorization", Matcher::Missing)
		.match_body(Matcher::Json(json!({ "email": "admin@example.uz", "password": "secret" })))
		.with_status(200)
		.with_body(envelope(json!({
			"id": 1,
			"email": "admin@example.uz",
			"token": TOKEN,
			"userName": "admin",
			"isSigned": true
		})))
		.expect(1)
		.create_async()
		.await;
	let news = backend
		.server
		.mock("GET", "/News/GetAll")
		.match_header("authorization", format!("Bearer {}", TOKEN).as_str())
		.with_status(200)
		.with_body(envelope(json!([])))
		.expect(1)
		.create_async()
		.await;
	let mut events = backend.panel.api().session_events();

	// Act
	let session = backend
		.panel
		.sign_in(&Credentials::new("admin@example.uz", "secret"))
		.await
		.unwrap();
	let listed = backend.panel.resource::<News>().fetch_all().await.unwrap();

	// Assert
	login.assert_async().await;
	news.assert_async().await;
	assert!(listed.is_empty());
	assert_eq!(session.token, TOKEN);
	assert_eq!(backend.storage.token().as_deref(), Some(TOKEN));
	assert_eq!(backend.storage.session().unwrap().user_name, "admin");
	assert_eq!(
		events.recv().await.unwrap(),
		SessionEvent::SignedIn {
			user_name: "admin".to_string()
		}
	);
	assert!(backend.toasts.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_refused_credentials_toast_and_store_nothing() {
	// Arrange
	let mut backend = Backend::start().await;
	let _login = backend
		.server
		.mock("POST", "/Auth/Login")
		.with_status(200)
		.with_body(error_envelope(400, "Email or password is incorrect"))
		.create_async()
		.await;

	// Act
	let result = backend
		.panel
		.sign_in(&Credentials::new("admin@example.uz", "wrong"))
		.await;

	// Assert
	assert!(result.is_err());
	assert!(backend.storage.token().is_none());
	assert!(backend.storage.is_empty());
	let toasts = backend.toasts.drain();
	assert_eq!(toasts.len(), 1);
	assert_eq!(toasts[0].kind, ToastKind::Error);
	assert_eq!(toasts[0].message, "Email or password is incorrect");
}

#[rstest]
#[tokio::test]
async fn test_http_401_on_sign_in_is_not_a_session_expiry() {
	// Arrange
	let mut backend = Backend::start().await;
	let _login = backend
		.server
		.mock("POST", "/Auth/Login")
		.with_status(401)
		.with_body(error_envelope(401, "Invalid credentials"))
		.create_async()
		.await;

	// Act
	let error = backend
		.panel
		.sign_in(&Credentials::new("admin@example.uz", "wrong"))
		.await
		.unwrap_err();

	// Assert
	assert!(matches!(error, ApiError::Unauthorized(ref message) if message == "Invalid credentials"));
	assert!(backend.storage.token().is_none());
	assert_eq!(backend.toasts.drain()[0].message, "Invalid credentials");
}

#[rstest]
#[tokio::test]
async fn test_blank_credentials_never_reach_the_server() {
	// Arrange
	let mut backend = Backend::start().await;
	let login = backend
		.server
		.mock("POST", "/Auth/Login")
		.expect(0)
		.create_async()
		.await;

	// Act
	let error = backend
		.panel
		.sign_in(&Credentials::new(" ", ""))
		.await
		.unwrap_err();

	// Assert
	login.assert_async().await;
	let errors = error.validation_errors().unwrap();
	assert!(!errors.field("email").is_empty());
	assert!(!errors.field("password").is_empty());
}

#[rstest]
#[tokio::test]
async fn test_rejected_token_ends_the_session_once() {
	// Arrange
	let mut backend = Backend::signed_in().await;
	let _tags = backend
		.server
		.mock("GET", "/Tags/GetAll")
		.with_status(401)
		.create_async()
		.await;
	let mut events = backend.panel.api().session_events();

	// Act
	let error = backend
		.panel
		.resource::<Tag>()
		.fetch_all()
		.await
		.unwrap_err();

	// Assert
	assert!(matches!(error, ResourceError::Api(ApiError::SessionExpired)));
	assert!(backend.storage.token().is_none());
	assert!(!backend.panel.is_authenticated());
	assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
}
