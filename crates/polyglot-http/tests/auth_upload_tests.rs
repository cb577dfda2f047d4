//! Sign-in, sign-out and file upload against a mock server

use mockito::{Matcher, Server, ServerGuard};
use polyglot_http::{ApiClient, ApiError, Credentials, SessionEvent, UploadFile};
use polyglot_storage::{SESSION_DATA_KEY, SessionStorage, TOKEN_KEY};
use rstest::rstest;
use serde_json::json;

fn client_for(server: &ServerGuard, storage: &SessionStorage) -> ApiClient {
	ApiClient::builder()
		.base_url(server.url())
		.storage(storage.clone())
		.build()
		.unwrap()
}

#[rstest]
#[tokio::test]
async fn test_sign_in_stores_session() {
	// Arrange
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/Auth/Login")
		.match_body(Matcher::Json(json!({
			"email": "admin@example.com",
			"password": "secret"
		})))
		.with_status(200)
		.with_body(
			json!({
				"code": 200,
				"content": {
					"id": 7,
					"role": "Admin",
					"email": "admin@example.com",
					"token": "jwt-token",
					"userName": "Admin",
					"isSigned": true
				},
				"error": null
			})
			.to_string(),
		)
		.expect(1)
		.create_async()
		.await;
	let storage = SessionStorage::in_memory();
	let client = client_for(&server, &storage);
	let mut events = client.session_events();

	// Act
	let session = client
		.sign_in(&Credentials::new("admin@example.com", "secret"))
		.await
		.unwrap();

	// Assert
	mock.assert_async().await;
	assert_eq!(session.token, "jwt-token");
	assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("jwt-token"));
	let data: serde_json::Value = storage.get_json(SESSION_DATA_KEY).unwrap().unwrap();
	assert_eq!(data, json!({ "userName": "Admin", "id": "7" }));
	assert!(client.is_authenticated());
	assert_eq!(
		events.recv().await.unwrap(),
		SessionEvent::SignedIn {
			user_name: "Admin".to_string()
		}
	);
}

#[rstest]
#[tokio::test]
async fn test_refused_sign_in_stores_nothing() {
	// Arrange
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/Auth/Login")
		.with_status(401)
		.with_body(r#"{"code":401,"error":"Invalid email or password"}"#)
		.create_async()
		.await;
	let storage = SessionStorage::in_memory();
	let client = client_for(&server, &storage);

	// Act
	let error = client
		.sign_in(&Credentials::new("admin@example.com", "wrong"))
		.await
		.unwrap_err();

	// Assert
	match error {
		ApiError::Unauthorized(message) => assert_eq!(message, "Invalid email or password"),
		other => panic!("unexpected error: {other:?}"),
	}
	assert!(storage.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_blank_credentials_never_reach_the_server() {
	// Arrange
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/Auth/Login")
		.expect(0)
		.create_async()
		.await;
	let client = client_for(&server, &SessionStorage::in_memory());

	// Act
	let error = client
		.sign_in(&Credentials::new("", ""))
		.await
		.unwrap_err();

	// Assert
	mock.assert_async().await;
	assert!(error.validation_errors().is_some());
}

#[rstest]
#[tokio::test]
async fn test_sign_out_clears_and_broadcasts() {
	// Arrange
	let server = Server::new_async().await;
	let storage = SessionStorage::in_memory();
	storage.set(TOKEN_KEY, "t").unwrap();
	let client = client_for(&server, &storage);
	let mut events = client.session_events();

	// Act
	client.sign_out();

	// Assert
	assert!(!client.is_authenticated());
	assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut);
}

#[rstest]
#[tokio::test]
async fn test_upload_returns_file_id() {
	// Arrange
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/File/UploadFile")
		.match_header("authorization", "Bearer up-token")
		.match_header(
			"content-type",
			Matcher::Regex("^multipart/form-data; boundary=".to_string()),
		)
		.match_body(Matcher::Regex(r#"name="file"; filename="cover.png""#.to_string()))
		.with_status(200)
		.with_body(r#"{"code":200,"content":{"id":"f-123"}}"#)
		.expect(1)
		.create_async()
		.await;
	let storage = SessionStorage::in_memory();
	storage.set(TOKEN_KEY, "up-token").unwrap();
	let client = client_for(&server, &storage);

	// Act
	let uploaded = client
		.upload(UploadFile::new("cover.png", b"PNG-bytes".to_vec()).with_mime("image/png"))
		.await
		.unwrap();

	// Assert
	mock.assert_async().await;
	assert_eq!(uploaded.id.as_str(), "f-123");
	assert_eq!(uploaded.file_name, "cover.png");
	assert_eq!(
		client.download_url(&uploaded.id),
		format!("{}/File/DownloadFile/download?id=f-123", server.url())
	);
}

#[rstest]
#[tokio::test]
async fn test_upload_without_id_is_decode_error() {
	// Arrange
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/File/UploadFile")
		.with_status(200)
		.with_body(r#"{"code":200,"content":null}"#)
		.create_async()
		.await;
	let client = client_for(&server, &SessionStorage::in_memory());

	// Act
	let error = client
		.upload(UploadFile::new("a.txt", b"hello".to_vec()))
		.await
		.unwrap_err();

	// Assert
	assert!(matches!(error, ApiError::Decode(_)));
}
