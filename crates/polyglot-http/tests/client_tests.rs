//! Request and response policy against a mock server

use mockito::{Matcher, Server, ServerGuard};
use polyglot_http::{ApiClient, ApiError, EntityId, SessionEvent};
use polyglot_storage::{Session, SessionStorage};
use rstest::rstest;
use serde_json::json;

fn client_for(server: &ServerGuard, storage: &SessionStorage) -> ApiClient {
	ApiClient::builder()
		.base_url(server.url())
		.storage(storage.clone())
		.build()
		.unwrap()
}

fn signed_in() -> SessionStorage {
	let storage = SessionStorage::in_memory();
	storage
		.save_session(&Session::new("tok-42", "1", "admin"))
		.unwrap();
	storage
}

#[rstest]
#[tokio::test]
async fn test_bearer_token_is_attached() {
	// Arrange
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/Tags/GetAll")
		.match_header("authorization", "Bearer tok-42")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"code":200,"content":[{"id":1,"tagName":"rust"}],"error":null}"#)
		.expect(1)
		.create_async()
		.await;
	let client = client_for(&server, &signed_in());

	// Act
	let envelope = client.get("/Tags/GetAll").await.unwrap();

	// Assert
	mock.assert_async().await;
	assert_eq!(
		envelope.into_content(),
		Some(json!([{ "id": 1, "tagName": "rust" }]))
	);
}

#[rstest]
#[tokio::test]
async fn test_no_token_means_no_authorization_header() {
	// Arrange
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/Statistics/Get")
		.match_header("authorization", Matcher::Missing)
		.with_status(200)
		.with_body(r#"{"content":{"views":3}}"#)
		.expect(1)
		.create_async()
		.await;
	let client = client_for(&server, &SessionStorage::in_memory());

	// Act
	let result = client.get("/Statistics/Get").await;

	// Assert
	mock.assert_async().await;
	assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn test_401_expires_session_and_broadcasts() {
	// Arrange
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("PUT", "/News/Update")
		.with_status(401)
		.create_async()
		.await;
	let storage = signed_in();
	let client = client_for(&server, &storage);
	let mut events = client.session_events();

	// Act
	let result = client.put("/News/Update", &json!({ "id": 3 })).await;

	// Assert
	assert!(matches!(result, Err(ApiError::SessionExpired)));
	assert!(storage.token().is_none());
	assert!(storage.is_empty());
	assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
}

#[rstest]
#[tokio::test]
async fn test_envelope_code_401_also_expires_session() {
	// Arrange
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("GET", "/Blog/GetAll")
		.with_status(200)
		.with_body(r#"{"code":401,"error":"token expired","content":null}"#)
		.create_async()
		.await;
	let storage = signed_in();
	let client = client_for(&server, &storage);

	// Act
	let result = client.get("/Blog/GetAll").await;

	// Assert
	assert!(matches!(result, Err(ApiError::SessionExpired)));
	assert!(storage.session().is_none());
}

#[rstest]
#[tokio::test]
async fn test_model_state_error_becomes_validation() {
	// Arrange
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/Tags/Create")
		.with_status(400)
		.with_body(r#"{"code":400,"error":"Validation failed","modelStateError":{"TagName":["The TagName field is required."]}}"#)
		.create_async()
		.await;
	let client = client_for(&server, &signed_in());

	// Act
	let error = client
		.post("/Tags/Create", &json!({ "tagName": "" }))
		.await
		.unwrap_err();

	// Assert
	let errors = error.validation_errors().unwrap();
	assert_eq!(errors.field("TagName"), ["The TagName field is required."]);
}

#[rstest]
#[tokio::test]
async fn test_envelope_error_on_success_status_is_rejected() {
	// Arrange
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("POST", "/Partner/Create")
		.with_status(200)
		.with_body(r#"{"code":409,"error":"Duplicate partner","content":null}"#)
		.create_async()
		.await;
	let client = client_for(&server, &signed_in());

	// Act
	let error = client
		.post("/Partner/Create", &json!({}))
		.await
		.unwrap_err();

	// Assert
	match error {
		ApiError::Rejected { code, message } => {
			assert_eq!(code, 409);
			assert_eq!(message, "Duplicate partner");
		}
		other => panic!("unexpected error: {other:?}"),
	}
}

#[rstest]
#[case(404, true, false)]
#[case(500, false, true)]
#[case(503, false, true)]
#[case(403, false, false)]
#[tokio::test]
async fn test_status_classification(
	#[case] status: usize,
	#[case] not_found: bool,
	#[case] retryable: bool,
) {
	// Arrange
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("GET", "/Publisher/GetAll")
		.with_status(status)
		.create_async()
		.await;
	let client = client_for(&server, &signed_in());

	// Act
	let error = client.get("/Publisher/GetAll").await.unwrap_err();

	// Assert
	assert_eq!(error.is_not_found(), not_found);
	assert_eq!(error.is_retryable(), retryable);
	assert_eq!(error.status(), Some(status as u16));
}

#[rstest]
#[tokio::test]
async fn test_delete_sends_id_as_query() {
	// Arrange
	let mut server = Server::new_async().await;
	let mock = server
		.mock("DELETE", "/Tags/Delete")
		.match_query(Matcher::UrlEncoded("id".into(), "7".into()))
		.with_status(200)
		.with_body(r#"{"code":200,"content":true}"#)
		.expect(1)
		.create_async()
		.await;
	let client = client_for(&server, &signed_in());

	// Act
	let result = client.delete("/Tags/Delete", &EntityId::from(7)).await;

	// Assert
	mock.assert_async().await;
	assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn test_empty_success_body_is_empty_envelope() {
	// Arrange
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("PUT", "/Statistics/Update")
		.with_status(204)
		.create_async()
		.await;
	let client = client_for(&server, &signed_in());

	// Act
	let envelope = client
		.put("/Statistics/Update", &json!({ "views": 1 }))
		.await
		.unwrap();

	// Assert
	assert!(envelope.content.is_none());
}

#[rstest]
#[tokio::test]
async fn test_non_envelope_success_body_is_decode_error() {
	// Arrange
	let mut server = Server::new_async().await;
	let _mock = server
		.mock("GET", "/Tags/GetAll")
		.with_status(200)
		.with_body("<html>maintenance</html>")
		.create_async()
		.await;
	let client = client_for(&server, &signed_in());

	// Act
	let error = client.get("/Tags/GetAll").await.unwrap_err();

	// Assert
	assert!(matches!(error, ApiError::Decode(_)));
}

#[rstest]
#[tokio::test]
async fn test_get_query_encodes_parameters() {
	// Arrange
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/ReferenceToBlog/GetReferencesByCategoryIds")
		.match_query(Matcher::UrlEncoded("id".into(), "12".into()))
		.with_status(200)
		.with_body(r#"{"content":[]}"#)
		.expect(1)
		.create_async()
		.await;
	let client = client_for(&server, &signed_in());

	// Act
	let envelope = client
		.get_query("/ReferenceToBlog/GetReferencesByCategoryIds", &[("id", "12")])
		.await
		.unwrap();

	// Assert
	mock.assert_async().await;
	assert_eq!(envelope.into_content(), Some(json!([])));
}
