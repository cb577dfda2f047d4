//! Creating a tag and seeing it in the refetched list

use mockito::Matcher;
use polyglot::{DraftState, EntityId, Language, Multilingual, Tag, ToastKind};
use polyglot_integration_tests::{Backend, TOKEN, envelope};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test]
async fn test_created_tag_appears_in_refetched_list() {
	// Arrange
	let mut backend = Backend::signed_in().await;
	let tags = backend.panel.resource::<Tag>();
	let before = backend
		.server
		.mock("GET", "/Tags/GetAll")
		.with_status(200)
		.with_body(envelope(json!([
			{ "id": 1, "tagName": { "uz": "Sport", "ru": "Спорт", "en": "Sport", "ger": "Sport" } }
		])))
		.expect(1)
		.create_async()
		.await;
	let create = backend
		.server
		.mock("POST", "/Tags/Create")
		.match_header("authorization", format!("Bearer {}", TOKEN).as_str())
		.match_body(Matcher::Json(json!({
			"tagName": { "uz": "Yangilik", "ru": "", "en": "News", "ger": "" }
		})))
		.with_status(200)
		.with_body(envelope(json!({ "id": 7 })))
		.expect(1)
		.create_async()
		.await;
	let list = tags.list();
	assert_eq!(list.load().await.unwrap().len(), 1);
	before.remove_async().await;
	let after = backend
		.server
		.mock("GET", "/Tags/GetAll")
		.with_status(200)
		.with_body(envelope(json!([
			{ "id": 1, "tagName": { "uz": "Sport", "ru": "Спорт", "en": "Sport", "ger": "Sport" } },
			{ "id": 7, "tagName": { "uz": "Yangilik", "ru": "", "en": "News", "ger": "" } }
		])))
		.expect(1)
		.create_async()
		.await;

	// Act
	let mut draft = tags.new_draft();
	draft.input("tagName", "Yangilik").unwrap();
	draft.switch_language(Language::En).unwrap();
	draft.input("tagName", "News").unwrap();
	tags.submit(&mut draft).await.unwrap();
	let refreshed = list.load().await.unwrap();

	// Assert
	create.assert_async().await;
	after.assert_async().await;
	assert_eq!(draft.state(), DraftState::Closed);
	let created = refreshed
		.iter()
		.find(|tag| tag.id == Some(EntityId::Int(7)))
		.unwrap();
	assert_eq!(created.tag_name, Multilingual::new("Yangilik", "", "News", ""));
	let toasts = backend.toasts.drain();
	assert_eq!(toasts.len(), 1);
	assert_eq!(toasts[0].kind, ToastKind::Success);
}

#[rstest]
#[tokio::test]
async fn test_blank_tag_never_reaches_the_server() {
	// Arrange
	let mut backend = Backend::signed_in().await;
	let tags = backend.panel.resource::<Tag>();
	let create = backend
		.server
		.mock("POST", "/Tags/Create")
		.expect(0)
		.create_async()
		.await;

	// Act
	let mut draft = tags.new_draft();
	draft.input("tagName", "   ").unwrap();
	let result = tags.submit(&mut draft).await;

	// Assert
	create.assert_async().await;
	let errors = result.unwrap_err().validation_errors().cloned().unwrap();
	assert!(!errors.field("tagName").is_empty());
	assert!(draft.is_open());
}
