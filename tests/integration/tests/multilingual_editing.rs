//! Editing records in four languages end to end

use mockito::Matcher;
use polyglot::{Language, News, TeamMember};
use polyglot_integration_tests::{Backend, envelope};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test]
async fn test_legacy_flat_title_is_upgraded_and_saved_in_every_language() {
	// Arrange
	let mut backend = Backend::signed_in().await;
	let _by_id = backend
		.server
		.mock("GET", "/News/GetById")
		.match_query(Matcher::UrlEncoded("id".into(), "12".into()))
		.with_status(200)
		.with_body(envelope(json!({
			"id": 12,
			"subject": { "uz": "Qisqa", "ru": "Кратко", "en": "", "ger": "" },
			"title": "Eski sarlavha",
			"text": null,
			"publisherId": 2,
			"publishedDate": "2026-01-10T09:00:00Z"
		})))
		.create_async()
		.await;
	let update = backend
		.server
		.mock("PUT", "/News/Update")
		.match_body(Matcher::PartialJson(json!({
			"id": 12,
			"subject": { "uz": "Qisqa", "ru": "Кратко", "en": "", "ger": "" },
			"title": { "uz": "Eski sarlavha", "ru": "", "en": "Old headline", "ger": "" },
			"text": { "uz": "", "ru": "", "en": "", "ger": "Text" }
		})))
		.with_status(200)
		.with_body(envelope(json!({ "id": 12 })))
		.expect(1)
		.create_async()
		.await;
	let news = backend.panel.resource::<News>();

	// Act
	let mut draft = news.edit_draft(12).await.unwrap();
	let uzbek_title = draft.value("title").map(str::to_string);
	draft.switch_language(Language::En).unwrap();
	draft.input("title", "Old headline").unwrap();
	draft.switch_language(Language::Ger).unwrap();
	draft.input("text", "Text").unwrap();
	draft.switch_language(Language::Uz).unwrap();
	let uzbek_after_switching = draft.value("title").map(str::to_string);
	news.submit(&mut draft).await.unwrap();

	// Assert
	update.assert_async().await;
	assert_eq!(uzbek_title.as_deref(), Some("Eski sarlavha"));
	assert_eq!(uzbek_after_switching, uzbek_title);
}

#[rstest]
#[tokio::test]
async fn test_team_member_skills_are_edited_by_index() {
	// Arrange
	let mut backend = Backend::signed_in().await;
	let create = backend
		.server
		.mock("POST", "/OurTeam/Create")
		.match_body(Matcher::PartialJson(json!({
			"name": { "uz": "Aziz", "ru": "", "en": "Aziz", "ger": "" },
			"role": { "uz": "Dasturchi", "ru": "", "en": "", "ger": "" },
			"skills": [
				{ "uz": "", "ru": "", "en": "Rust", "ger": "" },
				{ "uz": "", "ru": "", "en": "SQL", "ger": "" }
			]
		})))
		.with_status(200)
		.with_body(envelope(json!({ "id": 5 })))
		.expect(1)
		.create_async()
		.await;
	let team = backend.panel.resource::<TeamMember>();
	let mut draft = team.new_draft();

	// Act
	draft.input("name", "Aziz").unwrap();
	draft.input("role", "Dasturchi").unwrap();
	let rust = draft.entity_mut().unwrap().add_skill();
	let sql = draft.entity_mut().unwrap().add_skill();
	draft.switch_language(Language::En).unwrap();
	draft.input("name", "Aziz").unwrap();
	draft.input(&rust, "Rust").unwrap();
	draft.input(&sql, "SQL").unwrap();
	team.submit(&mut draft).await.unwrap();

	// Assert
	create.assert_async().await;
	assert!(!draft.is_open());
}
