//! Freshness window, invalidation across screens and delete idempotence

use mockito::Matcher;
use polyglot::{
	Blog, Entity, EntityId, Multilingual, MutationOutcome, QueryConfig, ReferenceToBlog, RetryPolicy,
	Tag,
};
use polyglot_integration_tests::{Backend, envelope, error_envelope};
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

#[rstest]
#[tokio::test]
async fn test_fresh_list_is_served_from_cache() {
	// Arrange
	let mut backend = Backend::signed_in().await;
	let list = backend
		.server
		.mock("GET", "/Tags/GetAll")
		.with_status(200)
		.with_body(envelope(json!([{ "id": 1, "tagName": "Sport" }])))
		.expect(1)
		.create_async()
		.await;
	let tags = backend.panel.resource::<Tag>();

	// Act
	let first = tags.list().load().await.unwrap();
	let second = tags.list().load().await.unwrap();

	// Assert
	list.assert_async().await;
	assert_eq!(first, second);
	assert_eq!(first[0].tag_name, Multilingual::new("Sport", "", "", ""));
	let stats = backend.panel.client().statistics();
	assert_eq!(stats.hits, 1);
	assert_eq!(stats.misses, 1);
}

#[rstest]
#[tokio::test]
async fn test_zero_freshness_always_refetches() {
	// Arrange
	let mut backend = Backend::with_config(QueryConfig {
		stale_time: Duration::ZERO,
		retry: RetryPolicy::none(),
	})
	.await;
	let list = backend
		.server
		.mock("GET", "/Tags/GetAll")
		.with_status(200)
		.with_body(envelope(json!([])))
		.expect(2)
		.create_async()
		.await;
	let tags = backend.panel.resource::<Tag>();

	// Act
	tags.fetch_all().await.unwrap();
	tags.fetch_all().await.unwrap();

	// Assert
	list.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn test_blog_update_refreshes_dependent_references() {
	// Arrange
	let mut backend = Backend::signed_in().await;
	let references = backend
		.server
		.mock("GET", "/ReferenceToBlog/GetAll")
		.with_status(200)
		.with_body(envelope(json!([{ "id": 4, "categoryId": 2, "blogId": 9 }])))
		.expect(2)
		.create_async()
		.await;
	let update = backend
		.server
		.mock("PUT", "/Blog/Update")
		.match_body(Matcher::PartialJson(json!({
			"id": 9,
			"title": { "uz": "Sarlavha", "ru": "", "en": "Headline", "ger": "" }
		})))
		.with_status(200)
		.with_body(envelope(json!({ "id": 9 })))
		.expect(1)
		.create_async()
		.await;
	let blog = backend.panel.resource::<Blog>();
	let reference_api = backend.panel.references::<ReferenceToBlog>();
	let loaded = reference_api.fetch_all().await.unwrap();
	assert_eq!(loaded[0].blog_id, Some(EntityId::Int(9)));
	let mut post = Entity::with_id(9, Blog::default());
	post.title = Multilingual::new("Sarlavha", "", "Headline", "");
	post.subject = Multilingual::new("Qisqa", "", "", "");
	post.text = Multilingual::new("Matn", "", "", "");
	post.publisher_id = Some(EntityId::Int(3));
	post.published_date = "2026-03-01T00:00:00Z".to_string();

	// Act
	let mut draft = blog.draft_from(post);
	let outcome = blog.submit(&mut draft).await.unwrap();
	reference_api.fetch_all().await.unwrap();

	// Assert
	update.assert_async().await;
	references.assert_async().await;
	assert!(matches!(outcome, MutationOutcome::Completed(_)));
}

#[rstest]
#[tokio::test]
async fn test_deleting_twice_is_quiet_the_second_time() {
	// Arrange
	let mut backend = Backend::signed_in().await;
	let first = backend
		.server
		.mock("DELETE", "/Tags/Delete")
		.match_query(Matcher::UrlEncoded("id".into(), "7".into()))
		.with_status(200)
		.with_body(envelope(json!(true)))
		.expect(1)
		.create_async()
		.await;
	let tags = backend.panel.resource::<Tag>();

	// Act
	let deleted = tags.delete(7).await.unwrap();
	first.assert_async().await;
	first.remove_async().await;
	let _gone = backend
		.server
		.mock("DELETE", "/Tags/Delete")
		.match_query(Matcher::UrlEncoded("id".into(), "7".into()))
		.with_status(200)
		.with_body(error_envelope(404, "Tag not found"))
		.create_async()
		.await;
	let again = tags.delete(7).await.unwrap();

	// Assert
	assert!(matches!(deleted, MutationOutcome::Completed(_)));
	assert!(again.is_already_gone());
	let toasts = backend.toasts.drain();
	assert_eq!(toasts.len(), 1);
	assert_eq!(toasts[0].message, "Tag deleted");
}
