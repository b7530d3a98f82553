//! Enrichment pipeline integration tests

mod common;

use common::{keywords, metric, seed_page, test_state, test_state_with_provider, FakeProvider};
use copyflow_common::db::models::{KeywordClass, PageStatus};
use copyflow_engine::db::{keyword_metrics, pages};
use copyflow_engine::services::{enrichment, seo_manager};
use uuid::Uuid;

#[tokio::test]
async fn enrichment_is_idempotent_and_overwrites() {
    // No provider on the state: the explicit runs below are the only writers
    let provider = FakeProvider::returning(vec![metric("pumps", 1000), metric("valves", 400)]);
    let state = test_state().await;
    let page_id = seed_page(&state.db).await;

    let artifact = seo_manager::upload_seo_data(
        &state,
        page_id,
        keywords(&["pumps"]),
        keywords(&["valves"]),
        Uuid::new_v4(),
    )
    .await
    .unwrap();

    // First run
    enrichment::enrich_artifact(&state.db, provider.as_ref(), &artifact)
        .await
        .unwrap();

    // Second run with fresher numbers
    provider.set_metrics(vec![metric("pumps", 3000), metric("valves", 900)]);
    enrichment::enrich_artifact(&state.db, provider.as_ref(), &artifact)
        .await
        .unwrap();

    let stored = keyword_metrics::list_for_artifact(&state.db, artifact.id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 2, "one row per (artifact, keyword)");
    let pumps = stored.iter().find(|m| m.keyword == "pumps").unwrap();
    assert_eq!(pumps.search_volume, Some(3000), "second fetch overwrites");
}

#[tokio::test]
async fn keywords_classify_by_primary_membership() {
    let provider = FakeProvider::returning(vec![metric("pumps", 1000), metric("valves", 400)]);
    let state = test_state().await;
    let page_id = seed_page(&state.db).await;

    // "pumps" appears in both lists and must classify primary
    let artifact = seo_manager::upload_seo_data(
        &state,
        page_id,
        keywords(&["pumps"]),
        keywords(&["pumps", "valves"]),
        Uuid::new_v4(),
    )
    .await
    .unwrap();

    enrichment::enrich_artifact(&state.db, provider.as_ref(), &artifact)
        .await
        .unwrap();

    let stored = keyword_metrics::list_for_artifact(&state.db, artifact.id)
        .await
        .unwrap();
    let pumps = stored.iter().find(|m| m.keyword == "pumps").unwrap();
    assert_eq!(pumps.keyword_class, KeywordClass::Primary);
    let valves = stored.iter().find(|m| m.keyword == "valves").unwrap();
    assert_eq!(valves.keyword_class, KeywordClass::Secondary);

    // The provider saw the deduplicated keyword list exactly once
    let calls = provider.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![keywords(&["pumps", "valves"])]);
}

#[tokio::test]
async fn empty_keyword_set_skips_the_provider() {
    let provider = FakeProvider::returning(vec![]);
    let state = test_state_with_provider(provider.clone()).await;
    let page_id = seed_page(&state.db).await;

    let artifact = seo_manager::upload_seo_data(&state, page_id, vec![], vec![], Uuid::new_v4())
        .await
        .unwrap();

    let stored = enrichment::enrich_artifact(&state.db, provider.as_ref(), &artifact)
        .await
        .unwrap();
    assert_eq!(stored, 0);

    // The spawned run takes the same early-return path as the direct one
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_never_reaches_the_uploader() {
    let provider = FakeProvider::failing();
    let state = test_state_with_provider(provider.clone()).await;
    let page_id = seed_page(&state.db).await;

    // Upload succeeds even though the detached enrichment will fail
    let artifact = seo_manager::upload_seo_data(
        &state,
        page_id,
        keywords(&["pumps"]),
        vec![],
        Uuid::new_v4(),
    )
    .await
    .expect("upload must not observe enrichment failure");

    // Wait until the detached task has reached the provider and failed
    provider.fetched.notified().await;

    let page = pages::get_page(&state.db, page_id).await.unwrap().unwrap();
    assert_eq!(page.status, PageStatus::AwaitingContent);
    let stored = keyword_metrics::list_for_artifact(&state.db, artifact.id)
        .await
        .unwrap();
    assert!(stored.is_empty());
    assert!(provider.call_count() >= 1, "the detached task did try");
}

#[tokio::test]
async fn upload_without_provider_skips_enrichment_entirely() {
    let state = test_state().await;
    let page_id = seed_page(&state.db).await;

    let artifact = seo_manager::upload_seo_data(
        &state,
        page_id,
        keywords(&["pumps"]),
        vec![],
        Uuid::new_v4(),
    )
    .await
    .unwrap();

    // No provider configured, so no task was spawned at all
    let stored = keyword_metrics::list_for_artifact(&state.db, artifact.id)
        .await
        .unwrap();
    assert!(stored.is_empty());
}
