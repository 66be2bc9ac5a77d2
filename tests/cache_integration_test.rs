//! Integration tests for the query cache: staleness, request sharing, and
//! invalidation after mutations.

use std::time::Duration;

use scout::api::{ApiClient, ApiError};
use scout::cache::QueryCache;
use scout::config::Config;
use scout::models::CrawlKind;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cache_for(server: &MockServer) -> QueryCache {
    let config = Config::default().with_base_url(format!("{}/api", server.uri()));
    QueryCache::new(ApiClient::new(&config))
}

fn creators_body(usernames: &[&str]) -> serde_json::Value {
    serde_json::Value::Array(
        usernames
            .iter()
            .enumerate()
            .map(|(i, u)| serde_json::json!({"id": i as i64 + 1, "username": u, "posts_count": 0}))
            .collect(),
    )
}

#[tokio::test]
async fn fresh_reads_are_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(creators_body(&["alice"])))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let first = cache.creators().await.unwrap();
    let second = cache.creators().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first[0].username, "alice");
    // expect(1) on the mock verifies only one request went out
}

#[tokio::test]
async fn concurrent_reads_share_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creators"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(creators_body(&["alice"]))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let (a, b, c) = tokio::join!(cache.creators(), cache.creators(), cache.creators());
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
}

#[tokio::test]
async fn stale_read_returns_old_value_and_revalidates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(creators_body(&["alice"])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(creators_body(&["alice", "bob"])))
        .mount(&server)
        .await;

    let config = Config::default().with_base_url(format!("{}/api", server.uri()));
    let cache = QueryCache::with_staleness(ApiClient::new(&config), Duration::from_millis(50));

    let first = cache.creators().await.unwrap();
    assert_eq!(first.len(), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;

    // Stale hit: the old value comes back immediately
    let stale = cache.creators().await.unwrap();
    assert_eq!(stale.len(), 1);

    // The background revalidation lands shortly after
    tokio::time::sleep(Duration::from_millis(100)).await;
    let refreshed = cache.creators().await.unwrap();
    assert_eq!(refreshed.len(), 2);
}

#[tokio::test]
async fn posts_pages_are_cached_independently() {
    let server = MockServer::start().await;
    for page in 1..=2 {
        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "posts": [{
                    "id": page,
                    "username": format!("user{}", page),
                    "posted_at": "2026-08-25T08:00:00Z",
                    "should_engage": false
                }],
                "pagination": {"total": 2, "totalPages": 2, "page": page}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let cache = cache_for(&server);
    let page1 = cache.posts(1).await.unwrap();
    let page2 = cache.posts(2).await.unwrap();
    let page1_again = cache.posts(1).await.unwrap();
    assert_eq!(page1.posts[0].username, "user1");
    assert_eq!(page2.posts[0].username, "user2");
    assert_eq!(page1, page1_again);
}

#[tokio::test]
async fn successful_mutation_invalidates_own_collection_and_stats() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(creators_body(&["alice"])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(creators_body(&["alice", "bob"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"active_creators": 1})),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 2, "username": "bob", "posts_count": 0
        })))
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    assert_eq!(cache.creators().await.unwrap().len(), 1);
    cache.stats().await.unwrap();

    cache.add_creator("bob").await.unwrap();

    // Both collections refetch after the mutation (stats mock expects 2 hits)
    assert_eq!(cache.creators().await.unwrap().len(), 2);
    cache.stats().await.unwrap();
}

#[tokio::test]
async fn failed_mutation_leaves_cache_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(creators_body(&["alice"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    assert_eq!(cache.creators().await.unwrap().len(), 1);

    let err = cache.add_creator("bob").await.unwrap_err();
    assert!(matches!(err, ApiError::ServerError { status: 500, .. }));

    // Still served from cache; the single GET expectation verifies it
    assert_eq!(cache.creators().await.unwrap().len(), 1);
}

#[tokio::test]
async fn crawl_item_update_invalidates_item_list() {
    let server = MockServer::start().await;
    let item = |desc: &str| {
        serde_json::json!({
            "id": 5, "type": "post", "status": "active",
            "url": "https://instagram.com/p/abc", "description": desc
        })
    };
    Mock::given(method("GET"))
        .and(path("/api/crawl/items"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": [item("old")]})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/crawl/items"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": [item("new")]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/crawl/items/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item("new")))
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let items = cache.crawl_items(None).await.unwrap();
    assert_eq!(items[0].description.as_deref(), Some("old"));

    cache
        .update_crawl_item(5, &serde_json::json!({"description": "new"}))
        .await
        .unwrap();

    let items = cache.crawl_items(None).await.unwrap();
    assert_eq!(items[0].description.as_deref(), Some("new"));
}

#[tokio::test]
async fn crawl_item_data_sends_type_query_and_caches_per_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/crawl/items/5/data"))
        .and(query_param("type", "post"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "comments": [{"id": 1, "username": "dana", "text": "nice"}],
            "engagement_stats": {"emoji_breakdown": {"🔥": 2}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let data = cache
        .crawl_item_data(5, Some(CrawlKind::Post))
        .await
        .unwrap();
    assert_eq!(data.comments.len(), 1);

    // Same item + kind hits the cache; the expect(1) verifies one request
    let again = cache
        .crawl_item_data(5, Some(CrawlKind::Post))
        .await
        .unwrap();
    assert_eq!(again.comments[0].username, "dana");
}

#[tokio::test]
async fn scheduler_toggle_invalidates_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scheduler/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"isRunning": false})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/scheduler/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"isRunning": true})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/scheduler/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    assert!(!cache.scheduler_status().await.unwrap().is_running);

    cache.start_scheduler().await.unwrap();
    assert!(cache.scheduler_status().await.unwrap().is_running);
}
