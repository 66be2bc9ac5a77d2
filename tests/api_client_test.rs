//! Integration tests for the API client against a mock backend.
//!
//! Covers response parsing for each endpoint shape and the classification
//! of failure statuses into error kinds.

use scout::api::{ApiClient, ApiError};
use scout::config::Config;
use scout::models::CrawlKind;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ApiClient {
    let config = Config::default().with_base_url(format!("{}/api", server.uri()));
    ApiClient::new(&config)
}

#[tokio::test]
async fn stats_parses_aggregate_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "active_creators": 4,
            "posts_today": 2,
            "posts_this_week": 11,
            "engagement_opportunities": 6,
            "avg_confidence": 0.82,
            "recent_activity": [{"message": "Scanned @alice", "timestamp": "2026-08-25T10:00:00Z"}]
        })))
        .mount(&server)
        .await;

    let stats = client_for(&server).await.stats().await.unwrap();
    assert_eq!(stats.active_creators, 4);
    assert_eq!(stats.engagement_opportunities, 6);
    assert_eq!(stats.recent_activity.len(), 1);
    assert_eq!(stats.recent_activity[0].message, "Scanned @alice");
}

#[tokio::test]
async fn posts_sends_page_and_limit_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(query_param("page", "3"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "posts": [{
                "id": 9,
                "username": "alice",
                "posted_at": "2026-08-25T08:00:00Z",
                "should_engage": true
            }],
            "pagination": {"total": 41, "totalPages": 3, "page": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server).await.posts(3, 20).await.unwrap();
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.pagination.total_pages, 3);
    assert_eq!(page.pagination.total, 41);
}

#[tokio::test]
async fn crawl_items_unwraps_envelope_and_filters_by_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/crawl/items"))
        .and(query_param("type", "user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "id": 1,
                "type": "user",
                "status": "active",
                "username": "carol",
                "posts_found": 5,
                "interactions": 40
            }]
        })))
        .mount(&server)
        .await;

    let items = client_for(&server)
        .await
        .crawl_items(Some(CrawlKind::User))
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label(), "@carol");
}

#[tokio::test]
async fn add_creator_strips_at_prefix_in_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/creators"))
        .and(body_json(serde_json::json!({"username": "alice"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "username": "alice",
            "posts_count": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let creator = client_for(&server)
        .await
        .add_creator(" @alice ")
        .await
        .unwrap();
    assert_eq!(creator.username, "alice");
}

#[tokio::test]
async fn scheduler_status_reads_camel_case_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scheduler/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"isRunning": true})),
        )
        .mount(&server)
        .await;

    let status = client_for(&server).await.scheduler_status().await.unwrap();
    assert!(status.is_running);
}

#[tokio::test]
async fn not_found_classifies_as_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).await.stats().await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.creators().await.unwrap_err();
    match err {
        ApiError::ServerError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn unexpected_4xx_classifies_as_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/creators"))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.creators().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Unknown {
            status: Some(409),
            ..
        }
    ));
}

#[tokio::test]
async fn malformed_body_classifies_as_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.stats().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn health_reports_backend_liveness() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    assert!(client_for(&server).await.health().await.unwrap());
}

#[tokio::test]
async fn update_crawl_item_puts_partial_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/crawl/items/5"))
        .and(body_json(serde_json::json!({"description": "retitled"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 5,
            "type": "post",
            "status": "active",
            "url": "https://instagram.com/p/abc",
            "description": "retitled"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client_for(&server)
        .await
        .update_crawl_item(5, &serde_json::json!({"description": "retitled"}))
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("retitled"));
}

#[tokio::test]
async fn toggle_crawl_item_posts_to_toggle_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/crawl/items/5/toggle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 5,
            "type": "post",
            "status": "paused",
            "url": "https://instagram.com/p/abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let item = client_for(&server)
        .await
        .toggle_crawl_item(5)
        .await
        .unwrap();
    assert!(!item.is_active());
}
