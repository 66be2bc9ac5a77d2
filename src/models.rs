//! Wire types for the Scout backend REST API.
//!
//! Everything here is read-only from the client's perspective: the backend
//! owns these entities, the TUI only fetches, renders, and triggers
//! refetches after mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A monitored Instagram account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Creator {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub follower_count: Option<i64>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub posts_count: i64,
    /// Last successful scan, absent for creators never scanned
    #[serde(default)]
    pub last_scan: Option<DateTime<Utc>>,
    #[serde(default)]
    pub biography: Option<String>,
}

/// A discovered post with the backend's AI analysis attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i64,
    pub username: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub display_image_url: Option<String>,
    #[serde(default)]
    pub post_url: Option<String>,
    /// Engagement recommendation from the analysis pipeline
    #[serde(default)]
    pub should_engage: bool,
    #[serde(default)]
    pub suggested_comment: Option<String>,
    #[serde(default)]
    pub tone_emoji: String,
    #[serde(default)]
    pub tone_description: String,
    /// Confidence in the tone analysis, 0.0..=1.0
    #[serde(default)]
    pub analysis_confidence: f64,
    /// Freshness category for the suggested comment (e.g. "fresh", "recycled")
    #[serde(default)]
    pub comment_freshness: String,
}

/// Pagination envelope on the posts list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    #[serde(default)]
    pub total: i64,
    #[serde(default, alias = "totalPages")]
    pub total_pages: i64,
    #[serde(default)]
    pub page: i64,
}

/// Response from `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostListResponse {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Kind of crawl target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrawlKind {
    #[default]
    Post,
    User,
}

impl CrawlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlKind::Post => "post",
            CrawlKind::User => "user",
        }
    }
}

/// A tracked post or user, distinct from the general creator list.
///
/// The post and user variants share the common fields; type-specific counters
/// are optional and default to zero when the backend omits them for the other
/// variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrawlItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: CrawlKind,
    #[serde(default)]
    pub description: Option<String>,
    /// "active" or "paused"
    #[serde(default)]
    pub status: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_crawl: Option<DateTime<Utc>>,

    // Post-variant fields
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub comments_found: i64,
    #[serde(default)]
    pub reactions_found: i64,
    #[serde(default)]
    pub unique_users: i64,

    // User-variant fields
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub posts_found: i64,
    #[serde(default)]
    pub interactions: i64,

    #[serde(default)]
    pub tracking_data: Option<TrackingData>,
}

impl CrawlItem {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// Display label: URL for tracked posts, @username for tracked users.
    pub fn label(&self) -> String {
        match self.kind {
            CrawlKind::Post => self.url.clone().unwrap_or_default(),
            CrawlKind::User => format!("@{}", self.username.as_deref().unwrap_or("")),
        }
    }
}

/// Tracking payload for a crawl item.
///
/// Post items carry `comments` + `engagement_stats`, user items carry
/// `posts` + `activity_stats`. Aggregates inside the stats structs are
/// backend-computed and passed through verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackingData {
    #[serde(default)]
    pub comments: Vec<TrackedComment>,
    #[serde(default)]
    pub engagement_stats: EngagementStats,
    #[serde(default)]
    pub posts: Vec<TrackedPost>,
    #[serde(default)]
    pub activity_stats: ActivityStats,
}

/// One captured comment on a tracked post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackedComment {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub reactions: Vec<String>,
}

/// Aggregate engagement stats for a tracked post (backend-computed).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngagementStats {
    /// emoji -> occurrence count; BTreeMap keeps export output deterministic
    #[serde(default)]
    pub emoji_breakdown: BTreeMap<String, i64>,
}

/// One captured post from a tracked user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackedPost {
    pub id: i64,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub engagement: i64,
    #[serde(default = "Utc::now")]
    pub posted_at: DateTime<Utc>,
}

/// Aggregate activity stats for a tracked user (backend-computed).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityStats {
    #[serde(default)]
    pub avg_engagement: f64,
    #[serde(default)]
    pub posting_frequency: Option<String>,
    #[serde(default)]
    pub hashtag_usage: Vec<String>,
}

/// Response from `GET /crawl/items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CrawlItemListResponse {
    #[serde(default)]
    pub items: Vec<CrawlItem>,
}

/// Request body for `POST /crawl/items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCrawlItem {
    #[serde(rename = "type")]
    pub kind: CrawlKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Aggregate dashboard metrics from `GET /stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    #[serde(default)]
    pub active_creators: i64,
    #[serde(default)]
    pub posts_today: i64,
    #[serde(default)]
    pub posts_this_week: i64,
    #[serde(default)]
    pub engagement_opportunities: i64,
    /// Mean analysis confidence across recent posts, 0.0..=1.0
    #[serde(default)]
    pub avg_confidence: f64,
    #[serde(default)]
    pub recent_activity: Vec<ActivityEntry>,
}

/// One line of recent activity on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response from `GET /scheduler/status`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchedulerStatus {
    #[serde(rename = "isRunning", default)]
    pub is_running: bool,
}

/// One scan-log entry from `GET /scan-logs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanLog {
    pub id: i64,
    #[serde(default)]
    pub creator_username: String,
    #[serde(default)]
    pub posts_found: i64,
    #[serde(default = "Utc::now")]
    pub scan_date: DateTime<Utc>,
    /// "success", "failed", or an in-progress marker
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_deserializes_with_missing_optionals() {
        let json = r#"{
            "id": 7,
            "username": "alice",
            "posted_at": "2026-08-01T12:00:00Z",
            "should_engage": true
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 7);
        assert!(post.should_engage);
        assert!(post.caption.is_none());
        assert_eq!(post.analysis_confidence, 0.0);
        assert_eq!(post.tone_emoji, "");
    }

    #[test]
    fn crawl_item_type_tag_selects_kind() {
        let json = r#"{
            "id": 1,
            "type": "user",
            "status": "active",
            "username": "bob",
            "posts_found": 3,
            "interactions": 12
        }"#;
        let item: CrawlItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, CrawlKind::User);
        assert!(item.is_active());
        assert_eq!(item.label(), "@bob");
        assert_eq!(item.comments_found, 0);
    }

    #[test]
    fn scheduler_status_uses_camel_case_key() {
        let status: SchedulerStatus = serde_json::from_str(r#"{"isRunning": true}"#).unwrap();
        assert!(status.is_running);
    }

    #[test]
    fn new_crawl_item_skips_absent_fields() {
        let body = NewCrawlItem {
            kind: CrawlKind::Post,
            url: Some("https://instagram.com/p/x".into()),
            username: None,
            description: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""type":"post""#));
        assert!(!json.contains("username"));
    }

    #[test]
    fn emoji_breakdown_iterates_in_key_order() {
        let json = r#"{"emoji_breakdown": {"b": 4, "a": 9}}"#;
        let stats: EngagementStats = serde_json::from_str(json).unwrap();
        let keys: Vec<&String> = stats.emoji_breakdown.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
