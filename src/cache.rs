//! Query cache and mutation layer.
//!
//! Sits between the view layer and [`ApiClient`]: read operations are keyed
//! by resource + parameters, share one in-flight request per key, and serve
//! cached values inside a staleness window (stale reads return the last known
//! value immediately while a background refetch runs). Mutations go straight
//! through and, on success, invalidate the collections they affect so the
//! next read refetches. A failed mutation leaves the cache untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{
    CrawlItem, CrawlKind, Creator, NewCrawlItem, PostListResponse, ScanLog, SchedulerStatus, Stats,
    TrackingData,
};

/// Default staleness window for cached reads.
pub const DEFAULT_STALENESS: Duration = Duration::from_secs(5 * 60);

/// Composite cache key: resource name plus the parameters that shape the
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Stats,
    SchedulerStatus,
    Creators,
    CreatorPosts { creator_id: i64 },
    Posts { page: u32 },
    ScanLogs { limit: u32 },
    CrawlItems { kind: Option<CrawlKind> },
    CrawlItemData {
        item_id: i64,
        kind: Option<CrawlKind>,
    },
}

impl QueryKey {
    /// Resource family, used for invalidation across parameter variants.
    pub fn resource(&self) -> &'static str {
        match self {
            QueryKey::Stats => "stats",
            QueryKey::SchedulerStatus => "scheduler",
            QueryKey::Creators => "creators",
            QueryKey::CreatorPosts { .. } => "creator-posts",
            QueryKey::Posts { .. } => "posts",
            QueryKey::ScanLogs { .. } => "scan-logs",
            QueryKey::CrawlItems { .. } => "crawl-items",
            QueryKey::CrawlItemData { .. } => "crawl-data",
        }
    }
}

/// Typed payloads the cache can hold, one variant per resource family.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Stats(Stats),
    SchedulerStatus(SchedulerStatus),
    Creators(Vec<Creator>),
    Posts(PostListResponse),
    ScanLogs(Vec<ScanLog>),
    CrawlItems(Vec<CrawlItem>),
    CrawlItemData(TrackingData),
}

struct Entry {
    value: CachedValue,
    fetched_at: Instant,
}

type FetchFuture = Shared<BoxFuture<'static, Result<CachedValue, ApiError>>>;

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    in_flight: Mutex<HashMap<QueryKey, FetchFuture>>,
}

/// The cache itself. Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct QueryCache {
    api: Arc<ApiClient>,
    inner: Arc<Inner>,
    staleness: Duration,
}

impl QueryCache {
    pub fn new(api: ApiClient) -> Self {
        Self::with_staleness(api, DEFAULT_STALENESS)
    }

    pub fn with_staleness(api: ApiClient, staleness: Duration) -> Self {
        Self {
            api: Arc::new(api),
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
            }),
            staleness,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Read through the cache.
    ///
    /// Fresh hit: returns the cached value, no network. Stale hit: kicks off
    /// a background refetch and returns the last known value immediately.
    /// Miss: awaits the (possibly shared) fetch.
    pub async fn get(&self, key: QueryKey) -> Result<CachedValue, ApiError> {
        let cached = {
            let entries = self.inner.entries.lock().expect("cache lock poisoned");
            entries
                .get(&key)
                .map(|entry| (entry.value.clone(), entry.fetched_at.elapsed()))
        };

        match cached {
            Some((value, age)) if age < self.staleness => {
                debug!(resource = key.resource(), "cache hit");
                Ok(value)
            }
            Some((value, _)) => {
                // Stale-while-revalidate: hand back the old value, refresh
                // in the background.
                debug!(resource = key.resource(), "cache stale, revalidating");
                let this = self.clone();
                let bg_key = key.clone();
                tokio::spawn(async move {
                    let _ = this.fetch_shared(bg_key).await;
                });
                Ok(value)
            }
            None => {
                debug!(resource = key.resource(), "cache miss");
                self.fetch_shared(key).await
            }
        }
    }

    /// Bypass the staleness window and refetch now. Used by the fixed-timer
    /// polls (stats, scheduler status).
    pub async fn refresh(&self, key: QueryKey) -> Result<CachedValue, ApiError> {
        self.fetch_shared(key).await
    }

    /// Await the in-flight fetch for `key`, creating it if absent.
    /// Concurrent callers for the same key share a single request.
    async fn fetch_shared(&self, key: QueryKey) -> Result<CachedValue, ApiError> {
        let future = {
            let mut in_flight = self.inner.in_flight.lock().expect("cache lock poisoned");
            if let Some(existing) = in_flight.get(&key) {
                existing.clone()
            } else {
                let api = Arc::clone(&self.api);
                let fetch_key = key.clone();
                let future: FetchFuture =
                    async move { fetch(&api, &fetch_key).await }.boxed().shared();
                in_flight.insert(key.clone(), future.clone());
                future
            }
        };

        let result = future.await;

        {
            let mut in_flight = self.inner.in_flight.lock().expect("cache lock poisoned");
            in_flight.remove(&key);
        }

        if let Ok(ref value) = result {
            let mut entries = self.inner.entries.lock().expect("cache lock poisoned");
            entries.insert(
                key,
                Entry {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }

        result
    }

    /// Drop every entry of a resource family, regardless of parameters.
    pub fn invalidate_resource(&self, resource: &str) {
        let mut entries = self.inner.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|key, _| key.resource() != resource);
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!(resource, dropped, "cache invalidated");
        }
    }

    // ------------------------------------------------------------------
    // Typed read helpers
    // ------------------------------------------------------------------

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        match self.get(QueryKey::Stats).await? {
            CachedValue::Stats(stats) => Ok(stats),
            other => Err(type_mismatch(&other)),
        }
    }

    pub async fn scheduler_status(&self) -> Result<SchedulerStatus, ApiError> {
        match self.get(QueryKey::SchedulerStatus).await? {
            CachedValue::SchedulerStatus(status) => Ok(status),
            other => Err(type_mismatch(&other)),
        }
    }

    pub async fn creators(&self) -> Result<Vec<Creator>, ApiError> {
        match self.get(QueryKey::Creators).await? {
            CachedValue::Creators(creators) => Ok(creators),
            other => Err(type_mismatch(&other)),
        }
    }

    pub async fn posts(&self, page: u32) -> Result<PostListResponse, ApiError> {
        match self.get(QueryKey::Posts { page }).await? {
            CachedValue::Posts(page) => Ok(page),
            other => Err(type_mismatch(&other)),
        }
    }

    pub async fn creator_posts(&self, creator_id: i64) -> Result<PostListResponse, ApiError> {
        match self.get(QueryKey::CreatorPosts { creator_id }).await? {
            CachedValue::Posts(page) => Ok(page),
            other => Err(type_mismatch(&other)),
        }
    }

    pub async fn scan_logs(&self, limit: u32) -> Result<Vec<ScanLog>, ApiError> {
        match self.get(QueryKey::ScanLogs { limit }).await? {
            CachedValue::ScanLogs(logs) => Ok(logs),
            other => Err(type_mismatch(&other)),
        }
    }

    pub async fn crawl_items(&self, kind: Option<CrawlKind>) -> Result<Vec<CrawlItem>, ApiError> {
        match self.get(QueryKey::CrawlItems { kind }).await? {
            CachedValue::CrawlItems(items) => Ok(items),
            other => Err(type_mismatch(&other)),
        }
    }

    pub async fn crawl_item_data(
        &self,
        item_id: i64,
        kind: Option<CrawlKind>,
    ) -> Result<TrackingData, ApiError> {
        match self.get(QueryKey::CrawlItemData { item_id, kind }).await? {
            CachedValue::CrawlItemData(data) => Ok(data),
            other => Err(type_mismatch(&other)),
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Add a creator; invalidates the creator list and stats on success.
    pub async fn add_creator(&self, username: &str) -> Result<Creator, ApiError> {
        let creator = self.api.add_creator(username).await?;
        self.invalidate_resource("creators");
        self.invalidate_resource("stats");
        Ok(creator)
    }

    pub async fn remove_creator(&self, creator_id: i64) -> Result<(), ApiError> {
        self.api.remove_creator(creator_id).await?;
        self.invalidate_resource("creators");
        self.invalidate_resource("stats");
        Ok(())
    }

    pub async fn scan_creator(&self, username: &str) -> Result<(), ApiError> {
        self.api.scan_creator(username).await?;
        self.invalidate_resource("creators");
        self.invalidate_resource("stats");
        Ok(())
    }

    pub async fn start_scheduler(&self) -> Result<(), ApiError> {
        self.api.start_scheduler().await?;
        self.invalidate_resource("scheduler");
        Ok(())
    }

    pub async fn stop_scheduler(&self) -> Result<(), ApiError> {
        self.api.stop_scheduler().await?;
        self.invalidate_resource("scheduler");
        Ok(())
    }

    pub async fn add_crawl_item(&self, item: &NewCrawlItem) -> Result<CrawlItem, ApiError> {
        let created = self.api.add_crawl_item(item).await?;
        self.invalidate_resource("crawl-items");
        self.invalidate_resource("stats");
        Ok(created)
    }

    pub async fn remove_crawl_item(&self, item_id: i64) -> Result<(), ApiError> {
        self.api.remove_crawl_item(item_id).await?;
        self.invalidate_resource("crawl-items");
        self.invalidate_resource("stats");
        Ok(())
    }

    pub async fn toggle_crawl_item(&self, item_id: i64) -> Result<CrawlItem, ApiError> {
        let updated = self.api.toggle_crawl_item(item_id).await?;
        self.invalidate_resource("crawl-items");
        Ok(updated)
    }

    pub async fn update_crawl_item(
        &self,
        item_id: i64,
        updates: &serde_json::Value,
    ) -> Result<CrawlItem, ApiError> {
        let updated = self.api.update_crawl_item(item_id, updates).await?;
        self.invalidate_resource("crawl-items");
        Ok(updated)
    }
}

fn type_mismatch(value: &CachedValue) -> ApiError {
    // Only reachable if a key/variant pairing in `fetch` is wrong.
    ApiError::InvalidResponse(format!("cache variant mismatch: {:?}", value))
}

/// Dispatch a key to its backend call.
async fn fetch(api: &ApiClient, key: &QueryKey) -> Result<CachedValue, ApiError> {
    match key {
        QueryKey::Stats => api.stats().await.map(CachedValue::Stats),
        QueryKey::SchedulerStatus => api
            .scheduler_status()
            .await
            .map(CachedValue::SchedulerStatus),
        QueryKey::Creators => api.creators().await.map(CachedValue::Creators),
        QueryKey::CreatorPosts { creator_id } => {
            api.creator_posts(*creator_id).await.map(CachedValue::Posts)
        }
        QueryKey::Posts { page } => api.posts(*page, 20).await.map(CachedValue::Posts),
        QueryKey::ScanLogs { limit } => api.scan_logs(*limit).await.map(CachedValue::ScanLogs),
        QueryKey::CrawlItems { kind } => api.crawl_items(*kind).await.map(CachedValue::CrawlItems),
        QueryKey::CrawlItemData { item_id, kind } => api
            .crawl_item_data(*item_id, *kind)
            .await
            .map(CachedValue::CrawlItemData),
    }
}
