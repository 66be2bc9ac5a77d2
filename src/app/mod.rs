//! Application state and logic for the TUI.
//!
//! [`App`] owns the per-screen view state, the query cache handle, and the
//! message channel that background tasks report into. Fetches and mutations
//! run on spawned tasks; the event loop in `main.rs` drains the channel and
//! redraws when `dirty` is set.

mod handlers;

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::ApiError;
use crate::cache::{CachedValue, QueryCache, QueryKey};
use crate::events::{AppMessage, MutationKind};
use crate::models::{CrawlKind, ScanLog, SchedulerStatus, Stats};
use crate::view_state::{CrawlViewState, CreatorsViewState, PostsViewState};

/// Poll cadence for dashboard stats.
pub const STATS_POLL_INTERVAL: Duration = Duration::from_secs(60);
/// Poll cadence for scheduler status.
pub const SCHEDULER_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Scan-log entries shown on the dashboard.
pub const SCAN_LOG_LIMIT: u32 = 10;

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Dashboard,
    Posts,
    Creators,
    Crawl,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Posts => "Posts",
            Screen::Creators => "Creators",
            Screen::Crawl => "Crawl",
        }
    }
}

/// One-line feedback shown at the bottom of every screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub struct App {
    pub cache: QueryCache,
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Taken by the event loop, which needs ownership for `select!`
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,

    pub screen: Screen,
    /// Bumped on every screen switch; fetch results stamped with an older
    /// generation are dropped on arrival.
    generation: u64,

    pub posts: PostsViewState,
    pub creators: CreatorsViewState,
    pub crawl: CrawlViewState,

    pub stats: Option<Stats>,
    pub scheduler: Option<SchedulerStatus>,
    pub scan_logs: Vec<ScanLog>,
    pub loading: bool,
    pub status: Option<StatusLine>,

    /// Mutations currently running; the triggering key is ignored while its
    /// kind is present
    in_flight: HashSet<MutationKind>,
    /// When set, the posts screen fetches this creator's posts instead of
    /// the global feed
    pub scoped_creator: Option<i64>,
    /// Posts-screen search input mode
    pub search_active: bool,

    poll_handles: Vec<JoinHandle<()>>,

    pub dirty: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(cache: QueryCache) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            cache,
            message_tx,
            message_rx: Some(message_rx),
            screen: Screen::Dashboard,
            generation: 0,
            posts: PostsViewState::new(),
            creators: CreatorsViewState::new(),
            crawl: CrawlViewState::new(),
            stats: None,
            scheduler: None,
            scan_logs: Vec::new(),
            loading: false,
            status: None,
            in_flight: HashSet::new(),
            scoped_creator: None,
            search_active: false,
            poll_handles: Vec::new(),
            dirty: true,
            should_quit: false,
        }
    }

    /// Kick off the initial dashboard load and its polls.
    pub fn start(&mut self) {
        self.enter_screen(Screen::Dashboard);
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mutation_in_flight(&self, kind: MutationKind) -> bool {
        self.in_flight.contains(&kind)
    }

    /// Switch screens: bump the generation, stop dashboard polls if leaving,
    /// and spawn the fetches the new screen needs.
    pub fn enter_screen(&mut self, screen: Screen) {
        self.generation += 1;
        self.screen = screen;
        self.status = None;
        self.search_active = false;
        self.stop_polling();
        info!(screen = screen.title(), "screen change");

        match screen {
            Screen::Dashboard => {
                self.spawn_stats_fetch();
                self.spawn_scheduler_fetch();
                self.spawn_scan_logs_fetch();
                self.start_polling();
            }
            Screen::Posts => {
                self.posts.set_now(chrono::Utc::now());
                self.spawn_posts_fetch();
            }
            Screen::Creators => self.spawn_creators_fetch(),
            Screen::Crawl => self.spawn_crawl_items_fetch(self.crawl.tab),
        }
        self.loading = true;
        self.mark_dirty();
    }

    /// Refetch whatever the current screen displays, bypassing staleness.
    pub fn refresh_current_screen(&mut self) {
        match self.screen {
            Screen::Dashboard => {
                self.spawn_refresh(QueryKey::Stats);
                self.spawn_refresh(QueryKey::SchedulerStatus);
                self.spawn_refresh(QueryKey::ScanLogs {
                    limit: SCAN_LOG_LIMIT,
                });
            }
            Screen::Posts => match self.scoped_creator {
                Some(creator_id) => self.spawn_refresh(QueryKey::CreatorPosts { creator_id }),
                None => self.spawn_refresh(QueryKey::Posts {
                    page: self.posts.page,
                }),
            },
            Screen::Creators => self.spawn_refresh(QueryKey::Creators),
            Screen::Crawl => self.spawn_refresh(QueryKey::CrawlItems {
                kind: Some(self.crawl.tab),
            }),
        }
        self.loading = true;
        self.mark_dirty();
    }

    // ------------------------------------------------------------------
    // Fetch spawning
    // ------------------------------------------------------------------

    pub fn spawn_stats_fetch(&self) {
        let cache = self.cache.clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = cache.stats().await;
            let _ = tx.send(AppMessage::StatsLoaded(result));
        });
    }

    pub fn spawn_scheduler_fetch(&self) {
        let cache = self.cache.clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = cache.scheduler_status().await;
            let _ = tx.send(AppMessage::SchedulerStatusLoaded(result));
        });
    }

    pub fn spawn_scan_logs_fetch(&self) {
        let cache = self.cache.clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = cache.scan_logs(SCAN_LOG_LIMIT).await;
            let _ = tx.send(AppMessage::ScanLogsLoaded(result));
        });
    }

    /// Fetch the posts the screen shows: the creator-scoped list when a
    /// scope is set, otherwise the current page of the global feed.
    pub fn spawn_posts_fetch(&self) {
        let cache = self.cache.clone();
        let tx = self.message_tx.clone();
        let generation = self.generation;
        let page = self.posts.page;
        let scoped = self.scoped_creator;
        tokio::spawn(async move {
            let result = match scoped {
                Some(creator_id) => cache.creator_posts(creator_id).await,
                None => cache.posts(page).await,
            };
            let _ = tx.send(AppMessage::PostsLoaded {
                generation,
                page,
                result,
            });
        });
    }

    pub fn spawn_creators_fetch(&self) {
        let cache = self.cache.clone();
        let tx = self.message_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = cache.creators().await;
            let _ = tx.send(AppMessage::CreatorsLoaded { generation, result });
        });
    }

    pub fn spawn_crawl_items_fetch(&self, kind: CrawlKind) {
        let cache = self.cache.clone();
        let tx = self.message_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = cache.crawl_items(Some(kind)).await;
            let _ = tx.send(AppMessage::CrawlItemsLoaded {
                generation,
                kind,
                result,
            });
        });
    }

    pub fn spawn_crawl_data_fetch(&self, item_id: i64, kind: CrawlKind) {
        let cache = self.cache.clone();
        let tx = self.message_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = cache.crawl_item_data(item_id, Some(kind)).await;
            let _ = tx.send(AppMessage::CrawlDataLoaded {
                generation,
                item_id,
                result,
            });
        });
    }

    /// Force-refresh one cache key; the result is routed to the same message
    /// variant the key's initial fetch uses.
    fn spawn_refresh(&self, key: QueryKey) {
        let cache = self.cache.clone();
        let tx = self.message_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = cache.refresh(key.clone()).await;
            let _ = tx.send(route_refresh(generation, key, result));
        });
    }

    // ------------------------------------------------------------------
    // Polling
    // ------------------------------------------------------------------

    /// Start the dashboard polls. Stats refresh every 60s, scheduler status
    /// every 30s, for as long as the dashboard is up.
    fn start_polling(&mut self) {
        self.poll_handles
            .push(spawn_poll(self, QueryKey::Stats, STATS_POLL_INTERVAL));
        self.poll_handles.push(spawn_poll(
            self,
            QueryKey::SchedulerStatus,
            SCHEDULER_POLL_INTERVAL,
        ));
    }

    fn stop_polling(&mut self) {
        for handle in self.poll_handles.drain(..) {
            handle.abort();
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Run a mutation on a spawned task, guarded so a second trigger of the
    /// same kind is ignored until the first settles.
    pub fn run_mutation<F>(&mut self, kind: MutationKind, fut: F)
    where
        F: Future<Output = Result<(), ApiError>> + Send + 'static,
    {
        if !self.in_flight.insert(kind) {
            return;
        }
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = fut.await;
            let _ = tx.send(AppMessage::MutationDone { kind, result });
        });
    }

    pub(crate) fn settle_mutation(&mut self, kind: MutationKind) {
        self.in_flight.remove(&kind);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

/// Repeatedly refresh one key until the receiver goes away or the task is
/// aborted. The first tick fires immediately and is skipped; the initial
/// fetch already covered it.
fn spawn_poll(app: &App, key: QueryKey, every: Duration) -> JoinHandle<()> {
    let cache = app.cache.clone();
    let tx = app.message_tx.clone();
    let generation = app.generation;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let result = cache.refresh(key.clone()).await;
            if tx
                .send(route_refresh(generation, key.clone(), result))
                .is_err()
            {
                break;
            }
        }
    })
}

/// Pair a refreshed cache value with its message variant. A value of the
/// wrong variant surfaces as an invalid-response error rather than data.
fn route_refresh(
    generation: u64,
    key: QueryKey,
    result: Result<CachedValue, ApiError>,
) -> AppMessage {
    fn mismatch<T>(value: CachedValue) -> Result<T, ApiError> {
        Err(ApiError::InvalidResponse(format!(
            "unexpected cache payload: {:?}",
            value
        )))
    }

    match key {
        QueryKey::Stats => AppMessage::StatsLoaded(result.and_then(|v| match v {
            CachedValue::Stats(s) => Ok(s),
            other => mismatch(other),
        })),
        QueryKey::SchedulerStatus => {
            AppMessage::SchedulerStatusLoaded(result.and_then(|v| match v {
                CachedValue::SchedulerStatus(s) => Ok(s),
                other => mismatch(other),
            }))
        }
        QueryKey::ScanLogs { .. } => AppMessage::ScanLogsLoaded(result.and_then(|v| match v {
            CachedValue::ScanLogs(logs) => Ok(logs),
            other => mismatch(other),
        })),
        QueryKey::Creators => AppMessage::CreatorsLoaded {
            generation,
            result: result.and_then(|v| match v {
                CachedValue::Creators(c) => Ok(c),
                other => mismatch(other),
            }),
        },
        QueryKey::Posts { page } => AppMessage::PostsLoaded {
            generation,
            page,
            result: result.and_then(|v| match v {
                CachedValue::Posts(p) => Ok(p),
                other => mismatch(other),
            }),
        },
        QueryKey::CrawlItems { kind } => AppMessage::CrawlItemsLoaded {
            generation,
            kind: kind.unwrap_or_default(),
            result: result.and_then(|v| match v {
                CachedValue::CrawlItems(items) => Ok(items),
                other => mismatch(other),
            }),
        },
        QueryKey::CrawlItemData { item_id, .. } => AppMessage::CrawlDataLoaded {
            generation,
            item_id,
            result: result.and_then(|v| match v {
                CachedValue::CrawlItemData(d) => Ok(d),
                other => mismatch(other),
            }),
        },
        // Scoped lists are single-page
        QueryKey::CreatorPosts { .. } => AppMessage::PostsLoaded {
            generation,
            page: 1,
            result: result.and_then(|v| match v {
                CachedValue::Posts(p) => Ok(p),
                other => mismatch(other),
            }),
        },
    }
}
