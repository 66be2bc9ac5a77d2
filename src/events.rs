//! Messages flowing from background tasks into the main event loop.
//!
//! Every spawned fetch or mutation reports back through one of these
//! variants over the app's mpsc channel. Fetch results carry the screen
//! generation they were spawned under so results for a screen the user has
//! already left are dropped instead of clobbering fresh state.

use std::path::PathBuf;

use crate::api::ApiError;
use crate::models::{
    CrawlItem, CrawlKind, Creator, PostListResponse, ScanLog, SchedulerStatus, Stats, TrackingData,
};

/// Which mutation a `MutationDone` message settles. Used for the in-flight
/// guard that disables the triggering control while its request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    AddCreator,
    RemoveCreator,
    ScanCreator,
    SchedulerToggle,
    AddCrawlItem,
    RemoveCrawlItem,
    ToggleCrawlItem,
}

#[derive(Debug)]
pub enum AppMessage {
    /// Dashboard stats arrived (initial fetch or the 60s poll)
    StatsLoaded(Result<Stats, ApiError>),
    /// Scheduler status arrived (initial fetch or the 30s poll)
    SchedulerStatusLoaded(Result<SchedulerStatus, ApiError>),
    /// Recent scan-log entries for the dashboard
    ScanLogsLoaded(Result<Vec<ScanLog>, ApiError>),
    /// Monitored creator list
    CreatorsLoaded {
        generation: u64,
        result: Result<Vec<Creator>, ApiError>,
    },
    /// One page of posts
    PostsLoaded {
        generation: u64,
        page: u32,
        result: Result<PostListResponse, ApiError>,
    },
    /// Tracked items for one crawl tab
    CrawlItemsLoaded {
        generation: u64,
        kind: CrawlKind,
        result: Result<Vec<CrawlItem>, ApiError>,
    },
    /// Tracking payload for the open detail view
    CrawlDataLoaded {
        generation: u64,
        item_id: i64,
        result: Result<TrackingData, ApiError>,
    },
    /// A mutation settled; on success the affected lists are refetched
    MutationDone {
        kind: MutationKind,
        result: Result<(), ApiError>,
    },
    /// A CSV report was written (or failed to write)
    ExportDone(Result<PathBuf, String>),
}
