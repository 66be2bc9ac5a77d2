//! Per-screen view state.
//!
//! Each screen owns a state container holding the raw data it last received
//! plus the user's filter/selection/input state. Filtering is a pure
//! projection over the raw data, recomputed lazily behind a dirty flag.

mod crawl_view;
mod creators_view;
mod posts_view;

pub use crawl_view::{CrawlForm, CrawlViewState};
pub use creators_view::CreatorsViewState;
pub use posts_view::PostsViewState;

/// Post list category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    /// Everything that passes the other filters
    #[default]
    All,
    /// Only posts the analysis recommends engaging with
    Engage,
    /// Only posts it recommends skipping
    NoEngage,
    /// Only posts from today's calendar date (UTC)
    Today,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::All,
        Category::Engage,
        Category::NoEngage,
        Category::Today,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Engage => "Engage",
            Category::NoEngage => "Skip",
            Category::Today => "Today",
        }
    }

    pub fn next(&self) -> Category {
        match self {
            Category::All => Category::Engage,
            Category::Engage => Category::NoEngage,
            Category::NoEngage => Category::Today,
            Category::Today => Category::All,
        }
    }
}

/// How the post list is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    Rows,
}

impl ViewMode {
    pub fn toggle(&self) -> ViewMode {
        match self {
            ViewMode::Grid => ViewMode::Rows,
            ViewMode::Rows => ViewMode::Grid,
        }
    }
}
