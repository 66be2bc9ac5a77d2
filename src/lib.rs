//! Scout: a terminal dashboard for an Instagram creator-monitoring backend.
//!
//! The backend discovers posts from monitored creators, runs tone analysis
//! on them, and tracks engagement on individual posts and users. This crate
//! is the client: it fetches through a staleness-aware query cache, renders
//! four screens (dashboard, posts, creators, crawl), and exports CSV
//! reports of whatever is on screen.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod events;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;
pub mod view_state;
