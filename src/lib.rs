//! Feedmill - web-administered RSS/Atom aggregator.
//!
//! A concurrent ingestion engine over a SQLite store, fronted by a JSON
//! admin API and a small housekeeping CLI.

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod logging;
pub mod seed;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{FeedmillError, Result};
pub use feed::{
    ActivityLog, FeedFetcher, FeedSelection, FetchFeed, IngestEngine, IngestStats,
    FETCH_POOL_SIZE,
};
