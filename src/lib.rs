//! Listing Watch: a polite classified-listings watcher
//!
//! This crate periodically fetches a vehicle listings page, matches the
//! listings against user-defined search criteria, remembers what it has
//! already reported, and emails a notification for every new match.

pub mod config;
pub mod listing;
pub mod notify;
pub mod output;
pub mod schedule;
pub mod scrape;
pub mod storage;

use thiserror::Error;

/// Main error type for Listing Watch operations
///
/// Collects the failures that stop the watcher at startup or end a
/// one-shot mode. Errors inside a running cycle are downgraded there instead.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store read warning: {0}")]
    StoreRead(#[from] storage::StoreReadWarning),

    #[error("Transport error: {0}")]
    Transport(#[from] notify::TransportError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Environment variable {0} must be set")]
    MissingEnv(String),
}

/// Page fetch errors
///
/// A fetch failure never aborts a cycle, it is downgraded to an empty
/// listing set by the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url} after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Result type alias for Listing Watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

// Re-export commonly used types
pub use config::Config;
pub use listing::{find_match, ListingRecord, SearchCriterion};
pub use schedule::{JitterRange, ScheduleWindow, Scheduler};
pub use scrape::{CycleReport, ScrapeCycle};
pub use storage::{JsonFileStore, ListingStore, SeenListings};
