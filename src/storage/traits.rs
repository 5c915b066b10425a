//! Storage traits and error types
//!
//! This module defines the trait interface for listing store backends and
//! the read/write error types they report.

use crate::listing::ListingRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons the persisted history could not be loaded
///
/// Never fatal: the cycle logs the warning and starts from an empty history.
#[derive(Debug, Error)]
pub enum StoreReadWarning {
    #[error("No listing store at {path}")]
    Missing { path: PathBuf },

    #[error("Failed to read listing store {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed listing store {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reasons the updated history could not be persisted
///
/// Fatal for the current cycle's persistence step only. Listings appended in
/// that cycle were never durably recorded and may be reported again.
#[derive(Debug, Error)]
pub enum StoreWriteError {
    #[error("Failed to serialize listing store: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write listing store {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreReadWarning {
    /// Returns true when there simply was no prior state
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Trait for listing store backends
///
/// A store holds the full ordered sequence of recorded listings. It is read
/// completely at the start of a cycle and overwritten completely at the end.
pub trait ListingStore: Send + Sync {
    /// Reads every recorded listing, oldest first
    fn load(&self) -> Result<Vec<ListingRecord>, StoreReadWarning>;

    /// Replaces the persisted content with `records`
    fn save(&self, records: &[ListingRecord]) -> Result<(), StoreWriteError>;

    /// Human-readable location, used in log lines
    fn location(&self) -> String;
}
