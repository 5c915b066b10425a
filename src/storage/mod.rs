//! Storage module for persisting seen listings
//!
//! This module handles the listing history, including:
//! - The flat JSON file backend
//! - Loading with graceful fallback to an empty history
//! - In-memory membership checks and appends during a cycle

mod json;
mod traits;

pub use json::JsonFileStore;
pub use traits::{ListingStore, StoreReadWarning, StoreWriteError};

use crate::listing::ListingRecord;
use std::collections::HashSet;

/// In-memory listing history for the duration of one cycle
///
/// Keeps the records in insertion order plus an id index. Ids are unique:
/// duplicates found while loading are dropped, keeping the first record.
#[derive(Debug, Clone, Default)]
pub struct SeenListings {
    records: Vec<ListingRecord>,
    ids: HashSet<String>,
}

impl SeenListings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from persisted records
    pub fn from_records(records: Vec<ListingRecord>) -> Self {
        let mut seen = Self::new();
        for record in records {
            if record.id.is_empty() {
                tracing::warn!("Dropping stored listing without an id");
                continue;
            }
            if seen.contains(&record.id) {
                tracing::warn!("Dropping duplicate stored listing {}", record.id);
                continue;
            }
            seen.append(record);
        }
        seen
    }

    /// Loads the history from a store, falling back to empty
    ///
    /// A missing store is the normal first-run case and only logged at info
    /// level; unreadable or malformed content is a warning.
    pub fn load(store: &dyn ListingStore) -> Self {
        match store.load() {
            Ok(records) => {
                let seen = Self::from_records(records);
                tracing::debug!(
                    "Loaded {} recorded listings from {}",
                    seen.len(),
                    store.location()
                );
                seen
            }
            Err(warning) if warning.is_missing() => {
                tracing::info!("{}, starting with an empty history", warning);
                Self::new()
            }
            Err(warning) => {
                tracing::warn!("{}, starting with an empty history", warning);
                Self::new()
            }
        }
    }

    /// Returns true if a listing with this id was already recorded
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Records a listing
    ///
    /// Callers check [`contains`](Self::contains) first; an id that is already
    /// present is ignored and `false` is returned.
    pub fn append(&mut self, record: ListingRecord) -> bool {
        if !self.ids.insert(record.id.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Looks up a recorded listing by id
    pub fn get(&self, id: &str) -> Option<&ListingRecord> {
        if !self.contains(id) {
            return None;
        }
        self.records.iter().find(|record| record.id == id)
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the full history back to the store
    pub fn save(&self, store: &dyn ListingStore) -> Result<(), StoreWriteError> {
        store.save(&self.records)
    }
}
