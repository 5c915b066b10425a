//! JSON file storage implementation
//!
//! This module provides a flat-file implementation of the ListingStore trait:
//! one pretty-printed JSON array, replaced in full on every save.

use crate::listing::ListingRecord;
use crate::storage::traits::{ListingStore, StoreReadWarning, StoreWriteError};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// JSON file storage backend
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`
    ///
    /// The file is not touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ListingStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ListingRecord>, StoreReadWarning> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreReadWarning::Missing {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(StoreReadWarning::Unreadable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| StoreReadWarning::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, records: &[ListingRecord]) -> Result<(), StoreWriteError> {
        let json = serde_json::to_string_pretty(records)?;
        let io_error = |source: std::io::Error| StoreWriteError::Io {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        // Written beside the store and renamed over it, so a crash mid-write
        // leaves the previous history intact.
        let mut staged = NamedTempFile::new_in(parent).map_err(io_error)?;
        staged.write_all(json.as_bytes()).map_err(io_error)?;
        staged.as_file().sync_all().map_err(io_error)?;
        staged.persist(&self.path).map_err(|e| io_error(e.error))?;

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
