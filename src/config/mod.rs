//! Configuration module for Listing Watch
//!
//! This module handles loading, parsing, and validating the TOML
//! configuration file, and reading mail credentials from the environment.
//!
//! # Example
//!
//! ```no_run
//! use listing_watch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("watch.toml")).unwrap();
//! println!("Watching {} with {} criteria", config.source.url, config.criteria.len());
//! ```

mod env;
mod parser;
mod types;
mod validation;

// Re-export types
pub use env::MailCredentials;
pub use types::{Config, MailConfig, ScheduleConfig, SourceConfig, StoreConfig, WindowEntry};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
