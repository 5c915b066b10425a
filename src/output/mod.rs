//! Output module for reporting on recorded listings
//!
//! This module handles summarizing the listing store for the `--stats` mode.

pub mod stats;

pub use stats::{compute_statistics, load_statistics, print_statistics, StoreStatistics};
