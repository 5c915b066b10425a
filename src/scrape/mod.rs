//! Scrape module for fetching and processing the listings page
//!
//! This module contains the core pipeline, including:
//! - Page fetching behind the `PageSource` trait
//! - Listing extraction with configurable selectors
//! - The fetch → match → dedupe → notify → persist cycle

mod cycle;
mod extractor;
mod fetcher;

pub use cycle::{CycleReport, ScrapeCycle};
pub use extractor::ListingExtractor;
pub use fetcher::{build_http_client, HttpPageSource, PageSource, RenderedPage};
