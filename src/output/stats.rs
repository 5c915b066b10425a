//! Statistics over the listing store
//!
//! This module provides functionality for summarizing the recorded listings
//! and displaying the result.

use crate::listing::{find_match, SearchCriterion};
use crate::storage::{ListingStore, SeenListings, StoreReadWarning};
use std::collections::BTreeMap;

/// Listing store statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Number of recorded listings
    pub total_listings: usize,

    /// Listings with a known link
    pub with_link: usize,

    /// Listings per extracted year; unknown years are not counted
    pub by_year: BTreeMap<String, usize>,

    /// Listings per currently configured criterion ("make model")
    pub by_criterion: BTreeMap<String, usize>,

    /// Listings no current criterion matches any more
    pub unmatched: usize,
}

/// Loads statistics from a store
///
/// Unlike a cycle, a missing or corrupt store is reported to the caller.
///
/// # Arguments
///
/// * `store` - The store to summarize
/// * `criteria` - Current criteria, used to group the listings
pub fn load_statistics(
    store: &dyn ListingStore,
    criteria: &[SearchCriterion],
) -> Result<StoreStatistics, StoreReadWarning> {
    let seen = SeenListings::from_records(store.load()?);
    Ok(compute_statistics(&seen, criteria))
}

/// Computes statistics over an in-memory history
pub fn compute_statistics(seen: &SeenListings, criteria: &[SearchCriterion]) -> StoreStatistics {
    let mut stats = StoreStatistics {
        total_listings: seen.len(),
        ..Default::default()
    };

    for record in seen.records() {
        if record.url.is_some() {
            stats.with_link += 1;
        }

        if let Some(year) = &record.year {
            *stats.by_year.entry(year.clone()).or_insert(0) += 1;
        }

        match find_match(record, criteria) {
            Some(criterion) => {
                let key = format!("{} {}", criterion.make, criterion.model);
                *stats.by_criterion.entry(key).or_insert(0) += 1;
            }
            None => stats.unmatched += 1,
        }
    }

    stats
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Listing Store Statistics ===\n");

    println!("Overview:");
    println!("  Recorded listings: {}", stats.total_listings);
    println!("  With link: {}", stats.with_link);
    println!();

    if !stats.by_criterion.is_empty() {
        println!("Listings by Criterion:");
        for (criterion, count) in &stats.by_criterion {
            println!("  {}: {}", criterion, count);
        }
        println!();
    }

    if stats.unmatched > 0 {
        println!("No longer matching current criteria: {}", stats.unmatched);
        println!();
    }

    if !stats.by_year.is_empty() {
        println!("Listings by Year:");
        for (year, count) in stats.by_year.iter().rev() {
            println!("  {}: {}", year, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListingRecord;
    use crate::storage::JsonFileStore;
    use tempfile::TempDir;

    fn history() -> SeenListings {
        SeenListings::from_records(vec![
            ListingRecord::new(
                "1",
                Some("BMW 320i 2015".to_string()),
                Some("https://soov.ee/1".to_string()),
            ),
            ListingRecord::new("2", Some("BMW 330d 2015".to_string()), None),
            ListingRecord::new("3", Some("Volvo V70 2008".to_string()), None),
        ])
    }

    #[test]
    fn test_compute_statistics() {
        let criteria = vec![SearchCriterion::new("bmw", "3", &["2015"])];

        let stats = compute_statistics(&history(), &criteria);

        assert_eq!(stats.total_listings, 3);
        assert_eq!(stats.with_link, 1);
        assert_eq!(stats.by_year.get("2015"), Some(&2));
        assert_eq!(stats.by_year.get("2008"), Some(&1));
        assert_eq!(stats.by_criterion.get("bmw 3"), Some(&2));
        assert_eq!(stats.unmatched, 1);
    }

    #[test]
    fn test_empty_history() {
        let stats = compute_statistics(&SeenListings::new(), &[]);
        assert_eq!(stats, StoreStatistics::default());
    }

    #[test]
    fn test_load_statistics_reports_missing_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("seen.json"));

        let err = load_statistics(&store, &[]).unwrap_err();
        assert!(err.is_missing());
    }
}
