//! Scrape cycle - one fetch, match, dedupe, notify and persist pass
//!
//! Every boundary failure is isolated to its own step:
//! - a failed fetch counts as an empty page
//! - an unreadable store counts as an empty history
//! - a failed notification is logged and skipped
//! - a failed save is logged and reported
//!
//! so a cycle always completes and the scheduler can carry on.

use crate::config::Config;
use crate::listing::{find_match, ListingRecord, SearchCriterion};
use crate::notify::{match_message, Notifier};
use crate::scrape::extractor::ListingExtractor;
use crate::scrape::fetcher::PageSource;
use crate::storage::{ListingStore, SeenListings};
use crate::{ConfigError, FetchError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Summary of one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Listings extracted from the page
    pub extracted: usize,

    /// Listings matching a criterion
    pub matched: usize,

    /// Matches skipped because they were recorded before
    pub already_recorded: usize,

    /// New matches recorded during this cycle
    pub found: usize,

    /// Notifications accepted by the transport
    pub notified: usize,

    /// Notifications that failed
    pub notify_failed: usize,

    /// The page could not be fetched
    pub fetch_failed: bool,

    /// The updated history was written back
    pub persisted: bool,

    /// Records in the history at the end of the cycle
    pub stored: usize,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} extracted, {} matched, {} already recorded, {} new, {} notified, {} failed notifications",
            self.extracted,
            self.matched,
            self.already_recorded,
            self.found,
            self.notified,
            self.notify_failed
        )
    }
}

/// Runs scrape cycles against one listings page
pub struct ScrapeCycle {
    page_url: Url,
    source: Arc<dyn PageSource>,
    extractor: ListingExtractor,
    criteria: Vec<SearchCriterion>,
    store: Arc<dyn ListingStore>,
    notifier: Notifier,
    recipient: String,
    fetch_timeout: Duration,
}

impl ScrapeCycle {
    /// Creates a cycle from the configuration and its collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the page URL, selectors, criteria and fetch timeout
    /// * `source` - The page fetching collaborator
    /// * `store` - The listing store
    /// * `notifier` - Sends match notifications
    /// * `recipient` - Address receiving the notifications
    pub fn new(
        config: &Config,
        source: Arc<dyn PageSource>,
        store: Arc<dyn ListingStore>,
        notifier: Notifier,
        recipient: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let page_url = Url::parse(&config.source.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.source.url, e)))?;

        Ok(Self {
            page_url,
            source,
            extractor: ListingExtractor::from_config(&config.source)?,
            criteria: config.criteria.clone(),
            store,
            notifier,
            recipient: recipient.into(),
            fetch_timeout: Duration::from_secs(config.source.fetch_timeout_secs),
        })
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    pub fn criteria(&self) -> &[SearchCriterion] {
        &self.criteria
    }

    /// Runs one full cycle
    ///
    /// The cycle:
    /// 1. Fetches and extracts the listings page
    /// 2. Loads the recorded history
    /// 3. Matches each listing in page order, skipping recorded ones
    /// 4. Records and notifies every new match
    /// 5. Writes the full history back, even when nothing changed
    pub async fn run(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let listings = match self.fetch_listings().await {
            Ok(listings) => listings,
            Err(e) => {
                tracing::warn!("Failed to fetch listings page: {}, treating as empty", e);
                report.fetch_failed = true;
                Vec::new()
            }
        };
        report.extracted = listings.len();

        let mut seen = SeenListings::load(self.store.as_ref());

        for listing in listings {
            let Some(criterion) = find_match(&listing, &self.criteria) else {
                tracing::trace!("No criterion matches {}", listing.id);
                continue;
            };
            report.matched += 1;

            if let Some(existing) = seen.get(&listing.id) {
                tracing::info!(
                    "Already recorded listing {} {}",
                    listing.id,
                    existing.url_or_unknown()
                );
                report.already_recorded += 1;
                continue;
            }

            tracing::info!("MATCHED listing {}", listing);
            let (subject, body) = match_message(&listing, criterion);
            seen.append(listing);
            report.found += 1;

            if self.notifier.notify(&self.recipient, &subject, &body).await {
                report.notified += 1;
            } else {
                report.notify_failed += 1;
            }
        }

        tracing::info!(
            "Found {} new listings matching search criteria",
            report.found
        );

        report.stored = seen.len();
        match seen.save(self.store.as_ref()) {
            Ok(()) => {
                report.persisted = true;
                tracing::info!(
                    "Results written to {} ({} listings)",
                    self.store.location(),
                    seen.len()
                );
            }
            Err(e) => {
                tracing::error!(
                    "{}; {} new listings were not recorded and may be reported again",
                    e,
                    report.found
                );
            }
        }

        tracing::debug!("Cycle finished: {}", report);
        report
    }

    async fn fetch_listings(&self) -> Result<Vec<ListingRecord>, FetchError> {
        let page = match tokio::time::timeout(self.fetch_timeout, self.source.fetch(&self.page_url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetchError::Timeout {
                    url: self.page_url.to_string(),
                    seconds: self.fetch_timeout.as_secs(),
                });
            }
        };

        Ok(self.extractor.extract(&page))
    }
}
