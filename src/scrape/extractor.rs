//! Listing extractor
//!
//! Turns a fetched listings page into listing records. Extraction is a pure
//! transform; missing sub-fields become absent values instead of dropping the
//! listing.

use crate::config::SourceConfig;
use crate::listing::ListingRecord;
use crate::scrape::fetcher::RenderedPage;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Extracts listing records using configured selectors
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    listing: Selector,
    title: Selector,
}

impl ListingExtractor {
    /// Creates an extractor
    ///
    /// # Arguments
    ///
    /// * `listing_selector` - Matches one element per listing
    /// * `title_selector` - Matches the title anchor inside a listing element
    pub fn new(listing_selector: &str, title_selector: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            listing: parse_selector(listing_selector)?,
            title: parse_selector(title_selector)?,
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, ConfigError> {
        Self::new(&config.listing_selector, &config.title_selector)
    }

    /// Extracts every listing on the page, in document order
    ///
    /// # Extraction Rules
    ///
    /// - `id`: the element's `id` attribute minus its first character
    ///   (`"a12345"` → `"12345"`); elements without one are skipped
    /// - `title`: trimmed text of the title anchor, absent if there is no
    ///   anchor or it has no text
    /// - `url`: the anchor's `href` resolved against the page URL
    /// - `year`: first standalone four-digit token of the title
    pub fn extract(&self, page: &RenderedPage) -> Vec<ListingRecord> {
        let document = Html::parse_document(&page.html);
        let mut listings = Vec::new();

        for element in document.select(&self.listing) {
            let Some(id) = listing_id(&element) else {
                tracing::debug!("Skipping listing element without an identifier");
                continue;
            };

            let anchor = element.select(&self.title).next();
            let title = anchor.and_then(|a| {
                let text = a.text().collect::<String>();
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            });
            let url = anchor
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve_link(href, &page.url));

            listings.push(ListingRecord::new(id, title, url));
        }

        tracing::debug!("Extracted {} listings from {}", listings.len(), page.url);
        listings
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", selector, e)))
}

/// Strips the one-character prefix from the element identifier
fn listing_id(element: &ElementRef<'_>) -> Option<String> {
    let raw = element.value().id()?;
    let mut chars = raw.chars();
    chars.next()?;
    let id = chars.as_str();
    (!id.is_empty()).then(|| id.to_string())
}

/// Resolves a link href to an absolute http(s) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> RenderedPage {
        RenderedPage {
            url: Url::parse("https://soov.ee/577-autod/3/listings.html").unwrap(),
            html: html.to_string(),
        }
    }

    fn extractor() -> ListingExtractor {
        ListingExtractor::new(".item-list", ".add-title a").unwrap()
    }

    #[test]
    fn test_extract_full_listing() {
        let html = r#"
            <div class="item-list" id="a4711">
                <h5 class="add-title"><a href="/4711-bmw-320i.html">  BMW 320i 2015 diesel </a></h5>
            </div>"#;

        let listings = extractor().extract(&page(html));

        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.id, "4711");
        assert_eq!(listing.title.as_deref(), Some("BMW 320i 2015 diesel"));
        assert_eq!(listing.normalized_title, "bmw320i2015diesel");
        assert_eq!(listing.url.as_deref(), Some("https://soov.ee/4711-bmw-320i.html"));
        assert_eq!(listing.year.as_deref(), Some("2015"));
    }

    #[test]
    fn test_missing_title_keeps_listing() {
        let html = r#"<div class="item-list" id="a1"><p>No title here</p></div>"#;

        let listings = extractor().extract(&page(html));

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "1");
        assert_eq!(listings[0].title, None);
        assert_eq!(listings[0].url, None);
        assert_eq!(listings[0].year, None);
    }

    #[test]
    fn test_anchor_without_href() {
        let html = r#"<div class="item-list" id="a2"><span class="add-title"><a>Audi A4</a></span></div>"#;

        let listings = extractor().extract(&page(html));

        assert_eq!(listings[0].title.as_deref(), Some("Audi A4"));
        assert_eq!(listings[0].url, None);
    }

    #[test]
    fn test_nested_title_text_is_joined() {
        let html = r#"<div class="item-list" id="a3"><span class="add-title"><a href="x">Volvo <b>V70</b> 2008</a></span></div>"#;

        let listings = extractor().extract(&page(html));

        assert_eq!(listings[0].title.as_deref(), Some("Volvo V70 2008"));
        assert_eq!(listings[0].url.as_deref(), Some("https://soov.ee/577-autod/3/x"));
    }

    #[test]
    fn test_skip_element_without_id() {
        let html = r#"
            <div class="item-list"><span class="add-title"><a href="/1">One</a></span></div>
            <div class="item-list" id="a"><span class="add-title"><a href="/2">Two</a></span></div>
            <div class="item-list" id="a3"><span class="add-title"><a href="/3">Three</a></span></div>"#;

        let listings = extractor().extract(&page(html));

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "3");
    }

    #[test]
    fn test_preserves_document_order() {
        let html = r#"
            <div class="item-list" id="a30"></div>
            <div class="item-list" id="a10"></div>
            <div class="item-list" id="a20"></div>"#;

        let ids: Vec<String> = extractor()
            .extract(&page(html))
            .into_iter()
            .map(|l| l.id)
            .collect();

        assert_eq!(ids, vec!["30", "10", "20"]);
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        let html = r#"<div class="item-list" id="a5"><span class="add-title"><a href="/5">Opel Astra 2011"#;

        let listings = extractor().extract(&page(html));

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].year.as_deref(), Some("2011"));
    }

    #[test]
    fn test_no_listings() {
        assert!(extractor().extract(&page("<html><body></body></html>")).is_empty());
    }

    #[test]
    fn test_skip_javascript_link() {
        let html = r#"<div class="item-list" id="a6"><span class="add-title"><a href="javascript:void(0)">Fiat</a></span></div>"#;

        let listings = extractor().extract(&page(html));

        assert_eq!(listings[0].url, None);
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(
            ListingExtractor::new("div[[", "a"),
            Err(ConfigError::InvalidSelector(_))
        ));
    }
}
