use crate::listing::ListingRecord;
use serde::Deserialize;

/// A make/model/years filter flagging relevant listings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchCriterion {
    #[serde(default)]
    pub make: String,

    #[serde(default)]
    pub model: String,

    /// Year tokens, at least one of which must appear in the listing title
    #[serde(default)]
    pub years: Vec<String>,
}

impl SearchCriterion {
    pub fn new(make: &str, model: &str, years: &[&str]) -> Self {
        Self {
            make: make.to_string(),
            model: model.to_string(),
            years: years.iter().map(|y| y.to_string()).collect(),
        }
    }

    /// Returns false when the criterion is missing a required part
    pub fn can_match(&self) -> bool {
        !self.make.is_empty() && !self.model.is_empty() && !self.years.is_empty()
    }

    /// Checks this criterion against a normalized title
    ///
    /// Make, model and one of the years must all be substrings of the title.
    /// Plain substring tests are used, so a one-character model such as "3"
    /// matches any title containing that digit.
    pub fn matches_title(&self, normalized_title: &str) -> bool {
        if self.make.is_empty() || self.model.is_empty() {
            return false;
        }

        normalized_title.contains(&self.make.to_lowercase())
            && normalized_title.contains(&self.model.to_lowercase())
            && self
                .years
                .iter()
                .any(|year| normalized_title.contains(year.as_str()))
    }
}

/// Finds the first criterion matching a listing
///
/// Criteria are tried in configured order and the first hit wins; there is no
/// scoring. The year check runs against the normalized title, independent of
/// the listing's extracted `year` field.
///
/// # Examples
///
/// ```
/// use listing_watch::listing::{find_match, ListingRecord, SearchCriterion};
///
/// let criteria = vec![SearchCriterion::new("bmw", "3", &["2015", "2016"])];
/// let listing = ListingRecord::new("123", Some("BMW 320i 2015 diesel".into()), None);
///
/// assert_eq!(find_match(&listing, &criteria), Some(&criteria[0]));
/// ```
pub fn find_match<'a>(
    listing: &ListingRecord,
    criteria: &'a [SearchCriterion],
) -> Option<&'a SearchCriterion> {
    criteria
        .iter()
        .find(|criterion| criterion.matches_title(&listing.normalized_title))
}
