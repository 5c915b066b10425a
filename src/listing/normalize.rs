use regex::Regex;
use std::sync::LazyLock;

/// A standalone four-digit token, e.g. the model year in "BMW 320i 2015"
///
/// Word boundaries are ASCII-only, so a non-ASCII letter such as "Ü" does
/// not glue itself to the digits.
static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{4}(?-u:\b)").expect("year pattern is a valid regex")
});

/// Normalizes a listing title for matching
///
/// # Normalization Steps
///
/// 1. Lowercase the whole title
/// 2. Drop every character outside `[a-z0-9]`, including whitespace,
///    punctuation and non-ASCII letters
///
/// # Examples
///
/// ```
/// use listing_watch::listing::normalize_title;
///
/// assert_eq!(normalize_title("BMW 320i 2015 diesel"), "bmw320i2015diesel");
/// assert_eq!(normalize_title("  Škoda Octavia, 1.6 TDI "), "kodaoctavia16tdi");
/// ```
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Returns the first standalone four-digit token of a raw title
///
/// Digits glued to letters ("320i2015") are not a token; the search runs on
/// the raw title, never on the normalized one.
///
/// # Examples
///
/// ```
/// use listing_watch::listing::extract_year;
///
/// assert_eq!(extract_year("Audi A4 2012, 2.0 TDI"), Some("2012".to_string()));
/// assert_eq!(extract_year("Audi A4 Avant"), None);
/// ```
pub fn extract_year(title: &str) -> Option<String> {
    YEAR_PATTERN.find(title).map(|m| m.as_str().to_string())
}
