use crate::listing::SearchCriterion;
use serde::Deserialize;

/// Main configuration structure for Listing Watch
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub criteria: Vec<SearchCriterion>,
}

/// Listings page and the selectors used to pull listings out of it
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// URL of the listings page
    pub url: String,

    /// Selector matching one element per listing
    #[serde(rename = "listing-selector", default = "default_listing_selector")]
    pub listing_selector: String,

    /// Selector for the title anchor, relative to a listing element
    #[serde(rename = "title-selector", default = "default_title_selector")]
    pub title_selector: String,

    /// Upper bound on a single page fetch (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// User agent sent with page requests
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Listing store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON file holding already recorded listings
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Outgoing mail configuration
///
/// Credentials and the recipient come from the environment, see
/// [`MailCredentials`](crate::config::MailCredentials).
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Sender identity, e.g. `"Listing Watch <watch@example.com>"`.
    /// Falls back to `EMAIL_USER` when unset.
    #[serde(default)]
    pub sender: Option<String>,

    #[serde(rename = "smtp-host", default = "default_smtp_host")]
    pub smtp_host: String,

    /// Implicit-TLS SMTP port
    #[serde(rename = "smtp-port", default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Upper bound on a single send (seconds)
    #[serde(rename = "send-timeout-secs", default = "default_send_timeout")]
    pub send_timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: None,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            send_timeout_secs: default_send_timeout(),
        }
    }
}

/// Delay policy between cycles
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Lower jitter bound when no window matches (seconds)
    #[serde(rename = "fallback-min-secs", default = "default_fallback_min")]
    pub fallback_min_secs: u64,

    /// Upper jitter bound when no window matches (seconds)
    #[serde(rename = "fallback-max-secs", default = "default_fallback_max")]
    pub fallback_max_secs: u64,

    /// Time-of-day windows, first match wins
    #[serde(rename = "window", default)]
    pub windows: Vec<WindowEntry>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            fallback_min_secs: default_fallback_min(),
            fallback_max_secs: default_fallback_max(),
            windows: Vec::new(),
        }
    }
}

/// Raw window entry as written in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct WindowEntry {
    /// Window start, `"HH:MM"` or `"M H * * *"`
    pub start: String,

    /// Window end (exclusive), same formats as `start`
    pub end: String,

    /// Lower delay bound inside this window (minutes)
    pub min: u64,

    /// Upper delay bound inside this window (minutes)
    pub max: u64,
}

fn default_listing_selector() -> String {
    ".item-list".to_string()
}

fn default_title_selector() -> String {
    ".add-title a".to_string()
}

fn default_fetch_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        .to_string()
}

fn default_store_path() -> String {
    "searchResults.json".to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_send_timeout() -> u64 {
    30
}

fn default_fallback_min() -> u64 {
    60
}

fn default_fallback_max() -> u64 {
    300
}
