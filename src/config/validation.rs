use crate::config::types::{Config, MailConfig, ScheduleConfig, SourceConfig, StoreConfig};
use crate::listing::SearchCriterion;
use crate::schedule::{JitterRange, ScheduleWindow};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_store_config(&config.store)?;
    validate_mail_config(&config.mail)?;
    validate_schedule_config(&config.schedule)?;
    validate_criteria(&config.criteria);
    Ok(())
}

/// Validates the listings page configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid source url '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Source url '{}' must use http or https",
            config.url
        )));
    }

    validate_selector("listing-selector", &config.listing_selector)?;
    validate_selector("title-selector", &config.title_selector)?;

    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {}", name, selector, e)))
}

/// Validates store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "store path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates mail configuration
fn validate_mail_config(config: &MailConfig) -> Result<(), ConfigError> {
    if config.smtp_host.trim().is_empty() {
        return Err(ConfigError::Validation(
            "smtp-host cannot be empty".to_string(),
        ));
    }

    if config.smtp_port == 0 {
        return Err(ConfigError::Validation(
            "smtp-port must be >= 1".to_string(),
        ));
    }

    if config.send_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "send-timeout-secs must be >= 1".to_string(),
        ));
    }

    if let Some(sender) = &config.sender {
        if !sender.contains('@') {
            return Err(ConfigError::Validation(format!(
                "Invalid sender address: '{}'",
                sender
            )));
        }
    }

    Ok(())
}

/// Validates the delay policy and every schedule window
fn validate_schedule_config(config: &ScheduleConfig) -> Result<(), ConfigError> {
    if config.fallback_min_secs > config.fallback_max_secs {
        return Err(ConfigError::Validation(format!(
            "fallback-min-secs ({}) must not exceed fallback-max-secs ({})",
            config.fallback_min_secs, config.fallback_max_secs
        )));
    }

    JitterRange::new(config.fallback_min_secs, config.fallback_max_secs)?;

    for entry in &config.windows {
        ScheduleWindow::from_entry(entry)?;
    }

    Ok(())
}

/// Criteria that can never match are accepted but reported
fn validate_criteria(criteria: &[SearchCriterion]) {
    if criteria.is_empty() {
        tracing::warn!("No search criteria configured, no listing will ever match");
    }

    for (index, criterion) in criteria.iter().enumerate() {
        if !criterion.can_match() {
            tracing::warn!(
                "Criterion #{} (make '{}', model '{}', {} years) can never match",
                index + 1,
                criterion.make,
                criterion.model,
                criterion.years.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowEntry;

    fn source(url: &str) -> SourceConfig {
        SourceConfig {
            url: url.to_string(),
            listing_selector: ".item-list".to_string(),
            title_selector: ".add-title a".to_string(),
            fetch_timeout_secs: 30,
            user_agent: "TestAgent/1.0".to_string(),
        }
    }

    #[test]
    fn test_validate_source_url() {
        assert!(validate_source_config(&source("https://soov.ee/listings.html")).is_ok());
        assert!(validate_source_config(&source("http://127.0.0.1:8080/")).is_ok());

        assert!(matches!(
            validate_source_config(&source("not a url")),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_source_config(&source("ftp://example.com/listings")),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_selectors() {
        let mut config = source("https://example.com/");
        config.title_selector = "a[[[".to_string();
        assert!(matches!(
            validate_source_config(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_validate_mail_sender() {
        let mut config = MailConfig::default();
        assert!(validate_mail_config(&config).is_ok());

        config.sender = Some("Listing Watch <watch@example.com>".to_string());
        assert!(validate_mail_config(&config).is_ok());

        config.sender = Some("Listing Watch".to_string());
        assert!(validate_mail_config(&config).is_err());
    }

    #[test]
    fn test_validate_schedule_windows() {
        let mut config = ScheduleConfig::default();
        config.windows.push(WindowEntry {
            start: "23:00".to_string(),
            end: "05:00".to_string(),
            min: 3,
            max: 6,
        });
        assert!(validate_schedule_config(&config).is_ok());

        config.windows.push(WindowEntry {
            start: "25:00".to_string(),
            end: "05:00".to_string(),
            min: 3,
            max: 6,
        });
        assert!(matches!(
            validate_schedule_config(&config),
            Err(ConfigError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_validate_fallback_range() {
        let config = ScheduleConfig {
            fallback_min_secs: 0,
            fallback_max_secs: 0,
            windows: Vec::new(),
        };
        assert!(validate_schedule_config(&config).is_err());
    }

    #[test]
    fn test_validate_fallback_upper_limit() {
        let config = ScheduleConfig {
            fallback_min_secs: 60,
            fallback_max_secs: 10_000_000_000_000_000,
            windows: Vec::new(),
        };
        assert!(matches!(
            validate_schedule_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_window_without_delay() {
        let mut config = ScheduleConfig::default();
        config.windows.push(WindowEntry {
            start: "00:00".to_string(),
            end: "23:59".to_string(),
            min: 0,
            max: 0,
        });
        assert!(matches!(
            validate_schedule_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
