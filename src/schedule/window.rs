//! Time-of-day windows and jitter ranges

use crate::config::WindowEntry;
use crate::ConfigError;
use chrono::NaiveTime;

/// Longest delay accepted between two cycles (seconds)
pub const MAX_DELAY_SECS: u64 = 24 * 60 * 60;

/// Inclusive delay bounds in seconds
///
/// The upper bound is at least one second and at most [`MAX_DELAY_SECS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl JitterRange {
    pub fn new(min_secs: u64, max_secs: u64) -> Result<Self, ConfigError> {
        if min_secs > max_secs {
            return Err(ConfigError::Validation(format!(
                "jitter minimum ({}s) must not exceed maximum ({}s)",
                min_secs, max_secs
            )));
        }
        if max_secs == 0 {
            return Err(ConfigError::Validation(
                "jitter maximum must be >= 1s".to_string(),
            ));
        }
        if max_secs > MAX_DELAY_SECS {
            return Err(ConfigError::Validation(format!(
                "jitter maximum ({}s) must not exceed {}s",
                max_secs, MAX_DELAY_SECS
            )));
        }
        Ok(Self { min_secs, max_secs })
    }

    /// Draws a uniformly random delay in `[min_secs, max_secs]`
    pub fn sample(&self, rng: &mut fastrand::Rng) -> u64 {
        rng.u64(self.min_secs..=self.max_secs)
    }

    pub fn contains(&self, seconds: u64) -> bool {
        (self.min_secs..=self.max_secs).contains(&seconds)
    }
}

/// A recurring daily window with its own delay bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub range: JitterRange,
}

impl ScheduleWindow {
    pub fn new(start: NaiveTime, end: NaiveTime, range: JitterRange) -> Result<Self, ConfigError> {
        if start == end {
            return Err(ConfigError::Validation(format!(
                "schedule window start and end are both {}",
                start.format("%H:%M")
            )));
        }
        Ok(Self { start, end, range })
    }

    /// Builds a window from a config entry
    ///
    /// Entry bounds are minutes and are converted to seconds.
    pub fn from_entry(entry: &WindowEntry) -> Result<Self, ConfigError> {
        let start = parse_time_of_day(&entry.start)?;
        let end = parse_time_of_day(&entry.end)?;
        let range = JitterRange::new(minutes_to_secs(entry.min)?, minutes_to_secs(entry.max)?)?;
        Self::new(start, end, range)
    }

    /// Returns true if `time` lies in `[start, end)`, wrapping past midnight
    /// when `end` is earlier than `start`
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start < self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

fn minutes_to_secs(minutes: u64) -> Result<u64, ConfigError> {
    minutes.checked_mul(60).ok_or_else(|| {
        ConfigError::Validation(format!("window bound of {} minutes is too large", minutes))
    })
}

/// Parses a time of day
///
/// # Accepted Formats
///
/// - `"HH:MM"`, e.g. `"23:00"`
/// - a daily cron expression `"M H * * *"`, e.g. `"10 10 * * *"` for 10:10
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use listing_watch::schedule::parse_time_of_day;
///
/// assert_eq!(parse_time_of_day("05:30").unwrap(), NaiveTime::from_hms_opt(5, 30, 0).unwrap());
/// assert_eq!(parse_time_of_day("10 10 * * *").unwrap(), NaiveTime::from_hms_opt(10, 10, 0).unwrap());
/// ```
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ConfigError> {
    let value = value.trim();
    let invalid = || ConfigError::InvalidTime(value.to_string());

    if value.contains(':') {
        return NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| invalid());
    }

    let fields: Vec<&str> = value.split_whitespace().collect();
    if fields.len() != 5 || fields[2..].iter().any(|f| *f != "*") {
        return Err(invalid());
    }

    let minute: u32 = fields[0].parse().map_err(|_| invalid())?;
    let hour: u32 = fields[1].parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}
