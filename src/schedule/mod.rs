//! Scheduling module for Listing Watch
//!
//! This module provides time-of-day windows, jitter ranges and the scheduler
//! loop that spaces out scrape cycles.

mod scheduler;
mod window;

pub use scheduler::Scheduler;
pub use window::{parse_time_of_day, JitterRange, ScheduleWindow};
