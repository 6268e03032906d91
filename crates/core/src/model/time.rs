use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One row of the time dimension, keyed by the exact play timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: NaiveDateTime,
    pub hour: i32,
    pub day: i32,
    /// ISO 8601 week of the year.
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// Monday is 0, Sunday is 6.
    pub weekday: i32,
}

impl TimeRow {
    pub fn from_start_time(start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            hour: start_time.hour() as i32,
            day: start_time.day() as i32,
            week: start_time.iso_week().week() as i32,
            month: start_time.month() as i32,
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday() as i32,
        }
    }
}
