use chrono::{DateTime, NaiveDateTime};

use crate::error::{PlaylogError, Result};

/// Converts a millisecond unix epoch into a UTC wall-clock timestamp.
pub fn timestamp_from_epoch_ms(ms: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| PlaylogError::Parse(format!("timestamp out of range: {ms}ms")))
}
