//! Compact `YYYYMMDDHHMM` timestamps.
//!
//! Acquisition times are stored as plain integers so that range filters
//! reduce to integer comparisons. Source text is expected in the ISO-like
//! layout written by the acquisition software (`2021-03-04T10:15:00`); only
//! the fixed character offsets of year, month, day, hour and minute are read.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::ExtractionError;

/// Lower bound used when no start-time filter is given.
pub const EARLIEST_TIMESTAMP: i64 = 0;

/// Character spans of each component in the source text.
const FIELD_SPANS: [(usize, usize); 5] = [(0, 4), (5, 7), (8, 10), (11, 13), (14, 16)];

/// Parses acquisition time text into a compact `YYYYMMDDHHMM` integer.
///
/// Empty text means the file recorded no time and yields `Ok(None)`.
///
/// # Errors
/// Returns [`ExtractionError::MalformedTimestamp`] if the text is too short or
/// any component is not made of ASCII digits.
pub fn parse_compact_timestamp(
    field: &'static str,
    text: &str,
) -> Result<Option<i64>, ExtractionError> {
    if text.is_empty() {
        return Ok(None);
    }

    let malformed = || ExtractionError::MalformedTimestamp {
        field,
        value: text.to_string(),
    };

    let mut digits = String::with_capacity(12);
    for (start, end) in FIELD_SPANS {
        let part = text.get(start..end).ok_or_else(malformed)?;
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        digits.push_str(part);
    }

    digits.parse::<i64>().map(Some).map_err(|_| malformed())
}

/// Encodes a date and time as `YYYYMMDDHHMM`.
#[must_use]
pub fn compact_timestamp(datetime: NaiveDateTime) -> i64 {
    i64::from(datetime.year()) * 100_000_000
        + i64::from(datetime.month()) * 1_000_000
        + i64::from(datetime.day()) * 10_000
        + i64::from(datetime.hour()) * 100
        + i64::from(datetime.minute())
}

/// The local wall-clock time as `YYYYMMDDHHMM`.
#[must_use]
pub fn now_compact() -> i64 {
    compact_timestamp(chrono::Local::now().naive_local())
}
