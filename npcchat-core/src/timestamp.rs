//! Timestamp normalization — turns raw ISO-8601 strings into sort keys.
//!
//! Inputs come from many clients and are not uniform: some carry a trailing
//! `Z`, some an explicit offset, some have fractional seconds, some none.
//! The only rewrite applied is trimming whitespace and mapping a trailing `Z`
//! to `+00:00`; offsets are kept as written and instants compare on the
//! absolute time line.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::{ChatError, Result};

/// Date-time layouts that carry an explicit offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Date-time layouts without an offset. These land on the UTC line.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A normalized, totally ordered point in time.
///
/// Only ever used as a sort key; the original string is what gets logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(DateTime<FixedOffset>);

impl Instant {
    /// The parsed date-time with its original offset.
    #[must_use]
    pub fn as_datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Parse a raw timestamp into an [`Instant`].
///
/// # Errors
/// Returns [`ChatError::MalformedTimestamp`] if the trimmed string is not an
/// ISO-8601 date or date-time.
pub fn normalize(raw: &str) -> Result<Instant> {
    let trimmed = raw.trim();
    let candidate = match trimmed.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => trimmed.to_string(),
    };

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&candidate, format) {
            return Ok(Instant(parsed));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&candidate, format) {
            return Ok(Instant(parsed.and_utc().fixed_offset()));
        }
    }

    let date = NaiveDate::parse_from_str(&candidate, "%Y-%m-%d").map_err(|e| {
        ChatError::MalformedTimestamp {
            raw: raw.to_string(),
            reason: e.to_string(),
        }
    })?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ChatError::MalformedTimestamp {
            raw: raw.to_string(),
            reason: "date has no midnight".to_string(),
        })?;
    Ok(Instant(midnight.and_utc().fixed_offset()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
