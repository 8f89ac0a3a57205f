//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from Unix seconds, `None` if out of range.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    ///
    /// Saturates at the earliest representable time, or the latest for a
    /// negative count that runs past it.
    pub fn minus_days(&self, days: i64) -> Self {
        let shifted = Duration::try_days(days).and_then(|d| self.0.checked_sub_signed(d));
        match shifted {
            Some(dt) => Self(dt),
            None if days >= 0 => Self(DateTime::<Utc>::MIN_UTC),
            None => Self(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// True when this timestamp falls in the trailing window `(as_of - days, as_of]`.
    pub fn is_within_trailing_days(&self, as_of: &Timestamp, days: u32) -> bool {
        let window_start = as_of.minus_days(i64::from(days));
        self.is_after(&window_start) && !self.is_after(as_of)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
