use chrono::{DateTime, Utc};
use std::fmt;

/// 100-nanosecond intervals between 1601-01-01 and the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// A timestamp counted in 100-nanosecond ticks since 1601-01-01 00:00:00 UTC.
///
/// The raw tick count is kept verbatim; negative or out-of-range values are not rejected at
/// decode time and simply fail to convert in [`FileTime::to_datetime`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileTime(pub i64);

impl FileTime {
    /// Returns the raw tick count.
    pub fn ticks(self) -> i64 {
        self.0
    }

    /// Converts to an absolute UTC instant, or `None` if the tick count is outside the range
    /// chrono can represent.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let unix_ticks = self.0.checked_sub(UNIX_EPOCH_TICKS)?;
        let secs = unix_ticks.div_euclid(TICKS_PER_SECOND);
        let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
        DateTime::from_timestamp(secs, nanos)
    }

    /// Builds a tick count from a UTC instant.
    pub fn from_datetime(instant: DateTime<Utc>) -> Option<Self> {
        let secs = instant.timestamp().checked_mul(TICKS_PER_SECOND)?;
        let sub = i64::from(instant.timestamp_subsec_nanos() / 100);
        secs.checked_add(sub)?
            .checked_add(UNIX_EPOCH_TICKS)
            .map(FileTime)
    }
}

impl fmt::Display for FileTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(instant) => write!(f, "{}", instant.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "<invalid file time {}>", self.0),
        }
    }
}
