//! Time normalization: wire-format timestamps to comparable epoch instants.

use chrono::DateTime;

use crate::error::ScheduleError;

/// Parse an RFC 3339 timestamp into epoch milliseconds.
pub fn parse_instant(raw: &str) -> Result<i64, ScheduleError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| ScheduleError::InvalidTimestamp(raw.to_string()))
}

/// Validate the `start < end` ordering invariant.
///
/// Checked at the schema boundary and again defensively before commit,
/// since an update may merge partial time fields.
pub fn check_ordered(start_ms: i64, end_ms: i64) -> Result<(), ScheduleError> {
    if start_ms >= end_ms {
        return Err(ScheduleError::InvalidTimeRange { start_ms, end_ms });
    }
    Ok(())
}

/// Parse and validate a wire-format time window.
pub fn normalize_window(start: &str, end: &str) -> Result<(i64, i64), ScheduleError> {
    let start_ms = parse_instant(start)?;
    let end_ms = parse_instant(end)?;
    check_ordered(start_ms, end_ms)?;
    Ok((start_ms, end_ms))
}
