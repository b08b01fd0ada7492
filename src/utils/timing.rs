//! Duration helpers shared by the statistics and the output sink.

use std::time::Duration;

use serde::Serializer;

/// Converts a duration to whole microseconds.
///
/// Saturates at `u64::MAX` rather than truncating for absurdly long durations.
pub fn duration_to_micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Converts a duration to fractional milliseconds for human-readable output.
pub fn duration_to_ms_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Serializes a `Duration` as integer microseconds.
pub fn serialize_duration_micros<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration_to_micros(*duration))
}
