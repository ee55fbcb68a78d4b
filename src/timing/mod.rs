/// Timestamp parsing and acquisition timing arithmetic
use crate::domain::ImagingModeDescriptor;
use crate::errors::{IngestionError, IngestionResult};
use chrono::{Duration, NaiveDateTime, Timelike};

/// Parse an ISO-8601 timestamp as found in planning and catalog files.
///
/// Accepts an optional `UTC=` prefix and an optional trailing `Z`.
pub fn parse_timestamp(value: &str) -> IngestionResult<NaiveDateTime> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix("UTC=").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| IngestionError::InvalidTimestamp(value.to_string()))
}

/// Parse the compact `YYYYMMDDTHHMMSS` form used in file names
pub fn parse_compact_timestamp(value: &str) -> IngestionResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .map_err(|_| IngestionError::InvalidTimestamp(value.to_string()))
}

/// ISO-8601 rendering with microseconds only when present
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    if value.nanosecond() == 0 {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Offset of `seconds`, rounded to the microsecond
pub fn seconds(seconds: f64) -> Duration {
    Duration::microseconds((seconds * 1e6).round() as i64)
}

/// Calibrated acquisition window of an imaging request.
///
/// The instrument starts imaging after the mode preamble, plus the warmup
/// when requested, and then images `chops + 1` chops.
pub fn compute_acquisition_window(
    trigger_time: NaiveDateTime,
    mode: &ImagingModeDescriptor,
    warmup_flag: bool,
    chops: u32,
) -> (NaiveDateTime, NaiveDateTime) {
    let mut start = trigger_time + seconds(mode.preamble);
    if warmup_flag {
        start += seconds(mode.warmup);
    }
    let stop = start + seconds((f64::from(chops) + 1.0) * mode.chop_duration);
    (start, stop)
}
