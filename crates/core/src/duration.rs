// Copyright 2025 Aggbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Elapsed-time text formatting.
//!
//! Durations are rendered as `HH:MM:SS`. Every field is zero-padded to at
//! least two digits and the hour field is never wrapped, so 100 hours
//! renders as `100:00:00`. Sub-second remainders are truncated.

use thiserror::Error;

const MILLIS_PER_SECOND: u64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// Errors raised while formatting or parsing durations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Elapsed time was negative.
    #[error("elapsed time must be non-negative, got {0} ms")]
    Negative(i64),

    /// Text was not in `HH:MM:SS` form.
    #[error("malformed duration text '{0}', expected HH:MM:SS")]
    Malformed(String),

    /// Parsed value does not fit in a millisecond counter.
    #[error("duration text '{0}' overflows a millisecond count")]
    Overflow(String),
}

/// Result type for duration operations.
pub type Result<T> = std::result::Result<T, DurationError>;

/// Format a millisecond count as `HH:MM:SS`.
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / MILLIS_PER_SECOND;
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let remaining_seconds = seconds % SECONDS_PER_MINUTE;
    format!("{hours:02}:{minutes:02}:{remaining_seconds:02}")
}

/// Format a signed millisecond count, rejecting negative values.
pub fn format_signed_millis(ms: i64) -> Result<String> {
    u64::try_from(ms)
        .map(format_duration)
        .map_err(|_| DurationError::Negative(ms))
}

/// Parse `HH:MM:SS` text back into whole milliseconds.
///
/// Minutes and seconds must be below 60; hours are unbounded. This is the
/// inverse of [`format_duration`] up to the truncated sub-second part.
pub fn parse_duration_text(text: &str) -> Result<u64> {
    let malformed = || DurationError::Malformed(text.to_string());

    let mut fields = text.trim().split(':');
    let (Some(h), Some(m), Some(s), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed());
    };

    let parse_field = |field: &str| -> Result<u64> {
        if field.len() < 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        field
            .parse::<u64>()
            .map_err(|_| DurationError::Overflow(text.to_string()))
    };

    let hours = parse_field(h)?;
    let minutes = parse_field(m)?;
    let seconds = parse_field(s)?;
    if minutes >= SECONDS_PER_MINUTE || seconds >= SECONDS_PER_MINUTE {
        return Err(malformed());
    }

    hours
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(|total| total.checked_add(minutes * SECONDS_PER_MINUTE + seconds))
        .and_then(|total| total.checked_mul(MILLIS_PER_SECOND))
        .ok_or_else(|| DurationError::Overflow(text.to_string()))
}
