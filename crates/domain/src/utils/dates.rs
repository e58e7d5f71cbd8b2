//! Timestamp parsing and formatting.
//!
//! The monitoring API is not consistent about timestamp formats: history rows
//! may carry ISO-8601 strings or Brazilian `dd/MM/yyyy HH:mm` strings. Each
//! accepted shape is an explicit [`TimestampFormat`]; nothing here relies on
//! locale-dependent splitting.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Accepted timestamp formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2024-03-01T10:15:00`, optional fraction, optional offset/`Z`
    Iso8601,
    /// `01/03/2024 10:15:30`
    BrazilianSeconds,
    /// `01/03/2024 10:15`
    BrazilianMinutes,
}

impl TimestampFormat {
    /// Formats tried by [`parse_any_timestamp`], in order.
    pub const ACCEPTED: [Self; 3] = [Self::Iso8601, Self::BrazilianSeconds, Self::BrazilianMinutes];

    /// `chrono` pattern for the naive form of this format.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Iso8601 => "%Y-%m-%dT%H:%M:%S%.f",
            Self::BrazilianSeconds => "%d/%m/%Y %H:%M:%S",
            Self::BrazilianMinutes => "%d/%m/%Y %H:%M",
        }
    }
}

/// Timestamp parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse '{input}' as {expected}")]
pub struct DateParseError {
    pub input: String,
    pub expected: String,
}

/// Parse `input` with exactly one format.
///
/// ISO-8601 values carrying an offset are converted to UTC before the offset
/// is dropped.
///
/// # Errors
/// Returns [`DateParseError`] when `input` does not match `format`.
pub fn parse_timestamp(
    input: &str,
    format: TimestampFormat,
) -> Result<NaiveDateTime, DateParseError> {
    let trimmed = input.trim();

    if format == TimestampFormat::Iso8601 {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(with_offset.naive_utc());
        }
    }

    NaiveDateTime::parse_from_str(trimmed, format.pattern()).map_err(|_| DateParseError {
        input: input.to_string(),
        expected: format.pattern().to_string(),
    })
}

/// Parse `input` with the first matching format from
/// [`TimestampFormat::ACCEPTED`].
///
/// # Errors
/// Returns [`DateParseError`] listing every accepted pattern when none match.
pub fn parse_any_timestamp(input: &str) -> Result<NaiveDateTime, DateParseError> {
    TimestampFormat::ACCEPTED
        .iter()
        .find_map(|format| parse_timestamp(input, *format).ok())
        .ok_or_else(|| DateParseError {
            input: input.to_string(),
            expected: TimestampFormat::ACCEPTED
                .iter()
                .map(|f| f.pattern())
                .collect::<Vec<_>>()
                .join(" | "),
        })
}

/// Format a date for API query strings (`yyyy-MM-dd`).
#[must_use]
pub fn format_query_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a timestamp for display (`dd-MM-yyyy`).
#[must_use]
pub fn format_display_date(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%d-%m-%Y").to_string()
}

/// Serde adapter for timestamps sent by the monitoring API.
///
/// Serializes as naive ISO-8601 and accepts any [`TimestampFormat`].
pub mod api_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const OUTPUT_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(OUTPUT_PATTERN).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_any_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
