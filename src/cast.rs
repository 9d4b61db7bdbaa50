use crate::metadata::FieldResult;
use crate::value::FmValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use bigdecimal::{BigDecimal, ParseBigDecimalError};
use serde::Deserialize;
use smol_str::SmolStr;
use std::str::FromStr;
use thiserror::Error;

// ─── CastConfig ─────────────────────────────────────────────────────────────

/// Date and time formats the server renders values with.
///
/// Formats are chrono `strftime` strings. The server's own pattern notation
/// (`MM/dd/yyyy`) goes through [`CastConfig::from_server_formats`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    /// Default: `%m/%d/%Y`.
    pub date_format: String,
    /// Default: `%H:%M:%S`.
    pub time_format: String,
    /// Default: `%m/%d/%Y %H:%M:%S`.
    pub timestamp_format: String,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            date_format: "%m/%d/%Y".into(),
            time_format: "%H:%M:%S".into(),
            timestamp_format: "%m/%d/%Y %H:%M:%S".into(),
        }
    }
}

impl CastConfig {
    /// Build from patterns in the server's notation, e.g. the
    /// `date-format="MM/dd/yyyy"` attribute of a response's `datasource`.
    pub fn from_server_formats(date: &str, time: &str, timestamp: &str) -> Self {
        Self {
            date_format: server_format_to_chrono(date),
            time_format: server_format_to_chrono(time),
            timestamp_format: server_format_to_chrono(timestamp),
        }
    }
}

/// Translate a server date pattern (`MM/dd/yyyy HH:mm:ss`) to chrono syntax.
///
/// Unknown letters are copied through as literals.
pub fn server_format_to_chrono(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let directive = match (c, run) {
            ('y', 2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('M', 1 | 2) => Some("%m"),
            ('M', 3) => Some("%b"),
            ('M', _) => Some("%B"),
            ('d', _) => Some("%d"),
            ('H', _) => Some("%H"),
            ('h', _) => Some("%I"),
            ('m', _) => Some("%M"),
            ('s', _) => Some("%S"),
            ('a', _) => Some("%p"),
            _ => None,
        };
        match directive {
            Some(directive) => out.push_str(directive),
            None => {
                for _ in 0..run {
                    if c == '%' {
                        out.push_str("%%");
                    } else {
                        out.push(c);
                    }
                }
            }
        }
    }
    out
}

// ─── Caster ─────────────────────────────────────────────────────────────────

/// Why a raw value did not convert. Wrapped into `RecordError::Cast` with the
/// field name by the caller.
#[derive(Debug, Error)]
pub enum CastFailure {
    #[error("invalid number: {0}")]
    Number(#[from] ParseBigDecimalError),
    #[error("invalid date/time: {0}")]
    DateTime(#[from] chrono::ParseError),
}

/// Convert one raw `data` string to the declared type.
///
/// Text is returned untouched. Every other type treats an empty (or
/// whitespace-only) value as null rather than zero or an error.
pub fn cast(raw: &str, result: FieldResult, config: &CastConfig) -> Result<FmValue, CastFailure> {
    let trimmed = raw.trim();
    if result != FieldResult::Text && trimmed.is_empty() {
        return Ok(FmValue::Null);
    }
    let value = match result {
        FieldResult::Text => FmValue::Text(SmolStr::from(raw)),
        FieldResult::Number => FmValue::Number(parse_number(trimmed)?),
        FieldResult::Date => {
            FmValue::Date(NaiveDate::parse_from_str(trimmed, &config.date_format)?)
        }
        FieldResult::Time => {
            FmValue::Time(NaiveTime::parse_from_str(trimmed, &config.time_format)?)
        }
        FieldResult::Timestamp => FmValue::Timestamp(NaiveDateTime::parse_from_str(
            trimmed,
            &config.timestamp_format,
        )?),
        FieldResult::Container => FmValue::Container(SmolStr::from(trimmed)),
    };
    Ok(value)
}

/// Arbitrary precision, so wide integers and tiny exponents survive intact.
fn parse_number(s: &str) -> Result<BigDecimal, ParseBigDecimalError> {
    BigDecimal::from_str(s)
}
