use chrono::NaiveDate;
use thiserror::Error;

use crate::consts::consts::DATE_FORMAT;

#[derive(Error, Debug, PartialEq)]
pub enum DateError {
    #[error("Invalid date '{0}', expected dd.mm.yyyy: {1}")]
    InvalidFormat(String, chrono::ParseError),
}

/// Formats a birthday with the canonical `dd.MM.yyyy` pattern
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a birthday written with the canonical `dd.MM.yyyy` pattern.
///
/// This is the only parser used for persisted dates, so anything written by
/// `format_date` reads back to the same value.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateError> {
    let trimmed = text.trim();

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| DateError::InvalidFormat(trimmed.to_string(), e))
}
