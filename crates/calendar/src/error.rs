//! Unified error type for the calendar
//!
//! Date arithmetic itself is total, so the only fallible operations are parsing
//! formatted dates and loading calendar configurations.

use thiserror::Error;

/// Unified error type for calendar operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Input text could not be turned into a date or token
    #[error("Parse error: {0}")]
    Parse(String),

    /// Calendar configuration is inconsistent
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CalendarError {
    /// Creates a parse error for string-to-value conversion failures.
    ///
    /// Use this when formatted input doesn't match the expected shape or
    /// names something the calendar doesn't know:
    /// - Malformed long-form dates
    /// - Unknown month, weekday or age names
    /// - Unknown format token names
    ///
    /// The message should quote the offending input.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a validation error for calendar configuration problems.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<serde_json::Error> for CalendarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(format!("Invalid calendar configuration: {}", err))
    }
}
