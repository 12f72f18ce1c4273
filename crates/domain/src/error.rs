// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while building, parsing, formatting or combining dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The calendar kind is unknown or carries an invalid month length.
    InvalidCalendar(String),
    /// The month is out of range or is not a known 3-letter month name.
    InvalidMonth(String),
    /// A date or duration string could not be parsed.
    DateParseError {
        /// The offending input.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },
    /// A point-in-time field lies outside its valid range.
    FieldOutOfRange {
        /// The field name (`month`, `day`, ...).
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// The smallest accepted value.
        min: i64,
        /// The largest accepted value.
        max: i64,
    },
    /// The format number is not one of the canonical forms.
    InvalidForm(String),
    /// The value cannot be written in the requested form.
    UnrepresentableDate {
        /// The requested form.
        form: u8,
        /// Why the value does not fit the form.
        reason: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// The time unit name is unknown.
    InvalidTimeUnit(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCalendar(msg) => write!(f, "Invalid calendar: {msg}"),
            Self::InvalidMonth(msg) => write!(f, "Invalid month: {msg}"),
            Self::DateParseError { input, reason } => {
                write!(f, "Failed to parse date '{input}': {reason}")
            }
            Self::FieldOutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "Invalid {field}: {value}. Must be between {min} and {max}"
                )
            }
            Self::InvalidForm(msg) => {
                write!(f, "Invalid date form: {msg}. Must be between 0 and 10")
            }
            Self::UnrepresentableDate { form, reason } => {
                write!(f, "Cannot write date in form {form}: {reason}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidTimeUnit(unit) => write!(
                f,
                "Invalid time unit: {unit}. Expected years, months, days, hours, minutes or seconds"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
