// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Signed, unnormalized spans of calendar time.
//!
//! A duration keeps its six fields exactly as given. `years=1` and
//! `days=365` are different durations: the first follows the calendar, the
//! second does not. Carrying only happens once a duration is applied to a
//! point in time.

use crate::arithmetic::SECONDS_PER_DAY;
use crate::calendar::Calendar;
use crate::date::CalendarDate;
use crate::error::DomainError;
use crate::fields::Fields;
use crate::format::{DateForm, ForceFields, FormatDescriptor, render};
use crate::parse::parse_date_string;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const KEYWORDS: [&str; 6] = ["years", "months", "days", "hours", "minutes", "seconds"];

/// A span of calendar time, such as a chunk length or a run delta.
///
/// Equality compares the six fields only; the remembered format does not
/// take part.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarDuration {
    fields: Fields,
    descriptor: FormatDescriptor,
}

impl CalendarDuration {
    /// Creates a duration from six signed fields.
    #[must_use]
    pub fn new(years: i64, months: i64, days: i64, hours: i64, minutes: i64, seconds: i64) -> Self {
        Self::from_fields(Fields::new(years, months, days, hours, minutes, seconds))
    }

    /// The empty duration.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// A duration of whole years.
    #[must_use]
    pub fn years(years: i64) -> Self {
        Self::new(years, 0, 0, 0, 0, 0)
    }

    /// A duration of whole months.
    #[must_use]
    pub fn months(months: i64) -> Self {
        Self::new(0, months, 0, 0, 0, 0)
    }

    /// A duration of whole days.
    #[must_use]
    pub fn days(days: i64) -> Self {
        Self::new(0, 0, days, 0, 0, 0)
    }

    /// A duration of whole hours.
    #[must_use]
    pub fn hours(hours: i64) -> Self {
        Self::new(0, 0, 0, hours, 0, 0)
    }

    /// A duration of whole minutes.
    #[must_use]
    pub fn minutes(minutes: i64) -> Self {
        Self::new(0, 0, 0, 0, minutes, 0)
    }

    /// A duration of seconds.
    #[must_use]
    pub fn seconds(seconds: i64) -> Self {
        Self::new(0, 0, 0, 0, 0, seconds)
    }

    /// Splits a number of seconds into days, hours, minutes and seconds.
    ///
    /// Every field takes the sign of `total`, so `-90` seconds becomes
    /// `-1` minute and `-30` seconds.
    #[must_use]
    pub fn from_seconds(total: i64) -> Self {
        let days: i64 = total / SECONDS_PER_DAY;
        let rest: i64 = total % SECONDS_PER_DAY;
        Self::new(0, 0, days, rest / 3_600, (rest % 3_600) / 60, rest % 60)
    }

    pub(crate) fn from_fields(fields: Fields) -> Self {
        Self {
            fields,
            descriptor: FormatDescriptor::default(),
        }
    }

    pub(crate) const fn with_descriptor(fields: Fields, descriptor: FormatDescriptor) -> Self {
        Self { fields, descriptor }
    }

    /// Parses a duration.
    ///
    /// Accepts the keyword form (`years=1, days=-3`) or any canonical date
    /// string (`0001-00-00`, `0000-00-365`). Date strings are not range
    /// checked, so months and days may be zero, negative or large.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is neither a keyword list nor a date string.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        if input.contains('=') {
            return parse_keywords(input).map(Self::from_fields);
        }
        let parsed = parse_date_string(input)?;
        Ok(Self::with_descriptor(parsed.fields, parsed.descriptor))
    }

    #[must_use]
    pub const fn year(&self) -> i64 {
        self.fields.year
    }

    #[must_use]
    pub const fn month(&self) -> i64 {
        self.fields.month
    }

    #[must_use]
    pub const fn day(&self) -> i64 {
        self.fields.day
    }

    #[must_use]
    pub const fn hour(&self) -> i64 {
        self.fields.hour
    }

    #[must_use]
    pub const fn minute(&self) -> i64 {
        self.fields.minute
    }

    #[must_use]
    pub const fn second(&self) -> i64 {
        self.fields.second
    }

    /// Returns the format this duration was read from.
    #[must_use]
    pub const fn descriptor(&self) -> FormatDescriptor {
        self.descriptor
    }

    pub(crate) const fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Returns whether all six fields are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.fields == Fields::default()
    }

    /// Returns whether some fields are positive and others negative.
    ///
    /// Such a duration can move one date forward and another backward, as
    /// `months=1, days=-30` does around February.
    #[must_use]
    pub fn is_mixed_sign(&self) -> bool {
        let Fields {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = self.fields;
        let values: [i64; 6] = [year, month, day, hour, minute, second];
        values.iter().any(|value| *value > 0) && values.iter().any(|value| *value < 0)
    }

    /// Returns the duration with every field negated.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is `i64::MIN`.
    pub fn negated(&self) -> Result<Self, DomainError> {
        self.fields
            .checked_neg()
            .map(|fields| Self::with_descriptor(fields, self.descriptor))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: String::from("negating a duration"),
            })
    }

    /// Field-wise sum of two durations. The result keeps this duration's format.
    ///
    /// # Errors
    ///
    /// Returns an error if a field overflows.
    pub fn checked_add(&self, other: &Self) -> Result<Self, DomainError> {
        self.fields
            .checked_add(&other.fields)
            .map(|fields| Self::with_descriptor(fields, self.descriptor))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: String::from("adding durations"),
            })
    }

    /// Treats the duration as a point in time and carries it into range.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is invalid or carrying overflows.
    pub fn to_date(self, calendar: Calendar) -> Result<CalendarDate, DomainError> {
        CalendarDate::from_duration(calendar, &self)
    }

    /// Writes the duration in the format it was read from.
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be written in that form.
    pub fn format(&self) -> Result<String, DomainError> {
        render(
            &self.fields,
            &self.descriptor,
            self.descriptor.form(),
            ForceFields::NONE,
        )
    }

    /// Writes the duration in `form`.
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be written in `form`.
    pub fn format_as(&self, form: DateForm, force: ForceFields) -> Result<String, DomainError> {
        render(&self.fields, &self.descriptor, form, force)
    }
}

impl PartialEq for CalendarDuration {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for CalendarDuration {}

impl Hash for CalendarDuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.hash(state);
    }
}

impl FromStr for CalendarDuration {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Writes the keyword form, skipping zero fields.
impl std::fmt::Display for CalendarDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Fields {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = self.fields;
        let values = [year, month, day, hour, minute, second];
        let mut written: bool = false;
        for (keyword, value) in KEYWORDS.iter().zip(values) {
            if value == 0 {
                continue;
            }
            if written {
                f.write_str(", ")?;
            }
            write!(f, "{keyword}={value}")?;
            written = true;
        }
        if !written {
            f.write_str("seconds=0")?;
        }
        Ok(())
    }
}

fn parse_keywords(input: &str) -> Result<Fields, DomainError> {
    let invalid = |reason: String| DomainError::DateParseError {
        input: input.to_string(),
        reason,
    };

    let mut values: [Option<i64>; 6] = [None; 6];
    for part in input.split(',') {
        let Some((key, value)) = part.split_once('=') else {
            return Err(invalid(format!("expected key=value, found '{}'", part.trim())));
        };
        let key: String = key.trim().to_ascii_lowercase();
        let index: usize = KEYWORDS
            .iter()
            .position(|keyword| *keyword == key || keyword.strip_suffix('s') == Some(key.as_str()))
            .ok_or_else(|| invalid(format!("unknown duration field '{key}'")))?;
        let value: i64 = value
            .trim()
            .parse()
            .map_err(|_| invalid(format!("{key} '{}' is not an integer", value.trim())))?;
        if values[index].replace(value).is_some() {
            return Err(invalid(format!("{key} given more than once")));
        }
    }

    let [year, month, day, hour, minute, second] = values.map(|value| value.unwrap_or(0));
    Ok(Fields::new(year, month, day, hour, minute, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_sign_detection() {
        assert!(CalendarDuration::new(0, 1, -30, 0, 0, 0).is_mixed_sign());
        assert!(CalendarDuration::parse("days=1, hours=-24").unwrap().is_mixed_sign());
        assert!(!CalendarDuration::new(-5, 0, -1, 0, 0, 0).is_mixed_sign());
        assert!(!CalendarDuration::years(1).is_mixed_sign());
        assert!(!CalendarDuration::zero().is_mixed_sign());
    }

    #[test]
    fn test_keyword_form_accepts_subsets_and_signs() {
        let duration = CalendarDuration::parse("years=1,days = -3, seconds=30").unwrap();
        assert_eq!(duration, CalendarDuration::new(1, 0, -3, 0, 0, 30));
    }

    #[test]
    fn test_keyword_form_rejects_duplicates_and_unknown_keys() {
        assert!(CalendarDuration::parse("years=1, years=2").is_err());
        assert!(CalendarDuration::parse("weeks=1").is_err());
        assert!(CalendarDuration::parse("years=one").is_err());
        assert!(CalendarDuration::parse("years=1,").is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let duration = CalendarDuration::new(-5, 0, 12, 0, 0, -1);
        let text: String = duration.to_string();
        assert_eq!(text, "years=-5, days=12, seconds=-1");
        assert_eq!(text.parse::<CalendarDuration>().unwrap(), duration);
        assert_eq!(CalendarDuration::zero().to_string(), "seconds=0");
    }

    #[test]
    fn test_from_seconds_shares_sign() {
        let duration = CalendarDuration::from_seconds(-90_061);
        assert_eq!(duration, CalendarDuration::new(0, 0, -1, -1, -1, -1));
    }
}
