// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Date string parsing.
//!
//! The parser reads every canonical form and records which one it saw, so
//! the value can later be written back in the same shape.
//!
//! ## Sign convention
//!
//! Separators and minus signs are the same character. A single `-` before a
//! month or day is a separator; a doubled `--` is a separator followed by a
//! negative value (`-12700--01--01`). A leading `-` on the year is its sign.
//! Time fields may carry their own `-` prefix (`T-01:-30:00`).
//!
//! ## Form detection
//!
//! - `/` anywhere: form 10
//! - whitespace with a month name: form 5
//! - whitespace with a separated date: form 3
//! - other whitespace: form 4
//! - `T` joiner: form 2
//! - unsigned digits of length 10, 12 or 14: form 8
//! - otherwise forms 1, 6, 7 or 9 depending on the date and time separators

use crate::calendar::Calendar;
use crate::error::DomainError;
use crate::fields::Fields;
use crate::format::{DateForm, FormatDescriptor};

const TIME_FIELD_NAMES: [&str; 3] = ["hour", "minute", "second"];

/// Six fields plus the layout they were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParsedDate {
    pub fields: Fields,
    pub descriptor: FormatDescriptor,
}

/// Time fields read from the part after the date.
#[derive(Debug, Default)]
struct TimePart {
    values: [i64; 3],
    count: usize,
    /// `Some(true)` for `:` separated, `Some(false)` for fixed width,
    /// `None` when a single field (or none) leaves it undecided.
    colon: Option<bool>,
}

/// Parses any canonical date string without range validation.
pub(crate) fn parse_date_string(input: &str) -> Result<ParsedDate, DomainError> {
    let trimmed: &str = input.trim();
    let parsed = if trimmed.is_empty() {
        Err(String::from("empty date string"))
    } else if trimmed.contains('/') {
        parse_slashed(trimmed)
    } else if trimmed.contains(char::is_whitespace) {
        parse_spaced(trimmed)
    } else {
        parse_compact(trimmed)
    };

    parsed.map_err(|reason| DomainError::DateParseError {
        input: input.to_string(),
        reason,
    })
}

fn parse_compact(s: &str) -> Result<ParsedDate, String> {
    let has_t: bool = s.contains('T');
    let normalized: String = s.replace('T', "_");
    let (date_part, time_part) = match normalized.split_once('_') {
        Some((date, time)) => (date, Some(time)),
        None => (normalized.as_str(), None),
    };

    if let Some(time) = time_part {
        if time.is_empty() {
            return Err(String::from("missing time after the date/time joiner"));
        }
        if time.contains('_') {
            return Err(String::from("more than one date/time joiner"));
        }
    }

    if let (None, Some(year_width)) = (time_part, digit_run_year_width(date_part)) {
        let (date_digits, time_digits) = date_part.split_at(year_width + 4);
        let (year, month, day, _) = parse_date_part(date_digits)?;
        let time: TimePart = parse_time_part(time_digits)?;
        return Ok(build(year, month, day, &time, DateForm::DIGITS));
    }

    let (year, month, day, separated) = parse_date_part(date_part)?;
    let time: TimePart = parse_time_part(time_part.unwrap_or(""))?;
    let form: DateForm = match (has_t, separated, time.colon) {
        (true, _, _) => DateForm::ISO_T,
        (false, true, Some(false)) => DateForm::ISO_COMPACT_TIME,
        (false, true, _) => DateForm::ISO_UNDERSCORE,
        (false, false, Some(true)) => DateForm::COMPACT_COLON,
        (false, false, _) => DateForm::COMPACT,
    };

    Ok(build(year, month, day, &time, form))
}

fn parse_spaced(s: &str) -> Result<ParsedDate, String> {
    let tokens: Vec<&str> = s.split_whitespace().collect();

    if tokens.len() >= 3 && tokens[1].chars().all(|c| c.is_ascii_alphabetic()) {
        if tokens.len() > 4 {
            return Err(String::from("too many fields after the year"));
        }
        let day: i64 = parse_signed(tokens[0], "day")?;
        let month: i64 = Calendar::month_from_name(tokens[1]).map_err(|err| err.to_string())?;
        let year: i64 = parse_signed(tokens[2], "year")?;
        let time: TimePart = parse_time_part(tokens.get(3).copied().unwrap_or(""))?;
        return Ok(build(year, month, day, &time, DateForm::MONTH_NAME));
    }

    let first: &str = tokens[0];
    if first.trim_start_matches('-').contains('-') {
        if tokens.len() > 2 {
            return Err(String::from("too many fields after the time"));
        }
        let (year, month, day, separated) = parse_date_part(first)?;
        if !separated {
            return Err(String::from("expected a '-' separated date"));
        }
        let time: TimePart = parse_time_part(tokens.get(1).copied().unwrap_or(""))?;
        return Ok(build(year, month, day, &time, DateForm::ISO_SPACE));
    }

    if !(3..=6).contains(&tokens.len()) {
        return Err(format!(
            "expected between 3 and 6 space separated fields, found {}",
            tokens.len()
        ));
    }
    let year: i64 = parse_signed(tokens[0], "year")?;
    let month: i64 = parse_signed(tokens[1], "month")?;
    let day: i64 = parse_signed(tokens[2], "day")?;
    let mut time = TimePart::default();
    for (index, token) in tokens[3..].iter().enumerate() {
        time.values[index] = parse_signed(token, TIME_FIELD_NAMES[index])?;
        time.count += 1;
    }

    Ok(build(year, month, day, &time, DateForm::SPACED))
}

fn parse_slashed(s: &str) -> Result<ParsedDate, String> {
    let tokens: Vec<&str> = s.split_whitespace().collect();
    if tokens.len() > 2 {
        return Err(String::from("too many fields after the time"));
    }
    let parts: Vec<&str> = tokens[0].split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(String::from("expected day/month/year"));
    };
    let day: i64 = parse_signed(day, "day")?;
    let month: i64 = parse_signed(month, "month")?;
    let year: i64 = parse_signed(year, "year")?;
    let time: TimePart = parse_time_part(tokens.get(1).copied().unwrap_or(""))?;

    Ok(build(year, month, day, &time, DateForm::SLASHED))
}

/// Reads `year[-]MM[-]DD` from the right. Returns whether separators were used.
fn parse_date_part(s: &str) -> Result<(i64, i64, i64, bool), String> {
    let (day, rest, day_separated) = take_trailing_field(s, "day")?;
    let (month, rest, month_separated) = take_trailing_field(rest, "month")?;
    if day_separated != month_separated {
        return Err(String::from("date mixes separated and fixed-width fields"));
    }
    let year: i64 = parse_signed(rest, "year")?;
    Ok((year, month, day, day_separated))
}

/// Splits the last month or day field off a date part.
///
/// A `-` directly before the digits is a separator unless nothing precedes
/// it, in which case it is the year's sign and the field is fixed width.
fn take_trailing_field<'a>(s: &'a str, name: &str) -> Result<(i64, &'a str, bool), String> {
    let digits: usize = s.bytes().rev().take_while(u8::is_ascii_digit).count();
    let start: usize = s.len() - digits;
    let run: &str = &s[start..];
    if run.is_empty() {
        return Err(format!("missing {name}"));
    }

    if let Some(before) = s[..start].strip_suffix('-').filter(|b| !b.is_empty()) {
        let value: i64 = parse_digits(run, name)?;
        return Ok(match before.strip_suffix('-') {
            Some(rest) => (-value, rest, true),
            None => (value, before, true),
        });
    }

    if run.len() < 2 {
        return Err(format!("{name} needs two digits"));
    }
    let split: usize = s.len() - 2;
    let value: i64 = parse_digits(&s[split..], name)?;
    Ok((value, &s[..split], false))
}

fn parse_time_part(t: &str) -> Result<TimePart, String> {
    let mut time = TimePart::default();
    if t.is_empty() {
        return Ok(time);
    }

    if t.contains(':') {
        let tokens: Vec<&str> = t.split(':').collect();
        if tokens.len() > 3 {
            return Err(String::from("too many time fields"));
        }
        for (index, token) in tokens.iter().enumerate() {
            time.values[index] = parse_signed(token, TIME_FIELD_NAMES[index])?;
        }
        time.count = tokens.len();
        time.colon = Some(true);
        return Ok(time);
    }

    let mut rest: &str = t;
    while !rest.is_empty() {
        if time.count == 3 {
            return Err(String::from("too many time fields"));
        }
        let name: &str = TIME_FIELD_NAMES[time.count];
        let (negative, body) = rest
            .strip_prefix('-')
            .map_or((false, rest), |body| (true, body));
        let (Some(digits), Some(tail)) = (body.get(..2), body.get(2..)) else {
            return Err(format!("{name} needs two digits"));
        };
        let value: i64 = parse_digits(digits, name)?;
        time.values[time.count] = if negative { -value } else { value };
        time.count += 1;
        rest = tail;
    }
    if time.count > 1 {
        time.colon = Some(false);
    }

    Ok(time)
}

fn parse_signed(s: &str, name: &str) -> Result<i64, String> {
    match s.strip_prefix('-') {
        Some(digits) => parse_digits(digits, name).map(|value| -value),
        None => parse_digits(s, name),
    }
}

fn parse_digits(s: &str, name: &str) -> Result<i64, String> {
    if s.is_empty() {
        return Err(format!("missing {name}"));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{name} '{s}' is not a number"));
    }
    s.parse::<i64>()
        .map_err(|_| format!("{name} '{s}' is too large"))
}

/// Year width of an unsigned, separator-free `YYYY[Y..]MMDDhh[mm[ss]]`.
///
/// Four-digit years may drop trailing time fields. Wider years always carry
/// `hhmmss`, so the year is whatever precedes the last ten digits.
fn digit_run_year_width(s: &str) -> Option<usize> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match s.len() {
        10 | 12 | 14 => Some(4),
        len if len > 14 => Some(len - 10),
        _ => None,
    }
}

fn build(year: i64, month: i64, day: i64, time: &TimePart, form: DateForm) -> ParsedDate {
    let [hour, minute, second] = time.values;
    ParsedDate {
        fields: Fields::new(year, month, day, hour, minute, second),
        descriptor: FormatDescriptor::new(form, time.count >= 1, time.count >= 2, time.count >= 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubled_dash_marks_negative_fields() {
        let parsed = parse_date_string("-12700--01--02").unwrap();
        assert_eq!(parsed.fields, Fields::new(-12700, -1, -2, 0, 0, 0));
    }

    #[test]
    fn test_leading_dash_on_compact_date_is_year_sign() {
        let parsed = parse_date_string("-127000315").unwrap();
        assert_eq!(parsed.fields, Fields::new(-12700, 3, 15, 0, 0, 0));
        assert_eq!(parsed.descriptor.form(), DateForm::COMPACT);
    }

    #[test]
    fn test_negative_time_fields() {
        let parsed = parse_date_string("1850-01-01T-01:-30:-05").unwrap();
        assert_eq!(parsed.fields, Fields::new(1850, 1, 1, -1, -30, -5));
    }

    #[test]
    fn test_fixed_width_negative_time_fields() {
        let parsed = parse_date_string("18500101_-0130-05").unwrap();
        assert_eq!(parsed.fields, Fields::new(1850, 1, 1, -1, 30, -5));
    }

    #[test]
    fn test_digit_run_is_form_eight() {
        let parsed = parse_date_string("18500101123000").unwrap();
        assert_eq!(parsed.fields, Fields::new(1850, 1, 1, 12, 30, 0));
        assert_eq!(parsed.descriptor.form(), DateForm::DIGITS);
    }

    #[test]
    fn test_wide_digit_run_takes_year_from_the_left() {
        let parsed = parse_date_string("120000315063000").unwrap();
        assert_eq!(parsed.fields, Fields::new(12000, 3, 15, 6, 30, 0));
        assert_eq!(parsed.descriptor.form(), DateForm::DIGITS);
        assert!(parsed.descriptor.has_second());
    }

    #[test]
    fn test_thirteen_digits_are_not_form_eight() {
        assert!(digit_run_year_width("1850010112300").is_none());
        assert!(digit_run_year_width("18500101").is_none());
    }

    #[test]
    fn test_missing_time_fields_are_recorded() {
        let parsed = parse_date_string("1850-01-01_12").unwrap();
        assert!(parsed.descriptor.has_hour());
        assert!(!parsed.descriptor.has_minute());
        assert!(!parsed.descriptor.has_second());
    }

    #[test]
    fn test_wide_separated_day_field() {
        let parsed = parse_date_string("0000-00-365").unwrap();
        assert_eq!(parsed.fields, Fields::new(0, 0, 365, 0, 0, 0));
    }

    #[test]
    fn test_rejects_malformed_input() {
        for input in [
            "",
            "1850-01",
            "1850-01-01_",
            "1850-01-01_12_00",
            "1850-0101",
            "18x0-01-01",
            "1850-01-01T12:00:00:00",
            "1850-01-01_1",
            "01/01",
            "01 Foo 1850",
            "1850 01",
        ] {
            let result = parse_date_string(input);
            assert!(
                matches!(result, Err(DomainError::DateParseError { .. })),
                "{input:?} should not parse"
            );
        }
    }
}
