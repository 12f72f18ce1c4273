// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonical textual forms of dates and durations.
//!
//! There are eleven forms. Each fixes the date-field order, the separator
//! between date fields, the joiner between date and time, and the separator
//! between time fields:
//!
//! | Form | Example                 |
//! |------|-------------------------|
//! | 0    | `18500101_123000`       |
//! | 1    | `1850-01-01_12:30:00`   |
//! | 2    | `1850-01-01T12:30:00`   |
//! | 3    | `1850-01-01 12:30:00`   |
//! | 4    | `1850 01 01 12 30 00`   |
//! | 5    | `01 Jan 1850 12:30:00`  |
//! | 6    | `18500101_12:30:00`     |
//! | 7    | `1850-01-01_123000`     |
//! | 8    | `18500101123000`        |
//! | 9    | `18500101_123000`       |
//! | 10   | `01/01/1850 12:30:00`   |
//!
//! Trailing time fields are only written when they were present in the
//! parsed input or when the caller forces them.

use crate::calendar::Calendar;
use crate::error::DomainError;
use crate::fields::Fields;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of canonical forms.
pub const FORM_COUNT: u8 = 11;

const DATE_SEPARATORS: [&str; 11] =
    ["", "-", "-", "-", " ", " ", "", "-", "", "", "/"];
const TIME_SEPARATORS: [&str; 11] =
    ["", ":", ":", ":", " ", ":", ":", "", "", "", ":"];
const DATE_TIME_JOINERS: [&str; 11] =
    ["_", "_", "T", " ", " ", " ", "_", "_", "", "_", " "];

/// One of the eleven canonical textual layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DateForm(u8);

impl DateForm {
    /// `YYYYMMDD_hhmmss`, year padded to four digits.
    pub const COMPACT_PADDED: Self = Self(0);
    /// `YYYY-MM-DD_hh:mm:ss`.
    pub const ISO_UNDERSCORE: Self = Self(1);
    /// `YYYY-MM-DDThh:mm:ss`.
    pub const ISO_T: Self = Self(2);
    /// `YYYY-MM-DD hh:mm:ss`.
    pub const ISO_SPACE: Self = Self(3);
    /// `YYYY MM DD hh mm ss`.
    pub const SPACED: Self = Self(4);
    /// `DD Mon YYYY hh:mm:ss`.
    pub const MONTH_NAME: Self = Self(5);
    /// `YYYYMMDD_hh:mm:ss`.
    pub const COMPACT_COLON: Self = Self(6);
    /// `YYYY-MM-DD_hhmmss`.
    pub const ISO_COMPACT_TIME: Self = Self(7);
    /// `YYYYMMDDhhmmss`, years of at least four digits.
    pub const DIGITS: Self = Self(8);
    /// `YYYYMMDD_hhmmss`.
    pub const COMPACT: Self = Self(9);
    /// `DD/MM/YYYY hh:mm:ss`.
    pub const SLASHED: Self = Self(10);

    /// Creates a form from its number.
    ///
    /// # Errors
    ///
    /// Returns an error if `form` is not between 0 and 10.
    pub fn new(form: u8) -> Result<Self, DomainError> {
        if form < FORM_COUNT {
            Ok(Self(form))
        } else {
            Err(DomainError::InvalidForm(form.to_string()))
        }
    }

    /// Returns the form number.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Iterates over all canonical forms in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..FORM_COUNT).map(Self)
    }

    /// Separator written between date fields.
    #[must_use]
    pub fn date_separator(self) -> &'static str {
        DATE_SEPARATORS[usize::from(self.0)]
    }

    /// Separator written between time fields.
    #[must_use]
    pub fn time_separator(self) -> &'static str {
        TIME_SEPARATORS[usize::from(self.0)]
    }

    /// Joiner written between the date and the hour.
    #[must_use]
    pub fn joiner(self) -> &'static str {
        DATE_TIME_JOINERS[usize::from(self.0)]
    }

    /// Whether the day is written before the month and year.
    #[must_use]
    pub const fn day_first(self) -> bool {
        matches!(self.0, 5 | 10)
    }

    /// Whether the month is spelled as a 3-letter name.
    #[must_use]
    pub const fn month_by_name(self) -> bool {
        self.0 == 5
    }

    /// Whether time fields are read back as fixed two-character groups.
    const fn fixed_width_time(self) -> bool {
        matches!(self.0, 0 | 7 | 8 | 9)
    }
}

impl TryFrom<u8> for DateForm {
    type Error = DomainError;

    fn try_from(form: u8) -> Result<Self, Self::Error> {
        Self::new(form)
    }
}

impl From<DateForm> for u8 {
    fn from(form: DateForm) -> Self {
        form.0
    }
}

impl FromStr for DateForm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| DomainError::InvalidForm(s.to_string()))
            .and_then(Self::new)
    }
}

impl std::fmt::Display for DateForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time fields to write even when they were absent from the parsed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ForceFields {
    /// Always write the hour.
    pub hour: bool,
    /// Always write the minute.
    pub minute: bool,
    /// Always write the second.
    pub second: bool,
}

impl ForceFields {
    /// Write only what the descriptor recorded.
    pub const NONE: Self = Self {
        hour: false,
        minute: false,
        second: false,
    };
    /// Write every time field.
    pub const ALL: Self = Self {
        hour: true,
        minute: true,
        second: true,
    };
}

/// The form a value was read from and which time fields it spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatDescriptor {
    form: DateForm,
    hour: bool,
    minute: bool,
    second: bool,
}

impl FormatDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(form: DateForm, hour: bool, minute: bool, second: bool) -> Self {
        Self {
            form,
            hour,
            minute,
            second,
        }
    }

    /// A descriptor that writes only the date part.
    #[must_use]
    pub const fn date_only(form: DateForm) -> Self {
        Self::new(form, false, false, false)
    }

    /// Returns the recorded form.
    #[must_use]
    pub const fn form(&self) -> DateForm {
        self.form
    }

    /// Returns whether the hour was present.
    #[must_use]
    pub const fn has_hour(&self) -> bool {
        self.hour
    }

    /// Returns whether the minute was present.
    #[must_use]
    pub const fn has_minute(&self) -> bool {
        self.minute
    }

    /// Returns whether the second was present.
    #[must_use]
    pub const fn has_second(&self) -> bool {
        self.second
    }
}

impl Default for FormatDescriptor {
    fn default() -> Self {
        Self::new(DateForm::ISO_UNDERSCORE, true, true, true)
    }
}

/// Writes `fields` in `form`, suppressing time fields the descriptor did not record.
pub(crate) fn render(
    fields: &Fields,
    descriptor: &FormatDescriptor,
    form: DateForm,
    force: ForceFields,
) -> Result<String, DomainError> {
    // Form 8 always has an hour, and years wider than four digits are only
    // readable back with the full hhmmss.
    let digits: bool = form == DateForm::DIGITS;
    let show_second: bool = descriptor.second || force.second || (digits && fields.year > 9999);
    let show_minute: bool = descriptor.minute || force.minute || show_second;
    let show_hour: bool = descriptor.hour || force.hour || show_minute || digits;

    let year: String = render_year(fields.year, form)?;
    let month: String = if form.month_by_name() {
        Calendar::month_name(fields.month)
            .map_err(|_| unrepresentable(form, "month names need a month between 1 and 12"))?
            .to_string()
    } else {
        render_date_field(fields.month, form, "month")?
    };
    let day: String = render_date_field(fields.day, form, "day")?;

    let separator: &str = form.date_separator();
    let mut out: String = if form.day_first() {
        format!("{day}{separator}{month}{separator}{year}")
    } else {
        format!("{year}{separator}{month}{separator}{day}")
    };

    let time = [
        (show_hour, fields.hour, form.joiner(), "hour"),
        (show_minute, fields.minute, form.time_separator(), "minute"),
        (show_second, fields.second, form.time_separator(), "second"),
    ];
    for (shown, value, prefix, name) in time {
        if !shown {
            break;
        }
        out.push_str(prefix);
        out.push_str(&render_time_field(value, form, name)?);
    }

    Ok(out)
}

fn render_year(year: i64, form: DateForm) -> Result<String, DomainError> {
    if form == DateForm::DIGITS {
        if year < 1000 {
            return Err(unrepresentable(
                form,
                &format!("year {year} has fewer than four digits"),
            ));
        }
        return Ok(year.to_string());
    }
    let sign: &str = if year < 0 { "-" } else { "" };
    Ok(format!("{sign}{:04}", year.unsigned_abs()))
}

fn render_date_field(value: i64, form: DateForm, name: &str) -> Result<String, DomainError> {
    // Without a separator the parser reads exactly two unsigned digits.
    if form.date_separator().is_empty() && !(0..=99).contains(&value) {
        return Err(unrepresentable(
            form,
            &format!("{name} {value} needs a date separator"),
        ));
    }
    Ok(pad_two(value))
}

fn render_time_field(value: i64, form: DateForm, name: &str) -> Result<String, DomainError> {
    let allowed = if form == DateForm::DIGITS { 0..=99 } else { -99..=99 };
    if form.fixed_width_time() && !allowed.contains(&value) {
        return Err(unrepresentable(
            form,
            &format!("{name} {value} does not fit a fixed-width time field"),
        ));
    }
    Ok(pad_two(value))
}

fn pad_two(value: i64) -> String {
    if value < 0 {
        format!("-{:02}", value.unsigned_abs())
    } else {
        format!("{value:02}")
    }
}

fn unrepresentable(form: DateForm, reason: &str) -> DomainError {
    DomainError::UnrepresentableDate {
        form: form.value(),
        reason: reason.to_string(),
    }
}
