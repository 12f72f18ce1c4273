// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar kinds and their day-counting rules.
//!
//! A calendar is a small immutable value. Every date carries a copy of the
//! calendar it was built with, so no date ever owns or mutates calendar state.
//!
//! ## Kinds
//!
//! - `GregorianLeap`: proleptic Gregorian, extended to year zero and negative
//!   (paleo) years with the same leap rule
//! - `NoLeap`: every year has 365 days
//! - `EqualMonth(n)`: twelve months of exactly `n` days each

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Three-letter month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The largest month length an equal-month calendar may use.
///
/// Day fields are written with two digits.
pub const MAX_EQUAL_MONTH_DAYS: u8 = 99;

/// Day-counting rules for one calendar system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "CalendarRepr", into = "String")]
pub enum Calendar {
    /// Proleptic Gregorian calendar with leap years.
    #[default]
    GregorianLeap,
    /// 365-day calendar without leap years.
    NoLeap,
    /// Synthetic calendar whose months all have the same number of days.
    EqualMonth(u8),
}

impl Calendar {
    /// Creates an equal-month calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if `days` is zero or larger than [`MAX_EQUAL_MONTH_DAYS`].
    pub fn equal_month(days: i64) -> Result<Self, DomainError> {
        u8::try_from(days)
            .ok()
            .filter(|d| (1..=MAX_EQUAL_MONTH_DAYS).contains(d))
            .map(Self::EqualMonth)
            .ok_or_else(|| {
                DomainError::InvalidCalendar(format!(
                    "equal-month calendars need between 1 and {MAX_EQUAL_MONTH_DAYS} days per month, got {days}"
                ))
            })
    }

    /// Resolves a legacy integer calendar code.
    ///
    /// `0` selects [`Calendar::NoLeap`], `1` selects [`Calendar::GregorianLeap`]
    /// and any larger value is the month length of an equal-month calendar.
    ///
    /// # Errors
    ///
    /// Returns an error for negative codes or month lengths that are too large.
    pub fn from_code(code: i64) -> Result<Self, DomainError> {
        match code {
            0 => Ok(Self::NoLeap),
            1 => Ok(Self::GregorianLeap),
            n if n > 1 => Self::equal_month(n),
            n => Err(DomainError::InvalidCalendar(format!(
                "unknown calendar code {n}"
            ))),
        }
    }

    /// Returns the legacy integer code of this calendar.
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::NoLeap => 0,
            Self::GregorianLeap => 1,
            Self::EqualMonth(days) => i64::from(*days),
        }
    }

    /// Returns whether `year` is a leap year.
    ///
    /// Only the Gregorian calendar has leap years.
    #[must_use]
    pub const fn is_leap_year(&self, year: i64) -> bool {
        match self {
            Self::GregorianLeap => (year % 4 == 0 && year % 100 != 0) || year % 400 == 0,
            Self::NoLeap | Self::EqualMonth(_) => false,
        }
    }

    /// Returns the number of days in `year`.
    #[must_use]
    pub fn days_in_year(&self, year: i64) -> i64 {
        match self {
            Self::GregorianLeap => {
                if self.is_leap_year(year) {
                    366
                } else {
                    365
                }
            }
            Self::NoLeap => 365,
            Self::EqualMonth(days) => 12 * i64::from(*days),
        }
    }

    /// Returns the number of days in `month` of `year`.
    ///
    /// # Arguments
    ///
    /// * `year` - Any year, including zero and negative years
    /// * `month` - The 1-based month number
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not between 1 and 12.
    pub fn days_in_month(&self, year: i64, month: i64) -> Result<i64, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::InvalidMonth(format!(
                "{month} is not between 1 and 12"
            )));
        }
        Ok(self.month_length(year, month))
    }

    /// Returns the number of days in the month named `name` of `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a 3-letter month name.
    pub fn days_in_named_month(&self, year: i64, name: &str) -> Result<i64, DomainError> {
        let month: i64 = Self::month_from_name(name)?;
        Ok(self.month_length(year, month))
    }

    /// Resolves a case-insensitive 3-letter month name to its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown.
    pub fn month_from_name(name: &str) -> Result<i64, DomainError> {
        MONTH_NAMES
            .iter()
            .zip(1_i64..)
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, month)| month)
            .ok_or_else(|| DomainError::InvalidMonth(format!("unknown month name '{name}'")))
    }

    /// Returns the 3-letter name of a 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not between 1 and 12.
    pub fn month_name(month: i64) -> Result<&'static str, DomainError> {
        month
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| MONTH_NAMES.get(index))
            .copied()
            .ok_or_else(|| DomainError::InvalidMonth(format!("{month} is not between 1 and 12")))
    }

    /// Checks that the calendar has usable month lengths.
    ///
    /// `EqualMonth` can be built directly, bypassing [`Calendar::equal_month`].
    ///
    /// # Errors
    ///
    /// Returns an error for an equal-month calendar with zero days per month.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::EqualMonth(0) => Err(DomainError::InvalidCalendar(String::from(
                "equal-month calendars need at least one day per month",
            ))),
            _ => Ok(()),
        }
    }

    /// Month length for an already validated month.
    pub(crate) fn month_length(&self, year: i64, month: i64) -> i64 {
        match self {
            Self::EqualMonth(days) => i64::from(*days),
            Self::GregorianLeap | Self::NoLeap => match month {
                2 if self.is_leap_year(year) => 29,
                2 => 28,
                4 | 6 | 9 | 11 => 30,
                _ => 31,
            },
        }
    }
}

impl FromStr for Calendar {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name: String = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "gregorian" | "standard" | "proleptic_gregorian" | "leap" => Ok(Self::GregorianLeap),
            "noleap" | "no_leap" | "365_day" => Ok(Self::NoLeap),
            "360_day" => Ok(Self::EqualMonth(30)),
            other => {
                if let Some(days) = other.strip_prefix("equal_month:") {
                    let days: i64 = days.parse().map_err(|_| {
                        DomainError::InvalidCalendar(format!("invalid month length in '{s}'"))
                    })?;
                    return Self::equal_month(days);
                }
                other.parse::<i64>().map_or_else(
                    |_| Err(DomainError::InvalidCalendar(format!("unknown calendar '{s}'"))),
                    Self::from_code,
                )
            }
        }
    }
}

impl std::fmt::Display for Calendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GregorianLeap => write!(f, "gregorian"),
            Self::NoLeap => write!(f, "noleap"),
            Self::EqualMonth(days) => write!(f, "equal_month:{days}"),
        }
    }
}

impl From<Calendar> for String {
    fn from(calendar: Calendar) -> Self {
        calendar.to_string()
    }
}

/// Accepted serialized shapes: a calendar name or a legacy integer code.
#[derive(Deserialize)]
#[serde(untagged)]
enum CalendarRepr {
    Code(i64),
    Name(String),
}

impl TryFrom<CalendarRepr> for Calendar {
    type Error = DomainError;

    fn try_from(repr: CalendarRepr) -> Result<Self, Self::Error> {
        match repr {
            CalendarRepr::Code(code) => Self::from_code(code),
            CalendarRepr::Name(name) => name.parse(),
        }
    }
}
