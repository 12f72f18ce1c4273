// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::arithmetic::{day_of_year, elapsed_seconds, normalize, whole_months};
use crate::calendar::Calendar;
use crate::duration::CalendarDuration;
use crate::error::DomainError;
use crate::fields::Fields;
use crate::format::{DateForm, ForceFields, FormatDescriptor, render};
use crate::parse::parse_date_string;
use crate::time_unit::TimeUnit;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// An immutable point in simulated time.
///
/// A date is bound to the calendar it was built with and remembers the
/// textual form it was read from, so it prints back in the same shape.
///
/// Dates compare by their six fields only. The calendar and the remembered
/// format are not part of equality or ordering.
///
/// # Invariants
///
/// - `1 <= month <= 12`
/// - `1 <= day <= calendar.days_in_month(year, month)`
/// - `0 <= hour < 24`, `0 <= minute < 60`, `0 <= second < 60`
/// - `year` is unrestricted; zero and negative years are paleo dates
#[derive(Debug, Clone, Copy)]
pub struct CalendarDate {
    fields: Fields,
    calendar: Calendar,
    descriptor: FormatDescriptor,
}

impl CalendarDate {
    /// Creates a validated point in time.
    ///
    /// # Arguments
    ///
    /// * `calendar` - The calendar the date belongs to
    /// * `year` - Any year, including zero and negative years
    /// * `month` - 1 to 12
    /// * `day` - 1 to the length of the month
    /// * `hour` - 0 to 23
    /// * `minute` - 0 to 59
    /// * `second` - 0 to 59
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is invalid or a field is out of range.
    pub fn new(
        calendar: Calendar,
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
    ) -> Result<Self, DomainError> {
        let fields = Fields::new(year, month, day, hour, minute, second);
        Self::validated(calendar, fields, FormatDescriptor::default())
    }

    /// Creates a date at midnight, written in form 1 without a time part.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is invalid or a field is out of range.
    pub fn ymd(calendar: Calendar, year: i64, month: i64, day: i64) -> Result<Self, DomainError> {
        let fields = Fields::new(year, month, day, 0, 0, 0);
        Self::validated(
            calendar,
            fields,
            FormatDescriptor::date_only(DateForm::ISO_UNDERSCORE),
        )
    }

    /// Parses a date string in any canonical form.
    ///
    /// The form and the time fields that were spelled out are remembered for
    /// [`CalendarDate::format`].
    ///
    /// # Errors
    ///
    /// Returns an error if the string is malformed or names an invalid point
    /// in time, such as `1850-02-30`.
    pub fn parse(calendar: Calendar, input: &str) -> Result<Self, DomainError> {
        let parsed = parse_date_string(input)?;
        Self::validated(calendar, parsed.fields, parsed.descriptor)
    }

    /// Carries a duration's fields into range and reads them as a point.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar is invalid or carrying overflows.
    pub fn from_duration(
        calendar: Calendar,
        duration: &CalendarDuration,
    ) -> Result<Self, DomainError> {
        let fields: Fields = normalize(calendar, duration.fields())?;
        Ok(Self {
            fields,
            calendar,
            descriptor: duration.descriptor(),
        })
    }

    fn validated(
        calendar: Calendar,
        fields: Fields,
        descriptor: FormatDescriptor,
    ) -> Result<Self, DomainError> {
        calendar.validate()?;
        check_range("month", fields.month, 1, 12)?;
        check_range(
            "day",
            fields.day,
            1,
            calendar.month_length(fields.year, fields.month),
        )?;
        check_range("hour", fields.hour, 0, 23)?;
        check_range("minute", fields.minute, 0, 59)?;
        check_range("second", fields.second, 0, 59)?;
        Ok(Self {
            fields,
            calendar,
            descriptor,
        })
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

    /// Returns the calendar this date belongs to.
    #[must_use]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Returns the format this date was read from.
    #[must_use]
    pub const fn descriptor(&self) -> FormatDescriptor {
        self.descriptor
    }

    /// Returns the 1-based day of the year.
    #[must_use]
    pub fn day_of_year(&self) -> i64 {
        day_of_year(self.calendar, &self.fields)
    }

    /// Writes the date in the form it was read from.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be written in that form, which
    /// only happens for form 8 with a year outside 1000 to 9999.
    pub fn format(&self) -> Result<String, DomainError> {
        render(
            &self.fields,
            &self.descriptor,
            self.descriptor.form(),
            ForceFields::NONE,
        )
    }

    /// Writes the date in `form`.
    ///
    /// Time fields that were absent from the parsed input are left out
    /// unless `force` asks for them. Forcing a field also writes the fields
    /// before it.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be written in `form`.
    pub fn format_as(&self, form: DateForm, force: ForceFields) -> Result<String, DomainError> {
        render(&self.fields, &self.descriptor, form, force)
    }

    /// Adds a duration and carries the result back into range.
    ///
    /// The result keeps this date's calendar and format.
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn checked_add(&self, duration: &CalendarDuration) -> Result<Self, DomainError> {
        let raw: Fields = self
            .fields
            .checked_add(duration.fields())
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: String::from("adding a duration to a date"),
            })?;
        Ok(Self {
            fields: normalize(self.calendar, &raw)?,
            calendar: self.calendar,
            descriptor: self.descriptor,
        })
    }

    /// Subtracts a duration and carries the result back into range.
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn checked_sub(&self, duration: &CalendarDuration) -> Result<Self, DomainError> {
        self.checked_add(&duration.negated()?)
    }

    /// Returns the duration from `earlier` to `self`.
    ///
    /// The result is expressed in days, hours, minutes and seconds, so that
    /// `earlier + self.duration_since(earlier) == self` holds in every
    /// calendar. It is negative when `earlier` is actually later.
    ///
    /// # Errors
    ///
    /// Returns an error if the dates use different calendars or the span
    /// overflows.
    pub fn duration_since(&self, earlier: &Self) -> Result<CalendarDuration, DomainError> {
        let seconds: i64 = self.elapsed_since(earlier)?;
        Ok(CalendarDuration::from_seconds(seconds))
    }

    /// Returns the absolute distance to `other` in whole `unit`s.
    ///
    /// Years and months count whole calendar months between the two dates;
    /// smaller units divide the exact elapsed seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the dates use different calendars or the span
    /// overflows.
    pub fn time_between(&self, other: &Self, unit: TimeUnit) -> Result<i64, DomainError> {
        let seconds: i64 = self.elapsed_since(other)?;
        if let Some(unit_seconds) = unit.fixed_seconds() {
            return Ok(seconds.abs() / unit_seconds);
        }

        let (early, late) = if self <= other {
            (self, other)
        } else {
            (other, self)
        };
        let months: i64 = whole_months(&early.fields, &late.fields)?;
        Ok(match unit {
            TimeUnit::Years => months / 12,
            _ => months,
        })
    }

    /// Reinterprets the fields as a duration from year zero.
    #[must_use]
    pub const fn to_duration(self) -> CalendarDuration {
        CalendarDuration::with_descriptor(self.fields, self.descriptor)
    }

    fn elapsed_since(&self, earlier: &Self) -> Result<i64, DomainError> {
        if self.calendar != earlier.calendar {
            return Err(DomainError::InvalidCalendar(format!(
                "cannot measure between {} and {} dates",
                earlier.calendar, self.calendar
            )));
        }
        elapsed_seconds(self.calendar, &earlier.fields, &self.fields)
    }
}

/// Returns the later of two dates; ties return `a`.
#[must_use]
pub fn later<'a>(a: &'a CalendarDate, b: &'a CalendarDate) -> &'a CalendarDate {
    if b > a { b } else { a }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), DomainError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(DomainError::FieldOutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl PartialEq for CalendarDate {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for CalendarDate {}

impl PartialOrd for CalendarDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fields.cmp(&other.fields)
    }
}

impl Hash for CalendarDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.hash(state);
    }
}

/// Writes the remembered form, falling back to form 1 when that form cannot
/// hold the date.
impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text: String = self
            .format()
            .or_else(|_| self.format_as(DateForm::ISO_UNDERSCORE, ForceFields::ALL))
            .map_err(|_| std::fmt::Error)?;
        f.write_str(&text)
    }
}
