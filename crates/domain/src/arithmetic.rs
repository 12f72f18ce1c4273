// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar-aware carrying and day counting.
//!
//! ## Normalization
//!
//! Seconds, minutes and hours fold into days with the fixed factors 60, 60
//! and 24. Months fold into years with factor 12. Days then carry into
//! months one month at a time, always asking the calendar for the length of
//! the month the carry currently sits in. Whole years are skipped in one step
//! when the carry sits in January, which keeps paleo-length spans cheap.

use crate::calendar::Calendar;
use crate::error::DomainError;
use crate::fields::Fields;

const SECONDS_PER_MINUTE: i64 = 60;
const MINUTES_PER_HOUR: i64 = 60;
const HOURS_PER_DAY: i64 = 24;
const MONTHS_PER_YEAR: i64 = 12;
pub(crate) const SECONDS_PER_DAY: i64 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR * HOURS_PER_DAY;

/// Carries out-of-range fields until they form a valid point in time.
pub(crate) fn normalize(calendar: Calendar, raw: &Fields) -> Result<Fields, DomainError> {
    calendar.validate()?;

    let minute: i64 = raw
        .minute
        .checked_add(raw.second.div_euclid(SECONDS_PER_MINUTE))
        .ok_or_else(|| overflow("carrying seconds into minutes"))?;
    let second: i64 = raw.second.rem_euclid(SECONDS_PER_MINUTE);

    let hour: i64 = raw
        .hour
        .checked_add(minute.div_euclid(MINUTES_PER_HOUR))
        .ok_or_else(|| overflow("carrying minutes into hours"))?;
    let minute: i64 = minute.rem_euclid(MINUTES_PER_HOUR);

    let mut day: i64 = raw
        .day
        .checked_add(hour.div_euclid(HOURS_PER_DAY))
        .ok_or_else(|| overflow("carrying hours into days"))?;
    let hour: i64 = hour.rem_euclid(HOURS_PER_DAY);

    let month_index: i64 = raw
        .month
        .checked_sub(1)
        .ok_or_else(|| overflow("carrying months into years"))?;
    let mut year: i64 = raw
        .year
        .checked_add(month_index.div_euclid(MONTHS_PER_YEAR))
        .ok_or_else(|| overflow("carrying months into years"))?;
    let mut month: i64 = month_index.rem_euclid(MONTHS_PER_YEAR) + 1;

    loop {
        let month_days: i64 = calendar.month_length(year, month);
        if day > month_days {
            if month == 1 && day > calendar.days_in_year(year) {
                day -= calendar.days_in_year(year);
                year = next_year(year)?;
            } else {
                day -= month_days;
                if month == MONTHS_PER_YEAR {
                    month = 1;
                    year = next_year(year)?;
                } else {
                    month += 1;
                }
            }
        } else if day < 1 {
            let previous: i64 = year
                .checked_sub(1)
                .ok_or_else(|| overflow("borrowing days from the previous year"))?;
            if month == 1 && day + calendar.days_in_year(previous) < 1 {
                day += calendar.days_in_year(previous);
                year = previous;
            } else {
                if month == 1 {
                    month = MONTHS_PER_YEAR;
                    year = previous;
                } else {
                    month -= 1;
                }
                day += calendar.month_length(year, month);
            }
        } else {
            break;
        }
    }

    Ok(Fields::new(year, month, day, hour, minute, second))
}

/// 1-based day of the year of a valid point.
pub(crate) fn day_of_year(calendar: Calendar, fields: &Fields) -> i64 {
    (1..fields.month)
        .map(|month| calendar.month_length(fields.year, month))
        .sum::<i64>()
        + fields.day
}

/// Signed number of seconds from `from` to `to`.
///
/// Whole years between the two are counted with `days_in_year`, the
/// remainder inside each year with `days_in_month`.
pub(crate) fn elapsed_seconds(
    calendar: Calendar,
    from: &Fields,
    to: &Fields,
) -> Result<i64, DomainError> {
    let (low, high, sign) = if from.year <= to.year {
        (from.year, to.year, 1)
    } else {
        (to.year, from.year, -1)
    };
    let whole_years: i64 = (low..high).try_fold(0_i64, |total, year| {
        total
            .checked_add(calendar.days_in_year(year))
            .ok_or_else(|| overflow("counting days between years"))
    })?;

    let days: i64 = (sign * whole_years) + day_of_year(calendar, to) - day_of_year(calendar, from);
    let clock: i64 = (to.hour - from.hour) * MINUTES_PER_HOUR * SECONDS_PER_MINUTE
        + (to.minute - from.minute) * SECONDS_PER_MINUTE
        + (to.second - from.second);

    days.checked_mul(SECONDS_PER_DAY)
        .and_then(|seconds| seconds.checked_add(clock))
        .ok_or_else(|| overflow("converting days into seconds"))
}

/// Whole calendar months from `early` to `late`, where `early <= late`.
pub(crate) fn whole_months(early: &Fields, late: &Fields) -> Result<i64, DomainError> {
    let months: i64 = late
        .year
        .checked_sub(early.year)
        .and_then(|years| years.checked_mul(MONTHS_PER_YEAR))
        .and_then(|months| months.checked_add(late.month - early.month))
        .ok_or_else(|| overflow("counting months"))?;
    let late_rest = (late.day, late.hour, late.minute, late.second);
    let early_rest = (early.day, early.hour, early.minute, early.second);
    Ok(if late_rest < early_rest { months - 1 } else { months })
}

fn next_year(year: i64) -> Result<i64, DomainError> {
    year.checked_add(1)
        .ok_or_else(|| overflow("carrying days into the next year"))
}

fn overflow(operation: &str) -> DomainError {
    DomainError::DateArithmeticOverflow {
        operation: operation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_carries_seconds_to_new_year() {
        let raw = Fields::new(1850, 12, 31, 23, 59, 60);
        let fields = normalize(Calendar::GregorianLeap, &raw).unwrap();
        assert_eq!(fields, Fields::new(1851, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_normalize_borrows_into_february_of_leap_year() {
        let raw = Fields::new(2000, 3, 0, 0, 0, 0);
        let fields = normalize(Calendar::GregorianLeap, &raw).unwrap();
        assert_eq!(fields, Fields::new(2000, 2, 29, 0, 0, 0));
    }

    #[test]
    fn test_normalize_wraps_months_into_years() {
        let raw = Fields::new(1850, 14, 1, 0, 0, 0);
        let fields = normalize(Calendar::NoLeap, &raw).unwrap();
        assert_eq!(fields, Fields::new(1851, 2, 1, 0, 0, 0));

        let raw = Fields::new(1850, 0, 1, 0, 0, 0);
        let fields = normalize(Calendar::NoLeap, &raw).unwrap();
        assert_eq!(fields, Fields::new(1849, 12, 1, 0, 0, 0));
    }

    #[test]
    fn test_normalize_skips_whole_years() {
        let raw = Fields::new(1, 1, 1 + 365 * 1000, 0, 0, 0);
        let fields = normalize(Calendar::NoLeap, &raw).unwrap();
        assert_eq!(fields, Fields::new(1001, 1, 1, 0, 0, 0));

        let raw = Fields::new(1, 1, 1 - 365 * 1000, 0, 0, 0);
        let fields = normalize(Calendar::NoLeap, &raw).unwrap();
        assert_eq!(fields, Fields::new(-999, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_normalize_negative_clock_fields() {
        let raw = Fields::new(1850, 1, 1, 0, 0, -1);
        let fields = normalize(Calendar::GregorianLeap, &raw).unwrap();
        assert_eq!(fields, Fields::new(1849, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_normalize_rejects_zero_length_months() {
        let raw = Fields::new(1850, 1, 1, 0, 0, 0);
        let result = normalize(Calendar::EqualMonth(0), &raw);
        assert!(matches!(result, Err(DomainError::InvalidCalendar(_))));
    }

    #[test]
    fn test_elapsed_seconds_is_antisymmetric_across_paleo_years() {
        let a = Fields::new(-12700, 3, 1, 6, 0, 0);
        let b = Fields::new(1850, 1, 1, 0, 0, 0);
        let forward = elapsed_seconds(Calendar::GregorianLeap, &a, &b).unwrap();
        let backward = elapsed_seconds(Calendar::GregorianLeap, &b, &a).unwrap();
        assert!(forward > 0);
        assert_eq!(forward, -backward);
    }

    #[test]
    fn test_whole_months_respects_day_and_clock() {
        let early = Fields::new(1850, 1, 31, 0, 0, 0);
        let late = Fields::new(1850, 3, 30, 0, 0, 0);
        assert_eq!(whole_months(&early, &late).unwrap(), 1);

        let late = Fields::new(1850, 3, 31, 0, 0, 0);
        assert_eq!(whole_months(&early, &late).unwrap(), 2);
    }
}
