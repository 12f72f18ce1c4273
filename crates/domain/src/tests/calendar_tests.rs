// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Calendar, DomainError};

#[test]
fn test_gregorian_leap_years() {
    let calendar: Calendar = Calendar::GregorianLeap;
    assert!(calendar.is_leap_year(2000));
    assert!(!calendar.is_leap_year(1900));
    assert!(calendar.is_leap_year(2004));
    assert!(!calendar.is_leap_year(2100));
}

#[test]
fn test_paleo_years_follow_the_same_leap_rule() {
    let calendar: Calendar = Calendar::GregorianLeap;
    assert!(calendar.is_leap_year(0));
    assert!(calendar.is_leap_year(-4));
    assert!(!calendar.is_leap_year(-100));
    assert!(calendar.is_leap_year(-400));
    assert_eq!(calendar.days_in_year(-12700), 365);
    assert_eq!(calendar.days_in_year(-12800), 366);
}

#[test]
fn test_no_leap_calendar() {
    let calendar: Calendar = Calendar::NoLeap;
    assert!(!calendar.is_leap_year(2000));
    assert_eq!(calendar.days_in_year(2000), 365);
    assert_eq!(calendar.days_in_month(2000, 2).unwrap(), 28);
}

#[test]
fn test_equal_month_calendar() {
    let calendar: Calendar = Calendar::equal_month(30).unwrap();
    for year in [-5000, 0, 1850, 2000] {
        assert_eq!(calendar.days_in_year(year), 360);
        assert!(!calendar.is_leap_year(year));
    }
    for month in 1..=12 {
        assert_eq!(calendar.days_in_month(2000, month).unwrap(), 30);
    }
}

#[test]
fn test_days_in_month_gregorian() {
    let calendar: Calendar = Calendar::GregorianLeap;
    let expected: [i64; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    for (month, days) in (1..=12).zip(expected) {
        assert_eq!(calendar.days_in_month(2000, month).unwrap(), days);
    }
    assert_eq!(calendar.days_in_month(1900, 2).unwrap(), 28);
}

#[test]
fn test_days_in_month_rejects_invalid_month() {
    let calendar: Calendar = Calendar::GregorianLeap;
    assert!(matches!(
        calendar.days_in_month(2000, 0),
        Err(DomainError::InvalidMonth(_))
    ));
    assert!(matches!(
        calendar.days_in_month(2000, 13),
        Err(DomainError::InvalidMonth(_))
    ));
}

#[test]
fn test_days_in_named_month_is_case_insensitive() {
    let calendar: Calendar = Calendar::GregorianLeap;
    assert_eq!(calendar.days_in_named_month(2000, "feb").unwrap(), 29);
    assert_eq!(calendar.days_in_named_month(2001, "FEB").unwrap(), 28);
    assert_eq!(calendar.days_in_named_month(2001, "Sep").unwrap(), 30);
    assert!(matches!(
        calendar.days_in_named_month(2001, "Sept"),
        Err(DomainError::InvalidMonth(_))
    ));
}

#[test]
fn test_month_name_lookup() {
    assert_eq!(Calendar::month_name(1).unwrap(), "Jan");
    assert_eq!(Calendar::month_name(12).unwrap(), "Dec");
    assert!(Calendar::month_name(0).is_err());
    assert!(Calendar::month_name(i64::MIN).is_err());
    assert_eq!(Calendar::month_from_name("dec").unwrap(), 12);
}

#[test]
fn test_calendar_codes() {
    assert_eq!(Calendar::from_code(0).unwrap(), Calendar::NoLeap);
    assert_eq!(Calendar::from_code(1).unwrap(), Calendar::GregorianLeap);
    assert_eq!(Calendar::from_code(30).unwrap(), Calendar::EqualMonth(30));
    assert!(Calendar::from_code(-1).is_err());
    assert!(Calendar::from_code(100).is_err());
    assert_eq!(Calendar::EqualMonth(30).code(), 30);
}

#[test]
fn test_calendar_names_round_trip() {
    for calendar in [
        Calendar::GregorianLeap,
        Calendar::NoLeap,
        Calendar::EqualMonth(30),
        Calendar::EqualMonth(7),
    ] {
        let name: String = calendar.to_string();
        assert_eq!(name.parse::<Calendar>().unwrap(), calendar);
    }
    assert_eq!("standard".parse::<Calendar>().unwrap(), Calendar::GregorianLeap);
    assert_eq!("365_day".parse::<Calendar>().unwrap(), Calendar::NoLeap);
    assert_eq!("360_day".parse::<Calendar>().unwrap(), Calendar::EqualMonth(30));
    assert_eq!("1".parse::<Calendar>().unwrap(), Calendar::GregorianLeap);
    assert!("julian".parse::<Calendar>().is_err());
    assert!("equal_month:0".parse::<Calendar>().is_err());
}

#[test]
fn test_calendar_serde_accepts_names_and_codes() {
    let calendar: Calendar = serde_json::from_str("\"noleap\"").unwrap();
    assert_eq!(calendar, Calendar::NoLeap);
    let calendar: Calendar = serde_json::from_str("30").unwrap();
    assert_eq!(calendar, Calendar::EqualMonth(30));
    assert_eq!(
        serde_json::to_string(&Calendar::EqualMonth(30)).unwrap(),
        "\"equal_month:30\""
    );
    assert!(serde_json::from_str::<Calendar>("\"julian\"").is_err());
}
