// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CouplingScheduler, RunCalendar};
use simcal_domain::{Calendar, CalendarDate, CalendarDuration};
use std::collections::BTreeMap;

pub fn date(text: &str) -> CalendarDate {
    CalendarDate::parse(Calendar::GregorianLeap, text).unwrap()
}

pub fn create_test_run_calendar() -> RunCalendar {
    RunCalendar::from_strings(Calendar::GregorianLeap, "1850-01-01", "1860-01-01", "0001-00-00")
        .unwrap()
}

/// Three setups with 1, 2 and 3 year chunks, running 1850 to 1900.
pub fn create_test_scheduler() -> CouplingScheduler {
    let names: Vec<String> = ["a", "b", "c"].map(String::from).to_vec();
    let chunk_lengths: BTreeMap<String, CalendarDuration> = names
        .iter()
        .zip(1..)
        .map(|(name, years)| (name.clone(), CalendarDuration::years(years)))
        .collect();
    CouplingScheduler::new(date("1850-01-01"), date("1900-01-01"), names, chunk_lengths).unwrap()
}
