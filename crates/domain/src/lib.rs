// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod arithmetic;
mod calendar;
mod date;
mod duration;
mod error;
mod fields;
mod format;
mod parse;
mod time_unit;

#[cfg(test)]
mod tests;

pub use calendar::{Calendar, MAX_EQUAL_MONTH_DAYS, MONTH_NAMES};
pub use date::{CalendarDate, later};
pub use duration::CalendarDuration;
pub use error::DomainError;
pub use format::{DateForm, FORM_COUNT, ForceFields, FormatDescriptor};
pub use time_unit::TimeUnit;
