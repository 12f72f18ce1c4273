// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unit in which the distance between two dates is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Whole calendar years (twelve whole months).
    Years,
    /// Whole calendar months.
    Months,
    /// Whole days of 86400 seconds.
    Days,
    /// Whole hours.
    Hours,
    /// Whole minutes.
    Minutes,
    /// Seconds.
    #[default]
    Seconds,
}

impl TimeUnit {
    /// Returns the plural lowercase name of the unit.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
        }
    }

    /// Length of the unit in seconds, `None` for calendar-dependent units.
    #[must_use]
    pub const fn fixed_seconds(&self) -> Option<i64> {
        match self {
            Self::Years | Self::Months => None,
            Self::Days => Some(86_400),
            Self::Hours => Some(3_600),
            Self::Minutes => Some(60),
            Self::Seconds => Some(1),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "years" | "year" => Ok(Self::Years),
            "months" | "month" => Ok(Self::Months),
            "days" | "day" => Ok(Self::Days),
            "hours" | "hour" => Ok(Self::Hours),
            "minutes" | "minute" => Ok(Self::Minutes),
            "seconds" | "second" => Ok(Self::Seconds),
            _ => Err(DomainError::InvalidTimeUnit(s.to_string())),
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
