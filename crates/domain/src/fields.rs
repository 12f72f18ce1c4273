// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// The six signed fields shared by points in time and durations.
///
/// Field order matters: the derived ordering is lexicographic from `year`
/// down to `second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct Fields {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
}

impl Fields {
    pub const fn new(year: i64, month: i64, day: i64, hour: i64, minute: i64, second: i64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Field-wise sum, `None` on overflow.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        Some(Self {
            year: self.year.checked_add(other.year)?,
            month: self.month.checked_add(other.month)?,
            day: self.day.checked_add(other.day)?,
            hour: self.hour.checked_add(other.hour)?,
            minute: self.minute.checked_add(other.minute)?,
            second: self.second.checked_add(other.second)?,
        })
    }

    /// Field-wise negation, `None` on overflow.
    pub fn checked_neg(&self) -> Option<Self> {
        Some(Self {
            year: self.year.checked_neg()?,
            month: self.month.checked_neg()?,
            day: self.day.checked_neg()?,
            hour: self.hour.checked_neg()?,
            minute: self.minute.checked_neg()?,
            second: self.second.checked_neg()?,
        })
    }
}
