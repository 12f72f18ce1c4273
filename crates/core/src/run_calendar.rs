// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::checkpoint::{DateCheckpoint, ResumeState, read_line, write_line};
use crate::error::CoreError;
use simcal_domain::{Calendar, CalendarDate, CalendarDuration};
use std::path::Path;
use tracing::{debug, info};

/// One chunk of simulated time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkWindow {
    /// The run number of the job that simulates this chunk.
    pub run_number: u64,
    /// First simulated instant.
    pub start_date: CalendarDate,
    /// `start_date` plus the chunk length.
    pub end_date: CalendarDate,
    /// The coupled setup that runs this chunk, if any.
    pub setup: Option<String>,
}

/// Tracks where a chunked simulation stands.
///
/// The calendar starts at `initial_date` with run number 1. Each chunk moves
/// `current_date` forward by `delta_date`. State survives process restarts
/// only through the checkpoint file.
#[derive(Debug, Clone)]
pub struct RunCalendar {
    calendar: Calendar,
    initial_date: CalendarDate,
    final_date: CalendarDate,
    current_date: CalendarDate,
    delta_date: CalendarDuration,
    run_number: u64,
}

impl RunCalendar {
    /// Creates a run calendar positioned at the first chunk.
    ///
    /// # Arguments
    ///
    /// * `initial_date` - Start of the experiment
    /// * `final_date` - End of the experiment
    /// * `delta_date` - Length of one chunk
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - The two dates use different calendars
    /// - `final_date` is before `initial_date`
    /// - `delta_date` does not move time forward
    pub fn new(
        initial_date: CalendarDate,
        final_date: CalendarDate,
        delta_date: CalendarDuration,
    ) -> Result<Self, CoreError> {
        let calendar: Calendar = initial_date.calendar();
        if final_date.calendar() != calendar {
            return Err(CoreError::Configuration(format!(
                "initial date uses the {calendar} calendar but final date uses {}",
                final_date.calendar()
            )));
        }
        if final_date < initial_date {
            return Err(CoreError::Configuration(format!(
                "final date {final_date} is before initial date {initial_date}"
            )));
        }
        ensure_moves_forward(&initial_date, &delta_date, "delta_date")?;

        Ok(Self {
            calendar,
            initial_date,
            final_date,
            current_date: initial_date,
            delta_date,
            run_number: 1,
        })
    }

    /// Creates a run calendar from configuration strings.
    ///
    /// # Errors
    ///
    /// Returns an error if a string does not parse, or for the reasons
    /// listed on [`RunCalendar::new`].
    pub fn from_strings(
        calendar: Calendar,
        initial_date: &str,
        final_date: &str,
        delta_date: &str,
    ) -> Result<Self, CoreError> {
        Self::new(
            parse_setting(calendar, "initial_date", initial_date)?,
            parse_setting(calendar, "final_date", final_date)?,
            parse_duration_setting("delta_date", delta_date)?,
        )
    }

    #[must_use]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    #[must_use]
    pub const fn initial_date(&self) -> &CalendarDate {
        &self.initial_date
    }

    #[must_use]
    pub const fn final_date(&self) -> &CalendarDate {
        &self.final_date
    }

    #[must_use]
    pub const fn current_date(&self) -> &CalendarDate {
        &self.current_date
    }

    /// Start of the current chunk, the same as the current date.
    #[must_use]
    pub const fn start_date(&self) -> &CalendarDate {
        &self.current_date
    }

    #[must_use]
    pub const fn delta_date(&self) -> &CalendarDuration {
        &self.delta_date
    }

    #[must_use]
    pub const fn run_number(&self) -> u64 {
        self.run_number
    }

    /// End of the current chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn end_date(&self) -> Result<CalendarDate, CoreError> {
        self.next_date()
    }

    /// Start of the chunk before the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn previous_date(&self) -> Result<CalendarDate, CoreError> {
        Ok(self.current_date.checked_sub(&self.delta_date)?)
    }

    /// Start of the chunk after the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn next_date(&self) -> Result<CalendarDate, CoreError> {
        Ok(self.current_date.checked_add(&self.delta_date)?)
    }

    /// Run number of the previous chunk; 0 before the first run.
    #[must_use]
    pub const fn previous_run_number(&self) -> u64 {
        self.run_number.saturating_sub(1)
    }

    #[must_use]
    pub const fn next_run_number(&self) -> u64 {
        self.run_number.saturating_add(1)
    }

    /// Whether the experiment has reached its final date.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_date >= self.final_date
    }

    /// The current chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn current_window(&self) -> Result<ChunkWindow, CoreError> {
        Ok(ChunkWindow {
            run_number: self.run_number,
            start_date: self.current_date,
            end_date: self.end_date()?,
            setup: None,
        })
    }

    /// Moves to the next chunk in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn advance(&mut self) -> Result<(), CoreError> {
        self.current_date = self.next_date()?;
        self.run_number = self.next_run_number();
        debug!(
            "Advanced to run {} starting {}",
            self.run_number, self.current_date
        );
        Ok(())
    }

    /// Lists the chunks from the current one up to the final date.
    ///
    /// At most `limit` windows are returned. The calendar itself is not
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn plan(&self, limit: usize) -> Result<Vec<ChunkWindow>, CoreError> {
        let mut cursor: Self = self.clone();
        let mut windows: Vec<ChunkWindow> = Vec::new();
        while windows.len() < limit && !cursor.is_complete() {
            windows.push(cursor.current_window()?);
            cursor.advance()?;
        }
        Ok(windows)
    }

    /// The checkpoint the next job should start from.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn next_checkpoint(&self) -> Result<DateCheckpoint, CoreError> {
        Ok(DateCheckpoint {
            date: self.next_date()?,
            run_number: self.next_run_number(),
        })
    }

    /// Restores the current date and run number from a checkpoint file.
    ///
    /// A missing file means this is the very first run: nothing changes and
    /// [`ResumeState::FirstRun`] is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_date_file(&mut self, path: &Path) -> Result<ResumeState, CoreError> {
        let Some(line) = read_line(path)? else {
            return Ok(ResumeState::FirstRun);
        };
        let checkpoint: DateCheckpoint =
            DateCheckpoint::parse_line(self.calendar, &line).map_err(|reason| {
                CoreError::MalformedCheckpoint {
                    path: path.to_path_buf(),
                    reason,
                }
            })?;

        self.restore(checkpoint.date, checkpoint.run_number);
        info!(
            "Restored run {} starting {} from {}",
            self.run_number,
            self.current_date,
            path.display()
        );
        Ok(ResumeState::Resumed)
    }

    /// Persists the next date and run number.
    ///
    /// Call this once, after the current chunk finished successfully.
    ///
    /// # Errors
    ///
    /// Returns an error if the next date cannot be derived or written, or
    /// if the file cannot be replaced.
    pub fn write_date_file(&self, path: &Path) -> Result<(), CoreError> {
        let checkpoint: DateCheckpoint = self.next_checkpoint()?;
        write_line(path, &checkpoint.to_line()?)?;
        info!(
            "Wrote checkpoint for run {} starting {} to {}",
            checkpoint.run_number,
            checkpoint.date,
            path.display()
        );
        Ok(())
    }

    pub(crate) const fn restore(&mut self, current_date: CalendarDate, run_number: u64) {
        self.current_date = current_date;
        self.run_number = run_number;
    }

    pub(crate) const fn set_delta_date(&mut self, delta_date: CalendarDuration) {
        self.delta_date = delta_date;
    }
}

/// Rejects steps that leave `start` where it is or move it backwards.
///
/// A step with mixed-sign fields can move forward from `start` and backward
/// from a later chunk boundary, so it is rejected outright.
pub(crate) fn ensure_moves_forward(
    start: &CalendarDate,
    step: &CalendarDuration,
    field: &str,
) -> Result<(), CoreError> {
    if step.is_mixed_sign() {
        return Err(CoreError::Configuration(format!(
            "{field} '{step}' mixes positive and negative fields"
        )));
    }
    let end: CalendarDate = start.checked_add(step)?;
    if end <= *start {
        return Err(CoreError::Configuration(format!(
            "{field} '{step}' does not move time forward from {start}"
        )));
    }
    Ok(())
}

pub(crate) fn parse_setting(
    calendar: Calendar,
    field: &str,
    value: &str,
) -> Result<CalendarDate, CoreError> {
    CalendarDate::parse(calendar, value).map_err(|source| CoreError::InvalidSetting {
        field: field.to_string(),
        source,
    })
}

pub(crate) fn parse_duration_setting(
    field: &str,
    value: &str,
) -> Result<CalendarDuration, CoreError> {
    CalendarDuration::parse(value).map_err(|source| CoreError::InvalidSetting {
        field: field.to_string(),
        source,
    })
}
