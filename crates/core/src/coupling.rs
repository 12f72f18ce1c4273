// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Round-robin scheduling of coupled setups.
//!
//! Setups take turns simulating one chunk each. The rotation is a ring
//! seeded in input order; its head is the setup that runs now. Advancing
//! rotates the ring by exactly one position, so after as many chunks as
//! there are setups the same setup is at the head again.
//!
//! Simulated time is shared: when a setup finishes its chunk, the next setup
//! starts where it stopped.

use crate::checkpoint::{ChunkCheckpoint, ResumeState, read_line, write_line};
use crate::error::CoreError;
use crate::run_calendar::{ChunkWindow, RunCalendar, ensure_moves_forward};
use simcal_domain::{CalendarDate, CalendarDuration};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// The time window one setup covers when it runs from the current date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouplingWindow {
    pub setup: String,
    pub start_date: CalendarDate,
    /// `start_date` plus the setup's chunk length.
    pub end_date: CalendarDate,
    /// One date per whole year of the chunk, starting at `start_date`.
    /// Boundary data is exchanged at these dates.
    pub coupling_dates: Vec<CalendarDate>,
}

/// A run calendar shared round-robin by several coupled setups.
#[derive(Debug, Clone)]
pub struct CouplingScheduler {
    run: RunCalendar,
    /// Setup names in seeding order.
    setups: Vec<String>,
    /// Index of the ring head in `setups`.
    head: usize,
    chunk_lengths: BTreeMap<String, CalendarDuration>,
    chunk_numbers: BTreeMap<String, u64>,
}

impl CouplingScheduler {
    /// Creates a scheduler whose first chunk is run by the first setup.
    ///
    /// # Arguments
    ///
    /// * `initial_date` - Start of the experiment
    /// * `final_date` - End of the experiment
    /// * `setups` - Setup names in rotation order
    /// * `chunk_lengths` - Chunk length of every setup
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - No setups are given
    /// - A setup name is empty, repeated or contains whitespace
    /// - A setup has no chunk length
    /// - A chunk length does not move time forward
    /// - The dates are inconsistent (see [`RunCalendar::new`])
    pub fn new(
        initial_date: CalendarDate,
        final_date: CalendarDate,
        setups: Vec<String>,
        chunk_lengths: BTreeMap<String, CalendarDuration>,
    ) -> Result<Self, CoreError> {
        validate_setups(&setups)?;
        let mut lengths: BTreeMap<String, CalendarDuration> = BTreeMap::new();
        for setup in &setups {
            let length: CalendarDuration = *chunk_lengths.get(setup).ok_or_else(|| {
                CoreError::Configuration(format!("setup '{setup}' has no chunk length"))
            })?;
            ensure_moves_forward(&initial_date, &length, &format!("chunk length of {setup}"))?;
            lengths.insert(setup.clone(), length);
        }

        let first: CalendarDuration = setups
            .first()
            .and_then(|setup| lengths.get(setup))
            .copied()
            .unwrap_or_default();
        let run: RunCalendar = RunCalendar::new(initial_date, final_date, first)?;
        let chunk_numbers: BTreeMap<String, u64> =
            setups.iter().map(|setup| (setup.clone(), 1)).collect();

        Ok(Self {
            run,
            setups,
            head: 0,
            chunk_lengths: lengths,
            chunk_numbers,
        })
    }

    /// The underlying run calendar. Its delta is the current setup's chunk length.
    #[must_use]
    pub const fn run_calendar(&self) -> &RunCalendar {
        &self.run
    }

    /// Setup names in seeding order.
    #[must_use]
    pub fn setups(&self) -> &[String] {
        &self.setups
    }

    /// The setup that runs the current chunk.
    #[must_use]
    pub fn this_setup(&self) -> &str {
        self.setup_at(0)
    }

    /// The setup that ran the previous chunk.
    #[must_use]
    pub fn previous_setup(&self) -> &str {
        self.setup_at(self.setups.len() - 1)
    }

    /// The setup that runs the next chunk.
    #[must_use]
    pub fn next_setup(&self) -> &str {
        self.setup_at(1)
    }

    /// Setup names starting at the ring head.
    #[must_use]
    pub fn rotation(&self) -> Vec<&str> {
        (0..self.setups.len())
            .map(|offset| self.setup_at(offset))
            .collect()
    }

    #[must_use]
    pub fn chunk_length(&self, setup: &str) -> Option<&CalendarDuration> {
        self.chunk_lengths.get(setup)
    }

    /// How many chunks `setup` has started, counting the current one.
    #[must_use]
    pub fn chunk_number(&self, setup: &str) -> Option<u64> {
        self.chunk_numbers.get(setup).copied()
    }

    #[must_use]
    pub const fn current_date(&self) -> &CalendarDate {
        self.run.current_date()
    }

    #[must_use]
    pub const fn run_number(&self) -> u64 {
        self.run.run_number()
    }

    /// Start of the previous setup's chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn previous_date(&self) -> Result<CalendarDate, CoreError> {
        let length: CalendarDuration = self.length_of(self.previous_setup())?;
        Ok(self.run.current_date().checked_sub(&length)?)
    }

    /// Start of the next chunk, where the current setup stops.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn next_date(&self) -> Result<CalendarDate, CoreError> {
        self.run.next_date()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.run.is_complete()
    }

    /// The window `setup` covers when it runs from the current date.
    ///
    /// # Errors
    ///
    /// Returns an error if the setup is unknown or the arithmetic overflows.
    pub fn coupling_window(&self, setup: &str) -> Result<CouplingWindow, CoreError> {
        let length: CalendarDuration = self.length_of(setup)?;
        let start_date: CalendarDate = *self.run.start_date();
        let end_date: CalendarDate = start_date.checked_add(&length)?;
        let coupling_dates: Vec<CalendarDate> = (0..length.year())
            .map(|year| start_date.checked_add(&CalendarDuration::years(year)))
            .collect::<Result<_, _>>()?;

        Ok(CouplingWindow {
            setup: setup.to_string(),
            start_date,
            end_date,
            coupling_dates,
        })
    }

    /// The windows of every setup, in seeding order.
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn coupling_windows(&self) -> Result<Vec<CouplingWindow>, CoreError> {
        self.setups
            .iter()
            .map(|setup| self.coupling_window(setup))
            .collect()
    }

    /// Moves to the next chunk and hands it to the next setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn advance(&mut self) -> Result<(), CoreError> {
        let finished: String = self.this_setup().to_string();
        self.run.advance()?;
        if let Some(number) = self.chunk_numbers.get_mut(&finished) {
            *number = number.saturating_add(1);
        }
        self.head = (self.head + 1) % self.setups.len();
        self.run.set_delta_date(self.length_of(self.this_setup())?);
        debug!(
            "Rotation advanced from {} to {}",
            finished,
            self.this_setup()
        );
        Ok(())
    }

    /// Lists the chunks from the current one up to the final date.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn plan(&self, limit: usize) -> Result<Vec<ChunkWindow>, CoreError> {
        let mut cursor: Self = self.clone();
        let mut windows: Vec<ChunkWindow> = Vec::new();
        while windows.len() < limit && !cursor.is_complete() {
            let mut window: ChunkWindow = cursor.run.current_window()?;
            window.setup = Some(cursor.this_setup().to_string());
            windows.push(window);
            cursor.advance()?;
        }
        Ok(windows)
    }

    /// The checkpoint the next job should start from.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn next_checkpoint(&self) -> Result<ChunkCheckpoint, CoreError> {
        let mut next: Self = self.clone();
        next.advance()?;
        let setup: String = next.this_setup().to_string();
        Ok(ChunkCheckpoint {
            date: *next.current_date(),
            chunk_number: next.chunk_number(&setup).unwrap_or(1),
            setup,
        })
    }

    /// Restores the rotation from a chunk checkpoint file.
    ///
    /// A missing file means this is the very first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it names
    /// a setup that is not part of the rotation.
    pub fn read_chunk_file(&mut self, path: &Path) -> Result<ResumeState, CoreError> {
        let Some(line) = read_line(path)? else {
            return Ok(ResumeState::FirstRun);
        };
        let checkpoint: ChunkCheckpoint = ChunkCheckpoint::parse_line(self.run.calendar(), &line)
            .map_err(|reason| CoreError::MalformedCheckpoint {
                path: path.to_path_buf(),
                reason,
            })?;
        self.restore(&checkpoint)?;
        info!(
            "Restored chunk {} of {} starting {} from {}",
            checkpoint.chunk_number,
            checkpoint.setup,
            checkpoint.date,
            path.display()
        );
        Ok(ResumeState::Resumed)
    }

    /// Persists the date, chunk number and name of the next setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the next state cannot be derived or written.
    pub fn write_chunk_file(&self, path: &Path) -> Result<(), CoreError> {
        let checkpoint: ChunkCheckpoint = self.next_checkpoint()?;
        write_line(path, &checkpoint.to_line()?)?;
        info!(
            "Wrote checkpoint for chunk {} of {} starting {} to {}",
            checkpoint.chunk_number,
            checkpoint.setup,
            checkpoint.date,
            path.display()
        );
        Ok(())
    }

    /// Rotates the named setup to the head and rebuilds the counters.
    ///
    /// Setups before it in seeding order have already run chunk `n`, so they
    /// are on `n + 1`; setups after it are on `n` like the head itself.
    fn restore(&mut self, checkpoint: &ChunkCheckpoint) -> Result<(), CoreError> {
        let head: usize = self
            .setups
            .iter()
            .position(|setup| *setup == checkpoint.setup)
            .ok_or_else(|| CoreError::UnknownSetup(checkpoint.setup.clone()))?;

        let n: u64 = checkpoint.chunk_number;
        let mut finished: u64 = 0;
        for (index, setup) in self.setups.iter().enumerate() {
            let number: u64 = if index < head { n.saturating_add(1) } else { n };
            finished = finished.saturating_add(number - 1);
            self.chunk_numbers.insert(setup.clone(), number);
        }

        self.head = head;
        self.run.restore(checkpoint.date, finished.saturating_add(1));
        self.run.set_delta_date(self.length_of(&checkpoint.setup)?);
        Ok(())
    }

    fn setup_at(&self, offset: usize) -> &str {
        let index: usize = (self.head + offset) % self.setups.len();
        self.setups.get(index).map_or("", String::as_str)
    }

    fn length_of(&self, setup: &str) -> Result<CalendarDuration, CoreError> {
        self.chunk_lengths
            .get(setup)
            .copied()
            .ok_or_else(|| CoreError::UnknownSetup(setup.to_string()))
    }
}

fn validate_setups(setups: &[String]) -> Result<(), CoreError> {
    if setups.is_empty() {
        return Err(CoreError::Configuration(String::from(
            "a coupled experiment needs at least one setup",
        )));
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for setup in setups {
        if setup.is_empty() || setup.contains(char::is_whitespace) {
            return Err(CoreError::Configuration(format!(
                "setup name '{setup}' must be non-empty and free of whitespace"
            )));
        }
        if !seen.insert(setup.as_str()) {
            return Err(CoreError::Configuration(format!(
                "setup '{setup}' is listed more than once"
            )));
        }
    }
    Ok(())
}
