// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON experiment configuration.
//!
//! ```json
//! {
//!   "calendar": "gregorian",
//!   "initial_date": "1850-01-01",
//!   "final_date": "1900-01-01",
//!   "delta_date": "0001-00-00",
//!   "setups": [
//!     { "name": "echam", "chunk_length": "0010-00-00" },
//!     { "name": "pism", "chunk_length": "years=100" }
//!   ]
//! }
//! ```
//!
//! With a non-empty `setups` list the configuration builds a
//! [`CouplingScheduler`]; otherwise a plain [`RunCalendar`] stepping by
//! `delta_date`.

use crate::checkpoint::ResumeState;
use crate::coupling::CouplingScheduler;
use crate::error::CoreError;
use crate::run_calendar::{ChunkWindow, RunCalendar, parse_duration_setting, parse_setting};
use serde::{Deserialize, Serialize};
use simcal_domain::{Calendar, CalendarDate, CalendarDuration};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// One coupled setup and the length of the chunks it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetupConfig {
    pub name: String,
    pub chunk_length: String,
}

/// Experiment settings as read from a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Calendar name or legacy integer code. Defaults to Gregorian.
    #[serde(default)]
    pub calendar: Calendar,
    pub initial_date: String,
    pub final_date: String,
    /// Chunk length of an uncoupled experiment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub setups: Vec<SetupConfig>,
}

impl ExperimentConfig {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let contents: String =
            std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loaded experiment configuration from {}", path.display());
        Self::from_json(&contents)
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(CoreError::ConfigParse)
    }

    /// Builds the experiment this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a date or duration does not parse,
    /// if `delta_date` is missing for an uncoupled experiment, or if the
    /// experiment is inconsistent.
    pub fn build(&self) -> Result<Experiment, CoreError> {
        let initial_date: CalendarDate =
            parse_setting(self.calendar, "initial_date", &self.initial_date)?;
        let final_date: CalendarDate =
            parse_setting(self.calendar, "final_date", &self.final_date)?;

        if self.setups.is_empty() {
            let delta: &str = self.delta_date.as_deref().ok_or_else(|| {
                CoreError::Configuration(String::from(
                    "delta_date is required when no setups are configured",
                ))
            })?;
            let delta_date: CalendarDuration = parse_duration_setting("delta_date", delta)?;
            return Ok(Experiment::Single(RunCalendar::new(
                initial_date,
                final_date,
                delta_date,
            )?));
        }

        let names: Vec<String> = self.setups.iter().map(|setup| setup.name.clone()).collect();
        let mut chunk_lengths: BTreeMap<String, CalendarDuration> = BTreeMap::new();
        for setup in &self.setups {
            let field: String = format!("chunk_length of {}", setup.name);
            chunk_lengths.insert(
                setup.name.clone(),
                parse_duration_setting(&field, &setup.chunk_length)?,
            );
        }
        Ok(Experiment::Coupled(CouplingScheduler::new(
            initial_date,
            final_date,
            names,
            chunk_lengths,
        )?))
    }
}

/// A configured experiment, coupled or not.
#[derive(Debug, Clone)]
pub enum Experiment {
    /// One model stepping by a fixed delta.
    Single(RunCalendar),
    /// Several setups taking turns.
    Coupled(CouplingScheduler),
}

impl Experiment {
    /// The run calendar that tracks dates and run numbers.
    #[must_use]
    pub const fn run_calendar(&self) -> &RunCalendar {
        match self {
            Self::Single(run) => run,
            Self::Coupled(scheduler) => scheduler.run_calendar(),
        }
    }

    /// Restores state from the checkpoint file that matches the experiment kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_checkpoint(&mut self, path: &Path) -> Result<ResumeState, CoreError> {
        match self {
            Self::Single(run) => run.read_date_file(path),
            Self::Coupled(scheduler) => scheduler.read_chunk_file(path),
        }
    }

    /// Writes the checkpoint the next job starts from.
    ///
    /// # Errors
    ///
    /// Returns an error if the next state cannot be derived or written.
    pub fn write_checkpoint(&self, path: &Path) -> Result<(), CoreError> {
        match self {
            Self::Single(run) => run.write_date_file(path),
            Self::Coupled(scheduler) => scheduler.write_chunk_file(path),
        }
    }

    /// Moves to the next chunk in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn advance(&mut self) -> Result<(), CoreError> {
        match self {
            Self::Single(run) => run.advance(),
            Self::Coupled(scheduler) => scheduler.advance(),
        }
    }

    /// Lists upcoming chunks, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn plan(&self, limit: usize) -> Result<Vec<ChunkWindow>, CoreError> {
        match self {
            Self::Single(run) => run.plan(limit),
            Self::Coupled(scheduler) => scheduler.plan(limit),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.run_calendar().is_complete()
    }
}
