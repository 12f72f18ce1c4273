// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON views printed by the `status` and `plan` commands.
//!
//! Dates are written in the form they were configured in.

use serde::Serialize;
use simcal::{ChunkWindow, CoreError, CouplingScheduler, Experiment, RunCalendar};

/// Where an experiment stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub calendar: String,
    pub run_number: u64,
    pub previous_date: String,
    pub current_date: String,
    pub next_date: String,
    pub end_date: String,
    pub final_date: String,
    pub resumed: bool,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupling: Option<CouplingReport>,
}

/// Rotation state of a coupled experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouplingReport {
    pub previous_setup: String,
    pub this_setup: String,
    pub next_setup: String,
    pub chunk_number: u64,
    pub coupling_start_date: String,
    pub coupling_end_date: String,
    pub coupling_dates: Vec<String>,
}

/// One upcoming chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub run_number: u64,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
}

impl StatusReport {
    /// Builds the report of a restored experiment.
    ///
    /// # Errors
    ///
    /// Returns an error if a derived date cannot be computed.
    pub fn new(experiment: &Experiment, resumed: bool) -> Result<Self, CoreError> {
        let run: &RunCalendar = experiment.run_calendar();
        let (previous_date, coupling) = match experiment {
            Experiment::Single(single) => (single.previous_date()?, None),
            Experiment::Coupled(scheduler) => (
                scheduler.previous_date()?,
                Some(CouplingReport::new(scheduler)?),
            ),
        };

        Ok(Self {
            calendar: run.calendar().to_string(),
            run_number: run.run_number(),
            previous_date: previous_date.to_string(),
            current_date: run.current_date().to_string(),
            next_date: run.next_date()?.to_string(),
            end_date: run.end_date()?.to_string(),
            final_date: run.final_date().to_string(),
            resumed,
            complete: run.is_complete(),
            coupling,
        })
    }
}

impl CouplingReport {
    fn new(scheduler: &CouplingScheduler) -> Result<Self, CoreError> {
        let this_setup: &str = scheduler.this_setup();
        let window = scheduler.coupling_window(this_setup)?;
        Ok(Self {
            previous_setup: scheduler.previous_setup().to_string(),
            this_setup: this_setup.to_string(),
            next_setup: scheduler.next_setup().to_string(),
            chunk_number: scheduler.chunk_number(this_setup).unwrap_or(1),
            coupling_start_date: window.start_date.to_string(),
            coupling_end_date: window.end_date.to_string(),
            coupling_dates: window
                .coupling_dates
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
    }
}

impl From<&ChunkWindow> for PlanEntry {
    fn from(window: &ChunkWindow) -> Self {
        Self {
            run_number: window.run_number,
            start_date: window.start_date.to_string(),
            end_date: window.end_date.to_string(),
            setup: window.setup.clone(),
        }
    }
}
