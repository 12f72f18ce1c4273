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

mod checkpoint;
mod config;
mod coupling;
mod error;
mod run_calendar;

#[cfg(test)]
mod tests;

// Re-export public types
pub use checkpoint::{ChunkCheckpoint, DateCheckpoint, ResumeState};
pub use config::{Experiment, ExperimentConfig, SetupConfig};
pub use coupling::{CouplingScheduler, CouplingWindow};
pub use error::CoreError;
pub use run_calendar::{ChunkWindow, RunCalendar};
