// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use simcal_domain::DomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring, restoring or advancing an experiment.
///
/// An absent checkpoint file is not an error; see
/// [`ResumeState::FirstRun`](crate::ResumeState::FirstRun).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The experiment is configured inconsistently.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configured value is not a valid date, duration or calendar.
    #[error("Invalid {field}: {source}")]
    InvalidSetting {
        /// The configuration field.
        field: String,
        /// The underlying domain error.
        #[source]
        source: DomainError,
    },

    /// A date string supplied at a call site could not be parsed.
    #[error("Failed to parse '{input}': {source}")]
    Parse {
        /// The rejected input.
        input: String,
        /// The underlying domain error.
        #[source]
        source: DomainError,
    },

    /// The experiment configuration file could not be read.
    #[error("Failed to read configuration {}: {source}", path.display())]
    ConfigRead {
        /// The configuration path.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The experiment configuration is not valid JSON for this schema.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[source] serde_json::Error),

    /// A checkpoint file exists but could not be read.
    #[error("Failed to read checkpoint {}: {source}", path.display())]
    CheckpointRead {
        /// The checkpoint path.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A checkpoint could not be written. The chunk must not be reported as done.
    #[error("Failed to write checkpoint {}: {source}", path.display())]
    CheckpointWrite {
        /// The checkpoint path.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A checkpoint file exists but its contents are not a checkpoint line.
    #[error("Malformed checkpoint {}: {reason}", path.display())]
    MalformedCheckpoint {
        /// The checkpoint path.
        path: PathBuf,
        /// Why the line was rejected.
        reason: String,
    },

    /// A restored checkpoint names a setup that is not part of the rotation.
    #[error("Unknown setup '{0}'")]
    UnknownSetup(String),

    /// Date arithmetic failed while deriving a date.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
