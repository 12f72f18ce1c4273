// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain-text checkpoint files.
//!
//! A checkpoint is a single line written at the end of a successful chunk
//! and read at the start of the next job:
//!
//! - run checkpoint: `<date> <run-number>`
//! - chunk checkpoint: `<date> <chunk-number> <setup-name>`
//!
//! Dates may contain spaces (forms 3, 4, 5 and 10), so lines are split from
//! the right.
//!
//! Files are replaced atomically: the line goes to a `.tmp` sibling, is
//! synced, then renamed over the target.

use crate::error::CoreError;
use simcal_domain::{Calendar, CalendarDate};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Whether a checkpoint was found when an experiment was restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeState {
    /// No checkpoint file exists; the configured start applies.
    FirstRun,
    /// State was restored from a checkpoint file.
    Resumed,
}

/// A run checkpoint: the date and run number the next job starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCheckpoint {
    pub date: CalendarDate,
    pub run_number: u64,
}

impl DateCheckpoint {
    /// Renders the checkpoint line, without a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be written in its own form.
    pub fn to_line(&self) -> Result<String, CoreError> {
        Ok(format!("{} {}", self.date.format()?, self.run_number))
    }

    /// Parses a checkpoint line.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the line is malformed.
    pub fn parse_line(calendar: Calendar, line: &str) -> Result<Self, String> {
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        let run_number: u64 = pop_counter(&mut tokens, "run number")?;
        let date: CalendarDate = parse_date(calendar, &tokens)?;
        Ok(Self { date, run_number })
    }
}

/// A chunk checkpoint: the date, chunk number and name of the next setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkCheckpoint {
    pub date: CalendarDate,
    pub chunk_number: u64,
    pub setup: String,
}

impl ChunkCheckpoint {
    /// Renders the checkpoint line, without a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be written in its own form.
    pub fn to_line(&self) -> Result<String, CoreError> {
        Ok(format!(
            "{} {} {}",
            self.date.format()?,
            self.chunk_number,
            self.setup
        ))
    }

    /// Parses a checkpoint line.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the line is malformed.
    pub fn parse_line(calendar: Calendar, line: &str) -> Result<Self, String> {
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        let setup: String = tokens
            .pop()
            .map(str::to_string)
            .ok_or_else(|| String::from("empty checkpoint"))?;
        let chunk_number: u64 = pop_counter(&mut tokens, "chunk number")?;
        let date: CalendarDate = parse_date(calendar, &tokens)?;
        Ok(Self {
            date,
            chunk_number,
            setup,
        })
    }
}

fn pop_counter(tokens: &mut Vec<&str>, name: &str) -> Result<u64, String> {
    let token: &str = tokens.pop().ok_or_else(|| format!("missing {name}"))?;
    match token.parse::<u64>() {
        Ok(0) => Err(format!("{name} must be at least 1")),
        Ok(value) => Ok(value),
        Err(_) => Err(format!("{name} '{token}' is not a positive integer")),
    }
}

fn parse_date(calendar: Calendar, tokens: &[&str]) -> Result<CalendarDate, String> {
    if tokens.is_empty() {
        return Err(String::from("missing date"));
    }
    CalendarDate::parse(calendar, &tokens.join(" ")).map_err(|err| err.to_string())
}

/// Reads the first line of a checkpoint file.
///
/// Returns `Ok(None)` when the file does not exist.
pub(crate) fn read_line(path: &Path) -> Result<Option<String>, CoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(
            contents.lines().next().unwrap_or_default().trim().to_string(),
        )),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(
                "Checkpoint {} does not exist, assuming very first run",
                path.display()
            );
            Ok(None)
        }
        Err(source) => Err(CoreError::CheckpointRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Atomically replaces `path` with `line`.
pub(crate) fn write_line(path: &Path, line: &str) -> Result<(), CoreError> {
    let write_error = |source: std::io::Error| CoreError::CheckpointWrite {
        path: path.to_path_buf(),
        source,
    };

    let tmp_path: PathBuf = temporary_sibling(path).map_err(write_error)?;
    if let Err(source) = replace_with(&tmp_path, path, line) {
        // The previous checkpoint is untouched; only the partial file goes.
        match fs::remove_file(&tmp_path) {
            Ok(()) => (),
            Err(err) if err.kind() == ErrorKind::NotFound => (),
            Err(err) => warn!("Could not remove {}: {err}", tmp_path.display()),
        }
        return Err(write_error(source));
    }
    Ok(())
}

fn replace_with(tmp_path: &Path, path: &Path, line: &str) -> std::io::Result<()> {
    let mut file: File = File::create(tmp_path)?;
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp_path, path)
}

fn temporary_sibling(path: &Path) -> Result<PathBuf, std::io::Error> {
    let mut name: OsString = path
        .file_name()
        .ok_or_else(|| {
            std::io::Error::new(ErrorKind::InvalidInput, "checkpoint path has no file name")
        })?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_checkpoint_line_with_spaces_in_date() {
        let line: &str = "07 Mar 1850 12:00:00 4";
        let checkpoint: DateCheckpoint =
            DateCheckpoint::parse_line(Calendar::GregorianLeap, line).unwrap();
        assert_eq!(checkpoint.run_number, 4);
        assert_eq!(checkpoint.date.month(), 3);
        assert_eq!(checkpoint.to_line().unwrap(), line);
    }

    #[test]
    fn test_chunk_checkpoint_line() {
        let line: &str = "-12600-01-01 2 pism";
        let checkpoint: ChunkCheckpoint =
            ChunkCheckpoint::parse_line(Calendar::GregorianLeap, line).unwrap();
        assert_eq!(checkpoint.setup, "pism");
        assert_eq!(checkpoint.chunk_number, 2);
        assert_eq!(checkpoint.date.year(), -12600);
        assert_eq!(checkpoint.to_line().unwrap(), line);
    }

    #[test]
    fn test_failed_write_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("run.date");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        let result = write_line(&path, "1851-01-01 2");

        assert!(matches!(result, Err(CoreError::CheckpointWrite { .. })));
        assert!(!dir.path().join("run.date.tmp").exists());
    }

    #[test]
    fn test_write_line_replaces_previous_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("run.date");

        write_line(&path, "1851-01-01 2").unwrap();
        write_line(&path, "1852-01-01 3").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1852-01-01 3\n");
        assert!(!dir.path().join("run.date.tmp").exists());
    }

    #[test]
    fn test_malformed_checkpoint_lines() {
        for line in ["", "1850-01-01", "1850-01-01 0", "1850-01-01 x", "4", "1850-02-30 2"] {
            assert!(
                DateCheckpoint::parse_line(Calendar::GregorianLeap, line).is_err(),
                "{line:?} should be rejected"
            );
        }
        assert!(ChunkCheckpoint::parse_line(Calendar::GregorianLeap, "1850-01-01 echam").is_err());
    }

    #[test]
    fn test_write_line_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("run.date");
        write_line(&path, "1850-01-01 1").unwrap();
        write_line(&path, "1851-01-01 2").unwrap();

        assert_eq!(read_line(&path).unwrap().as_deref(), Some("1851-01-01 2"));
        assert!(!dir.path().join("run.date.tmp").exists());
    }

    #[test]
    fn test_read_line_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_line(&dir.path().join("absent")).unwrap(), None);
    }
}
