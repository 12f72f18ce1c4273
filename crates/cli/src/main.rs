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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod report;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use color_eyre::{Result, eyre::Context, eyre::eyre};
use report::{PlanEntry, StatusReport};
use simcal::{Experiment, ExperimentConfig, ResumeState};
use simcal_domain::{
    Calendar, CalendarDate, CalendarDuration, DateForm, ForceFields, TimeUnit, later,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// simcal - calendars and chunk schedules for restartable simulations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Calendar: gregorian, noleap, 360_day, equal_month:N or a legacy integer code
    #[arg(long, global = true, default_value = "gregorian")]
    calendar: Calendar,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run(self.calendar)
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a duration to a date
    Plus {
        date: String,
        #[command(flatten)]
        offset: Offset,
    },

    /// Subtract a duration from a date
    Minus {
        date: String,
        #[command(flatten)]
        offset: Offset,
    },

    /// Rewrite a date in another canonical form
    Format {
        date: String,

        /// Target form, 0 to 10. Defaults to the form of the input
        #[arg(long)]
        form: Option<DateForm>,

        #[arg(long)]
        force_hour: bool,

        #[arg(long)]
        force_minute: bool,

        #[arg(long)]
        force_second: bool,
    },

    /// Print the later of two dates
    Later { first: String, second: String },

    /// Print the distance between two dates
    Between {
        first: String,
        second: String,

        /// years, months, days, hours, minutes or seconds
        #[arg(long, default_value = "seconds")]
        unit: TimeUnit,
    },

    /// Print the 1-based day of the year
    DayOfYear { date: String },

    /// Show where an experiment stands
    Status {
        /// Experiment configuration (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Checkpoint file to restore from
        #[arg(long)]
        date_file: Option<PathBuf>,
    },

    /// Write the checkpoint for the next chunk
    Advance {
        /// Experiment configuration (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Checkpoint file to restore from and replace
        #[arg(long)]
        date_file: PathBuf,
    },

    /// List upcoming chunks without changing anything
    Plan {
        /// Experiment configuration (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Checkpoint file to start from
        #[arg(long)]
        date_file: Option<PathBuf>,

        /// Maximum number of chunks to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

/// Duration fields for `plus` and `minus`.
#[derive(Debug, Clone, Copy, clap::Args)]
struct Offset {
    #[arg(short = 'Y', long, default_value_t = 0, allow_negative_numbers = true)]
    years: i64,

    #[arg(short = 'M', long, default_value_t = 0, allow_negative_numbers = true)]
    months: i64,

    #[arg(short = 'D', long, default_value_t = 0, allow_negative_numbers = true)]
    days: i64,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    hours: i64,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    minutes: i64,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    seconds: i64,
}

impl Offset {
    fn duration(self) -> CalendarDuration {
        CalendarDuration::new(
            self.years,
            self.months,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        )
    }
}

impl Command {
    fn run(self, calendar: Calendar) -> Result<()> {
        match self {
            Self::Plus { date, offset } => {
                let date: CalendarDate = parse_date(calendar, &date)?;
                println!("{}", date.checked_add(&offset.duration())?.format()?);
            }
            Self::Minus { date, offset } => {
                let date: CalendarDate = parse_date(calendar, &date)?;
                println!("{}", date.checked_sub(&offset.duration())?.format()?);
            }
            Self::Format {
                date,
                form,
                force_hour,
                force_minute,
                force_second,
            } => {
                let date: CalendarDate = parse_date(calendar, &date)?;
                let force = ForceFields {
                    hour: force_hour,
                    minute: force_minute,
                    second: force_second,
                };
                let form: DateForm = form.unwrap_or_else(|| date.descriptor().form());
                println!("{}", date.format_as(form, force)?);
            }
            Self::Later { first, second } => {
                let first: CalendarDate = parse_date(calendar, &first)?;
                let second: CalendarDate = parse_date(calendar, &second)?;
                println!("{}", later(&first, &second).format()?);
            }
            Self::Between {
                first,
                second,
                unit,
            } => {
                let first: CalendarDate = parse_date(calendar, &first)?;
                let second: CalendarDate = parse_date(calendar, &second)?;
                println!("{}", first.time_between(&second, unit)?);
            }
            Self::DayOfYear { date } => {
                println!("{}", parse_date(calendar, &date)?.day_of_year());
            }
            Self::Status { config, date_file } => {
                let (experiment, state) = restore(&config, date_file.as_deref())?;
                let report: StatusReport =
                    StatusReport::new(&experiment, state == ResumeState::Resumed)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Self::Advance { config, date_file } => {
                let (experiment, _) = restore(&config, Some(&date_file))?;
                if experiment.is_complete() {
                    return Err(eyre!(
                        "experiment already reached its final date {}",
                        experiment.run_calendar().final_date()
                    ));
                }
                experiment.write_checkpoint(&date_file)?;
                info!(
                    "Run {} finished, next checkpoint in {}",
                    experiment.run_calendar().run_number(),
                    date_file.display()
                );
            }
            Self::Plan {
                config,
                date_file,
                limit,
            } => {
                let (experiment, _) = restore(&config, date_file.as_deref())?;
                let entries: Vec<PlanEntry> = experiment
                    .plan(limit)?
                    .iter()
                    .map(PlanEntry::from)
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }
        Ok(())
    }
}

fn parse_date(calendar: Calendar, text: &str) -> Result<CalendarDate> {
    CalendarDate::parse(calendar, text).wrap_err_with(|| format!("Invalid date '{text}'"))
}

/// Builds the experiment and restores its checkpoint, if one is given.
fn restore(config: &Path, date_file: Option<&Path>) -> Result<(Experiment, ResumeState)> {
    let mut experiment: Experiment = ExperimentConfig::load(config)?.build()?;
    let state: ResumeState = match date_file {
        Some(path) => experiment.read_checkpoint(path)?,
        None => ResumeState::FirstRun,
    };
    Ok((experiment, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_offsets_accept_negative_values() {
        let args: Args =
            Args::try_parse_from(["simcal", "plus", "1850-01-01", "-Y", "-5", "--hours", "12"])
                .unwrap();
        let Command::Plus { offset, .. } = args.command else {
            panic!("expected the plus command");
        };
        assert_eq!(offset.duration(), CalendarDuration::new(-5, 0, 0, 12, 0, 0));
    }

    #[test]
    fn test_calendar_and_unit_parse_through_domain_types() {
        let args: Args = Args::try_parse_from([
            "simcal",
            "between",
            "1850-01-01",
            "1851-01-01",
            "--unit",
            "days",
            "--calendar",
            "360_day",
        ])
        .unwrap();
        assert_eq!(args.calendar, Calendar::EqualMonth(30));
        assert!(matches!(
            args.command,
            Command::Between {
                unit: TimeUnit::Days,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_calendar_is_rejected() {
        let result = Args::try_parse_from(["simcal", "--calendar", "julian", "day-of-year", "1850-01-01"]);
        assert!(result.is_err());
    }
}
