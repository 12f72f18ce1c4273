// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - simcal workspace automation
//!
//! `cargo xtask ci` lints, builds and tests the workspace, then runs
//! `smoke`: the `simcal` binary is driven through a few chunks of a demo
//! experiment, one process per chunk, against a scratch checkpoint file.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{
    fmt::Debug,
    io,
    path::{Path, PathBuf},
    process::Output,
};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::eyre, eyre::Context, Result};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const DEMO_CONFIG: &str = "demos/coupled.json";
const SMOKE_DATE_FILE: &str = "target/smoke.date";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Lint, build, test and smoke-run the workspace
    CI,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Type-check every target
    #[command(visible_alias = "c")]
    Check,

    /// Run clippy, rustdoc and rustfmt checks
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Build docs the way docs.rs does
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check formatting
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Apply clippy suggestions
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Apply rustfmt
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run unit and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Drive the simcal binary through a demo experiment
    #[command(visible_alias = "s")]
    Smoke(SmokeArgs),
}

#[derive(Clone, Debug, clap::Args)]
struct SmokeArgs {
    /// Experiment configuration to run
    #[arg(long, default_value = DEMO_CONFIG)]
    config: PathBuf,

    /// Number of chunks to advance
    #[arg(long, default_value_t = 3)]
    chunks: usize,
}

impl Default for SmokeArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEMO_CONFIG),
            chunks: 3,
        }
    }
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => run_cargo(&["build", "--all-targets", "--all-features"]),
            Self::Check => run_cargo(&["check", "--all-targets", "--all-features"]),
            Self::Lint => lint(),
            Self::LintClippy => run_cargo(&CLIPPY),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => run_cargo_nightly(&["fmt", "--all", "--check"]),
            Self::FixClippy => run_cargo(&CLIPPY_FIX),
            Self::FixFormatting => run_cargo_nightly(&["fmt", "--all"]),
            Self::Test => test(),
            Self::Smoke(args) => smoke(&args),
        }
    }
}

const CLIPPY: [&str; 6] = [
    "clippy",
    "--all-targets",
    "--all-features",
    "--",
    "-D",
    "warnings",
];

const CLIPPY_FIX: [&str; 9] = [
    "clippy",
    "--all-targets",
    "--all-features",
    "--fix",
    "--allow-dirty",
    "--allow-staged",
    "--",
    "-D",
    "warnings",
];

fn ci() -> Result<()> {
    lint()?;
    run_cargo(&["build", "--all-targets", "--all-features"])?;
    test()?;
    smoke(&SmokeArgs::default())
}

fn lint() -> Result<()> {
    run_cargo(&CLIPPY)?;
    lint_docs()?;
    run_cargo_nightly(&["fmt", "--all", "--check"])
}

/// Build docs for each default package with docs.rs flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

fn test() -> Result<()> {
    run_cargo(&["test", "--all-targets", "--all-features"])?;
    // doc tests last, they are the slow part
    run_cargo(&["test", "--doc", "--all-features"])
}

/// Plan, advance `chunks` times, then report status
///
/// Each `advance` is its own process, the way a batch job resubmits itself,
/// so every chunk after the first restores from the checkpoint file.
fn smoke(args: &SmokeArgs) -> Result<()> {
    if !args.config.is_file() {
        return Err(eyre!(
            "{} not found, run from the workspace root",
            args.config.display()
        ));
    }

    let date_file = Path::new(SMOKE_DATE_FILE);
    if date_file.exists() {
        std::fs::remove_file(date_file)
            .wrap_err_with(|| format!("failed to remove {SMOKE_DATE_FILE}"))?;
    }

    for invocation in smoke_invocations(&args.config.to_string_lossy(), args.chunks) {
        let mut cargo_args: Vec<&str> = vec!["run", "--quiet", "--package", "simcal-cli", "--"];
        cargo_args.extend(invocation.iter().map(String::as_str));
        run_cargo(&cargo_args)?;
    }

    let checkpoint = std::fs::read_to_string(date_file)
        .wrap_err_with(|| format!("failed to read {SMOKE_DATE_FILE}"))?;
    tracing::info!(
        "checkpoint after {} chunks: {}",
        args.chunks,
        checkpoint.trim_end()
    );
    Ok(())
}

/// The `simcal` argument lists a smoke run executes, in order
fn smoke_invocations(config: &str, chunks: usize) -> Vec<Vec<String>> {
    let with_checkpoint = |command: &str| -> Vec<String> {
        [command, "--config", config, "--date-file", SMOKE_DATE_FILE]
            .map(String::from)
            .to_vec()
    };

    let limit: String = (chunks * 2).to_string();
    let mut invocations: Vec<Vec<String>> = Vec::with_capacity(chunks + 2);
    invocations.push(
        ["plan", "--config", config, "--limit", limit.as_str()]
            .map(String::from)
            .to_vec(),
    );
    invocations.extend(std::iter::repeat_with(|| with_checkpoint("advance")).take(chunks));
    invocations.push(with_checkpoint("status"));
    invocations
}

fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

fn run_cargo_nightly(args: &[&str]) -> Result<()> {
    cmd("cargo", args)
        // CARGO is set because we run inside a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Logs a `duct::Expression` before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // the command line may have scrolled away by now
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
