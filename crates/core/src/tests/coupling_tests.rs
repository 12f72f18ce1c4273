// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_scheduler, date};
use crate::{ChunkWindow, CoreError, CouplingScheduler, CouplingWindow, ResumeState};
use simcal_domain::CalendarDuration;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

fn lengths(entries: &[(&str, CalendarDuration)]) -> BTreeMap<String, CalendarDuration> {
    entries
        .iter()
        .map(|(name, length)| ((*name).to_string(), *length))
        .collect()
}

fn names(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn test_initial_rotation() {
    let scheduler: CouplingScheduler = create_test_scheduler();
    assert_eq!(scheduler.this_setup(), "a");
    assert_eq!(scheduler.previous_setup(), "c");
    assert_eq!(scheduler.next_setup(), "b");
    assert_eq!(scheduler.rotation(), vec!["a", "b", "c"]);
    assert_eq!(scheduler.run_number(), 1);
    assert_eq!(scheduler.chunk_number("a"), Some(1));
    assert_eq!(
        scheduler.run_calendar().delta_date(),
        &CalendarDuration::years(1)
    );
}

#[test]
fn test_previous_and_next_dates_follow_setup_chunk_lengths() {
    let scheduler: CouplingScheduler = create_test_scheduler();
    assert_eq!(scheduler.previous_date().unwrap(), date("1847-01-01"));
    assert_eq!(scheduler.next_date().unwrap(), date("1851-01-01"));
}

#[test]
fn test_rotation_is_periodic() {
    let mut after_one: CouplingScheduler = create_test_scheduler();
    after_one.advance().unwrap();

    let mut after_four: CouplingScheduler = create_test_scheduler();
    for _ in 0..4 {
        after_four.advance().unwrap();
    }

    assert_eq!(after_four.this_setup(), after_one.this_setup());
    assert_eq!(after_four.rotation(), after_one.rotation());
}

#[test]
fn test_advance_moves_time_by_finished_setup() {
    let mut scheduler: CouplingScheduler = create_test_scheduler();
    let expected: [(&str, &str, u64); 4] = [
        ("b", "1851-01-01", 2),
        ("c", "1853-01-01", 3),
        ("a", "1856-01-01", 4),
        ("b", "1857-01-01", 5),
    ];
    for (setup, current, run_number) in expected {
        scheduler.advance().unwrap();
        assert_eq!(scheduler.this_setup(), setup);
        assert_eq!(scheduler.current_date(), &date(current));
        assert_eq!(scheduler.run_number(), run_number);
        assert_eq!(
            scheduler.run_calendar().delta_date(),
            scheduler.chunk_length(setup).unwrap()
        );
    }
    assert_eq!(scheduler.chunk_number("a"), Some(2));
    assert_eq!(scheduler.chunk_number("b"), Some(2));
    assert_eq!(scheduler.chunk_number("c"), Some(2));
}

#[test]
fn test_coupling_window_lists_whole_years() {
    let scheduler: CouplingScheduler = create_test_scheduler();
    let window: CouplingWindow = scheduler.coupling_window("c").unwrap();

    assert_eq!(window.start_date, date("1850-01-01"));
    assert_eq!(window.end_date, date("1853-01-01"));
    assert_eq!(
        window.coupling_dates,
        vec![date("1850-01-01"), date("1851-01-01"), date("1852-01-01")]
    );

    let windows: Vec<CouplingWindow> = scheduler.coupling_windows().unwrap();
    assert_eq!(windows.len(), 3);
    assert_eq!(windows[0].coupling_dates.len(), 1);
}

#[test]
fn test_coupling_window_without_whole_years() {
    let scheduler: CouplingScheduler = CouplingScheduler::new(
        date("1850-01-01"),
        date("1851-01-01"),
        names(&["ocean"]),
        lengths(&[("ocean", CalendarDuration::months(6))]),
    )
    .unwrap();
    let window: CouplingWindow = scheduler.coupling_window("ocean").unwrap();
    assert_eq!(window.end_date, date("1850-07-01"));
    assert!(window.coupling_dates.is_empty());
    assert!(matches!(
        scheduler.coupling_window("atmosphere"),
        Err(CoreError::UnknownSetup(_))
    ));
}

#[test]
fn test_chunk_file_names_next_setup() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("chunk.date");
    let scheduler: CouplingScheduler = create_test_scheduler();

    scheduler.write_chunk_file(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "1851-01-01 1 b\n");
}

#[test]
fn test_chunk_file_resume_matches_replay() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("chunk.date");

    let mut replayed: CouplingScheduler = create_test_scheduler();
    for _ in 0..5 {
        let mut job: CouplingScheduler = create_test_scheduler();
        job.read_chunk_file(&path).unwrap();
        job.write_chunk_file(&path).unwrap();
        replayed.advance().unwrap();
    }

    let mut resumed: CouplingScheduler = create_test_scheduler();
    let state: ResumeState = resumed.read_chunk_file(&path).unwrap();

    assert_eq!(state, ResumeState::Resumed);
    assert_eq!(resumed.current_date(), replayed.current_date());
    assert_eq!(resumed.run_number(), replayed.run_number());
    assert_eq!(resumed.rotation(), replayed.rotation());
    for setup in ["a", "b", "c"] {
        assert_eq!(resumed.chunk_number(setup), replayed.chunk_number(setup));
    }
    assert_eq!(
        resumed.run_calendar().delta_date(),
        replayed.run_calendar().delta_date()
    );
}

#[test]
fn test_missing_chunk_file_is_first_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut scheduler: CouplingScheduler = create_test_scheduler();

    let state: ResumeState = scheduler
        .read_chunk_file(&dir.path().join("nonexistent"))
        .unwrap();

    assert_eq!(state, ResumeState::FirstRun);
    assert_eq!(scheduler.this_setup(), "a");
    assert_eq!(scheduler.run_number(), 1);
}

#[test]
fn test_chunk_file_with_unknown_setup() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("chunk.date");
    fs::write(&path, "1851-01-01 1 z\n").unwrap();
    let mut scheduler: CouplingScheduler = create_test_scheduler();

    let result = scheduler.read_chunk_file(&path);

    assert!(matches!(result, Err(CoreError::UnknownSetup(ref name)) if name == "z"));
}

#[test]
fn test_setup_without_chunk_length_is_rejected_at_construction() {
    let result = CouplingScheduler::new(
        date("1850-01-01"),
        date("1900-01-01"),
        names(&["a", "b"]),
        lengths(&[("a", CalendarDuration::years(1))]),
    );
    assert!(matches!(result, Err(CoreError::Configuration(_))));
}

#[test]
fn test_invalid_setup_names_are_rejected() {
    let length: CalendarDuration = CalendarDuration::years(1);
    for setups in [
        names(&[]),
        names(&[""]),
        names(&["two words"]),
        names(&["a", "a"]),
    ] {
        let chunk_lengths = lengths(&[("a", length), ("", length), ("two words", length)]);
        let result =
            CouplingScheduler::new(date("1850-01-01"), date("1900-01-01"), setups, chunk_lengths);
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }
}

#[test]
fn test_chunk_length_must_move_forward() {
    let result = CouplingScheduler::new(
        date("1850-01-01"),
        date("1900-01-01"),
        names(&["a"]),
        lengths(&[("a", CalendarDuration::zero())]),
    );
    assert!(matches!(result, Err(CoreError::Configuration(_))));
}

#[test]
fn test_mixed_sign_chunk_length_is_rejected() {
    let result = CouplingScheduler::new(
        date("1850-01-30"),
        date("1900-01-01"),
        names(&["a", "b"]),
        lengths(&[
            ("a", CalendarDuration::years(1)),
            ("b", CalendarDuration::new(0, 1, -30, 0, 0, 0)),
        ]),
    );
    assert!(matches!(result, Err(CoreError::Configuration(ref msg)) if msg.contains("chunk length of b")));
}

#[test]
fn test_plan_assigns_setups_in_rotation() {
    let scheduler: CouplingScheduler = create_test_scheduler();

    let windows: Vec<ChunkWindow> = scheduler.plan(5).unwrap();

    let setups: Vec<&str> = windows
        .iter()
        .map(|window| window.setup.as_deref().unwrap())
        .collect();
    assert_eq!(setups, vec!["a", "b", "c", "a", "b"]);
    assert_eq!(windows[3].start_date, date("1856-01-01"));
    assert_eq!(windows[3].end_date, date("1857-01-01"));
    assert_eq!(windows[4].run_number, 5);
    assert_eq!(scheduler.run_number(), 1);
}
