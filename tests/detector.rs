mod common;

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use composer_kit::ErrorKind;
use composer_kit::detector::Detector;
use composer_kit::runner::{Runner, set_runner_for_tests};
use tempfile::TempDir;

use common::{make_executable, unique_var};

struct LookupRunner {
    answer: Option<PathBuf>,
    calls: Mutex<Vec<String>>,
}

impl Runner for LookupRunner {
    fn output(&self, program: &str, args: &[&str]) -> io::Result<Output> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(format!("{} {}", program, args.join(" ")));
        let (code, stdout) = match &self.answer {
            Some(path) => (0, format!("{}\n", path.display())),
            None => (1, String::new()),
        };
        Ok(Output {
            status: exit_status(code),
            stdout: stdout.into_bytes(),
            stderr: Vec::new(),
        })
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

fn isolated_detector(tag: &str) -> Detector {
    let mut detector = Detector::new();
    detector.set_possible_paths(Vec::new());
    detector.set_env_override(unique_var(tag));
    detector
}

#[test]
fn env_override_beats_candidates() {
    let temp = TempDir::new().expect("temp dir");
    let from_env = make_executable(temp.path(), "composer-env", "#!/bin/sh\n");
    let candidate = make_executable(temp.path(), "composer-candidate", "#!/bin/sh\n");
    let var = unique_var("OVERRIDE");
    unsafe { std::env::set_var(&var, &from_env) };

    let mut detector = isolated_detector("UNUSED");
    detector.set_env_override(&var);
    detector.set_possible_paths(vec![candidate]);
    let found = detector.detect().expect("detect");

    unsafe { std::env::remove_var(&var) };
    assert_eq!(found, from_env);
}

#[test]
fn invalid_override_falls_through_to_candidates() {
    let temp = TempDir::new().expect("temp dir");
    let candidate = make_executable(temp.path(), "composer", "#!/bin/sh\n");
    let var = unique_var("BROKEN");
    unsafe { std::env::set_var(&var, temp.path().join("missing")) };

    let mut detector = isolated_detector("UNUSED");
    detector.set_env_override(&var);
    detector.add_possible_path(candidate.clone());
    let found = detector.detect().expect("detect");

    unsafe { std::env::remove_var(&var) };
    assert_eq!(found, candidate);
}

#[test]
fn first_executable_candidate_wins() {
    let temp = TempDir::new().expect("temp dir");
    let first = make_executable(temp.path(), "first", "#!/bin/sh\n");
    let second = make_executable(temp.path(), "second", "#!/bin/sh\n");

    let mut detector = isolated_detector("ORDER");
    detector.set_possible_paths(vec![temp.path().join("missing"), first.clone(), second]);
    assert_eq!(detector.detect().expect("detect"), first);
}

#[test]
fn falls_back_to_path_lookup() {
    let temp = TempDir::new().expect("temp dir");
    let on_path = make_executable(temp.path(), "composer", "#!/bin/sh\n");
    let runner = Arc::new(LookupRunner {
        answer: Some(on_path.clone()),
        calls: Mutex::new(Vec::new()),
    });
    let guard = set_runner_for_tests(runner.clone());

    let mut detector = isolated_detector("LOOKUP");
    detector.add_possible_path(temp.path().join("not-here"));
    let found = detector.detect();
    let calls = runner.calls.lock().expect("calls lock").clone();
    drop(guard);

    assert_eq!(found.expect("detect"), on_path);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].ends_with(" composer"));
}

#[test]
fn nothing_found_is_not_found() {
    let runner = Arc::new(LookupRunner {
        answer: None,
        calls: Mutex::new(Vec::new()),
    });
    let guard = set_runner_for_tests(runner);

    let detector = isolated_detector("NONE");
    let err = detector.detect().expect_err("nothing to find");
    let installed = detector.is_installed();
    drop(guard);

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!installed);
}

#[test]
fn detection_is_not_cached() {
    let temp = TempDir::new().expect("temp dir");
    let target = temp.path().join("composer");
    let runner = Arc::new(LookupRunner {
        answer: None,
        calls: Mutex::new(Vec::new()),
    });
    let guard = set_runner_for_tests(runner);

    let mut detector = isolated_detector("LATE");
    detector.add_possible_path(target.clone());
    let before = detector.is_installed();
    make_executable(temp.path(), "composer", "#!/bin/sh\n");
    let after = detector.detect();
    drop(guard);

    assert!(!before);
    assert_eq!(after.expect("detect after install"), target);
}

#[cfg(unix)]
#[test]
fn non_executable_candidate_is_skipped_on_unix() {
    use std::os::unix::fs::PermissionsExt;
    let temp = TempDir::new().expect("temp dir");
    let plain = temp.path().join("composer.phar");
    std::fs::write(&plain, "<?php").expect("write");
    std::fs::set_permissions(&plain, std::fs::Permissions::from_mode(0o644)).expect("chmod");
    let runner = Arc::new(LookupRunner {
        answer: None,
        calls: Mutex::new(Vec::new()),
    });
    let guard = set_runner_for_tests(runner);

    let mut detector = isolated_detector("PLAIN");
    detector.add_possible_path(plain);
    let result = detector.detect();
    drop(guard);

    assert_eq!(result.expect_err("not executable").kind(), ErrorKind::NotFound);
}
