//! Pre-recorded command responses that stand in for real composer runs.
//!
//! A [`FixtureTable`] can be injected into a [`crate::composer::Composer`];
//! otherwise the process-wide table from [`global`] is used. The global table
//! is shared by every test in the process, so tests that register into it
//! must call [`clear_mock_outputs`] when they are done.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::{Error, Result};

/// A recorded response: output plus an optional error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub output: String,
    pub error: Option<String>,
}

impl Fixture {
    /// Turn the recording into what a real run would have returned.
    pub fn into_result(self) -> Result<String> {
        match self.error {
            None => Ok(self.output),
            Some(message) => Err(Error::Recorded {
                message,
                output: self.output,
            }),
        }
    }
}

/// Thread-safe map from command keys to recorded responses.
#[derive(Debug, Default)]
pub struct FixtureTable {
    entries: RwLock<HashMap<String, Fixture>>,
}

impl FixtureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a response for `command` (subcommand plus space-joined args).
    pub fn register(&self, command: impl Into<String>, output: impl Into<String>, error: Option<&str>) {
        let fixture = Fixture {
            output: output.into(),
            error: error.map(str::to_string),
        };
        self.entries
            .write()
            .expect("fixture lock poisoned")
            .insert(command.into(), fixture);
    }

    pub fn clear(&self) {
        self.entries.write().expect("fixture lock poisoned").clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("fixture lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact command match first, then the leading token alone.
    pub fn lookup<S: AsRef<str>>(&self, args: &[S]) -> Option<Fixture> {
        let first = args.first()?.as_ref();
        let entries = self.entries.read().expect("fixture lock poisoned");
        entries
            .get(&command_key(args))
            .or_else(|| entries.get(first))
            .cloned()
    }
}

/// Canonical lookup key: arguments joined by single spaces.
pub fn command_key<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ")
}

static GLOBAL: OnceLock<Arc<FixtureTable>> = OnceLock::new();

/// The process-wide table used by instances without an injected one.
pub fn global() -> Arc<FixtureTable> {
    GLOBAL.get_or_init(|| Arc::new(FixtureTable::new())).clone()
}

/// Register a response in the process-wide table.
pub fn setup_mock_output(command: &str, output: &str, error: Option<&str>) {
    global().register(command, output, error);
}

/// Remove every response from the process-wide table.
pub fn clear_mock_outputs() {
    global().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn exact_match_beats_leading_token() {
        let table = FixtureTable::new();
        table.register("diagnose", "generic", None);
        table.register("diagnose --verbose", "specific", None);
        let hit = table.lookup(&["diagnose", "--verbose"]).expect("fixture");
        assert_eq!(hit.output, "specific");
    }

    #[test]
    fn leading_token_matches_any_arguments() {
        let table = FixtureTable::new();
        table.register("diagnose", "generic", None);
        let hit = table.lookup(&["diagnose", "--verbose"]).expect("fixture");
        assert_eq!(hit.output, "generic");
        assert!(table.lookup(&["status"]).is_none());
        assert!(table.lookup::<&str>(&[]).is_none());
    }

    #[test]
    fn recorded_error_becomes_err_with_output() {
        let fixture = Fixture {
            output: "partial".to_string(),
            error: Some("boom".to_string()),
        };
        let err = fixture.into_result().expect_err("error fixture");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.output(), Some("partial"));
    }

    #[test]
    fn concurrent_register_and_lookup() {
        let table = Arc::new(FixtureTable::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let table = table.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("show vendor/pkg-{}-{}", worker, i);
                        table.register(key.clone(), "ok", None);
                        let args: Vec<&str> = key.split(' ').collect();
                        assert!(table.lookup(&args).is_some());
                        if i % 50 == 0 {
                            let _ = table.lookup(&["show"]);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker panicked");
        }
        assert_eq!(table.len(), 8 * 200);
    }
}
