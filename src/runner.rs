//! Runner abstraction for the short-lived helper processes used during
//! detection and installation (`which`/`where`, `php`, `brew`, `sudo`).

use std::io;
use std::path::PathBuf;
use std::process::Output;
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use crate::platform::Os;
use crate::probe::is_executable;

/// Runner interface for invoking helper commands.
pub trait Runner: Send + Sync {
    /// Execute a command to completion and return its captured output.
    fn output(&self, program: &str, args: &[&str]) -> io::Result<Output>;
}

struct RealRunner;

impl Runner for RealRunner {
    fn output(&self, program: &str, args: &[&str]) -> io::Result<Output> {
        log::debug!("running {} {:?}", program, args);
        std::process::Command::new(program).args(args).output()
    }
}

static RUNNER: OnceLock<RwLock<Arc<dyn Runner>>> = OnceLock::new();
static TEST_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn runner_lock() -> &'static RwLock<Arc<dyn Runner>> {
    RUNNER.get_or_init(|| RwLock::new(Arc::new(RealRunner)))
}

/// Run a command and capture its output.
pub fn run_output(program: &str, args: &[&str]) -> io::Result<Output> {
    let runner = runner_lock().read().expect("runner lock poisoned").clone();
    runner.output(program, args)
}

/// Resolve a bare command name through the OS lookup facility.
///
/// Uses `where` on Windows and `which` elsewhere. Only the first reported
/// line is considered, and it must pass the executable probe.
pub fn lookup_path(name: &str) -> Option<PathBuf> {
    let finder = if Os::current().is_windows() {
        "where"
    } else {
        "which"
    };
    let output = run_output(finder, &[name]).ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().map(str::trim).find(|line| !line.is_empty())?;
    let path = PathBuf::from(first);
    is_executable(&path).then_some(path)
}

/// Check if a command is resolvable on PATH.
pub fn command_exists(command: &str) -> bool {
    let finder = if Os::current().is_windows() {
        "where"
    } else {
        "which"
    };
    run_output(finder, &[command])
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Render stdout followed by stderr as one string.
pub fn combined_output(output: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

/// Guard that restores the previous runner when dropped.
pub struct RunnerGuard {
    previous: Arc<dyn Runner>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl Drop for RunnerGuard {
    fn drop(&mut self) {
        let mut runner = runner_lock().write().expect("runner lock poisoned");
        *runner = self.previous.clone();
    }
}

/// Override the runner for tests; restores on guard drop.
pub fn set_runner_for_tests(runner: Arc<dyn Runner>) -> RunnerGuard {
    let lock = TEST_LOCK.get_or_init(|| Mutex::new(()));
    let guard = lock
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous = {
        let mut slot = runner_lock().write().expect("runner lock poisoned");
        let previous = slot.clone();
        *slot = runner;
        previous
    };
    RunnerGuard {
        previous,
        _lock: guard,
    }
}
