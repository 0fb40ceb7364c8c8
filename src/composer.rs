//! The `Composer` handle: resolves an executable once, then runs commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::context::RunContext;
use crate::detector::Detector;
use crate::error::{Error, Result};
use crate::fixtures::{self, FixtureTable};
use crate::installer::{Install, Installer};
use crate::invoke::{self, InvocationRequest};
use crate::probe::is_executable;

/// Timeout applied by [`Composer::run`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Construction options for [`Composer::new`].
pub struct Options {
    /// Use this executable and skip detection.
    pub executable_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    /// Install composer when detection fails.
    pub auto_install: bool,
    pub installer: Option<Box<dyn Install>>,
    pub detector: Option<Detector>,
    /// Full replacement environment; empty means inherit.
    pub env: Vec<(String, String)>,
    pub default_timeout: Duration,
    /// Fixture table consulted before spawning; the global table if `None`.
    pub fixtures: Option<Arc<FixtureTable>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            executable_path: None,
            working_dir: None,
            auto_install: true,
            installer: None,
            detector: None,
            env: Vec::new(),
            default_timeout: DEFAULT_TIMEOUT,
            fixtures: None,
        }
    }
}

/// A resolved composer executable plus the settings used to run it.
///
/// Setters are for setup before the handle is shared; `run*` methods take
/// `&self` and may be called from many threads at once.
#[derive(Debug, Clone)]
pub struct Composer {
    executable_path: PathBuf,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
    default_timeout: Duration,
    fixtures: Arc<FixtureTable>,
}

impl Composer {
    /// Resolve the executable and build a ready handle.
    ///
    /// Order: explicit path, detection, then (with `auto_install`) one
    /// install followed by a single detection retry.
    pub fn new(options: Options) -> Result<Self> {
        let Options {
            executable_path,
            working_dir,
            auto_install,
            installer,
            detector,
            env,
            default_timeout,
            fixtures: fixture_table,
        } = options;

        let executable_path = match executable_path.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::NotFound {
                        detail: format!("configured executable {} does not exist", path.display()),
                    });
                }
                path
            }
            None => resolve(&detector.unwrap_or_default(), installer, auto_install)?,
        };
        log::debug!("composer ready at {}", executable_path.display());

        Ok(Self {
            executable_path,
            working_dir,
            env,
            default_timeout,
            fixtures: fixture_table.unwrap_or_else(fixtures::global),
        })
    }

    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn set_working_dir(&mut self, dir: impl Into<PathBuf>) {
        self.working_dir = Some(dir.into());
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn set_env(&mut self, env: Vec<(String, String)>) {
        self.env = env;
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = timeout;
    }

    /// True while the bound executable still passes the probe.
    pub fn is_installed(&self) -> bool {
        is_executable(&self.executable_path)
    }

    /// Run a composer command bounded by the default timeout.
    pub fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        self.run_with_timeout(self.default_timeout, args)
    }

    pub fn run_with_timeout<S: AsRef<str>>(&self, timeout: Duration, args: &[S]) -> Result<String> {
        self.run_with_context(&RunContext::with_timeout(timeout), args)
    }

    /// Run a composer command under `ctx`.
    ///
    /// A registered fixture answers before any process is spawned.
    pub fn run_with_context<S: AsRef<str>>(&self, ctx: &RunContext, args: &[S]) -> Result<String> {
        if let Some(fixture) = self.fixtures.lookup(args) {
            log::debug!("fixture answered `{}`", fixtures::command_key(args));
            return fixture.into_result();
        }

        let mut request = InvocationRequest::new(self.executable_path.clone(), args);
        request.working_dir = self.working_dir.clone();
        request.env = self.env.clone();
        invoke::execute(ctx, &request)
    }

    /// Version token from `composer --version`.
    pub fn version(&self) -> Result<String> {
        let output = self.run(&["--version"])?;
        let version = output.split_whitespace().nth(2).map(str::to_string);
        version.ok_or(Error::Parse { output })
    }

    pub fn self_update(&self) -> Result<()> {
        self.run(&["self-update"]).map(|_| ())
    }

    pub fn diagnose(&self) -> Result<String> {
        self.run(&["diagnose"])
    }

    pub fn status(&self) -> Result<String> {
        self.run(&["status"])
    }

    pub fn check(&self) -> Result<String> {
        self.run(&["check"])
    }

    /// Run a vendored binary: `composer exec <binary> -- <args>`.
    pub fn exec<S: AsRef<str>>(&self, binary: &str, args: &[S]) -> Result<String> {
        let mut full = vec!["exec".to_string(), binary.to_string(), "--".to_string()];
        full.extend(args.iter().map(|arg| arg.as_ref().to_string()));
        self.run(&full)
    }

    /// Settings reported by `composer config --list`.
    pub fn environment_info(&self) -> Result<BTreeMap<String, String>> {
        let output = self.run(&["config", "--list"])?;
        Ok(parse_config_list(&output))
    }
}

fn resolve(
    detector: &Detector,
    installer: Option<Box<dyn Install>>,
    auto_install: bool,
) -> Result<PathBuf> {
    match detector.detect() {
        Ok(path) => Ok(path),
        Err(err) if !auto_install => Err(err),
        Err(err) => {
            log::info!("{}; installing composer", err);
            let installer: Box<dyn Install> =
                installer.unwrap_or_else(|| Box::new(Installer::default()));
            installer
                .install()
                .map_err(|err| Error::Install(Box::new(err)))?;
            detector.detect()
        }
    }
}

fn parse_config_list(output: &str) -> BTreeMap<String, String> {
    let mut info = BTreeMap::new();
    for line in output.lines() {
        let line = line.trim();
        let pair = match line.strip_prefix('[') {
            Some(rest) => rest.split_once(']'),
            None => line.split_once(':'),
        };
        if let Some((key, value)) = pair {
            let key = key.trim();
            if !key.is_empty() {
                info.insert(key.to_string(), value.trim().to_string());
            }
        }
    }
    info
}
