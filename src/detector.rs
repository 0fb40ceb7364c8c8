//! Composer discovery: environment override, candidate paths, then PATH.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::platform::Os;
use crate::probe::is_executable;
use crate::runner;

/// Environment variable naming an explicit composer executable.
pub const ENV_OVERRIDE: &str = "COMPOSER_PATH";

const LOOKUP_NAME: &str = "composer";

/// Locates a usable composer executable.
///
/// Candidates are probed in order on every [`Detector::detect`] call; nothing
/// is cached between calls.
#[derive(Debug, Clone)]
pub struct Detector {
    possible_paths: Vec<PathBuf>,
    env_override: String,
    lookup_name: String,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    /// Create a detector seeded with the current platform's candidates.
    pub fn new() -> Self {
        Self::for_os(&Os::current())
    }

    /// Create a detector seeded with the candidates of `os`.
    pub fn for_os(os: &Os) -> Self {
        Self {
            possible_paths: os.candidate_paths(),
            env_override: ENV_OVERRIDE.to_string(),
            lookup_name: LOOKUP_NAME.to_string(),
        }
    }

    /// Replace the candidate list wholesale.
    pub fn set_possible_paths(&mut self, paths: Vec<PathBuf>) {
        self.possible_paths = paths;
    }

    /// Append a candidate with the lowest priority.
    pub fn add_possible_path(&mut self, path: impl Into<PathBuf>) {
        self.possible_paths.push(path.into());
    }

    pub fn possible_paths(&self) -> &[PathBuf] {
        &self.possible_paths
    }

    /// Change which environment variable is consulted first.
    pub fn set_env_override(&mut self, name: impl Into<String>) {
        self.env_override = name.into();
    }

    /// Change the bare name handed to `which`/`where`.
    pub fn set_lookup_name(&mut self, name: impl Into<String>) {
        self.lookup_name = name.into();
    }

    /// Find the composer executable.
    pub fn detect(&self) -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(&self.env_override).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(path);
            if is_executable(&path) {
                log::debug!("using {} from {}", path.display(), self.env_override);
                return Ok(path);
            }
            log::debug!(
                "{} points at {} which is not executable",
                self.env_override,
                path.display()
            );
        }

        if let Some(path) = self.possible_paths.iter().find(|path| is_executable(path)) {
            log::debug!("found composer candidate {}", path.display());
            return Ok(path.clone());
        }

        if let Some(path) = runner::lookup_path(&self.lookup_name) {
            log::debug!("resolved {} on PATH at {}", self.lookup_name, path.display());
            return Ok(path);
        }

        Err(Error::NotFound {
            detail: format!(
                "checked ${}, {} candidate paths and PATH lookup for {}",
                self.env_override,
                self.possible_paths.len(),
                self.lookup_name
            ),
        })
    }

    /// True when [`Detector::detect`] succeeds.
    pub fn is_installed(&self) -> bool {
        self.detect().is_ok()
    }
}
