//! Settings loaded from composer-kit.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::composer::{DEFAULT_TIMEOUT, Options};
use crate::environment::EnvBuilder;
use crate::installer::InstallConfig;

/// Settings file looked up in the current directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "composer-kit.toml";

#[derive(Debug, Default, Deserialize)]
/// Top-level settings file representation.
pub struct Settings {
    #[serde(default)]
    pub composer: ComposerSection,
    #[serde(default)]
    pub install: InstallSection,
}

#[derive(Debug, Deserialize)]
/// How composer is located and run.
pub struct ComposerSection {
    pub executable: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    #[serde(default = "default_auto_install")]
    pub auto_install: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Keep the host environment underneath `env` entries.
    #[serde(default = "default_inherit_env")]
    pub inherit_env: bool,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for ComposerSection {
    fn default() -> Self {
        Self {
            executable: None,
            working_dir: None,
            auto_install: default_auto_install(),
            timeout_secs: default_timeout_secs(),
            inherit_env: default_inherit_env(),
            env: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// Overrides applied on top of the platform install defaults.
pub struct InstallSection {
    pub download_url: Option<String>,
    pub install_dir: Option<PathBuf>,
    pub use_proxy: Option<bool>,
    pub proxy_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub use_sudo: Option<bool>,
    pub prefer_brew_on_mac: Option<bool>,
    pub php_binary: Option<String>,
}

impl InstallSection {
    /// Merge onto the defaults for the running OS.
    pub fn to_install_config(&self) -> InstallConfig {
        let mut config = InstallConfig::default();
        if let Some(url) = &self.download_url {
            config.download_url = url.clone();
        }
        if let Some(dir) = &self.install_dir {
            config.install_dir = dir.clone();
        }
        if let Some(use_proxy) = self.use_proxy {
            config.use_proxy = use_proxy;
        }
        if self.proxy_url.is_some() {
            config.proxy_url = self.proxy_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(use_sudo) = self.use_sudo {
            config.use_sudo = use_sudo;
        }
        if let Some(prefer) = self.prefer_brew_on_mac {
            config.prefer_brew_on_mac = prefer;
        }
        if let Some(php) = &self.php_binary {
            config.php_binary = php.clone();
        }
        config
    }
}

impl ComposerSection {
    /// Environment list for [`Options::env`]; empty means inherit untouched.
    pub fn to_env(&self) -> Vec<(String, String)> {
        if self.env.is_empty() {
            return Vec::new();
        }
        let base = if self.inherit_env {
            EnvBuilder::inherit()
        } else {
            EnvBuilder::new()
        };
        self.env
            .iter()
            .fold(base, |builder, (key, value)| builder.set_raw(key, value))
            .build()
    }
}

impl Settings {
    /// Options for [`crate::composer::Composer::new`], minus the installer.
    pub fn to_options(&self) -> Options {
        Options {
            executable_path: self.composer.executable.clone(),
            working_dir: self.composer.working_dir.clone(),
            auto_install: self.composer.auto_install,
            env: self.composer.to_env(),
            default_timeout: Duration::from_secs(self.composer.timeout_secs),
            ..Options::default()
        }
    }
}

/// Load settings from disk.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings at {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(settings)
}

/// Load `path` if given, else the default file if present, else defaults.
pub fn resolve_settings(path: Option<&Path>) -> Result<Settings> {
    if let Some(path) = path {
        return load_settings(path);
    }
    let local = Path::new(DEFAULT_SETTINGS_FILE);
    if local.exists() {
        return load_settings(local);
    }
    Ok(Settings::default())
}

fn default_auto_install() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_inherit_env() -> bool {
    true
}
