//! Composer's environment variables and a builder for subprocess env lists.
//!
//! The values are not interpreted here; they are only staged for the
//! composer process.

use std::collections::BTreeMap;
use std::fmt;

/// Environment variables composer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnvVar {
    Home,
    CacheDir,
    ProcessTimeout,
    AllowSuperuser,
    MemoryLimit,
    DisableXdebugWarn,
    NoInteraction,
    VendorDir,
    BinDir,
    CaFile,
    NoDev,
    DiscardChanges,
    HtaccessProtect,
    MirrorPathRepos,
}

impl EnvVar {
    pub fn name(self) -> &'static str {
        match self {
            EnvVar::Home => "COMPOSER_HOME",
            EnvVar::CacheDir => "COMPOSER_CACHE_DIR",
            EnvVar::ProcessTimeout => "COMPOSER_PROCESS_TIMEOUT",
            EnvVar::AllowSuperuser => "COMPOSER_ALLOW_SUPERUSER",
            EnvVar::MemoryLimit => "COMPOSER_MEMORY_LIMIT",
            EnvVar::DisableXdebugWarn => "COMPOSER_DISABLE_XDEBUG_WARN",
            EnvVar::NoInteraction => "COMPOSER_NO_INTERACTION",
            EnvVar::VendorDir => "COMPOSER_VENDOR_DIR",
            EnvVar::BinDir => "COMPOSER_BIN_DIR",
            EnvVar::CaFile => "COMPOSER_CAFILE",
            EnvVar::NoDev => "COMPOSER_NO_DEV",
            EnvVar::DiscardChanges => "COMPOSER_DISCARD_CHANGES",
            EnvVar::HtaccessProtect => "COMPOSER_HTACCESS_PROTECT",
            EnvVar::MirrorPathRepos => "COMPOSER_MIRROR_PATH_REPOS",
        }
    }

    /// Current value in the host process environment.
    pub fn get(self) -> Option<String> {
        std::env::var(self.name()).ok()
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the full environment handed to composer.
#[derive(Debug, Clone, Default)]
pub struct EnvBuilder {
    vars: BTreeMap<String, String>,
}

impl EnvBuilder {
    /// Start empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a copy of the host environment.
    pub fn inherit() -> Self {
        Self {
            vars: std::env::vars_os()
                .map(|(k, v)| {
                    (
                        k.to_string_lossy().into_owned(),
                        v.to_string_lossy().into_owned(),
                    )
                })
                .collect(),
        }
    }

    pub fn set(mut self, var: EnvVar, value: impl Into<String>) -> Self {
        self.vars.insert(var.name().to_string(), value.into());
        self
    }

    pub fn set_raw(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn unset(mut self, var: EnvVar) -> Self {
        self.vars.remove(var.name());
        self
    }

    pub fn process_timeout(self, seconds: u64) -> Self {
        self.set(EnvVar::ProcessTimeout, seconds.to_string())
    }

    pub fn allow_superuser(self, allow: bool) -> Self {
        if allow {
            self.set(EnvVar::AllowSuperuser, "1")
        } else {
            self.unset(EnvVar::AllowSuperuser)
        }
    }

    pub fn no_interaction(self, enabled: bool) -> Self {
        if enabled {
            self.set(EnvVar::NoInteraction, "1")
        } else {
            self.unset(EnvVar::NoInteraction)
        }
    }

    pub fn no_dev(self, enabled: bool) -> Self {
        if enabled {
            self.set(EnvVar::NoDev, "1")
        } else {
            self.unset(EnvVar::NoDev)
        }
    }

    pub fn memory_limit(self, limit: impl Into<String>) -> Self {
        self.set(EnvVar::MemoryLimit, limit)
    }

    pub fn build(self) -> Vec<(String, String)> {
        self.vars.into_iter().collect()
    }
}
