//! Composer installation: per-OS installers behind one entry point.

mod macos;
mod unix;
mod windows;

pub use macos::MacOsInstaller;
pub use unix::UnixInstaller;
pub use windows::WindowsInstaller;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::download::{DownloadConfig, Downloader, HttpDownloader};
use crate::elevation::Elevation;
use crate::error::{Error, Result};
use crate::fsutil;
use crate::platform::Os;
use crate::runner;

/// Default location of the composer setup script.
pub const DEFAULT_DOWNLOAD_URL: &str = "https://getcomposer.org/installer";

/// File name the setup script is asked to produce.
pub const PHAR_NAME: &str = "composer.phar";

/// Everything an installer needs to know; immutable once handed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    pub download_url: String,
    pub install_dir: PathBuf,
    pub use_proxy: bool,
    pub proxy_url: Option<String>,
    pub timeout: Duration,
    /// Use sudo for the setup script and wrapper on Unix-like systems.
    pub use_sudo: bool,
    /// Try `brew install composer` first on macOS.
    pub prefer_brew_on_mac: bool,
    pub php_binary: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self::for_os(&Os::current())
    }
}

impl InstallConfig {
    /// Defaults for a given OS.
    pub fn for_os(os: &Os) -> Self {
        let install_dir = match os {
            Os::Windows => std::env::var_os("ProgramFiles")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"))
                .join("Composer"),
            _ => PathBuf::from("/usr/local/bin"),
        };
        Self {
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            install_dir,
            use_proxy: false,
            proxy_url: None,
            timeout: Duration::from_secs(300),
            use_sudo: false,
            prefer_brew_on_mac: true,
            php_binary: "php".to_string(),
        }
    }

    pub fn download_config(&self) -> DownloadConfig {
        DownloadConfig {
            use_proxy: self.use_proxy,
            proxy_url: self.proxy_url.clone(),
            timeout: self.timeout,
        }
    }

    pub fn phar_path(&self) -> PathBuf {
        self.install_dir.join(PHAR_NAME)
    }
}

/// Capability shared by everything that can install composer.
pub trait Install: Send + Sync {
    fn install(&self) -> Result<()>;
}

/// Installer variant chosen for an operating system.
pub enum PlatformInstaller {
    Windows(WindowsInstaller),
    MacOs(MacOsInstaller),
    Linux(UnixInstaller),
    Unix(UnixInstaller),
}

impl PlatformInstaller {
    /// Pick the installer for `os`; fails for systems without one.
    pub fn for_os(os: &Os, config: InstallConfig, downloader: Arc<dyn Downloader>) -> Result<Self> {
        match os {
            Os::Windows => Ok(Self::Windows(WindowsInstaller::new(config, downloader))),
            Os::MacOs => Ok(Self::MacOs(MacOsInstaller::new(config, downloader))),
            Os::Linux => Ok(Self::Linux(UnixInstaller::new(config, downloader))),
            Os::Unix(_) => Ok(Self::Unix(UnixInstaller::new(config, downloader))),
            Os::Other(name) => Err(Error::UnsupportedPlatform(name.clone())),
        }
    }

    pub fn install(&self) -> Result<()> {
        match self {
            Self::Windows(installer) => installer.install(),
            Self::MacOs(installer) => installer.install(),
            Self::Linux(installer) | Self::Unix(installer) => installer.install(),
        }
    }
}

/// Installs composer for the running OS.
pub struct Installer {
    config: InstallConfig,
    os: Os,
    downloader: Arc<dyn Downloader>,
}

impl Default for Installer {
    fn default() -> Self {
        Self::new(InstallConfig::default())
    }
}

impl Installer {
    pub fn new(config: InstallConfig) -> Self {
        Self::with_downloader(config, Arc::new(HttpDownloader))
    }

    pub fn with_downloader(config: InstallConfig, downloader: Arc<dyn Downloader>) -> Self {
        Self {
            config,
            os: Os::current(),
            downloader,
        }
    }

    /// Target a different OS than the running one.
    pub fn with_os(mut self, os: Os) -> Self {
        self.os = os;
        self
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: InstallConfig) {
        self.config = config;
    }

    pub fn os(&self) -> &Os {
        &self.os
    }
}

impl Install for Installer {
    fn install(&self) -> Result<()> {
        let platform =
            PlatformInstaller::for_os(&self.os, self.config.clone(), self.downloader.clone())?;
        log::info!(
            "installing composer into {} ({})",
            self.config.install_dir.display(),
            self.os
        );
        platform.install()
    }
}

/// Make sure the install dir exists and is writable.
///
/// Elevated installs continue past a failed check; the privileged steps
/// do the writing.
fn prepare_install_dir(config: &InstallConfig, elevation: Elevation) -> Result<()> {
    match fsutil::check_write_permission(&config.install_dir) {
        Ok(()) => Ok(()),
        Err(err) if elevation.is_elevated() => {
            log::warn!(
                "{} is not writable ({}); continuing with sudo",
                config.install_dir.display(),
                err
            );
            Ok(())
        }
        Err(source) => Err(Error::InsufficientRights {
            path: config.install_dir.clone(),
            source,
        }),
    }
}

/// Download the setup script and run it through php.
///
/// The script lives in a temp file that is removed when this returns,
/// whatever the outcome.
fn run_setup_script(
    config: &InstallConfig,
    downloader: &dyn Downloader,
    elevation: Elevation,
) -> Result<PathBuf> {
    let script = tempfile::Builder::new()
        .prefix("composer-setup-")
        .suffix(".php")
        .tempfile()
        .map_err(|err| Error::io("failed to create temp file for setup script", err))?
        .into_temp_path();

    downloader.download(&config.download_url, &script, &config.download_config())?;
    execute_setup(config, &script, elevation)?;
    Ok(config.phar_path())
}

fn execute_setup(config: &InstallConfig, script: &Path, elevation: Elevation) -> Result<()> {
    let script_arg = script.to_string_lossy().into_owned();
    let install_dir_arg = format!("--install-dir={}", config.install_dir.display());
    let filename_arg = format!("--filename={}", PHAR_NAME);
    let output = elevation
        .run(
            &config.php_binary,
            &[&script_arg, &install_dir_arg, &filename_arg],
        )
        .map_err(|err| Error::BootstrapFailed {
            reason: format!("could not start {}: {}", config.php_binary, err),
            output: String::new(),
        })?;
    if !output.status.success() {
        return Err(Error::BootstrapFailed {
            reason: format!("exited with {}", output.status),
            output: runner::combined_output(&output),
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::ErrorKind;
    use crate::runner::set_runner_for_tests;

    #[test]
    fn defaults_follow_os() {
        let linux = InstallConfig::for_os(&Os::Linux);
        assert_eq!(linux.download_url, DEFAULT_DOWNLOAD_URL);
        assert_eq!(linux.install_dir, PathBuf::from("/usr/local/bin"));
        assert_eq!(linux.timeout, Duration::from_secs(300));
        assert!(linux.prefer_brew_on_mac);
        assert!(!linux.use_sudo);

        let windows = InstallConfig::for_os(&Os::Windows);
        assert!(windows.install_dir.ends_with("Composer"));
    }

    #[test]
    fn unsupported_os_fails_fast() {
        let result = PlatformInstaller::for_os(
            &Os::Other("plan9".to_string()),
            InstallConfig::for_os(&Os::Linux),
            Arc::new(StubDownloader::default()),
        );
        match result {
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::UnsupportedPlatform);
                assert!(err.to_string().contains("plan9"));
            }
            Ok(_) => panic!("plan9 should be unsupported"),
        }
    }

    #[test]
    fn installer_config_roundtrips_through_setter() {
        let mut installer = Installer::new(InstallConfig::for_os(&Os::Linux));
        let mut config = installer.config().clone();
        config.download_url = "http://example.com/composer.php".to_string();
        config.use_sudo = true;
        installer.set_config(config.clone());
        assert_eq!(installer.config(), &config);
    }

    #[test]
    fn installer_dispatches_on_selected_os() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let runner = Arc::new(ScriptedRunner::default());
        let guard = set_runner_for_tests(runner.clone());
        let downloader = Arc::new(StubDownloader::default());
        let installer = Installer::with_downloader(config_in(temp.path()), downloader.clone())
            .with_os(Os::Unix("freebsd".to_string()));
        installer.install().expect("install");
        drop(guard);

        assert_eq!(downloader.targets.lock().expect("targets lock").len(), 1);
        assert!(temp.path().join("composer").exists());
    }
}
