use std::sync::Arc;

use super::InstallConfig;
use super::unix::install_with_shell_wrapper;
use crate::download::Downloader;
use crate::error::Result;
use crate::runner;

/// macOS installer: Homebrew first, manual install as the fallback.
pub struct MacOsInstaller {
    config: InstallConfig,
    downloader: Arc<dyn Downloader>,
}

impl MacOsInstaller {
    pub fn new(config: InstallConfig, downloader: Arc<dyn Downloader>) -> Self {
        Self { config, downloader }
    }

    pub fn install(&self) -> Result<()> {
        if self.try_brew_install() {
            return Ok(());
        }
        install_with_shell_wrapper(&self.config, self.downloader.as_ref())
    }

    /// Best effort; any failure means "use the manual path".
    fn try_brew_install(&self) -> bool {
        if !self.config.prefer_brew_on_mac {
            return false;
        }
        if !runner::command_exists("brew") {
            log::info!("homebrew not found; installing composer manually");
            return false;
        }
        log::info!("installing composer with homebrew");
        match runner::run_output("brew", &["install", "composer"]) {
            Ok(output) if output.status.success() => {
                log::info!("composer installed with homebrew");
                true
            }
            Ok(output) => {
                log::warn!(
                    "brew install composer exited with {}; installing manually",
                    output.status
                );
                false
            }
            Err(err) => {
                log::warn!("brew install composer failed to start: {}", err);
                false
            }
        }
    }
}
