use std::path::Path;
use std::sync::Arc;

use super::{InstallConfig, prepare_install_dir, run_setup_script};
use crate::download::Downloader;
use crate::elevation::Elevation;
use crate::error::Result;

/// Installer for Linux and the other Unix systems.
pub struct UnixInstaller {
    config: InstallConfig,
    downloader: Arc<dyn Downloader>,
}

impl UnixInstaller {
    pub fn new(config: InstallConfig, downloader: Arc<dyn Downloader>) -> Self {
        Self { config, downloader }
    }

    pub fn install(&self) -> Result<()> {
        install_with_shell_wrapper(&self.config, self.downloader.as_ref())
    }
}

/// Setup script into `composer.phar`, then a `composer` sh wrapper beside it.
pub(super) fn install_with_shell_wrapper(
    config: &InstallConfig,
    downloader: &dyn Downloader,
) -> Result<()> {
    let elevation = Elevation::from_flag(config.use_sudo);
    prepare_install_dir(config, elevation)?;
    let phar = run_setup_script(config, downloader, elevation)?;

    let wrapper = config.install_dir.join("composer");
    elevation.write_executable(&wrapper, shell_wrapper(&config.php_binary, &phar).as_bytes())?;
    log::info!("composer wrapper written to {}", wrapper.display());
    Ok(())
}

fn shell_wrapper(php: &str, phar: &Path) -> String {
    format!("#!/bin/sh\nexec {} \"{}\" \"$@\"\n", php, phar.display())
}
