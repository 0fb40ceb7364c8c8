use std::path::Path;
use std::sync::Arc;

use super::{InstallConfig, prepare_install_dir, run_setup_script};
use crate::download::Downloader;
use crate::elevation::Elevation;
use crate::error::Result;

/// Windows installer producing `composer.phar` plus `composer.bat`.
///
/// There is no sudo on Windows; `use_sudo` is ignored.
pub struct WindowsInstaller {
    config: InstallConfig,
    downloader: Arc<dyn Downloader>,
}

impl WindowsInstaller {
    pub fn new(config: InstallConfig, downloader: Arc<dyn Downloader>) -> Self {
        Self { config, downloader }
    }

    pub fn install(&self) -> Result<()> {
        let elevation = Elevation::Direct;
        prepare_install_dir(&self.config, elevation)?;
        let phar = run_setup_script(&self.config, self.downloader.as_ref(), elevation)?;

        let batch = self.config.install_dir.join("composer.bat");
        elevation.write_executable(&batch, batch_wrapper(&self.config.php_binary, &phar).as_bytes())?;
        log::info!(
            "composer installed; add {} to PATH to call it by name",
            self.config.install_dir.display()
        );
        Ok(())
    }
}

fn batch_wrapper(php: &str, phar: &Path) -> String {
    format!("@{} \"{}\" %*\r\n", php, phar.display())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::runner::set_runner_for_tests;

    #[test]
    fn writes_batch_wrapper_without_sudo() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let runner = Arc::new(ScriptedRunner::default());
        let guard = set_runner_for_tests(runner.clone());
        let mut config = config_in(temp.path());
        config.use_sudo = true;

        WindowsInstaller::new(config, Arc::new(StubDownloader::default()))
            .install()
            .expect("install");
        let commands = runner.commands();
        drop(guard);

        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("php "));
        let batch = std::fs::read_to_string(temp.path().join("composer.bat")).expect("batch");
        assert!(batch.starts_with("@php \""));
        assert!(batch.ends_with("%*\r\n"));
    }

    #[test]
    fn batch_wrapper_format() {
        assert_eq!(
            batch_wrapper("php", Path::new("composer.phar")),
            "@php \"composer.phar\" %*\r\n"
        );
    }
}
