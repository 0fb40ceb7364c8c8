use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Settings;
use crate::installer::{Install, InstallConfig, Installer};

#[derive(Args, Debug)]
/// Install options; unset flags fall back to the settings file.
pub struct InstallArgs {
    #[arg(short = 'd', long, help = "Install directory")]
    install_dir: Option<PathBuf>,
    #[arg(short = 'u', long, help = "Setup script URL")]
    url: Option<String>,
    #[arg(short = 'x', long, help = "HTTP proxy for the download")]
    proxy: Option<String>,
    #[arg(short = 't', long, help = "Download timeout in seconds")]
    timeout_secs: Option<u64>,
    #[arg(short = 's', long, help = "Use sudo for privileged steps")]
    sudo: bool,
    #[arg(short = 'B', long, help = "Skip the Homebrew shortcut on macOS")]
    no_brew: bool,
    #[arg(short = 'P', long, help = "PHP interpreter")]
    php: Option<String>,
    #[arg(short = 'D', long, help = "Print the plan without installing")]
    dry_run: bool,
}

/// Install composer using settings plus flag overrides.
pub fn handle(settings: &Settings, args: InstallArgs) -> Result<()> {
    let config = merge(settings.install.to_install_config(), &args);

    if args.dry_run {
        println!("dry-run: composer install");
        println!("url={}", config.download_url);
        println!("install_dir={}", config.install_dir.display());
        println!("proxy={}", config.proxy_url.as_deref().unwrap_or("none"));
        println!("sudo={}", config.use_sudo);
        println!("prefer_brew_on_mac={}", config.prefer_brew_on_mac);
        return Ok(());
    }

    let install_dir = config.install_dir.clone();
    Installer::new(config)
        .install()
        .with_context(|| format!("failed to install composer into {}", install_dir.display()))?;
    println!("composer installed into {}", install_dir.display());
    Ok(())
}

fn merge(mut config: InstallConfig, args: &InstallArgs) -> InstallConfig {
    if let Some(dir) = &args.install_dir {
        config.install_dir = dir.clone();
    }
    if let Some(url) = &args.url {
        config.download_url = url.clone();
    }
    if let Some(proxy) = &args.proxy {
        config.use_proxy = true;
        config.proxy_url = Some(proxy.clone());
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if args.sudo {
        config.use_sudo = true;
    }
    if args.no_brew {
        config.prefer_brew_on_mac = false;
    }
    if let Some(php) = &args.php {
        config.php_binary = php.clone();
    }
    config
}
