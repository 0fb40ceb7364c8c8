//! CLI entrypoints and command routing.

mod detect;
mod install;
mod run;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::composer::Composer;
use crate::config::{Settings, resolve_settings};
use crate::installer::Installer;

#[derive(Parser, Debug)]
#[command(name = "composer-kit", version, about = "Locate, install and drive PHP Composer")]
struct Cli {
    #[arg(
        short = 'c',
        long,
        global = true,
        help = "Settings file (defaults to ./composer-kit.toml when present)"
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
/// Overrides for how composer is resolved and run.
struct ComposerArgs {
    #[arg(short = 'e', long, help = "Composer executable to use")]
    executable: Option<PathBuf>,
    #[arg(short = 'w', long, help = "Working directory for composer")]
    working_dir: Option<PathBuf>,
    #[arg(short = 'n', long, help = "Fail instead of installing composer")]
    no_install: bool,
    #[arg(short = 't', long, help = "Timeout in seconds")]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report where composer was found
    #[command(alias = "d")]
    Detect(detect::DetectArgs),
    /// Install composer for this platform
    #[command(alias = "i")]
    Install(install::InstallArgs),
    /// Run a composer command
    #[command(alias = "r")]
    Run {
        #[command(flatten)]
        composer: ComposerArgs,
        #[command(flatten)]
        args: run::RunArgs,
    },
    /// Print the composer version
    #[command(alias = "v")]
    Version {
        #[command(flatten)]
        composer: ComposerArgs,
    },
    /// Update composer itself
    SelfUpdate {
        #[command(flatten)]
        composer: ComposerArgs,
    },
    /// Run composer diagnose
    Diagnose {
        #[command(flatten)]
        composer: ComposerArgs,
    },
}

/// Entry point for the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Detect(args) => detect::handle(args),
        Command::Install(args) => install::handle(&settings, args),
        Command::Run { composer, args } => {
            let composer = open_composer(&settings, &composer)?;
            run::handle(&composer, args)
        }
        Command::Version { composer } => {
            let composer = open_composer(&settings, &composer)?;
            let version = composer.version().context("failed to read composer version")?;
            println!("{}", version);
            Ok(())
        }
        Command::SelfUpdate { composer } => {
            let composer = open_composer(&settings, &composer)?;
            composer.self_update().context("composer self-update failed")?;
            println!("composer updated");
            Ok(())
        }
        Command::Diagnose { composer } => {
            let composer = open_composer(&settings, &composer)?;
            let report = composer.diagnose().context("composer diagnose failed")?;
            print!("{}", report);
            Ok(())
        }
    }
}

fn open_composer(settings: &Settings, args: &ComposerArgs) -> Result<Composer> {
    let mut options = settings.to_options();
    if let Some(path) = &args.executable {
        options.executable_path = Some(path.clone());
    }
    if let Some(dir) = &args.working_dir {
        options.working_dir = Some(dir.clone());
    }
    if args.no_install {
        options.auto_install = false;
    }
    if let Some(secs) = args.timeout_secs {
        options.default_timeout = Duration::from_secs(secs);
    }
    options.installer = Some(Box::new(Installer::new(
        settings.install.to_install_config(),
    )));
    Composer::new(options).context("composer is not available")
}
