use anyhow::{Result, bail};
use clap::Args;

use crate::composer::Composer;

#[derive(Args, Debug)]
/// Arguments forwarded to composer.
pub struct RunArgs {
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required = true,
        help = "Composer arguments, e.g. `run -- show --direct`"
    )]
    args: Vec<String>,
}

/// Run composer and print its combined output, even on failure.
pub fn handle(composer: &Composer, args: RunArgs) -> Result<()> {
    match composer.run(&args.args) {
        Ok(output) => {
            print!("{}", output);
            Ok(())
        }
        Err(err) => {
            if let Some(output) = err.output() {
                eprint!("{}", output);
            }
            bail!("composer {} failed: {}", args.args.join(" "), err)
        }
    }
}
