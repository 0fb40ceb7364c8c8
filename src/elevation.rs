//! Privilege elevation strategy for installer steps.

use std::io::{self, Write};
use std::path::Path;
use std::process::Output;

use crate::error::{Error, Result};
use crate::fsutil;
use crate::runner;

/// How installer commands and file writes are performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Run as the current user.
    Direct,
    /// Route through `sudo`.
    Sudo,
}

impl Elevation {
    pub fn from_flag(use_sudo: bool) -> Self {
        if use_sudo {
            Elevation::Sudo
        } else {
            Elevation::Direct
        }
    }

    pub fn is_elevated(self) -> bool {
        matches!(self, Elevation::Sudo)
    }

    /// Run `program` with `args`, elevated when configured.
    pub fn run(self, program: &str, args: &[&str]) -> io::Result<Output> {
        match self {
            Elevation::Direct => runner::run_output(program, args),
            Elevation::Sudo => {
                let mut sudo_args = vec![program];
                sudo_args.extend_from_slice(args);
                runner::run_output("sudo", &sudo_args)
            }
        }
    }

    /// Write an executable file (mode 0755).
    ///
    /// Elevated writes stage the bytes in a temp file, then copy and chmod
    /// the target through `sudo`.
    pub fn write_executable(self, path: &Path, contents: &[u8]) -> Result<()> {
        let wrapper_failed = |reason: String| Error::WrapperFailed {
            path: path.to_path_buf(),
            reason,
        };
        match self {
            Elevation::Direct => fsutil::write_file_with_mode(path, contents, 0o755)
                .map_err(|err| wrapper_failed(err.to_string())),
            Elevation::Sudo => {
                let mut staged = tempfile::NamedTempFile::new()
                    .map_err(|err| wrapper_failed(format!("staging failed: {}", err)))?;
                staged
                    .write_all(contents)
                    .and_then(|_| staged.flush())
                    .map_err(|err| wrapper_failed(format!("staging failed: {}", err)))?;
                let staged_path = staged.path().to_string_lossy().into_owned();
                let target = path.to_string_lossy().into_owned();

                let copy = self
                    .run("cp", &[&staged_path, &target])
                    .map_err(|err| wrapper_failed(format!("sudo cp failed: {}", err)))?;
                if !copy.status.success() {
                    return Err(wrapper_failed(format!(
                        "sudo cp exited with {}: {}",
                        copy.status,
                        runner::combined_output(&copy).trim()
                    )));
                }
                let chmod = self
                    .run("chmod", &["755", &target])
                    .map_err(|err| wrapper_failed(format!("sudo chmod failed: {}", err)))?;
                if !chmod.status.success() {
                    return Err(wrapper_failed(format!(
                        "sudo chmod exited with {}: {}",
                        chmod.status,
                        runner::combined_output(&chmod).trim()
                    )));
                }
                Ok(())
            }
        }
    }
}
