//! Error taxonomy shared by detection, installation and invocation.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], stable for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InstallationFailed,
    InsufficientRights,
    UnsupportedPlatform,
    DownloadFailed,
    CommandExecutionFailed,
    Canceled,
    DeadlineExceeded,
    Recorded,
    Parse,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("composer executable not found: {detail}")]
    NotFound { detail: String },

    #[error("failed to install composer: {0}")]
    Install(#[source] Box<Error>),

    #[error("composer setup script failed ({reason}): {output}")]
    BootstrapFailed { reason: String, output: String },

    #[error("failed to create wrapper {}: {reason}", path.display())]
    WrapperFailed { path: PathBuf, reason: String },

    #[error("insufficient rights to write {}; rerun with elevation", path.display())]
    InsufficientRights {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("composer command failed ({status}), output: {output}")]
    CommandFailed { status: ExitStatus, output: String },

    #[error("command canceled")]
    Canceled { output: String },

    #[error("command deadline exceeded")]
    DeadlineExceeded { output: String },

    #[error("{message}")]
    Recorded { message: String, output: String },

    #[error("unable to parse composer output: {output}")]
    Parse { output: String },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Install(_) | Error::BootstrapFailed { .. } | Error::WrapperFailed { .. } => {
                ErrorKind::InstallationFailed
            }
            Error::InsufficientRights { .. } => ErrorKind::InsufficientRights,
            Error::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            Error::Download { .. } => ErrorKind::DownloadFailed,
            Error::CommandFailed { .. } | Error::Spawn { .. } => ErrorKind::CommandExecutionFailed,
            Error::Canceled { .. } => ErrorKind::Canceled,
            Error::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
            Error::Recorded { .. } => ErrorKind::Recorded,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    /// Process output captured before the failure, when there is any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Error::BootstrapFailed { output, .. }
            | Error::CommandFailed { output, .. }
            | Error::Canceled { output }
            | Error::DeadlineExceeded { output }
            | Error::Recorded { output, .. } => Some(output),
            _ => None,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}
