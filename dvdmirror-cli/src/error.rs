use thiserror::Error;

use dvdmirror_core::DiscError;
use dvdmirror_lib::MirrorError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Opening or reading the disc failed
    #[error("Disc error: {0}")]
    Disc(#[from] DiscError),

    /// Copying failed
    #[error("{0}")]
    Mirror(#[from] MirrorError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Logger installation or log file error
    #[error("Logging error: {0}")]
    Logging(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
