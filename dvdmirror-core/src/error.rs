use thiserror::Error;

/// Errors reported by a disc structure provider.
#[derive(Debug, Error)]
pub enum DiscError {
    /// I/O error while reading from the disc
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required file or directory is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// An IFO file does not have the expected signature or layout
    #[error("Invalid IFO: {0}")]
    InvalidIfo(String),

    /// A navigation table points outside its file or is truncated
    #[error("Corrupted table: {0}")]
    CorruptedTable(String),

    /// The request is not valid for this title set or domain
    #[error("Unsupported request: {0}")]
    Unsupported(String),
}

impl DiscError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_ifo(msg: impl Into<String>) -> Self {
        Self::InvalidIfo(msg.into())
    }

    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::CorruptedTable(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
