//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] huskylens_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] huskylens_transport::Error),

    #[error("No frame header after {attempts} attempts")]
    SyncLost { attempts: usize },

    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("Protocol version unknown")]
    VersionUnknown,

    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

impl Error {
    /// Check if the next frame might still be read successfully
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(e) => e.is_recoverable(),
            Self::SyncLost { .. } | Self::ShortRead { .. } => true,
            Self::Transport(_) | Self::VersionUnknown | Self::NotSupported(_) => false,
        }
    }
}
