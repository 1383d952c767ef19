//! Error types for huskylens-core



/// Result type alias for huskylens protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to be valid
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// Frame does not start with the protocol magic
    #[error("Bad frame header: {0}")]
    BadMagic(String),

    /// Declared length disagrees with the bytes received
    #[error("Length mismatch: header declares {declared} payload bytes, frame carries {actual}")]
    LengthMismatch {
        declared: usize,
        actual: usize,
    },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch {
        expected: u8,
        received: u8,
    },

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Well-formed frame carrying a command that is not valid here
    #[error("Unexpected command: {0}")]
    UnexpectedCommand(String),

    /// Payload does not match the expected layout
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Payload too large
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),

    /// Value outside the domain enums
    #[error("Type error: {0}")]
    Types(#[from] huskylens_types::Error),
}

impl Error {
    /// Check if error is recoverable (reading the next frame might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. }
                | Self::BadMagic(_)
                | Self::LengthMismatch { .. }
                | Self::ChecksumMismatch { .. }
                | Self::UnknownCommand(_)
                | Self::UnexpectedCommand(_)
                | Self::Malformed(_)
        )
    }
}
