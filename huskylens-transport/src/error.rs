//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Connection closed by remote")]
    ConnectionClosed,

    #[error("No HuskyLens found: {0}")]
    DeviceNotFound(String),

    #[error("Invalid device path: {0}")]
    InvalidPath(String),
}
