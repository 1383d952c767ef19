//! Transport layer for HuskyLens devices
//!
//! Provides serial (any async byte stream) and I2C communication.

pub mod error;
pub mod i2c;
pub mod serial;
pub mod stream;

pub use error::{Error, Result};
pub use i2c::{I2cBus, I2cTransport};
pub use stream::{ByteStream, StreamTransport};

use async_trait::async_trait;
use bytes::BytesMut;

/// Byte-level link to a device
///
/// Reads are bounded: a read that times out returns whatever arrived, which
/// may be fewer bytes than requested.
#[async_trait]
pub trait Transport: Send {
    /// Send raw bytes
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Receive up to `size` bytes
    async fn read(&mut self, size: usize) -> Result<BytesMut>;

    /// Discard pending input (best-effort)
    async fn flush(&mut self) -> Result<()>;

    /// Human-readable endpoint description
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data).await
    }

    async fn read(&mut self, size: usize) -> Result<BytesMut> {
        (**self).read(size).await
    }

    async fn flush(&mut self) -> Result<()> {
        (**self).flush().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
