//! Byte-stream transport (UART and anything else that reads and writes)

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use huskylens_core::constants::{retries, timing};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::{error::*, Transport};

/// Chunk size used when draining pending input
const FLUSH_CHUNK: usize = 64;

/// Object-safe byte stream
pub trait ByteStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<S: AsyncRead + AsyncWrite + Unpin + Send> ByteStream for S {}

/// Transport over an async byte stream
///
/// Reads poll the stream up to `read_attempts` times, waiting at most
/// `poll_interval` each time, and return what has arrived by then.
pub struct StreamTransport<S> {
    stream: S,
    label: String,
    read_attempts: usize,
    poll_interval: Duration,
}

impl<S: ByteStream> StreamTransport<S> {
    /// Create new stream transport
    pub fn new(stream: S, label: impl Into<String>) -> Self {
        Self {
            stream,
            label: label.into(),
            read_attempts: retries::SERIAL_READ,
            poll_interval: timing::SERIAL_POLL,
        }
    }

    /// Set number of polls per read
    pub fn with_read_attempts(mut self, attempts: usize) -> Self {
        self.read_attempts = attempts;
        self
    }

    /// Set wait per poll
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Get the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[async_trait]
impl<S: ByteStream> Transport for StreamTransport<S> {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        trace!("Sending {} bytes: {:02X?}", data.len(), data);

        self.stream.write_all(data).await?;
        self.stream.flush().await?;

        Ok(())
    }

    async fn read(&mut self, size: usize) -> Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(size);
        let mut chunk = vec![0u8; size];
        let mut closed = false;

        for _ in 0..self.read_attempts {
            if buf.len() >= size {
                break;
            }

            let wanted = size - buf.len();
            match timeout(self.poll_interval, self.stream.read(&mut chunk[..wanted])).await {
                Ok(Ok(0)) => {
                    closed = true;
                    tokio::time::sleep(self.poll_interval).await;
                }
                Ok(Ok(n)) => buf.extend_from_slice(&chunk[..n]),
                Ok(Err(e)) => return Err(Error::Io(e)),
                Err(_) => {}
            }
        }

        if buf.is_empty() && closed {
            return Err(Error::ConnectionClosed);
        }

        if buf.len() < size {
            debug!(
                "Short read on {}: {} of {} bytes",
                self.label,
                buf.len(),
                size
            );
        }
        trace!("Received {} bytes: {:02X?}", buf.len(), &buf[..]);

        Ok(buf)
    }

    async fn flush(&mut self) -> Result<()> {
        let mut chunk = [0u8; FLUSH_CHUNK];
        let mut discarded = 0;

        for _ in 0..retries::STREAM_FLUSH {
            match timeout(self.poll_interval, self.stream.read(&mut chunk)).await {
                Ok(Ok(0)) | Err(_) => break,
                Ok(Ok(n)) => discarded += n,
                Ok(Err(e)) => return Err(Error::Io(e)),
            }
        }

        if discarded > 0 {
            trace!("Flushed {} stale bytes from {}", discarded, self.label);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::duplex;

    #[tokio::test(start_paused = true)]
    async fn test_read_full() {
        let (local, mut remote) = duplex(256);
        let mut transport = StreamTransport::new(local, "test");

        remote.write_all(&[1, 2, 3, 4, 5]).await.unwrap();

        let data = transport.read(5).await.unwrap();
        assert_eq!(&data[..], &[1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_leaves_extra_bytes() {
        let (local, mut remote) = duplex(256);
        let mut transport = StreamTransport::new(local, "test");

        remote.write_all(&[1, 2, 3, 4, 5]).await.unwrap();

        assert_eq!(&transport.read(2).await.unwrap()[..], &[1, 2]);
        assert_eq!(&transport.read(3).await.unwrap()[..], &[3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_read() {
        let (local, mut remote) = duplex(256);
        let mut transport = StreamTransport::new(local, "test").with_read_attempts(5);

        remote.write_all(&[0x55, 0xAA]).await.unwrap();

        let data = transport.read(6).await.unwrap();
        assert_eq!(&data[..], &[0x55, 0xAA]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_nothing() {
        let (local, _remote) = duplex(256);
        let mut transport = StreamTransport::new(local, "test");

        let data = transport.read(3).await.unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_stream() {
        let (local, remote) = duplex(256);
        let mut transport = StreamTransport::new(local, "test").with_read_attempts(3);
        drop(remote);

        assert!(matches!(
            transport.read(3).await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write() {
        let (local, mut remote) = duplex(256);
        let mut transport = StreamTransport::new(local, "test");

        transport.write(&[0x55, 0xAA, 0x11]).await.unwrap();

        let mut received = [0u8; 3];
        remote.read_exact(&mut received).await.unwrap();
        assert_eq!(received, [0x55, 0xAA, 0x11]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_discards_pending() {
        let (local, mut remote) = duplex(1024);
        let mut transport = StreamTransport::new(local, "test");

        remote.write_all(&[0xEE; 100]).await.unwrap();
        transport.flush().await.unwrap();

        remote.write_all(&[0x01]).await.unwrap();
        assert_eq!(&transport.read(1).await.unwrap()[..], &[0x01]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_is_bounded() {
        let (local, mut remote) = duplex(4096);
        let mut transport = StreamTransport::new(local, "test");

        // More than 10 chunks of 64 bytes pending
        remote.write_all(&[0xEE; 1000]).await.unwrap();
        transport.flush().await.unwrap();

        let rest = transport.read(1000).await.unwrap();
        assert_eq!(rest.len(), 1000 - 10 * FLUSH_CHUNK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_into_inner_keeps_stream() {
        let (local, mut remote) = duplex(256);
        let mut transport = StreamTransport::new(local, "test");
        transport.write(&[0x55]).await.unwrap();

        let mut stream = transport.into_inner();
        stream.write_all(&[0xAA]).await.unwrap();

        let mut received = [0u8; 2];
        remote.read_exact(&mut received).await.unwrap();
        assert_eq!(received, [0x55, 0xAA]);
    }

    #[test]
    fn test_describe() {
        let (local, _remote) = duplex(16);
        let transport = StreamTransport::new(local, "/dev/ttyUSB0");
        assert_eq!(transport.describe(), "/dev/ttyUSB0");
    }
}
