//! Frame-level I/O over a transport

use bytes::{BufMut, BytesMut};
use huskylens_core::{
    constants::{HEADER_V1, HEADER_V2, V2_HEADER_SIZE},
    FrameCodec, ProtocolVersion, V1Command, V1Frame, V2Command, V2Frame,
};
use huskylens_transport::Transport;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::{
    config::{Config, Timing},
    error::{Error, Result},
};

/// Sends encoded requests and assembles response frames
pub(crate) struct Link {
    transport: Box<dyn Transport>,
    codec: FrameCodec,
    timing: Timing,
    verify_v2_checksum: bool,
}

impl Link {
    pub(crate) fn new(transport: Box<dyn Transport>, config: Config) -> Self {
        Self {
            transport,
            codec: FrameCodec::new(),
            timing: config.timing,
            verify_v2_checksum: config.verify_v2_checksum,
        }
    }

    pub(crate) fn timing(&self) -> &Timing {
        &self.timing
    }

    pub(crate) fn describe(&self) -> String {
        self.transport.describe()
    }

    /// Send a V1 command
    pub(crate) async fn send_v1(&mut self, command: V1Command, payload: &[u8]) -> Result<()> {
        let bytes = self.codec.encode_v1(command, payload)?;
        trace!("Sending {}: {}", command, hex::encode(bytes));

        self.transport.write(bytes).await?;
        sleep(self.timing.after_write).await;

        Ok(())
    }

    /// Send a V2 command, discarding stale input first
    pub(crate) async fn send_v2(
        &mut self,
        command: V2Command,
        algorithm: u8,
        content: &[u8],
    ) -> Result<()> {
        self.flush().await;

        let bytes = self.codec.encode_v2(command, algorithm, content)?;
        trace!("Sending {}: {}", command, hex::encode(bytes));

        self.transport.write(bytes).await?;
        sleep(self.timing.after_write).await;

        Ok(())
    }

    /// Send the knock request for `version`
    pub(crate) async fn send_knock(&mut self, version: ProtocolVersion) -> Result<()> {
        match version {
            ProtocolVersion::V1 => self.send_v1(V1Command::RequestKnock, &[]).await,
            ProtocolVersion::V2 => self.send_v2(V2Command::Knock, 0, &[]).await,
        }
    }

    /// Best-effort input flush
    pub(crate) async fn flush(&mut self) {
        if let Err(e) = self.transport.flush().await {
            debug!("Flush on {} failed: {}", self.transport.describe(), e);
        }
    }

    /// Read up to `size` raw bytes
    pub(crate) async fn read_raw(&mut self, size: usize) -> Result<BytesMut> {
        Ok(self.transport.read(size).await?)
    }

    async fn read_exact(&mut self, size: usize) -> Result<BytesMut> {
        if size == 0 {
            return Ok(BytesMut::new());
        }

        let buf = self.transport.read(size).await?;
        if buf.len() < size {
            return Err(Error::ShortRead {
                expected: size,
                actual: buf.len(),
            });
        }
        Ok(buf)
    }

    /// Read one V1 frame
    ///
    /// Scans non-overlapping 3-byte windows for the header, then reads the
    /// rest of the frame and verifies it.
    pub(crate) async fn read_v1(&mut self) -> Result<V1Frame> {
        let attempts = self.timing.header_sync_attempts;
        let mut synced = false;

        for _ in 0..attempts {
            let window = self.transport.read(HEADER_V1.len()).await?;
            if window[..] == HEADER_V1 {
                synced = true;
                break;
            }
            trace!("Discarding {:02X?} while looking for header", &window[..]);
        }

        if !synced {
            return Err(Error::SyncLost { attempts });
        }

        let len = self.read_exact(1).await?[0];
        let command = self.read_exact(1).await?[0];
        let payload = self.read_exact(len as usize).await?;
        let checksum = self.read_exact(1).await?[0];

        let mut raw = BytesMut::with_capacity(HEADER_V1.len() + 3 + payload.len());
        raw.put_slice(&HEADER_V1);
        raw.put_u8(len);
        raw.put_u8(command);
        raw.put_slice(&payload);
        raw.put_u8(checksum);

        let frame = V1Frame::decode(&raw)?;
        trace!("Received {:?}", frame);

        Ok(frame)
    }

    /// Read one V2 frame
    pub(crate) async fn read_v2(&mut self) -> Result<V2Frame> {
        let mut raw = self.read_exact(V2_HEADER_SIZE).await?;
        if raw[..HEADER_V2.len()] != HEADER_V2 {
            return Err(huskylens_core::Error::BadMagic(hex::encode(&raw[..HEADER_V2.len()])).into());
        }

        let size = raw[V2_HEADER_SIZE - 1] as usize;
        let body = self.transport.read(size + 1).await?;
        raw.extend_from_slice(&body);

        let frame = V2Frame::decode(&raw)?;
        trace!("Received {:?}", frame);

        if self.verify_v2_checksum {
            frame.verify_checksum()?;
        }

        Ok(frame)
    }
}
