//! I2C transport
//!
//! V1 devices sit at `0x32` and every transfer goes through register `0x0C`.
//! V2 devices sit at `0x50` and take plain reads and writes.
//!
//! Bus setup (pins, clock) happens outside this crate; any implementation of
//! [`I2cBus`] can be plugged in.

use std::io;

use async_trait::async_trait;
use bytes::BytesMut;
use huskylens_core::{
    constants::{i2c, retries},
    ProtocolVersion,
};
use tracing::{debug, info, trace};

use crate::{error::*, Transport};

/// Bytes read per drain transaction
const FLUSH_CHUNK: usize = 16;

/// Minimal I2C master interface
#[async_trait]
pub trait I2cBus: Send {
    /// Write `bytes` to the device at `address`
    async fn write(&mut self, address: u8, bytes: &[u8]) -> io::Result<()>;

    /// Fill `buf` from the device at `address`
    async fn read(&mut self, address: u8, buf: &mut [u8]) -> io::Result<()>;

    /// Write `bytes` then fill `buf` in one transaction
    async fn write_read(&mut self, address: u8, bytes: &[u8], buf: &mut [u8]) -> io::Result<()>;
}

/// Transport over an I2C bus
pub struct I2cTransport {
    bus: Box<dyn I2cBus>,
    version: ProtocolVersion,
}

impl I2cTransport {
    /// Create transport for a device of known version
    pub fn new(bus: Box<dyn I2cBus>, version: ProtocolVersion) -> Self {
        Self { bus, version }
    }

    /// Probe both addresses and return the transport for the one that answers
    ///
    /// V1 is probed first with a register read, then V2 with a direct read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if neither address acknowledges.
    pub async fn detect(mut bus: Box<dyn I2cBus>) -> Result<(Self, ProtocolVersion)> {
        let mut probe = [0u8; 1];

        let version = match bus
            .write_read(i2c::ADDR_V1, &[i2c::REGISTER_V1], &mut probe)
            .await
        {
            Ok(()) => ProtocolVersion::V1,
            Err(e) => {
                debug!("No V1 device at 0x{:02X}: {}", i2c::ADDR_V1, e);
                match bus.read(i2c::ADDR_V2, &mut probe).await {
                    Ok(()) => ProtocolVersion::V2,
                    Err(e) => {
                        debug!("No V2 device at 0x{:02X}: {}", i2c::ADDR_V2, e);
                        return Err(Error::DeviceNotFound(format!(
                            "no answer at 0x{:02X} or 0x{:02X}",
                            i2c::ADDR_V1,
                            i2c::ADDR_V2
                        )));
                    }
                }
            }
        };

        let transport = Self::new(bus, version);
        info!("HuskyLens {} at {}", version, transport.describe());

        Ok((transport, version))
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    fn address(&self) -> u8 {
        match self.version {
            ProtocolVersion::V1 => i2c::ADDR_V1,
            ProtocolVersion::V2 => i2c::ADDR_V2,
        }
    }
}

#[async_trait]
impl Transport for I2cTransport {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        trace!("Sending {} bytes: {:02X?}", data.len(), data);

        let address = self.address();
        match self.version {
            ProtocolVersion::V1 => {
                let mut indexed = Vec::with_capacity(data.len() + 1);
                indexed.push(i2c::REGISTER_V1);
                indexed.extend_from_slice(data);
                self.bus.write(address, &indexed).await?;
            }
            ProtocolVersion::V2 => self.bus.write(address, data).await?,
        }

        Ok(())
    }

    async fn read(&mut self, size: usize) -> Result<BytesMut> {
        let mut buf = BytesMut::zeroed(size);

        let address = self.address();
        match self.version {
            ProtocolVersion::V1 => {
                self.bus
                    .write_read(address, &[i2c::REGISTER_V1], &mut buf)
                    .await?
            }
            ProtocolVersion::V2 => self.bus.read(address, &mut buf).await?,
        }

        trace!("Received {} bytes: {:02X?}", buf.len(), &buf[..]);
        Ok(buf)
    }

    async fn flush(&mut self) -> Result<()> {
        if self.version == ProtocolVersion::V1 {
            return Ok(());
        }

        let mut chunk = [0u8; FLUSH_CHUNK];
        for _ in 0..retries::I2C_FLUSH {
            if let Err(e) = self.bus.read(i2c::ADDR_V2, &mut chunk).await {
                debug!("I2C flush stopped: {}", e);
                break;
            }
        }

        Ok(())
    }

    fn describe(&self) -> String {
        format!("i2c@0x{:02X}", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Write(u8, Vec<u8>),
        Read(u8, usize),
        WriteRead(u8, Vec<u8>, usize),
    }

    /// Bus that answers at the listed addresses and fills reads with 0xAB
    #[derive(Clone, Default)]
    struct FakeBus {
        present: Vec<u8>,
        ops: Arc<Mutex<Vec<Op>>>,
        fail_reads_after: Option<usize>,
    }

    impl FakeBus {
        fn with_device(address: u8) -> Self {
            Self {
                present: vec![address],
                ..Self::default()
            }
        }

        fn ops(&self) -> Vec<Op> {
            self.ops.lock().unwrap().clone()
        }

        fn check(&self, address: u8) -> io::Result<()> {
            if self.present.contains(&address) {
                Ok(())
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "nack"))
            }
        }
    }

    #[async_trait]
    impl I2cBus for FakeBus {
        async fn write(&mut self, address: u8, bytes: &[u8]) -> io::Result<()> {
            self.ops.lock().unwrap().push(Op::Write(address, bytes.to_vec()));
            self.check(address)
        }

        async fn read(&mut self, address: u8, buf: &mut [u8]) -> io::Result<()> {
            let reads = {
                let mut ops = self.ops.lock().unwrap();
                ops.push(Op::Read(address, buf.len()));
                ops.iter().filter(|op| matches!(op, Op::Read(..))).count()
            };
            if self.fail_reads_after.is_some_and(|limit| reads > limit) {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "bus busy"));
            }
            self.check(address)?;
            buf.fill(0xAB);
            Ok(())
        }

        async fn write_read(&mut self, address: u8, bytes: &[u8], buf: &mut [u8]) -> io::Result<()> {
            self.ops
                .lock()
                .unwrap()
                .push(Op::WriteRead(address, bytes.to_vec(), buf.len()));
            self.check(address)?;
            buf.fill(0xAB);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_detect_v1() {
        let bus = FakeBus::with_device(0x32);
        let (transport, version) = I2cTransport::detect(Box::new(bus.clone())).await.unwrap();

        assert_eq!(version, ProtocolVersion::V1);
        assert_eq!(transport.version(), ProtocolVersion::V1);
        assert_eq!(transport.describe(), "i2c@0x32");
        assert_eq!(bus.ops(), vec![Op::WriteRead(0x32, vec![0x0C], 1)]);
    }

    #[tokio::test]
    async fn test_detect_v2() {
        let bus = FakeBus::with_device(0x50);
        let (transport, version) = I2cTransport::detect(Box::new(bus.clone())).await.unwrap();

        assert_eq!(version, ProtocolVersion::V2);
        assert_eq!(transport.version(), ProtocolVersion::V2);
        assert_eq!(
            bus.ops(),
            vec![Op::WriteRead(0x32, vec![0x0C], 1), Op::Read(0x50, 1)]
        );
    }

    #[tokio::test]
    async fn test_detect_nothing() {
        let result = I2cTransport::detect(Box::new(FakeBus::default())).await;
        assert!(matches!(result, Err(Error::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn test_v1_register_indexed() {
        let bus = FakeBus::with_device(0x32);
        let mut transport = I2cTransport::new(Box::new(bus.clone()), ProtocolVersion::V1);

        transport.write(&[0x55, 0xAA]).await.unwrap();
        let data = transport.read(3).await.unwrap();
        transport.flush().await.unwrap();

        assert_eq!(&data[..], &[0xAB, 0xAB, 0xAB]);
        assert_eq!(
            bus.ops(),
            vec![
                Op::Write(0x32, vec![0x0C, 0x55, 0xAA]),
                Op::WriteRead(0x32, vec![0x0C], 3),
            ]
        );
    }

    #[tokio::test]
    async fn test_v2_direct() {
        let bus = FakeBus::with_device(0x50);
        let mut transport = I2cTransport::new(Box::new(bus.clone()), ProtocolVersion::V2);

        transport.write(&[0x55, 0xAA]).await.unwrap();
        transport.read(5).await.unwrap();

        assert_eq!(
            bus.ops(),
            vec![Op::Write(0x50, vec![0x55, 0xAA]), Op::Read(0x50, 5)]
        );
    }

    #[tokio::test]
    async fn test_v2_flush_reads_five_chunks() {
        let bus = FakeBus::with_device(0x50);
        let mut transport = I2cTransport::new(Box::new(bus.clone()), ProtocolVersion::V2);

        transport.flush().await.unwrap();

        assert_eq!(bus.ops(), vec![Op::Read(0x50, 16); 5]);
    }

    #[tokio::test]
    async fn test_v2_flush_stops_at_error() {
        let bus = FakeBus {
            fail_reads_after: Some(2),
            ..FakeBus::with_device(0x50)
        };
        let mut transport = I2cTransport::new(Box::new(bus.clone()), ProtocolVersion::V2);

        assert!(transport.flush().await.is_ok());
        assert_eq!(bus.ops().len(), 3);
    }

    #[tokio::test]
    async fn test_read_error_propagates() {
        let mut transport =
            I2cTransport::new(Box::new(FakeBus::default()), ProtocolVersion::V2);

        assert!(matches!(transport.read(5).await, Err(Error::Io(_))));
    }
}
