//! Serial ports
//!
//! Ports are opened 8N1 without flow control, in raw mode.

use std::io;

use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::debug;

use crate::{error::*, stream::StreamTransport};

/// Baud rate of the stock firmware
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Open a serial port for reading and writing
///
/// # Errors
///
/// Returns error if:
/// - The port does not exist ([`Error::InvalidPath`] or [`Error::DeviceNotFound`])
/// - The port is busy or cannot be configured
pub fn open(path: &str, baud_rate: u32) -> Result<StreamTransport<SerialStream>> {
    let port = tokio_serial::new(path, baud_rate)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()
        .map_err(|e| match e.kind() {
            tokio_serial::ErrorKind::NoDevice => {
                Error::DeviceNotFound(format!("{}: {}", path, e))
            }
            tokio_serial::ErrorKind::Io(io::ErrorKind::NotFound) => {
                Error::InvalidPath(format!("{}: {}", path, e))
            }
            _ => Error::Io(e.into()),
        })?;

    debug!("Opened serial port {} at {} baud", path, baud_rate);

    Ok(StreamTransport::new(port, format!("{}@{}", path, baud_rate)))
}
