//! Protocol constants

use std::time::Duration;

/// V1 frame magic
pub const HEADER_V1: [u8; 3] = [0x55, 0xAA, 0x11];

/// V2 frame magic
pub const HEADER_V2: [u8; 2] = [0x55, 0xAA];

/// V1 frame overhead: magic + length + command + checksum
pub const V1_OVERHEAD: usize = HEADER_V1.len() + 3;

/// V2 header: magic + command + algorithm + length
pub const V2_HEADER_SIZE: usize = HEADER_V2.len() + 3;

/// Fixed part of a V2 result payload: id, confidence, x, y, width, height
pub const V2_RESULT_CORE_SIZE: usize = 10;

/// Bytes read when waiting for a V2 knock acknowledgement
pub const V2_KNOCK_REPLY_SIZE: usize = 6;

/// I2C addressing
pub mod i2c {
    /// V1 devices answer at this address
    pub const ADDR_V1: u8 = 0x32;

    /// V2 devices answer at this address
    pub const ADDR_V2: u8 = 0x50;

    /// V1 transactions are indexed at this register
    pub const REGISTER_V1: u8 = 0x0C;
}

/// Default timing (hardware settling requirements, not incidental delays)
pub mod timing {
    use super::Duration;

    /// Wait after every command write
    pub const AFTER_WRITE: Duration = Duration::from_millis(5);

    /// Wait between a V2 get-result command and the info frame
    pub const V2_INITIAL: Duration = Duration::from_millis(50);

    /// Wait before each V2 result frame
    pub const V2_BETWEEN: Duration = Duration::from_millis(10);

    /// Wait between V1 knock reply reads
    pub const KNOCK_RETRY_V1: Duration = Duration::from_millis(10);

    /// Wait between V2 knock rounds
    pub const KNOCK_RETRY_V2: Duration = Duration::from_millis(50);

    /// Serial polling interval
    pub const SERIAL_POLL: Duration = Duration::from_millis(1);
}

/// Bounded retry counts
pub mod retries {
    /// 3-byte windows inspected while looking for a V1 header
    pub const HEADER_SYNC: usize = 50;

    /// Frame reads while waiting for a V1 knock acknowledgement
    pub const KNOCK_V1: usize = 10;

    /// Knock rounds (write + read) for V2
    pub const KNOCK_V2: usize = 5;

    /// Serial poll attempts per read
    pub const SERIAL_READ: usize = 150;

    /// Reads performed by a stream flush
    pub const STREAM_FLUSH: usize = 10;

    /// Reads performed by an I2C flush
    pub const I2C_FLUSH: usize = 5;
}
