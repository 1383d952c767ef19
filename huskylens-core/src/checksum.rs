//! HuskyLens frame checksum
//!
//! Both protocol versions use the same trailer byte: the additive sum of
//! every preceding byte of the frame (header, length, command and payload),
//! truncated to 8 bits.

use tracing::trace;

/// Calculate frame checksum
///
/// # Examples
///
/// ```
/// use huskylens_core::checksum;
///
/// // V1 knock request without the trailing checksum byte
/// let checksum = checksum::calculate(&[0x55, 0xAA, 0x11, 0x00, 0x2C]);
/// assert_eq!(checksum, 0x3C);
/// ```
pub fn calculate(bytes: &[u8]) -> u8 {
    let checksum = bytes
        .iter()
        .fold(0u8, |sum, &byte| sum.wrapping_add(byte));

    trace!(
        len = bytes.len(),
        checksum = format!("0x{:02X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify checksum
pub fn verify(bytes: &[u8], expected: u8) -> bool {
    calculate(bytes) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty() {
        assert_eq!(calculate(&[]), 0);
    }

    #[test]
    fn test_checksum_knock_frame() {
        // 0x55 + 0xAA + 0x11 + 0x00 + 0x2C = 0x13C
        assert_eq!(calculate(&[0x55, 0xAA, 0x11, 0x00, 0x2C]), 0x3C);
    }

    #[test]
    fn test_checksum_wraps() {
        let payload = vec![0xFF; 1000];

        // 1000 * 255 = 255000 = 0x3E418
        assert_eq!(calculate(&payload), 0x18);
    }

    #[test]
    fn test_checksum_verify() {
        let bytes = [0x55, 0xAA, 0x20, 0x00, 0x00];
        let checksum = calculate(&bytes);

        assert!(verify(&bytes, checksum));
        assert!(!verify(&bytes, checksum.wrapping_add(1)));
    }

    #[test]
    fn test_checksum_order_independent() {
        assert_eq!(calculate(&[1, 2, 3]), calculate(&[3, 2, 1]));
    }
}
