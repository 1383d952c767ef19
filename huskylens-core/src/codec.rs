//! Outgoing frame encoder
//!
//! `FrameCodec` builds every request in one reusable buffer. It is owned by a
//! single driver and takes `&mut self`; sharing one across tasks requires an
//! external lock.

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::{
    checksum,
    command::{V1Command, V2Command},
    constants::{HEADER_V1, HEADER_V2, V1_OVERHEAD},
    error::Result,
    frame::ensure_fits,
    MAX_PAYLOAD_SIZE,
};

/// Request encoder with an owned scratch buffer
#[derive(Debug)]
pub struct FrameCodec {
    scratch: BytesMut,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self {
            scratch: BytesMut::with_capacity(V1_OVERHEAD + MAX_PAYLOAD_SIZE),
        }
    }

    /// Encode a V1 request, returning the wire bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use huskylens_core::{FrameCodec, V1Command};
    ///
    /// let mut codec = FrameCodec::new();
    /// let bytes = codec.encode_v1(V1Command::Request, &[]).unwrap();
    /// assert_eq!(bytes, &[0x55, 0xAA, 0x11, 0x00, 0x20, 0x30]);
    /// ```
    pub fn encode_v1(&mut self, command: V1Command, payload: &[u8]) -> Result<&[u8]> {
        ensure_fits(payload.len())?;

        self.scratch.clear();
        self.scratch.put_slice(&HEADER_V1);
        self.scratch.put_u8(payload.len() as u8);
        self.scratch.put_u8(command.into());
        self.scratch.put_slice(payload);
        self.seal();

        trace!("Encoded {}: {}", command, hex::encode(&self.scratch));
        Ok(&self.scratch)
    }

    /// Encode a V2 request, returning the wire bytes
    pub fn encode_v2(
        &mut self,
        command: V2Command,
        algorithm: u8,
        content: &[u8],
    ) -> Result<&[u8]> {
        ensure_fits(content.len())?;

        self.scratch.clear();
        self.scratch.put_slice(&HEADER_V2);
        self.scratch.put_u8(command.into());
        self.scratch.put_u8(algorithm);
        self.scratch.put_u8(content.len() as u8);
        self.scratch.put_slice(content);
        self.seal();

        trace!("Encoded {}: {}", command, hex::encode(&self.scratch));
        Ok(&self.scratch)
    }

    /// Append the checksum of everything in the scratch buffer
    fn seal(&mut self) {
        let checksum = checksum::calculate(&self.scratch);
        self.scratch.put_u8(checksum);
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::frame::{V1Frame, V2Frame};

    #[test]
    fn test_encode_v1_request() {
        let mut codec = FrameCodec::new();
        let bytes = codec.encode_v1(V1Command::RequestAlgorithm, &[0x02, 0x00]).unwrap();

        assert_eq!(bytes, &[0x55, 0xAA, 0x11, 0x02, 0x2D, 0x02, 0x00, 0x41]);
    }

    #[test]
    fn test_encode_v2_request() {
        let mut codec = FrameCodec::new();
        let bytes = codec.encode_v2(V2Command::GetResult, 3, &[]).unwrap();

        // 0x55 + 0xAA + 0x21 + 0x03 = 0x123
        assert_eq!(bytes, &[0x55, 0xAA, 0x21, 0x03, 0x00, 0x23]);
    }

    #[test]
    fn test_scratch_is_reused() {
        let mut codec = FrameCodec::new();
        codec.encode_v1(V1Command::RequestCustomText, &[0u8; 40]).unwrap();

        let bytes = codec.encode_v1(V1Command::RequestKnock, &[]).unwrap();
        assert_eq!(bytes.len(), 6);
    }

    #[test]
    fn test_encoding_matches_frames() {
        let mut codec = FrameCodec::new();
        let text = b"\x05hello";

        let v1 = V1Frame::with_payload(V1Command::RequestCustomText, text.to_vec())
            .encode()
            .unwrap();
        assert_eq!(
            codec.encode_v1(V1Command::RequestCustomText, text).unwrap(),
            &v1[..]
        );

        let v2 = V2Frame::with_content(V2Command::DrawText, 4, text.to_vec())
            .encode()
            .unwrap();
        assert_eq!(codec.encode_v2(V2Command::DrawText, 4, text).unwrap(), &v2[..]);
    }

    #[test]
    fn test_scratch_does_not_grow() {
        let mut codec = FrameCodec::new();
        let capacity = codec.scratch.capacity();

        for _ in 0..16 {
            codec.encode_v1(V1Command::RequestCustomText, &[0u8; 200]).unwrap();
            codec.encode_v2(V2Command::DrawText, 0, &[0u8; MAX_PAYLOAD_SIZE]).unwrap();
        }

        assert_eq!(codec.scratch.capacity(), capacity);
    }

    #[test]
    fn test_payload_too_large() {
        let mut codec = FrameCodec::new();
        let result = codec.encode_v2(V2Command::DrawText, 0, &[0u8; 300]);

        assert!(matches!(result, Err(Error::PayloadTooLarge { size: 300, .. })));
    }
}
