//! HuskyLens frame structures and encoding/decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    command::{V1Command, V2Command},
    constants::{HEADER_V1, HEADER_V2, V1_OVERHEAD, V2_HEADER_SIZE},
    error::{Error, Result},
    MAX_PAYLOAD_SIZE,
};

pub(crate) fn ensure_fits(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(Error::PayloadTooLarge {
            size: len,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    Ok(())
}

/// V1 protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌────────────────┬─────────┬─────────┬─────────────┬──────────┐
/// │     Magic      │ Length  │ Command │   Payload   │ Checksum │
/// │ 0x55 0xAA 0x11 │ 1 byte  │ 1 byte  │ Length bytes│  1 byte  │
/// └────────────────┴─────────┴─────────┴─────────────┴──────────┘
/// ```
///
/// The checksum is the 8-bit sum of every preceding byte. Multi-byte values
/// inside the payload are little-endian.
///
/// # Examples
///
/// ```
/// use huskylens_core::{V1Command, V1Frame};
///
/// let frame = V1Frame::new(V1Command::RequestKnock);
/// let encoded = frame.encode().unwrap();
/// assert_eq!(&encoded[..], &[0x55, 0xAA, 0x11, 0x00, 0x2C, 0x3C]);
///
/// let decoded = V1Frame::decode(&encoded).unwrap();
/// assert_eq!(decoded, frame);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct V1Frame {
    /// Command code
    pub command: V1Command,

    /// Frame payload (command-specific data)
    pub payload: Bytes,
}

impl V1Frame {
    /// Create a frame with empty payload
    pub fn new(command: V1Command) -> Self {
        Self {
            command,
            payload: Bytes::new(),
        }
    }

    /// Create a frame with payload
    pub fn with_payload(command: V1Command, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// Calculate checksum for this frame
    pub fn checksum(&self) -> u8 {
        checksum::calculate(&HEADER_V1)
            .wrapping_add(self.payload.len() as u8)
            .wrapping_add(self.command.into())
            .wrapping_add(checksum::calculate(&self.payload))
    }

    /// Append the encoded frame to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        ensure_fits(self.payload.len())?;

        buf.reserve(self.size());
        buf.put_slice(&HEADER_V1);
        buf.put_u8(self.payload.len() as u8);
        buf.put_u8(self.command.into());
        buf.put_slice(&self.payload);
        buf.put_u8(self.checksum());

        Ok(())
    }

    /// Encode frame to bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload does not fit the
    /// one-byte length field.
    pub fn encode(&self) -> Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(self.size());
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Decode a complete frame
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than the frame overhead
    /// - Magic does not match
    /// - Declared length disagrees with the buffer
    /// - Checksum verification fails
    /// - Command code is unknown
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < V1_OVERHEAD {
            return Err(Error::FrameTooShort {
                expected: V1_OVERHEAD,
                actual: buf.len(),
            });
        }

        if buf[..HEADER_V1.len()] != HEADER_V1 {
            return Err(Error::BadMagic(hex::encode(&buf[..HEADER_V1.len()])));
        }

        let declared = buf[3] as usize;
        let actual = buf.len() - V1_OVERHEAD;
        if declared != actual {
            return Err(Error::LengthMismatch { declared, actual });
        }

        let (body, trailer) = buf.split_at(buf.len() - 1);
        let expected = checksum::calculate(body);
        if expected != trailer[0] {
            return Err(Error::ChecksumMismatch {
                expected,
                received: trailer[0],
            });
        }

        let command = V1Command::try_from(buf[4])?;

        Ok(Self {
            command,
            payload: Bytes::copy_from_slice(&body[5..]),
        })
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        V1_OVERHEAD + self.payload.len()
    }
}

impl fmt::Debug for V1Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("V1Frame")
            .field("command", &self.command)
            .field("payload", &hex::encode(&self.payload))
            .field("checksum", &format!("0x{:02X}", self.checksum()))
            .finish()
    }
}

impl fmt::Display for V1Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V1Frame[{}](len={})", self.command, self.payload.len())
    }
}

/// V2 protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌───────────┬─────────┬───────────┬─────────┬──────────────┬──────────┐
/// │   Magic   │ Command │ Algorithm │ Length  │   Content    │ Checksum │
/// │ 0x55 0xAA │ 1 byte  │  1 byte   │ 1 byte  │ Length bytes │  1 byte  │
/// └───────────┴─────────┴───────────┴─────────┴──────────────┴──────────┘
/// ```
///
/// Decoding is lenient: the header must be present, but a truncated body
/// keeps its shape (the last received byte is taken as the checksum).
/// Checksums of received frames are only checked on request through
/// [`V2Frame::verify_checksum`].
#[derive(Clone, PartialEq, Eq)]
pub struct V2Frame {
    /// Command code
    pub command: V2Command,

    /// Algorithm byte of the header
    pub algorithm: u8,

    /// Frame content
    pub content: Bytes,

    /// Content length announced by the header
    declared_len: usize,

    /// Trailer byte as received (`None` for locally built frames)
    received_checksum: Option<u8>,
}

impl V2Frame {
    /// Create a frame with empty content
    pub fn new(command: V2Command, algorithm: u8) -> Self {
        Self::with_content(command, algorithm, Bytes::new())
    }

    /// Create a frame with content
    pub fn with_content(command: V2Command, algorithm: u8, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            command,
            algorithm,
            declared_len: content.len(),
            content,
            received_checksum: None,
        }
    }

    /// Content length announced by the header
    pub fn declared_len(&self) -> usize {
        self.declared_len
    }

    /// Trailer byte as received, if any
    pub fn received_checksum(&self) -> Option<u8> {
        self.received_checksum
    }

    /// Check if the whole announced content arrived
    pub fn is_complete(&self) -> bool {
        self.content.len() == self.declared_len
    }

    /// Calculate checksum over header and content
    pub fn checksum(&self) -> u8 {
        checksum::calculate(&HEADER_V2)
            .wrapping_add(self.command.into())
            .wrapping_add(self.algorithm)
            .wrapping_add(self.declared_len as u8)
            .wrapping_add(checksum::calculate(&self.content))
    }

    /// Verify a received frame against its trailer byte
    pub fn verify_checksum(&self) -> Result<()> {
        if !self.is_complete() {
            return Err(Error::LengthMismatch {
                declared: self.declared_len,
                actual: self.content.len(),
            });
        }

        let received = self.received_checksum.ok_or(Error::FrameTooShort {
            expected: V2_HEADER_SIZE + self.declared_len + 1,
            actual: V2_HEADER_SIZE + self.content.len(),
        })?;

        let expected = self.checksum();
        if expected != received {
            return Err(Error::ChecksumMismatch { expected, received });
        }

        Ok(())
    }

    /// Append the encoded frame to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        ensure_fits(self.content.len())?;

        buf.reserve(self.size());
        let start = buf.len();
        buf.put_slice(&HEADER_V2);
        buf.put_u8(self.command.into());
        buf.put_u8(self.algorithm);
        buf.put_u8(self.content.len() as u8);
        buf.put_slice(&self.content);
        let checksum = checksum::calculate(&buf[start..]);
        buf.put_u8(checksum);

        Ok(())
    }

    /// Encode frame to bytes
    pub fn encode(&self) -> Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(self.size());
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Decode a received frame
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than the 5-byte header
    /// - Magic does not match
    /// - Command code is unknown
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < V2_HEADER_SIZE {
            return Err(Error::FrameTooShort {
                expected: V2_HEADER_SIZE,
                actual: buf.len(),
            });
        }

        if buf[..HEADER_V2.len()] != HEADER_V2 {
            return Err(Error::BadMagic(hex::encode(&buf[..HEADER_V2.len()])));
        }

        let command = V2Command::try_from(buf[2])?;
        let algorithm = buf[3];
        let declared_len = buf[4] as usize;

        let (content, received_checksum) = match buf[V2_HEADER_SIZE..].split_last() {
            Some((&trailer, content)) => (Bytes::copy_from_slice(content), Some(trailer)),
            None => (Bytes::new(), None),
        };

        Ok(Self {
            command,
            algorithm,
            content,
            declared_len,
            received_checksum,
        })
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        V2_HEADER_SIZE + self.content.len() + 1
    }
}

impl fmt::Debug for V2Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("V2Frame")
            .field("command", &self.command)
            .field("algorithm", &self.algorithm)
            .field("declared_len", &self.declared_len)
            .field("content", &hex::encode(&self.content))
            .field(
                "checksum",
                &self.received_checksum.map(|c| format!("0x{:02X}", c)),
            )
            .finish()
    }
}

impl fmt::Display for V2Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V2Frame[{}](algorithm={}, len={}/{})",
            self.command,
            self.algorithm,
            self.content.len(),
            self.declared_len
        )
    }
}
