//! Payload builders for outgoing commands

use bytes::{BufMut, BytesMut};
use huskylens_types::{Algorithm, Color};

use crate::{
    algorithm::v1_wire_id,
    error::{Error, Result},
    MAX_PAYLOAD_SIZE,
};

/// Minimum number of algorithm slots in a V2 multi-algorithm request
const MULTI_ALGORITHM_SLOTS: usize = 4;

fn text_len(text: &str) -> Result<u8> {
    u8::try_from(text.len()).map_err(|_| Error::PayloadTooLarge {
        size: text.len(),
        max: MAX_PAYLOAD_SIZE,
    })
}

/// V1 `RequestAlgorithm` payload: remapped id as `i16` LE
pub fn v1_algorithm(algorithm: Algorithm) -> [u8; 2] {
    v1_wire_id(algorithm).to_le_bytes()
}

/// V1 `RequestById` payload
pub fn v1_id(id: i16) -> [u8; 2] {
    id.to_le_bytes()
}

/// V1 `RequestCustomText` payload
///
/// ```text
/// [text_len] [x > 255 ? 0xFF : 0x00] [x mod 255] [y] [text...]
/// ```
pub fn v1_text(text: &str, x: i16, y: i16) -> Result<BytesMut> {
    let len = text_len(text)?;
    let y = u8::try_from(y)
        .map_err(|_| Error::Malformed(format!("V1 text row {} outside 0..=255", y)))?;

    let mut buf = BytesMut::with_capacity(4 + text.len());
    buf.put_u8(len);
    buf.put_u8(if x <= 255 { 0x00 } else { 0xFF });
    buf.put_u8(x.rem_euclid(255) as u8);
    buf.put_u8(y);
    buf.put_slice(text.as_bytes());

    Ok(buf)
}

/// V2 `SetAlgorithm` content: `[algorithm, 0]` then four zero `i16`
pub fn v2_algorithm(algorithm: Algorithm) -> BytesMut {
    let mut buf = BytesMut::with_capacity(10);
    buf.put_u8(algorithm.id());
    buf.put_u8(0);
    for _ in 0..4 {
        buf.put_i16_le(0);
    }
    buf
}

/// V2 `SetMultiAlgorithm` content: `[count, 0]` then algorithm ids as `i16`
/// LE, zero-padded to at least four slots
pub fn v2_multi_algorithm(algorithms: &[Algorithm]) -> BytesMut {
    let slots = algorithms.len().max(MULTI_ALGORITHM_SLOTS);

    let mut buf = BytesMut::with_capacity(2 + slots * 2);
    buf.put_u8(algorithms.len() as u8);
    buf.put_u8(0);
    for slot in 0..slots {
        let id = algorithms.get(slot).map_or(0, |algorithm| algorithm.id());
        buf.put_i16_le(i16::from(id));
    }
    buf
}

/// V2 `DrawText` content: `[color, 0, x, y, 0, 0, text_len, text...]`
pub fn v2_text(text: &str, x: i16, y: i16, color: Color) -> Result<BytesMut> {
    let len = text_len(text)?;

    let mut buf = BytesMut::with_capacity(11 + text.len());
    buf.put_u8(color.into());
    buf.put_u8(0);
    buf.put_i16_le(x);
    buf.put_i16_le(y);
    buf.put_i16_le(0);
    buf.put_i16_le(0);
    buf.put_u8(len);
    buf.put_slice(text.as_bytes());

    Ok(buf)
}

/// V2 `DrawRect` content: `[color, 0, x1, y1, x2, y2]`
pub fn v2_rect(x1: i16, y1: i16, x2: i16, y2: i16, color: Color) -> BytesMut {
    let mut buf = BytesMut::with_capacity(10);
    buf.put_u8(color.into());
    buf.put_u8(0);
    buf.put_i16_le(x1);
    buf.put_i16_le(y1);
    buf.put_i16_le(x2);
    buf.put_i16_le(y2);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_v1_algorithm_payload() {
        assert_eq!(v1_algorithm(Algorithm::ObjectRecognition), [0x02, 0x00]);
        assert_eq!(v1_algorithm(Algorithm::QrCodeRecognition), [0x07, 0x00]);
    }

    #[test]
    fn test_v1_id_payload() {
        assert_eq!(v1_id(5), [0x05, 0x00]);
        assert_eq!(v1_id(-1), [0xFF, 0xFF]);
    }

    #[test]
    fn test_v1_text() {
        let payload = v1_text("Hi", 50, 60).unwrap();
        assert_eq!(&payload[..], &[2, 0x00, 50, 60, b'H', b'i']);

        let payload = v1_text("Hi", 300, 10).unwrap();
        assert_eq!(&payload[..], &[2, 0xFF, 45, 10, b'H', b'i']);
    }

    #[test]
    fn test_v1_text_row_out_of_range() {
        assert!(matches!(v1_text("x", 0, 300), Err(Error::Malformed(_))));
    }

    #[test]
    fn test_text_too_long() {
        let text = "x".repeat(256);
        assert!(matches!(
            v2_text(&text, 0, 0, Color::White),
            Err(Error::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_v2_algorithm_content() {
        let content = v2_algorithm(Algorithm::HandRecognition);
        assert_eq!(&content[..], &[14, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_v2_multi_algorithm_content() {
        let content = v2_multi_algorithm(&[Algorithm::FaceRecognition, Algorithm::LineTracking]);
        assert_eq!(&content[..], &[2, 0, 1, 0, 4, 0, 0, 0, 0, 0]);

        let content = v2_multi_algorithm(&[
            Algorithm::FaceRecognition,
            Algorithm::ObjectTracking,
            Algorithm::ObjectRecognition,
            Algorithm::LineTracking,
            Algorithm::ColorRecognition,
        ]);
        assert_eq!(&content[..], &[5, 0, 1, 0, 2, 0, 3, 0, 4, 0, 5, 0]);
    }

    #[test]
    fn test_v2_text_content() {
        let content = v2_text("ok", 10, -2, Color::Green).unwrap();
        assert_eq!(
            &content[..],
            &[3, 0, 10, 0, 0xFE, 0xFF, 0, 0, 0, 0, 2, b'o', b'k']
        );
    }

    #[test]
    fn test_v2_rect_content() {
        let content = v2_rect(1, 2, 300, 4, Color::Red);
        assert_eq!(&content[..], &[2, 0, 1, 0, 2, 0, 0x2C, 0x01, 4, 0]);
    }
}
