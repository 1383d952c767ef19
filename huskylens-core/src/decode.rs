//! Result payload decoding
//!
//! Turns `Return*` frames into [`Detection`] records. Info frames only carry
//! the number of result frames that follow.
//!
//! # V2 result layout
//!
//! ```text
//! ┌────┬──────┬───┬───┬───────┬────────┬──────────────────────┬───────────────┐
//! │ ID │ Conf │ X │ Y │ Width │ Height │ [len][name][len][txt] │ keypoints ... │
//! │ i8 │  u8  │     i16 LE each        │ only if declared > 10 │   i16 LE      │
//! └────┴──────┴───┴───┴───────┴────────┴──────────────────────┴───────────────┘
//! ```
//!
//! String and keypoint sections are parsed defensively: a short or malformed
//! tail never fails the record.

use byteorder::{ByteOrder, LittleEndian};
use bytes::Buf;
use huskylens_types::{Algorithm, Arrow, Block, Detection, Face, Hand, Pose};
use tracing::{debug, trace};

use crate::{
    command::{V1Command, V2Command},
    constants::V2_RESULT_CORE_SIZE,
    error::{Error, Result},
    frame::{V1Frame, V2Frame},
};

/// Size of a V1 block or arrow payload: five `i16`
const V1_RESULT_SIZE: usize = 10;

/// Number of result frames announced by a V1 `ReturnInfo` payload
///
/// Payloads shorter than two bytes announce nothing.
pub fn v1_object_count(payload: &[u8]) -> i16 {
    if payload.len() < 2 {
        return 0;
    }
    LittleEndian::read_i16(payload)
}

/// Decode a V1 `ReturnBlock` or `ReturnArrow` frame
pub fn decode_v1(frame: &V1Frame) -> Result<Detection> {
    if frame.payload.len() != V1_RESULT_SIZE {
        return Err(Error::Malformed(format!(
            "{} payload is {} bytes, expected {}",
            frame.command,
            frame.payload.len(),
            V1_RESULT_SIZE
        )));
    }

    let mut fields = [0i16; 5];
    LittleEndian::read_i16_into(&frame.payload, &mut fields);
    let [a, b, c, d, id] = fields;

    match frame.command {
        V1Command::ReturnBlock => Ok(Block::new(a, b, c, d, id).into()),
        V1Command::ReturnArrow => Ok(Arrow::new(a, b, c, d, id).into()),
        other => Err(Error::UnexpectedCommand(other.to_string())),
    }
}

/// Number of result frames announced by a V2 `ReturnInfo` frame
///
/// The count is the second `i16` of the content; shorter content announces
/// nothing.
pub fn v2_result_count(frame: &V2Frame) -> i16 {
    match frame.content.get(2..4) {
        Some(raw) => LittleEndian::read_i16(raw),
        None => 0,
    }
}

/// Decode a V2 `ReturnBlock` or `ReturnArrow` frame
///
/// Blocks become faces, hands or poses when `algorithm` produces landmarks
/// and the frame carries keypoints.
pub fn decode_v2(frame: &V2Frame, algorithm: Algorithm) -> Result<Detection> {
    let declared = frame.declared_len();
    if declared < V2_RESULT_CORE_SIZE || frame.content.len() < V2_RESULT_CORE_SIZE {
        return Err(Error::Malformed(format!(
            "{} carries {} of {} declared bytes, need {}",
            frame.command,
            frame.content.len(),
            declared,
            V2_RESULT_CORE_SIZE
        )));
    }

    let mut buf = &frame.content[..];
    let id = i16::from(buf.get_i8());
    let confidence = buf.get_u8();
    let x = buf.get_i16_le();
    let y = buf.get_i16_le();
    let width = buf.get_i16_le();
    let height = buf.get_i16_le();

    if frame.command == V2Command::ReturnArrow {
        return Ok(Arrow::new(x, y, width, height, id).into());
    }
    if frame.command != V2Command::ReturnBlock {
        return Err(Error::UnexpectedCommand(frame.command.to_string()));
    }

    let (name, content) = if declared > V2_RESULT_CORE_SIZE {
        let name = take_string(&mut buf);
        let content = take_string(&mut buf);
        (name, content)
    } else {
        (String::new(), String::new())
    };

    let keypoints = keypoints(buf);
    trace!(
        "Result id={} conf={} name='{}' content='{}' keypoints={}",
        id,
        confidence,
        name,
        content,
        keypoints.len()
    );

    let block = Block::new(x, y, width, height, id).with_details(confidence, name, content);

    if keypoints.is_empty() || !algorithm.has_landmarks() {
        return Ok(block.into());
    }

    Ok(match algorithm {
        Algorithm::FaceRecognition => Detection::Face(Face::new(block, &keypoints)),
        Algorithm::HandRecognition => Detection::Hand(Hand::new(block, &keypoints)),
        Algorithm::PoseRecognition => Detection::Pose(Pose::new(block, &keypoints)),
        _ => block.into(),
    })
}

/// Read a `[len][bytes]` string
///
/// A missing length byte yields an empty string. A length running past the
/// buffer yields an empty string without consuming the bytes. Invalid UTF-8
/// yields an empty string but still consumes them.
fn take_string(buf: &mut &[u8]) -> String {
    if !buf.has_remaining() {
        return String::new();
    }

    let len = buf.get_u8() as usize;
    if len == 0 || buf.remaining() < len {
        return String::new();
    }

    let raw = &buf[..len];
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text.to_owned(),
        Err(e) => {
            debug!("Dropping non UTF-8 string {}: {}", hex::encode(raw), e);
            String::new()
        }
    };
    buf.advance(len);
    text
}

/// Remaining complete `i16` values; an odd trailing byte is ignored
fn keypoints(buf: &[u8]) -> Vec<i16> {
    let count = buf.len() / 2;
    let mut points = vec![0i16; count];
    LittleEndian::read_i16_into(&buf[..count * 2], &mut points);
    points
}
