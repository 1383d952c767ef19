//! V1 algorithm numbering
//!
//! V1 firmware enumerates a subset of the algorithms starting at a different
//! base and skipping some IDs:
//!
//! ```text
//! requested   1..=6  -> sent as value - 1
//! requested  10..=11 -> sent as value - 3
//! anything else      -> sent unchanged
//! ```
//!
//! These offsets are part of the wire contract.

use huskylens_types::Algorithm;

/// Algorithm value as understood by V1 firmware
pub fn v1_wire_id(algorithm: Algorithm) -> i16 {
    let id = i16::from(algorithm.id());
    match id {
        1..=6 => id - 1,
        10..=11 => id - 3,
        _ => id,
    }
}
