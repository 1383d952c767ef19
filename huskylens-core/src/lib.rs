//! # huskylens-core
//!
//! Core protocol implementation for HuskyLens vision sensors.
//!
//! This crate provides the low-level protocol primitives:
//! - V1 and V2 frame structure and encoding/decoding
//! - Checksum calculation
//! - Command definitions
//! - Result payload decoding
//! - Session and algorithm state
//! - Protocol constants

pub mod algorithm;
pub mod checksum;
pub mod codec;
pub mod command;
pub mod constants;
pub mod decode;
pub mod error;
pub mod frame;
pub mod request;
pub mod session;

pub use codec::FrameCodec;
pub use command::{V1Command, V2Command};
pub use error::{Error, Result};
pub use frame::{V1Frame, V2Frame};
pub use session::{AlgorithmSwitch, LinkState, ProtocolVersion, Session};

/// Largest payload a single frame can carry (one length byte)
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;
