//! HuskyLens protocol command definitions

use std::fmt;

use crate::error::{Error, Result};

/// V1 protocol command codes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum V1Command {
    // Requests (host to device)
    Request = 0x20,
    RequestLearned = 0x23,
    RequestById = 0x26,
    RequestKnock = 0x2C,
    RequestAlgorithm = 0x2D,
    RequestCustomText = 0x34,
    RequestClearText = 0x35,
    RequestFirmwareVersion = 0x3C,

    // Responses (device to host)
    ReturnInfo = 0x29,
    ReturnBlock = 0x2A,
    ReturnArrow = 0x2B,
    ReturnOk = 0x2E,
}

impl V1Command {
    /// Every V1 command
    pub const ALL: [V1Command; 12] = [
        Self::Request,
        Self::RequestLearned,
        Self::RequestById,
        Self::RequestKnock,
        Self::RequestAlgorithm,
        Self::RequestCustomText,
        Self::RequestClearText,
        Self::RequestFirmwareVersion,
        Self::ReturnInfo,
        Self::ReturnBlock,
        Self::ReturnArrow,
        Self::ReturnOk,
    ];

    /// Check if this is a response command (from device to host)
    pub fn is_response(self) -> bool {
        matches!(
            self,
            Self::ReturnInfo | Self::ReturnBlock | Self::ReturnArrow | Self::ReturnOk
        )
    }

    /// Check if this is a request command (from host to device)
    pub fn is_request(self) -> bool {
        !self.is_response()
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Request => "COMMAND_REQUEST",
            Self::RequestLearned => "COMMAND_REQUEST_LEARNED",
            Self::RequestById => "COMMAND_REQUEST_BY_ID",
            Self::RequestKnock => "COMMAND_REQUEST_KNOCK",
            Self::RequestAlgorithm => "COMMAND_REQUEST_ALGORITHM",
            Self::RequestCustomText => "COMMAND_REQUEST_CUSTOM_TEXT",
            Self::RequestClearText => "COMMAND_REQUEST_CLEAR_TEXT",
            Self::RequestFirmwareVersion => "COMMAND_REQUEST_FIRMWARE_VERSION",
            Self::ReturnInfo => "COMMAND_RETURN_INFO",
            Self::ReturnBlock => "COMMAND_RETURN_BLOCK",
            Self::ReturnArrow => "COMMAND_RETURN_ARROW",
            Self::ReturnOk => "COMMAND_RETURN_OK",
        }
    }
}

impl From<V1Command> for u8 {
    fn from(cmd: V1Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for V1Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x20 => Ok(Self::Request),
            0x23 => Ok(Self::RequestLearned),
            0x26 => Ok(Self::RequestById),
            0x2C => Ok(Self::RequestKnock),
            0x2D => Ok(Self::RequestAlgorithm),
            0x34 => Ok(Self::RequestCustomText),
            0x35 => Ok(Self::RequestClearText),
            0x3C => Ok(Self::RequestFirmwareVersion),
            0x29 => Ok(Self::ReturnInfo),
            0x2A => Ok(Self::ReturnBlock),
            0x2B => Ok(Self::ReturnArrow),
            0x2E => Ok(Self::ReturnOk),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for V1Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// V2 protocol command codes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum V2Command {
    // Requests (host to device)
    Knock = 0x20,
    GetResult = 0x21,
    SetAlgorithm = 0x30,
    SetMultiAlgorithm = 0x32,
    SetMultiAlgorithmRatio = 0x33,
    DrawRect = 0x56,
    ClearRect = 0x57,
    DrawText = 0x58,
    ClearText = 0x59,

    // Responses (device to host)
    ReturnOk = 0x40,
    ReturnInfo = 0x42,
    ReturnBlock = 0x43,
    ReturnArrow = 0x44,
}

impl V2Command {
    /// Every V2 command
    pub const ALL: [V2Command; 13] = [
        Self::Knock,
        Self::GetResult,
        Self::SetAlgorithm,
        Self::SetMultiAlgorithm,
        Self::SetMultiAlgorithmRatio,
        Self::DrawRect,
        Self::ClearRect,
        Self::DrawText,
        Self::ClearText,
        Self::ReturnOk,
        Self::ReturnInfo,
        Self::ReturnBlock,
        Self::ReturnArrow,
    ];

    /// Check if this is a response command (from device to host)
    pub fn is_response(self) -> bool {
        matches!(
            self,
            Self::ReturnOk | Self::ReturnInfo | Self::ReturnBlock | Self::ReturnArrow
        )
    }

    /// Check if this is a request command (from host to device)
    pub fn is_request(self) -> bool {
        !self.is_response()
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Knock => "COMMAND_KNOCK",
            Self::GetResult => "COMMAND_GET_RESULT",
            Self::SetAlgorithm => "COMMAND_SET_ALGORITHM",
            Self::SetMultiAlgorithm => "COMMAND_SET_MULTI_ALGORITHM",
            Self::SetMultiAlgorithmRatio => "COMMAND_SET_MULTI_ALGORITHM_RATIO",
            Self::DrawRect => "COMMAND_ACTION_DRAW_RECT",
            Self::ClearRect => "COMMAND_ACTION_CLEAN_RECT",
            Self::DrawText => "COMMAND_ACTION_DRAW_TEXT",
            Self::ClearText => "COMMAND_ACTION_CLEAR_TEXT",
            Self::ReturnOk => "COMMAND_RETURN_OK",
            Self::ReturnInfo => "COMMAND_RETURN_INFO",
            Self::ReturnBlock => "COMMAND_RETURN_BLOCK",
            Self::ReturnArrow => "COMMAND_RETURN_ARROW",
        }
    }
}

impl From<V2Command> for u8 {
    fn from(cmd: V2Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for V2Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x20 => Ok(Self::Knock),
            0x21 => Ok(Self::GetResult),
            0x30 => Ok(Self::SetAlgorithm),
            0x32 => Ok(Self::SetMultiAlgorithm),
            0x33 => Ok(Self::SetMultiAlgorithmRatio),
            0x56 => Ok(Self::DrawRect),
            0x57 => Ok(Self::ClearRect),
            0x58 => Ok(Self::DrawText),
            0x59 => Ok(Self::ClearText),
            0x40 => Ok(Self::ReturnOk),
            0x42 => Ok(Self::ReturnInfo),
            0x43 => Ok(Self::ReturnBlock),
            0x44 => Ok(Self::ReturnArrow),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for V2Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}
