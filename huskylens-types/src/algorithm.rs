//! Recognition algorithms and overlay colors

use std::fmt;

use crate::error::{Error, Result};

/// Recognition algorithm running on the device
///
/// Values are the V2 firmware numbering. V1 firmware enumerates a subset
/// with a different base; the remapping lives in the protocol codec.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Algorithm {
    Menu = 0,
    FaceRecognition = 1,
    ObjectTracking = 2,
    #[default]
    ObjectRecognition = 3,
    LineTracking = 4,
    ColorRecognition = 5,
    TagRecognition = 6,
    ObjectClassification = 7,
    Ocr = 8,
    LicenseRecognition = 9,
    QrCodeRecognition = 10,
    BarcodeRecognition = 11,
    FaceEmotionRecognition = 12,
    PoseRecognition = 13,
    HandRecognition = 14,
}

impl Algorithm {
    /// Every algorithm, in wire order
    pub const ALL: [Algorithm; 15] = [
        Self::Menu,
        Self::FaceRecognition,
        Self::ObjectTracking,
        Self::ObjectRecognition,
        Self::LineTracking,
        Self::ColorRecognition,
        Self::TagRecognition,
        Self::ObjectClassification,
        Self::Ocr,
        Self::LicenseRecognition,
        Self::QrCodeRecognition,
        Self::BarcodeRecognition,
        Self::FaceEmotionRecognition,
        Self::PoseRecognition,
        Self::HandRecognition,
    ];

    /// Wire value
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Check if block results of this algorithm can carry keypoints
    pub fn has_landmarks(self) -> bool {
        matches!(
            self,
            Self::FaceRecognition | Self::HandRecognition | Self::PoseRecognition
        )
    }

    /// Get algorithm name
    pub fn name(self) -> &'static str {
        match self {
            Self::Menu => "MENU",
            Self::FaceRecognition => "FACE_RECOGNITION",
            Self::ObjectTracking => "OBJECT_TRACKING",
            Self::ObjectRecognition => "OBJECT_RECOGNITION",
            Self::LineTracking => "LINE_TRACKING",
            Self::ColorRecognition => "COLOR_RECOGNITION",
            Self::TagRecognition => "TAG_RECOGNITION",
            Self::ObjectClassification => "OBJECT_CLASSIFICATION",
            Self::Ocr => "OCR",
            Self::LicenseRecognition => "LICENSE_RECOGNITION",
            Self::QrCodeRecognition => "QR_CODE_RECOGNITION",
            Self::BarcodeRecognition => "BARCODE_RECOGNITION",
            Self::FaceEmotionRecognition => "FACE_EMOTION_RECOGNITION",
            Self::PoseRecognition => "POSE_RECOGNITION",
            Self::HandRecognition => "HAND_RECOGNITION",
        }
    }
}

impl From<Algorithm> for u8 {
    fn from(algorithm: Algorithm) -> u8 {
        algorithm as u8
    }
}

impl TryFrom<u8> for Algorithm {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidAlgorithm(value))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), *self as u8)
    }
}

/// Overlay drawing colors (V2 palette)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    #[default]
    White = 1,
    Red = 2,
    Green = 3,
    Blue = 4,
    Yellow = 5,
}

impl From<Color> for u8 {
    fn from(color: Color) -> u8 {
        color as u8
    }
}

impl TryFrom<u8> for Color {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Black),
            1 => Ok(Self::White),
            2 => Ok(Self::Red),
            3 => Ok(Self::Green),
            4 => Ok(Self::Blue),
            5 => Ok(Self::Yellow),
            _ => Err(Error::InvalidColor(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_conversion() {
        assert_eq!(u8::from(Algorithm::HandRecognition), 14);
        assert_eq!(Algorithm::try_from(3).unwrap(), Algorithm::ObjectRecognition);

        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::try_from(algorithm.id()).unwrap(), algorithm);
        }
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!(matches!(
            Algorithm::try_from(15),
            Err(Error::InvalidAlgorithm(15))
        ));
    }

    #[test]
    fn test_default_algorithm() {
        assert_eq!(Algorithm::default(), Algorithm::ObjectRecognition);
    }

    #[test]
    fn test_has_landmarks() {
        assert!(Algorithm::FaceRecognition.has_landmarks());
        assert!(Algorithm::HandRecognition.has_landmarks());
        assert!(Algorithm::PoseRecognition.has_landmarks());
        assert!(!Algorithm::ObjectRecognition.has_landmarks());
        assert!(!Algorithm::FaceEmotionRecognition.has_landmarks());
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(Color::default(), Color::White);
        assert_eq!(Color::try_from(3).unwrap(), Color::Green);
        assert!(Color::try_from(6).is_err());
    }
}
