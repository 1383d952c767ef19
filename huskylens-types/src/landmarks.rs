//! Landmark-carrying detections (V2 face, hand and pose recognition)
//!
//! The device appends a flat array of little-endian `i16` keypoints to the
//! block payload: `[x0, y0, x1, y1, ...]`. Landmarks are only attached when
//! the array covers every named point; a short array leaves them unset.

use std::fmt;

use crate::detection::Block;

/// Pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

macro_rules! landmark_set {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name {
            $(pub $field: Point,)+
        }

        impl $name {
            /// Number of named points
            pub const POINTS: usize = [$(stringify!($field)),+].len();

            /// Build from a flat keypoint array, `None` if it is too short
            pub fn from_keypoints(keypoints: &[i16]) -> Option<Self> {
                if keypoints.len() < Self::POINTS * 2 {
                    return None;
                }
                let mut pairs = keypoints
                    .chunks_exact(2)
                    .map(|pair| Point::new(pair[0], pair[1]));
                Some(Self {
                    $($field: pairs.next()?,)+
                })
            }

            /// Named points in wire order
            pub fn iter(&self) -> impl Iterator<Item = (&'static str, Point)> {
                [$((stringify!($field), self.$field)),+].into_iter()
            }
        }
    };
}

landmark_set! {
    /// Five facial landmarks
    FaceLandmarks {
        left_eye,
        right_eye,
        nose,
        left_mouth,
        right_mouth,
    }
}

landmark_set! {
    /// 21 hand keypoints: wrist, then four joints per finger from the palm out
    HandLandmarks {
        wrist,
        thumb_cmc,
        thumb_mcp,
        thumb_ip,
        thumb_tip,
        index_finger_mcp,
        index_finger_pip,
        index_finger_dip,
        index_finger_tip,
        middle_finger_mcp,
        middle_finger_pip,
        middle_finger_dip,
        middle_finger_tip,
        ring_finger_mcp,
        ring_finger_pip,
        ring_finger_dip,
        ring_finger_tip,
        pinky_finger_mcp,
        pinky_finger_pip,
        pinky_finger_dip,
        pinky_finger_tip,
    }
}

landmark_set! {
    /// 17 body keypoints
    PoseLandmarks {
        nose,
        left_eye,
        right_eye,
        left_ear,
        right_ear,
        left_shoulder,
        right_shoulder,
        left_elbow,
        right_elbow,
        left_wrist,
        right_wrist,
        left_hip,
        right_hip,
        left_knee,
        right_knee,
        left_ankle,
        right_ankle,
    }
}

/// Face with optional landmarks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub block: Block,
    pub landmarks: Option<FaceLandmarks>,
}

impl Face {
    pub fn new(block: Block, keypoints: &[i16]) -> Self {
        Self {
            block,
            landmarks: FaceLandmarks::from_keypoints(keypoints),
        }
    }

    pub fn learned(&self) -> bool {
        self.block.learned()
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Face(x={}, y={}, ID={})",
            self.block.x, self.block.y, self.block.id
        )
    }
}

/// Hand with optional keypoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    pub block: Block,
    pub landmarks: Option<HandLandmarks>,
}

impl Hand {
    pub fn new(block: Block, keypoints: &[i16]) -> Self {
        Self {
            block,
            landmarks: HandLandmarks::from_keypoints(keypoints),
        }
    }

    pub fn learned(&self) -> bool {
        self.block.learned()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hand(x={}, y={}, ID={}",
            self.block.x, self.block.y, self.block.id
        )?;
        if let Some(landmarks) = &self.landmarks {
            write!(f, ", wrist={}", landmarks.wrist)?;
        }
        write!(f, ")")
    }
}

/// Body pose with optional keypoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pose {
    pub block: Block,
    pub landmarks: Option<PoseLandmarks>,
}

impl Pose {
    pub fn new(block: Block, keypoints: &[i16]) -> Self {
        Self {
            block,
            landmarks: PoseLandmarks::from_keypoints(keypoints),
        }
    }

    pub fn learned(&self) -> bool {
        self.block.learned()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pose(x={}, y={}, ID={}",
            self.block.x, self.block.y, self.block.id
        )?;
        if let Some(landmarks) = &self.landmarks {
            write!(f, ", nose={}", landmarks.nose)?;
        }
        write!(f, ")")
    }
}
