//! Type definitions for huskylens

pub mod algorithm;
pub mod detection;
pub mod error;
pub mod landmarks;
pub mod result_set;

pub use algorithm::{Algorithm, Color};
pub use detection::{Arrow, Block, Detection, DetectionKind};
pub use error::{Error, Result};
pub use landmarks::{Face, FaceLandmarks, Hand, HandLandmarks, Point, Pose, PoseLandmarks};
pub use result_set::{ResultQuery, ResultSet};
