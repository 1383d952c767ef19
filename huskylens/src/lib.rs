//! # huskylens
//!
//! Async driver for DFRobot HuskyLens V1 and HuskyLens 2 AI vision sensors.
//!
//! ## Features
//!
//! - Both wire protocols (V1 and V2) with automatic version detection
//! - Serial (any async byte stream) and I2C transports
//! - Face, hand and pose landmarks on V2
//! - Degrades wire failures to `false` / `None` / empty results, logged via `tracing`
//!
//! ## Quick Start
//!
//! ```no_run
//! use huskylens::{Algorithm, Connection, HuskyLens, ResultQuery};
//!
//! #[tokio::main]
//! async fn main() -> huskylens::Result<()> {
//!     let mut lens = HuskyLens::connect(Connection::serial("/dev/ttyUSB0")).await?;
//!     println!("HuskyLens {:?}", lens.version());
//!
//!     lens.set_algorithm(Some(Algorithm::ObjectTracking)).await;
//!
//!     let results = lens.get_results(&ResultQuery::new().learned_only()).await;
//!     for block in &results.blocks {
//!         println!("{}", block);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod lens;

mod link;

#[cfg(test)]
mod testing;

// Re-exports
pub use config::{Config, Timing};
pub use error::{Error, Result};
pub use lens::{Connection, HuskyLens};

pub use huskylens_core::{LinkState, ProtocolVersion};
pub use huskylens_transport::{ByteStream, I2cBus, StreamTransport, Transport};

// Re-export types
pub use huskylens_types::{
    Algorithm, Arrow, Block, Color, Detection, DetectionKind, Face, FaceLandmarks, Hand,
    HandLandmarks, Point, Pose, PoseLandmarks, ResultQuery, ResultSet,
};
