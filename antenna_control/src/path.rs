//! Command path generation.
//!
//! A path is a list of motion [`section::Section`]s. Each section yields
//! time-stamped AltAz commands in groups ([`generator::TimedCoordinate`])
//! and carries a [`context::ControlContext`] describing its timing. When
//! sections run back to back, each relative (duration-only) section starts
//! exactly where its predecessor stopped.
//!
//! All path angles are in degrees; conversion to the controller unit
//! happens at the drive.

pub mod context;
pub mod engine;
pub mod generator;
pub mod geometry;
pub mod section;

use thiserror::Error;

pub use engine::EngineError;

/// Path generation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// Coordinate engine could not resolve a point.
    #[error("coordinate engine: {0}")]
    Engine(#[from] EngineError),

    /// Scan start and stop coincide, so it has no direction.
    #[error("scan start and stop are identical ({lon}, {lat})")]
    ZeroLengthScan { lon: f64, lat: f64 },

    /// Scan speed must be positive and finite.
    #[error("invalid scan speed {0}")]
    InvalidSpeed(f64),

    /// Command frequency must be positive and finite.
    #[error("invalid command frequency {0}")]
    InvalidFrequency(f64),
}
