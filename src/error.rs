//! Contract violations.
//!
//! Illegal *moves* are reported as `Outcome::Rejected`, not as errors. An
//! `EngineError` means the caller handed the engine something it should never
//! have produced: a coordinate off the board or an unusable layout.

use thiserror::Error;

use crate::types::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("coordinate {coord} is outside the {width}x{height} board")]
    OutOfBounds {
        coord: Coordinate,
        width: u8,
        height: u8,
    },

    #[error("invalid game config: {0}")]
    InvalidConfig(String),
}
