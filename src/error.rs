//! Error types for the simulation core.
//!
//! Every failure is raised synchronously at the point of violation and
//! leaves any prior state untouched. Nothing is retried internally.

use thiserror::Error;

use crate::Size;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A probability, deviation, size or literal grid value is outside its domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Noise tag outside of `uniform`, `gaussian` and `salt_and_pepper`.
    #[error("unsupported noise kind: {0:?}")]
    UnsupportedNoiseKind(String),

    /// Two grids of different shapes were compared.
    #[error("shape mismatch: {left} vs {right}")]
    ShapeMismatch { left: Size, right: Size },

    /// `advance` was called after the configured frame count was reached.
    #[error("simulation terminated after {frame_count} frames")]
    SimulationTerminated { frame_count: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn invalid<V: ToString>(name: &'static str, value: V, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
