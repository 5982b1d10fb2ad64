#![forbid(unsafe_code)]

//! Configuration errors.

use thiserror::Error;

/// Rejected [`StackLayoutConfig`](crate::StackLayoutConfig) values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A pixel dimension that must be non-negative was negative.
    #[error("dimension `{name}` must be non-negative, got {value}")]
    NegativeDimension { name: &'static str, value: i32 },

    /// The dimmed scale must lie in `(0, 1]`.
    #[error("dimmed scale must be in (0, 1], got {0}")]
    DimmedScaleOutOfRange(f32),

    /// The indentation shape factor must lie in `[0, 1]`.
    #[error("shape factor must be in [0, 1], got {0}")]
    ShapeFactorOutOfRange(f32),
}
