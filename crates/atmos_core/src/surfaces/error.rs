//! Surface model error types.

use crate::types::InterpolationError;
use thiserror::Error;

/// Surface construction and evaluation errors.
///
/// # Variants
///
/// - `OutOfBounds`: Query outside the fitted grid domain
/// - `DimensionMismatch`: Grid shape inconsistent with its axes
/// - `NonFiniteValue`: Grid cell is NaN or infinite (surfaces are fitted
///   only to gap-filled, complete grids)
/// - `InsufficientData`: Empty axis
/// - `Interpolation`: Wrapped 1D interpolation error
///
/// # Examples
///
/// ```
/// use atmos_core::surfaces::SurfaceError;
///
/// let err = SurfaceError::OutOfBounds { x: 9500.0, min: 2500.0, max: 9000.0 };
/// assert!(format!("{}", err).contains("9500"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// Query point outside the fitted domain.
    #[error("Out of bounds: {x} not in [{min}, {max}]")]
    OutOfBounds {
        /// The query coordinate that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Grid shape inconsistent with its axes.
    #[error("Dimension mismatch: {what} has {got} entries, expected {expected}")]
    DimensionMismatch {
        /// Which part of the grid was inconsistent
        what: &'static str,
        /// Number of entries found
        got: usize,
        /// Number of entries required
        expected: usize,
    },

    /// Grid cell is NaN or infinite.
    #[error("Non-finite grid value at ({row}, {col})")]
    NonFiniteValue {
        /// Row index (first axis)
        row: usize,
        /// Column index (second axis)
        col: usize,
    },

    /// Empty axis.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// 1D interpolation error.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),
}
