//! Constant surface implementation.

use super::error::SurfaceError;
use super::traits::Surface;
use serde::{Deserialize, Serialize};

/// Surface with the same value everywhere.
///
/// Used for the microturbulent velocity, which is constant across all
/// layers and atmospheres of a metallicity slice. Replaces the ad hoc
/// callable of older pipelines with a regular, serialisable model.
///
/// # Example
///
/// ```
/// use atmos_core::surfaces::{ConstantSurface, Surface};
///
/// let surface = ConstantSurface::new(2.0);
/// assert_eq!(surface.evaluate(5777.0, 4.44).unwrap(), 2.0);
/// assert_eq!(surface.evaluate_clamped(f64::MAX, f64::MIN), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantSurface {
    value: f64,
}

impl ConstantSurface {
    /// Construct a constant surface.
    #[inline]
    pub fn new(value: f64) -> Self {
        ConstantSurface { value }
    }

    /// The constant value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Check the model invariants (the value must be finite).
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if !self.value.is_finite() {
            return Err(SurfaceError::NonFiniteValue { row: 0, col: 0 });
        }
        Ok(())
    }
}

impl Surface for ConstantSurface {
    fn evaluate(&self, _x: f64, _y: f64) -> Result<f64, SurfaceError> {
        Ok(self.value)
    }

    #[inline]
    fn evaluate_clamped(&self, _x: f64, _y: f64) -> f64 {
        self.value
    }

    #[inline]
    fn x_domain(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }

    #[inline]
    fn y_domain(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}
