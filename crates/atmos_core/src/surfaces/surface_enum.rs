//! Static dispatch enum wrapping the concrete surface models.

use super::constant::ConstantSurface;
use super::error::SurfaceError;
use super::spline::SplineSurface;
use super::traits::Surface;
use serde::{Deserialize, Serialize};

/// Static dispatch enum wrapping concrete surface implementations.
///
/// Avoids trait objects in the persisted pack: each variant is a plain,
/// globally resolvable serde type, so a pack written by one process loads
/// in any other.
///
/// # Variants
///
/// - `Spline`: bicubic surface over a gap-filled rectangular grid
/// - `Constant`: fixed value (microturbulent velocity)
///
/// # Example
///
/// ```
/// use atmos_core::surfaces::{Surface, SurfaceModel};
///
/// let model = SurfaceModel::constant(1.5);
/// assert_eq!(model.evaluate(5000.0, 4.0).unwrap(), 1.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceModel {
    /// Bicubic spline surface
    Spline(SplineSurface),
    /// Constant-valued surface
    Constant(ConstantSurface),
}

impl SurfaceModel {
    /// Create a constant variant.
    #[inline]
    pub fn constant(value: f64) -> Self {
        SurfaceModel::Constant(ConstantSurface::new(value))
    }

    /// Check the wrapped model's invariants.
    pub fn validate(&self) -> Result<(), SurfaceError> {
        match self {
            SurfaceModel::Spline(surface) => surface.validate(),
            SurfaceModel::Constant(surface) => surface.validate(),
        }
    }
}

impl Surface for SurfaceModel {
    /// Evaluate the surface at `(x, y)`, delegating to the wrapped model.
    fn evaluate(&self, x: f64, y: f64) -> Result<f64, SurfaceError> {
        match self {
            SurfaceModel::Spline(surface) => surface.evaluate(x, y),
            SurfaceModel::Constant(surface) => surface.evaluate(x, y),
        }
    }

    fn evaluate_clamped(&self, x: f64, y: f64) -> f64 {
        match self {
            SurfaceModel::Spline(surface) => surface.evaluate_clamped(x, y),
            SurfaceModel::Constant(surface) => surface.evaluate_clamped(x, y),
        }
    }

    fn x_domain(&self) -> (f64, f64) {
        match self {
            SurfaceModel::Spline(surface) => surface.x_domain(),
            SurfaceModel::Constant(surface) => surface.x_domain(),
        }
    }

    fn y_domain(&self) -> (f64, f64) {
        match self {
            SurfaceModel::Spline(surface) => surface.y_domain(),
            SurfaceModel::Constant(surface) => surface.y_domain(),
        }
    }
}

impl From<SplineSurface> for SurfaceModel {
    fn from(surface: SplineSurface) -> Self {
        SurfaceModel::Spline(surface)
    }
}

impl From<ConstantSurface> for SurfaceModel {
    fn from(surface: ConstantSurface) -> Self {
        SurfaceModel::Constant(surface)
    }
}
