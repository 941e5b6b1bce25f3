//! Common surface evaluation trait.

use super::error::SurfaceError;

/// A 2D interpolant over a rectangular `(x, y)` domain.
pub trait Surface {
    /// Evaluate the surface at `(x, y)`.
    ///
    /// # Returns
    ///
    /// * `Ok(z)` - The surface value
    /// * `Err(SurfaceError::OutOfBounds)` - If either coordinate falls
    ///   outside the fitted domain
    fn evaluate(&self, x: f64, y: f64) -> Result<f64, SurfaceError>;

    /// Evaluate with both coordinates clamped into the fitted domain.
    ///
    /// Never fails; queries beyond the grid evaluate at the nearest
    /// boundary. Inside the domain this agrees with [`evaluate`].
    ///
    /// [`evaluate`]: Surface::evaluate
    fn evaluate_clamped(&self, x: f64, y: f64) -> f64;

    /// Valid range of the first coordinate.
    fn x_domain(&self) -> (f64, f64);

    /// Valid range of the second coordinate.
    fn y_domain(&self) -> (f64, f64);
}
