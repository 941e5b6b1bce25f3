//! Bicubic spline surface implementation.

use super::error::SurfaceError;
use super::traits::Surface;
use crate::math::interpolators::{CubicSplineInterpolator, Interpolator, LinearInterpolator};
use crate::types::InterpolationError;
use serde::{Deserialize, Serialize};

/// Exact-interpolation bicubic surface over a complete rectangular grid.
///
/// Stores the grid axes and values and evaluates by fitting natural cubic
/// splines along the second axis (one per grid row), then a spline along
/// the first axis through the row results. The surface passes exactly
/// through every grid knot (zero smoothing); it is fitted only to
/// gap-filled grids, so every cell must hold a finite value.
///
/// Axes with fewer than 3 points degrade per axis: 2 points interpolate
/// linearly, a single point contributes a constant, mirroring the degree
/// reduction of classical rectangular spline fits on narrow grids.
///
/// # Grid Layout
///
/// `values[i][j] = z(xs[i], ys[j])`:
/// - Rows follow the first axis (e.g. teff)
/// - Columns follow the second axis (e.g. logg)
///
/// # Example
///
/// ```
/// use atmos_core::surfaces::{SplineSurface, Surface};
///
/// let xs = [4000.0, 5000.0, 6000.0];
/// let ys = [1.0, 2.0, 3.0];
/// let values = vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 2.0, 3.0],
///     vec![2.0, 3.0, 4.0],
/// ];
/// let surface = SplineSurface::new(&xs, &ys, values).unwrap();
/// assert!((surface.evaluate(5000.0, 2.0).unwrap() - 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineSurface {
    /// Strictly increasing first-axis knots
    xs: Vec<f64>,
    /// Strictly increasing second-axis knots
    ys: Vec<f64>,
    /// Grid values: `values[i][j] = z(xs[i], ys[j])`
    values: Vec<Vec<f64>>,
}

impl SplineSurface {
    /// Construct a bicubic surface from axes and a complete grid.
    ///
    /// # Arguments
    ///
    /// * `xs` - Strictly increasing first-axis knots (at least 1)
    /// * `ys` - Strictly increasing second-axis knots (at least 1)
    /// * `values` - Complete grid, `values[i][j] = z(xs[i], ys[j])`
    ///
    /// # Returns
    ///
    /// * `Ok(SplineSurface)` - Successfully constructed surface
    /// * `Err(SurfaceError::InsufficientData)` - Empty axis
    /// * `Err(SurfaceError::DimensionMismatch)` - Grid shape inconsistent
    /// * `Err(SurfaceError::NonFiniteValue)` - NaN or infinite cell
    /// * `Err(SurfaceError::Interpolation)` - Knots not strictly increasing
    pub fn new(xs: &[f64], ys: &[f64], values: Vec<Vec<f64>>) -> Result<Self, SurfaceError> {
        let surface = SplineSurface {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            values,
        };
        surface.validate()?;
        Ok(surface)
    }

    /// Check the model invariants.
    ///
    /// Also applied to freshly deserialised surfaces before first use.
    pub fn validate(&self) -> Result<(), SurfaceError> {
        check_axis(&self.xs)?;
        check_axis(&self.ys)?;
        if self.values.len() != self.xs.len() {
            return Err(SurfaceError::DimensionMismatch {
                what: "grid rows",
                got: self.values.len(),
                expected: self.xs.len(),
            });
        }
        for (i, row) in self.values.iter().enumerate() {
            if row.len() != self.ys.len() {
                return Err(SurfaceError::DimensionMismatch {
                    what: "grid row",
                    got: row.len(),
                    expected: self.ys.len(),
                });
            }
            for (j, &v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(SurfaceError::NonFiniteValue { row: i, col: j });
                }
            }
        }
        Ok(())
    }

    /// Returns the first-axis knots.
    #[inline]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Returns the second-axis knots.
    #[inline]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Returns the fitted grid values.
    #[inline]
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Evaluate without bounds checking; both coordinates must already lie
    /// within the axis domains.
    fn eval_inner(&self, x: f64, y: f64) -> Result<f64, InterpolationError> {
        let row_values = self
            .values
            .iter()
            .map(|row| eval_axis(&self.ys, row, y))
            .collect::<Result<Vec<f64>, InterpolationError>>()?;
        eval_axis(&self.xs, &row_values, x)
    }
}

/// Evaluate one axis curve, degrading by knot count.
fn eval_axis(knots: &[f64], values: &[f64], t: f64) -> Result<f64, InterpolationError> {
    match knots.len() {
        1 => Ok(values[0]),
        2 => LinearInterpolator::new(knots, values)?.interpolate(t),
        _ => CubicSplineInterpolator::new(knots, values)?.interpolate(t),
    }
}

fn check_axis(knots: &[f64]) -> Result<(), SurfaceError> {
    if knots.is_empty() {
        return Err(SurfaceError::InsufficientData { got: 0, need: 1 });
    }
    for i in 1..knots.len() {
        if knots[i] <= knots[i - 1] {
            return Err(SurfaceError::Interpolation(
                InterpolationError::NonMonotonicData { index: i },
            ));
        }
    }
    Ok(())
}

impl Surface for SplineSurface {
    fn evaluate(&self, x: f64, y: f64) -> Result<f64, SurfaceError> {
        let (x_min, x_max) = self.x_domain();
        if x < x_min || x > x_max {
            return Err(SurfaceError::OutOfBounds {
                x,
                min: x_min,
                max: x_max,
            });
        }
        let (y_min, y_max) = self.y_domain();
        if y < y_min || y > y_max {
            return Err(SurfaceError::OutOfBounds {
                x: y,
                min: y_min,
                max: y_max,
            });
        }
        Ok(self.eval_inner(x, y)?)
    }

    fn evaluate_clamped(&self, x: f64, y: f64) -> f64 {
        let (x_min, x_max) = self.x_domain();
        let (y_min, y_max) = self.y_domain();
        let cx = x.max(x_min).min(x_max);
        let cy = y.max(y_min).min(y_max);
        match self.eval_inner(cx, cy) {
            Ok(v) => v,
            // Unreachable for a validated surface; the nearest knot keeps
            // the query total.
            Err(_) => {
                let i = nearest_index(&self.xs, cx);
                let j = nearest_index(&self.ys, cy);
                self.values[i][j]
            }
        }
    }

    #[inline]
    fn x_domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    #[inline]
    fn y_domain(&self) -> (f64, f64) {
        (self.ys[0], self.ys[self.ys.len() - 1])
    }
}

/// Index of the knot closest to `t`.
fn nearest_index(knots: &[f64], t: f64) -> usize {
    let pos = knots.partition_point(|&k| k < t);
    if pos == 0 {
        return 0;
    }
    if pos >= knots.len() {
        return knots.len() - 1;
    }
    if (t - knots[pos - 1]).abs() <= (knots[pos] - t).abs() {
        pos - 1
    } else {
        pos
    }
}
