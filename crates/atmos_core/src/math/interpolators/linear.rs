//! Linear interpolation implementation.

use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator over strictly increasing knots.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`, `f32`)
///
/// # Construction
///
/// Knots must already be strictly increasing (grid axes are sorted sets by
/// construction); at least 2 data points are required.
///
/// # Example
///
/// ```
/// use atmos_core::math::interpolators::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 2.0, 4.0]).unwrap();
/// let y = interp.interpolate(0.5_f64).unwrap();
/// assert!((y - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator<T: Float> {
    /// Strictly increasing x-coordinates
    xs: Vec<T>,
    /// Corresponding y-values
    ys: Vec<T>,
}

impl<T: Float> LinearInterpolator<T> {
    /// Construct a linear interpolator from knots and values.
    ///
    /// # Arguments
    ///
    /// * `xs` - Strictly increasing x-coordinates
    /// * `ys` - Corresponding y-values
    ///
    /// # Returns
    ///
    /// * `Ok(LinearInterpolator)` - Successfully constructed interpolator
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 2 data points
    /// * `Err(InterpolationError::NonMonotonicData)` - Knots not strictly increasing
    /// * `Err(InterpolationError::InvalidInput)` - Mismatched array lengths
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        validate_knots(xs, ys, 2)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Returns a reference to the knots.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Returns the number of data points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns true if the interpolator has no data points.
    /// Never true for a constructed interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Segment index `i` such that `xs[i] <= x < xs[i+1]`, clamped to
    /// the valid segment range [0, n-2].
    #[inline]
    fn find_segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);
        if pos == 0 {
            0
        } else if pos >= self.xs.len() {
            self.xs.len() - 2
        } else {
            pos - 1
        }
    }

    #[inline]
    fn segment_value(&self, x: T) -> T {
        let i = self.find_segment(x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (y1 - y0) * ((x - x0) / (x1 - x0))
    }
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        let (x_min, x_max) = self.domain();
        if x < x_min || x > x_max {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: x_min.to_f64().unwrap_or(f64::NAN),
                max: x_max.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(self.segment_value(x))
    }

    fn evaluate_clamped(&self, x: T) -> T {
        let (x_min, x_max) = self.domain();
        self.segment_value(x.max(x_min).min(x_max))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

/// Shared knot validation for the 1D interpolators.
pub(super) fn validate_knots<T: Float>(
    xs: &[T],
    ys: &[T],
    need: usize,
) -> Result<(), InterpolationError> {
    if xs.len() != ys.len() {
        return Err(InterpolationError::InvalidInput(format!(
            "xs and ys must have same length: got {} and {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < need {
        return Err(InterpolationError::InsufficientData {
            got: xs.len(),
            need,
        });
    }
    for i in 1..xs.len() {
        if xs[i] <= xs[i - 1] {
            return Err(InterpolationError::NonMonotonicData { index: i });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_new_with_minimum_points() {
        let interp = LinearInterpolator::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert_eq!(interp.len(), 2);
        assert!(!interp.is_empty());
    }

    #[test]
    fn test_new_insufficient_data() {
        let result = LinearInterpolator::new(&[1.0], &[2.0]);
        match result.unwrap_err() {
            InterpolationError::InsufficientData { got, need } => {
                assert_eq!(got, 1);
                assert_eq!(need, 2);
            }
            _ => panic!("Expected InsufficientData error"),
        }
    }

    #[test]
    fn test_new_mismatched_lengths() {
        let result = LinearInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 1.0]);
        assert!(matches!(
            result.unwrap_err(),
            InterpolationError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_new_rejects_unsorted_knots() {
        let result = LinearInterpolator::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]);
        match result.unwrap_err() {
            InterpolationError::NonMonotonicData { index } => assert_eq!(index, 2),
            _ => panic!("Expected NonMonotonicData error"),
        }
    }

    #[test]
    fn test_new_rejects_duplicate_knots() {
        let result = LinearInterpolator::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]);
        assert!(matches!(
            result.unwrap_err(),
            InterpolationError::NonMonotonicData { index: 2 }
        ));
    }

    // ========================================
    // Interpolation Tests
    // ========================================

    #[test]
    fn test_interpolate_at_knots() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 2.0, 4.0, 6.0];
        let interp = LinearInterpolator::new(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((interp.interpolate(*x).unwrap() - *y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_interpolate_midpoints() {
        let interp = LinearInterpolator::new(&[0.0, 1.0, 3.0], &[0.0, 2.0, 6.0]).unwrap();
        assert!((interp.interpolate(0.5).unwrap() - 1.0).abs() < 1e-12);
        assert!((interp.interpolate(2.0).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_out_of_bounds() {
        let interp = LinearInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        match interp.interpolate(-0.1).unwrap_err() {
            InterpolationError::OutOfBounds { x, min, max } => {
                assert!((x + 0.1).abs() < 1e-12);
                assert_eq!(min, 0.0);
                assert_eq!(max, 2.0);
            }
            _ => panic!("Expected OutOfBounds error"),
        }
        assert!(interp.interpolate(2.1).is_err());
    }

    #[test]
    fn test_evaluate_clamped_flat_ends() {
        let interp = LinearInterpolator::new(&[0.0, 1.0, 2.0], &[5.0, 7.0, 9.0]).unwrap();
        assert_eq!(interp.evaluate_clamped(-10.0), 5.0);
        assert_eq!(interp.evaluate_clamped(10.0), 9.0);
        assert!((interp.evaluate_clamped(0.5) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_domain() {
        let interp = LinearInterpolator::new(&[1.0, 2.0, 3.0], &[1.0, 4.0, 9.0]).unwrap();
        assert_eq!(interp.domain(), (1.0, 3.0));
    }

    #[test]
    fn test_with_f32() {
        let interp = LinearInterpolator::new(&[0.0_f32, 1.0], &[0.0_f32, 2.0]).unwrap();
        assert!((interp.interpolate(0.5_f32).unwrap() - 1.0).abs() < 1e-6);
    }
}
