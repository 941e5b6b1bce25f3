//! Natural cubic spline interpolation.

use super::linear::validate_knots;
use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Polynomial coefficients for one spline segment:
/// `y = a + b*(x-xi) + c*(x-xi)² + d*(x-xi)³`.
#[derive(Debug, Clone, Copy)]
struct SegmentCoeffs<T: Float> {
    a: T,
    b: T,
    c: T,
    d: T,
}

/// Natural cubic spline interpolator with C² continuity.
///
/// Solves the tridiagonal system for the second derivatives at the knots
/// (Thomas algorithm) with zero second derivative at both boundaries, and
/// evaluates the per-segment cubic polynomials. Passes exactly through
/// every knot.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`, `f32`)
///
/// # Construction
///
/// Knots must already be strictly increasing; at least 3 data points are
/// required.
///
/// # Example
///
/// ```
/// use atmos_core::math::interpolators::{Interpolator, CubicSplineInterpolator};
///
/// let xs = [0.0, 1.0, 2.0, 3.0];
/// let ys = [0.0, 1.0, 4.0, 9.0];
///
/// let interp = CubicSplineInterpolator::new(&xs, &ys).unwrap();
/// let y = interp.interpolate(2.0_f64).unwrap();
/// assert!((y - 4.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSplineInterpolator<T: Float> {
    /// Strictly increasing knots
    xs: Vec<T>,
    /// Polynomial coefficients per segment
    coeffs: Vec<SegmentCoeffs<T>>,
}

impl<T: Float> CubicSplineInterpolator<T> {
    /// Construct a natural cubic spline from knots and values.
    ///
    /// # Arguments
    ///
    /// * `xs` - Strictly increasing x-coordinates
    /// * `ys` - Corresponding y-values
    ///
    /// # Returns
    ///
    /// * `Ok(CubicSplineInterpolator)` - Successfully constructed interpolator
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 3 data points
    /// * `Err(InterpolationError::NonMonotonicData)` - Knots not strictly increasing
    /// * `Err(InterpolationError::InvalidInput)` - Mismatched array lengths
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        validate_knots(xs, ys, 3)?;
        let coeffs = Self::compute_coefficients(xs, ys);
        Ok(Self {
            xs: xs.to_vec(),
            coeffs,
        })
    }

    /// Solve for the knot second derivatives and derive segment polynomials.
    ///
    /// Natural boundary: M[0] = M[n-1] = 0. Interior equations
    /// `h[i-1]*M[i-1] + 2*(h[i-1]+h[i])*M[i] + h[i]*M[i+1] = rhs[i]` are
    /// solved with the Thomas algorithm.
    fn compute_coefficients(xs: &[T], ys: &[T]) -> Vec<SegmentCoeffs<T>> {
        let n = xs.len();
        let two = T::from(2.0).unwrap_or_else(T::one);
        let six = T::from(6.0).unwrap_or_else(T::one);

        let h: Vec<T> = (0..n - 1).map(|i| xs[i + 1] - xs[i]).collect();

        let interior = n - 2;
        let mut c_prime = vec![T::zero(); interior];
        let mut d_prime = vec![T::zero(); interior];

        let rhs = |k: usize| {
            six * ((ys[k + 2] - ys[k + 1]) / h[k + 1] - (ys[k + 1] - ys[k]) / h[k])
        };

        let diag0 = two * (h[0] + h[1]);
        if interior > 1 {
            c_prime[0] = h[1] / diag0;
        }
        d_prime[0] = rhs(0) / diag0;

        for k in 1..interior {
            let denom = two * (h[k] + h[k + 1]) - h[k] * c_prime[k - 1];
            if k + 1 < interior {
                c_prime[k] = h[k + 1] / denom;
            }
            d_prime[k] = (rhs(k) - h[k] * d_prime[k - 1]) / denom;
        }

        let mut m = vec![T::zero(); n];
        m[interior] = d_prime[interior - 1];
        for k in (1..interior).rev() {
            m[k] = d_prime[k - 1] - c_prime[k - 1] * m[k + 1];
        }

        (0..n - 1)
            .map(|i| SegmentCoeffs {
                a: ys[i],
                b: (ys[i + 1] - ys[i]) / h[i] - h[i] * (two * m[i] + m[i + 1]) / six,
                c: m[i] / two,
                d: (m[i + 1] - m[i]) / (six * h[i]),
            })
            .collect()
    }

    /// Returns a reference to the knots.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
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

    /// Segment index for `x`, clamped to the valid range [0, n-2].
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
        let c = &self.coeffs[i];
        let dx = x - self.xs[i];
        c.a + dx * (c.b + dx * (c.c + dx * c.d))
    }
}

impl<T: Float> Interpolator<T> for CubicSplineInterpolator<T> {
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

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_new_with_minimum_points() {
        let interp = CubicSplineInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        assert_eq!(interp.len(), 3);
    }

    #[test]
    fn test_new_insufficient_data() {
        let result = CubicSplineInterpolator::new(&[0.0, 1.0], &[0.0, 1.0]);
        match result.unwrap_err() {
            InterpolationError::InsufficientData { got, need } => {
                assert_eq!(got, 2);
                assert_eq!(need, 3);
            }
            _ => panic!("Expected InsufficientData error"),
        }
    }

    #[test]
    fn test_new_rejects_unsorted_knots() {
        let result = CubicSplineInterpolator::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]);
        assert!(matches!(
            result.unwrap_err(),
            InterpolationError::NonMonotonicData { .. }
        ));
    }

    // ========================================
    // Interpolation Tests
    // ========================================

    #[test]
    fn test_interpolate_at_knot_points() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, 4.0, 9.0, 16.0];
        let interp = CubicSplineInterpolator::new(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            let v = interp.interpolate(*x).unwrap();
            assert!((v - *y).abs() < 1e-10, "at x={}, got {} want {}", x, v, y);
        }
    }

    #[test]
    fn test_linear_data_stays_linear() {
        // Natural spline of linear data has zero curvature everywhere.
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0, 2.0, 3.0];
        let interp = CubicSplineInterpolator::new(&xs, &ys).unwrap();
        assert!((interp.interpolate(0.5).unwrap() - 0.5).abs() < 1e-10);
        assert!((interp.interpolate(1.5).unwrap() - 1.5).abs() < 1e-10);
        assert!((interp.interpolate(2.5).unwrap() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_interpolate_out_of_bounds() {
        let interp = CubicSplineInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        assert!(interp.interpolate(-0.1).is_err());
        assert!(interp.interpolate(2.1).is_err());
        assert!(interp.interpolate(0.0).is_ok());
        assert!(interp.interpolate(2.0).is_ok());
    }

    #[test]
    fn test_evaluate_clamped_matches_knot_at_ends() {
        let interp = CubicSplineInterpolator::new(&[0.0, 1.0, 2.0], &[3.0, 1.0, 4.0]).unwrap();
        assert!((interp.evaluate_clamped(-5.0) - 3.0).abs() < 1e-10);
        assert!((interp.evaluate_clamped(5.0) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_first_derivative_continuity() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, 4.0, 9.0, 16.0];
        let interp = CubicSplineInterpolator::new(&xs, &ys).unwrap();
        let h = 1e-6;
        for &knot in &xs[1..xs.len() - 1] {
            let left = (interp.interpolate(knot).unwrap()
                - interp.interpolate(knot - h).unwrap())
                / h;
            let right = (interp.interpolate(knot + h).unwrap()
                - interp.interpolate(knot).unwrap())
                / h;
            assert!(
                (left - right).abs() < 1e-3,
                "slope jump at knot {}: {} vs {}",
                knot,
                left,
                right
            );
        }
    }

    #[test]
    fn test_natural_boundary_conditions() {
        // Second derivative should vanish at the ends.
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0, 4.0, 9.0];
        let interp = CubicSplineInterpolator::new(&xs, &ys).unwrap();
        let h = 0.01;
        let y0 = interp.interpolate(0.0).unwrap();
        let y1 = interp.interpolate(h).unwrap();
        let y2 = interp.interpolate(2.0 * h).unwrap();
        let d2 = (y2 - 2.0 * y1 + y0) / (h * h);
        assert!(d2.abs() < 0.5, "curvature at boundary: {}", d2);
    }

    #[test]
    fn test_domain() {
        let interp =
            CubicSplineInterpolator::new(&[1.0, 2.0, 3.0, 4.0], &[1.0, 4.0, 9.0, 16.0]).unwrap();
        assert_eq!(interp.domain(), (1.0, 4.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// An exact-interpolation spline passes through every knot,
            /// whatever the values look like.
            #[test]
            fn prop_passes_through_knots(
                ys in proptest::collection::vec(-100.0f64..100.0, 5)
            ) {
                let xs = [0.0, 1.0, 2.5, 3.0, 4.0];
                let interp = CubicSplineInterpolator::new(&xs, &ys).unwrap();
                for (x, y) in xs.iter().zip(ys.iter()) {
                    let v = interp.interpolate(*x).unwrap();
                    prop_assert!((v - *y).abs() < 1e-8, "at {}: {} vs {}", x, v, y);
                }
            }

            /// In-domain evaluation stays finite for finite data.
            #[test]
            fn prop_finite_inside_domain(
                ys in proptest::collection::vec(-100.0f64..100.0, 5),
                x in 0.0f64..4.0
            ) {
                let xs = [0.0, 1.0, 2.5, 3.0, 4.0];
                let interp = CubicSplineInterpolator::new(&xs, &ys).unwrap();
                prop_assert!(interp.interpolate(x).unwrap().is_finite());
            }
        }
    }
}
