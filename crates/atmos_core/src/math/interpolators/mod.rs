//! 1D interpolation over sorted knots.
//!
//! The grid axes of an atmosphere pack (effective temperature, surface
//! gravity, metallicity, layer index) are sorted sets by construction, so
//! the interpolators here require strictly increasing knots and report
//! [`InterpolationError::NonMonotonicData`](crate::types::InterpolationError)
//! instead of silently re-sorting.
//!
//! ## Available Interpolators
//!
//! - [`LinearInterpolator`]: piecewise linear between adjacent knots
//! - [`CubicSplineInterpolator`]: natural cubic spline with C² continuity
//!
//! ## Core Trait
//!
//! Both implement the [`Interpolator`] trait:
//! - `interpolate(x) -> Result<T, InterpolationError>`: bounds-checked value
//! - `evaluate_clamped(x) -> T`: infallible value with the query clamped
//!   into the knot domain (flat continuation beyond the ends)
//! - `domain() -> (T, T)`: valid interpolation range
//!
//! ## Example
//!
//! ```
//! use atmos_core::math::interpolators::{Interpolator, LinearInterpolator};
//!
//! let xs = [0.0, 1.0, 2.0, 3.0];
//! let ys = [0.0, 2.0, 4.0, 6.0];
//!
//! let interp = LinearInterpolator::new(&xs, &ys).unwrap();
//! assert_eq!(interp.domain(), (0.0, 3.0));
//! let y = interp.interpolate(1.5_f64).unwrap();
//! assert!((y - 3.0).abs() < 1e-10);
//! ```

mod cubic_spline;
mod linear;
mod traits;

pub use cubic_spline::CubicSplineInterpolator;
pub use linear::LinearInterpolator;
pub use traits::Interpolator;
