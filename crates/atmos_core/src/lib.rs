//! # atmos_core: Numerical Foundation for Atmosphere Grid Modelling
//!
//! ## Foundation Layer Role
//!
//! atmos_core is the bottom layer of the workspace, providing:
//! - Domain types: `LayerValues`, `AtmosphereModel`, `Quantity` (`types`)
//! - Error types: `InterpolationError`, `SurfaceError` (`types::error`,
//!   `surfaces::error`)
//! - 1D interpolators: linear and natural cubic spline (`math::interpolators`)
//! - 2D surface models over rectangular grids: `SplineSurface`,
//!   `ConstantSurface`, and the `SurfaceModel` static-dispatch enum
//!   (`surfaces`)
//!
//! The foundation layer has no dependencies on other atmos_* crates and a
//! minimal external surface:
//! - num-traits: generic numerical computation for the 1D interpolators
//! - thiserror: structured error enums
//! - serde: serialisation of the persistable surface models
//!
//! ## Usage Example
//!
//! ```rust
//! use atmos_core::surfaces::{Surface, SplineSurface};
//!
//! // A 3x3 grid sampling z = x + y; the fitted surface passes through
//! // every knot and reproduces the plane in between.
//! let xs = [0.0, 1.0, 2.0];
//! let ys = [10.0, 11.0, 12.0];
//! let values = vec![
//!     vec![10.0, 11.0, 12.0],
//!     vec![11.0, 12.0, 13.0],
//!     vec![12.0, 13.0, 14.0],
//! ];
//! let surface = SplineSurface::new(&xs, &ys, values).unwrap();
//! let z = surface.evaluate(1.0, 11.0).unwrap();
//! assert!((z - 12.0).abs() < 1e-10);
//! ```

pub mod math;
pub mod surfaces;
pub mod types;
