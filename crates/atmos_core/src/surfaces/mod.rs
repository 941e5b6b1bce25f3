//! 2D surface models over rectangular grids.
//!
//! A surface maps a `(teff, logg)` style coordinate pair to one physical
//! quantity. Two concrete models exist:
//!
//! - [`SplineSurface`]: exact-interpolation bicubic surface over a complete
//!   rectangular grid (the workhorse for gap-filled quantity grids)
//! - [`ConstantSurface`]: a fixed value for quantities that do not vary
//!   over the grid (microturbulent velocity)
//!
//! [`SurfaceModel`] wraps both behind a static-dispatch enum so a persisted
//! pack deserialises into globally resolvable types, and [`Surface`] is the
//! common evaluation trait.
//!
//! # Example
//!
//! ```
//! use atmos_core::surfaces::{Surface, SurfaceModel};
//!
//! let model = SurfaceModel::constant(2.0);
//! assert_eq!(model.evaluate(5000.0, 4.5).unwrap(), 2.0);
//! ```

pub mod constant;
pub mod error;
pub mod spline;
pub mod surface_enum;
pub mod traits;

pub use constant::ConstantSurface;
pub use error::SurfaceError;
pub use spline::SplineSurface;
pub use surface_enum::SurfaceModel;
pub use traits::Surface;
