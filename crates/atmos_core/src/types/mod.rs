//! Domain types for plane-parallel atmosphere models.
//!
//! # Components
//!
//! - [`LayerValues`]: the seven physical quantities of one depth layer
//! - [`AtmosphereModel`]: one reference atmosphere (teff, logg, metallicity
//!   plus its layer stack)
//! - [`Quantity`]: named indices into a layer's value tuple
//! - [`InterpolationError`]: errors from 1D interpolation operations

pub mod error;
pub mod layer;

pub use error::InterpolationError;
pub use layer::{AtmosphereModel, LayerValues, Quantity};
