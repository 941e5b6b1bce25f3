//! # atmos_grid: Atmosphere Grid Interpolation Pipeline
//!
//! ## Pipeline Layer Role
//!
//! atmos_grid turns sparse, irregular grids of reference model
//! atmospheres into a continuous, queryable model:
//!
//! - [`reader`]: Kurucz/Castelli file parsing into a normalised grid
//! - [`gapfill`]: three-stage filling of missing (teff, logg) cells
//!   (interpolate, extrapolate, copy-nearest)
//! - [`builder`]: surface model fitting per (metallicity, layer,
//!   quantity) plus per-metallicity proximity surfaces
//! - [`pack`]: the persisted [`ModelPack`] bundle (build once, query many)
//! - queries on the pack: [`ModelPack::valid_atmosphere_target`],
//!   [`ModelPack::interpolate_atmosphere_layers`],
//!   [`ModelPack::estimate_proximity_to_real_atmospheres`]
//! - [`writer`]: plane-parallel text output for external radiative
//!   transfer codes
//! - [`regions`]: tab-delimited wavelength region files
//!
//! ## Usage Example
//!
//! ```rust
//! use atmos_core::types::{AtmosphereModel, LayerValues};
//! use atmos_grid::{build_model_pack, AtmosphereGrid};
//!
//! // Two metallicity slices over a complete 2x2 (teff, logg) grid with
//! // two layers per atmosphere.
//! let mut models = Vec::new();
//! for &mh in &[-1.0, 0.0] {
//!     for &teff in &[5000.0, 6000.0] {
//!         for &logg in &[4.0, 4.5] {
//!             let layers = (0..2)
//!                 .map(|l| {
//!                     let depth = (l + 1) as f64;
//!                     LayerValues::new([
//!                         1e-3 * depth,
//!                         0.8 * teff + 100.0 * mh + 15.0 * depth,
//!                         50.0 * logg,
//!                         1e8,
//!                         1e-4,
//!                         1e-2,
//!                         2.0,
//!                     ])
//!                 })
//!                 .collect();
//!             models.push(AtmosphereModel::new(teff, logg, mh, layers));
//!         }
//!     }
//! }
//! let grid = AtmosphereGrid::from_models(models, 2).unwrap();
//! let pack = build_model_pack(&grid).unwrap();
//!
//! assert!(pack.valid_atmosphere_target(5500.0, 4.25, -0.5));
//! let layers = pack.interpolate_atmosphere_layers(5500.0, 4.25, -0.5).unwrap();
//! assert_eq!(layers.len(), 2);
//! assert_eq!(pack.estimate_proximity_to_real_atmospheres(5500.0, 4.25, -0.5), 0.0);
//! ```

pub mod builder;
pub mod error;
pub mod gapfill;
pub mod pack;
mod query;
pub mod reader;
pub mod regions;
pub mod writer;

pub use builder::build_model_pack;
pub use error::{Axis, GridError};
pub use gapfill::{FillOutcome, GapFiller, Provenance, ValueBounds};
pub use pack::{ModelPack, ProximityModel};
pub use reader::{
    metallicity_from_filename, read_kurucz_atmospheres, AtmosphereGrid, MetallicitySlice,
    ReaderConfig,
};
pub use regions::{read_regions, write_regions, WavelengthRegion};
pub use writer::{read_atmosphere, write_atmosphere, write_atmosphere_to};
