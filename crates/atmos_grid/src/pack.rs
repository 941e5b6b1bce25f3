//! The persisted, queryable model pack.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use atmos_core::surfaces::{SplineSurface, SurfaceModel};
use atmos_core::types::Quantity;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GridError;

/// Proximity-to-real-data surface for one metallicity slice.
///
/// The surface value counts derivation stages (0 = a real atmosphere);
/// `grid_max` is its maximum over the real grid knots, used to clamp
/// spline overshoot at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityModel {
    surface: SplineSurface,
    grid_max: f64,
}

impl ProximityModel {
    /// Wrap a fitted proximity surface and its grid maximum.
    pub fn new(surface: SplineSurface, grid_max: f64) -> Self {
        ProximityModel { surface, grid_max }
    }

    /// The fitted proximity surface.
    #[inline]
    pub fn surface(&self) -> &SplineSurface {
        &self.surface
    }

    /// Maximum proximity over the real grid knots.
    #[inline]
    pub fn grid_max(&self) -> f64 {
        self.grid_max
    }

    fn validate(&self) -> Result<(), GridError> {
        self.surface.validate()?;
        if !self.grid_max.is_finite() || self.grid_max < 0.0 {
            return Err(GridError::MalformedPack(format!(
                "proximity grid maximum {} is not a finite non-negative value",
                self.grid_max
            )));
        }
        Ok(())
    }
}

/// The complete interpolation model bundle.
///
/// Built once by [`build_model_pack`](crate::builder::build_model_pack),
/// persisted with [`save`](ModelPack::save), and loaded read-only at query
/// time. Queries never mutate the pack, so shared references may be used
/// from any number of threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPack {
    /// `surfaces[metallicity][layer][quantity]`
    surfaces: Vec<Vec<Vec<SurfaceModel>>>,
    /// One proximity model per metallicity
    proximity: Vec<ProximityModel>,
    teff_range: Vec<f64>,
    logg_range: Vec<f64>,
    mh_range: Vec<f64>,
    nlayers: usize,
}

impl ModelPack {
    /// Assemble and validate a pack.
    pub(crate) fn new(
        surfaces: Vec<Vec<Vec<SurfaceModel>>>,
        proximity: Vec<ProximityModel>,
        teff_range: Vec<f64>,
        logg_range: Vec<f64>,
        mh_range: Vec<f64>,
        nlayers: usize,
    ) -> Result<Self, GridError> {
        let pack = ModelPack {
            surfaces,
            proximity,
            teff_range,
            logg_range,
            mh_range,
            nlayers,
        };
        pack.validate()?;
        Ok(pack)
    }

    /// Sorted effective temperature axis (K).
    #[inline]
    pub fn teff_range(&self) -> &[f64] {
        &self.teff_range
    }

    /// Sorted surface gravity axis (dex).
    #[inline]
    pub fn logg_range(&self) -> &[f64] {
        &self.logg_range
    }

    /// Sorted metallicity axis (dex).
    #[inline]
    pub fn mh_range(&self) -> &[f64] {
        &self.mh_range
    }

    /// Depth layers per synthesized atmosphere.
    #[inline]
    pub fn nlayers(&self) -> usize {
        self.nlayers
    }

    /// Surface model for one (metallicity index, layer, quantity index).
    #[inline]
    pub fn surface(&self, mh_idx: usize, layer: usize, quantity: usize) -> &SurfaceModel {
        &self.surfaces[mh_idx][layer][quantity]
    }

    /// Per-metallicity proximity models, in `mh_range` order.
    #[inline]
    pub fn proximity(&self) -> &[ProximityModel] {
        &self.proximity
    }

    /// Serialise the pack to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), GridError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        info!(path = %path.display(), "saved model pack");
        Ok(())
    }

    /// Load and validate a pack previously written with [`save`].
    ///
    /// [`save`]: ModelPack::save
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let pack: ModelPack = serde_json::from_reader(BufReader::new(file))?;
        pack.validate()?;
        info!(
            path = %path.display(),
            metallicities = pack.mh_range.len(),
            layers = pack.nlayers,
            "loaded model pack"
        );
        Ok(pack)
    }

    /// Internal-consistency checks applied on assembly and on load.
    fn validate(&self) -> Result<(), GridError> {
        if self.nlayers == 0 {
            return Err(GridError::MalformedPack("nlayers is zero".into()));
        }
        for (name, axis) in [
            ("teff_range", &self.teff_range),
            ("logg_range", &self.logg_range),
            ("MH_range", &self.mh_range),
        ] {
            if axis.is_empty() {
                return Err(GridError::MalformedPack(format!("{} is empty", name)));
            }
            for i in 1..axis.len() {
                if axis[i] <= axis[i - 1] {
                    return Err(GridError::MalformedPack(format!(
                        "{} is not strictly increasing at index {}",
                        name, i
                    )));
                }
            }
        }
        if self.surfaces.len() != self.mh_range.len() {
            return Err(GridError::MalformedPack(format!(
                "{} surface slices for {} metallicities",
                self.surfaces.len(),
                self.mh_range.len()
            )));
        }
        if self.proximity.len() != self.mh_range.len() {
            return Err(GridError::MalformedPack(format!(
                "{} proximity models for {} metallicities",
                self.proximity.len(),
                self.mh_range.len()
            )));
        }
        for slice in &self.surfaces {
            if slice.len() != self.nlayers {
                return Err(GridError::MalformedPack(format!(
                    "surface slice has {} layers, expected {}",
                    slice.len(),
                    self.nlayers
                )));
            }
            for layer in slice {
                if layer.len() != Quantity::COUNT {
                    return Err(GridError::MalformedPack(format!(
                        "layer has {} quantity models, expected {}",
                        layer.len(),
                        Quantity::COUNT
                    )));
                }
                for model in layer {
                    model.validate()?;
                }
            }
        }
        for model in &self.proximity {
            model.validate()?;
        }
        Ok(())
    }
}
