//! Query operations over a loaded model pack.
//!
//! The top-level entry points for downstream consumers: target
//! validation, full-atmosphere interpolation, and the proximity estimate.
//! All of them are read-only; a shared pack may be queried concurrently.

use atmos_core::surfaces::Surface;
use atmos_core::types::{LayerValues, Quantity};

use crate::error::{Axis, GridError};
use crate::pack::ModelPack;

impl ModelPack {
    /// Whether an interpolated atmosphere can be produced for the target.
    ///
    /// True iff every coordinate lies within its observed axis range,
    /// boundary-inclusive at both ends. A conservative no-extrapolation
    /// guard: the fitted surfaces extend no further than the grid, however
    /// the grid itself was gap-filled.
    ///
    /// Callers should check this before
    /// [`interpolate_atmosphere_layers`](ModelPack::interpolate_atmosphere_layers),
    /// which fails hard on out-of-range targets.
    pub fn valid_atmosphere_target(&self, teff: f64, logg: f64, metallicity: f64) -> bool {
        insertion_within(self.teff_range(), teff)
            && insertion_within(self.logg_range(), logg)
            && insertion_within(self.mh_range(), metallicity)
    }

    /// Synthesize the full layer stack for a `(teff, logg, MH)` target.
    ///
    /// For every quantity, each per-metallicity surface is evaluated at
    /// `(teff, logg)` across all layers, a spline is fitted over the
    /// (metallicity × layer index) matrix, and the target metallicity row
    /// is read off; the per-quantity vectors are then transposed into
    /// layer order.
    ///
    /// # Returns
    ///
    /// * `Ok(layers)` - One `LayerValues` per layer, surface first
    /// * `Err(GridError::OutOfRange)` - MH target outside the grid
    /// * `Err(GridError::Surface)` - teff/logg outside the fitted surfaces
    pub fn interpolate_atmosphere_layers(
        &self,
        teff: f64,
        logg: f64,
        metallicity: f64,
    ) -> Result<Vec<LayerValues>, GridError> {
        check_insertion(self.mh_range(), metallicity, Axis::Metallicity)?;

        let nmh = self.mh_range().len();
        let nlayers = self.nlayers();
        let layer_axis: Vec<f64> = (0..nlayers).map(|l| l as f64).collect();

        let mut per_quantity: Vec<Vec<f64>> = Vec::with_capacity(Quantity::COUNT);
        for quantity in Quantity::ALL {
            // One row per metallicity, one column per layer.
            let mut matrix: Vec<Vec<f64>> = Vec::with_capacity(nmh);
            for mh_idx in 0..nmh {
                let mut row = Vec::with_capacity(nlayers);
                for layer in 0..nlayers {
                    row.push(
                        self.surface(mh_idx, layer, quantity.index())
                            .evaluate(teff, logg)?,
                    );
                }
                matrix.push(row);
            }
            let across_metallicity =
                atmos_core::surfaces::SplineSurface::new(self.mh_range(), &layer_axis, matrix)?;
            let values = layer_axis
                .iter()
                .map(|&layer| across_metallicity.evaluate(metallicity, layer))
                .collect::<Result<Vec<f64>, _>>()?;
            per_quantity.push(values);
        }

        // Transpose quantity-major to layer-major.
        let layers = (0..nlayers)
            .map(|layer| {
                let mut values = [0.0; Quantity::COUNT];
                for (quantity, column) in per_quantity.iter().enumerate() {
                    values[quantity] = column[layer];
                }
                LayerValues::new(values)
            })
            .collect();
        Ok(layers)
    }

    /// Estimate how many derivation stages separate the target from a
    /// real reference atmosphere (0 = the target coincides with one).
    ///
    /// Never fails: out-of-grid coordinates are clamped to the nearest
    /// boundary, each per-metallicity estimate is clamped into
    /// `[0, grid_max]`, and the metallicity interpolation extends flat
    /// beyond the axis ends.
    pub fn estimate_proximity_to_real_atmospheres(
        &self,
        teff: f64,
        logg: f64,
        metallicity: f64,
    ) -> f64 {
        let per_mh: Vec<f64> = self
            .proximity()
            .iter()
            .map(|model| {
                let estimate = model.surface().evaluate_clamped(teff, logg);
                estimate.max(0.0).min(model.grid_max())
            })
            .collect();
        interp_clamped(self.mh_range(), &per_mh, metallicity).max(0.0)
    }
}

/// Insertion-index range test: the leftmost insertion point is 0 only for
/// targets at or below the axis minimum (exact equality passes), and past
/// the end only for targets above the maximum.
fn insertion_within(axis: &[f64], target: f64) -> bool {
    let idx = axis.partition_point(|&v| v < target);
    if idx == 0 && target != axis[0] {
        return false;
    }
    idx < axis.len()
}

fn check_insertion(axis: &[f64], target: f64, which: Axis) -> Result<(), GridError> {
    if insertion_within(axis, target) {
        Ok(())
    } else {
        Err(GridError::OutOfRange {
            axis: which,
            value: target,
            min: axis[0],
            max: axis[axis.len() - 1],
        })
    }
}

/// 1D linear interpolation with flat continuation beyond the knot ends.
fn interp_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len();
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    let i = xs.partition_point(|&v| v <= x) - 1;
    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
    ys[i] + (ys[i + 1] - ys[i]) * t
}
