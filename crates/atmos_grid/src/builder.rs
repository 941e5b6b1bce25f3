//! Surface model construction from a parsed reference grid.
//!
//! Two passes over the grid: a scan for the global per-quantity value
//! bounds (the stage-2 extrapolation clamp), then one independent build
//! per metallicity slice fitting a surface model for every (layer,
//! quantity) pair plus the slice's proximity model. Slices share no
//! mutable state, so they fan out over the rayon pool; assembly order is
//! deterministic either way.

use std::collections::HashSet;

use atmos_core::surfaces::{SplineSurface, SurfaceModel};
use atmos_core::types::Quantity;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::GridError;
use crate::gapfill::{grid_mean, GapFiller, ValueBounds, ValueGrid};
use crate::pack::{ModelPack, ProximityModel};
use crate::reader::{AtmosphereGrid, MetallicitySlice};

/// Surface and proximity models for one metallicity slice.
struct SliceModels {
    /// `surfaces[layer][quantity]`
    surfaces: Vec<Vec<SurfaceModel>>,
    proximity: ProximityModel,
}

/// Build the queryable model pack from a parsed reference grid.
///
/// Fits one surface per (metallicity, layer, quantity) over the
/// gap-filled value grids and one proximity surface per metallicity.
/// Slow (nested numerical fits) but done once; the resulting pack is
/// persisted and queried read-only.
///
/// # Returns
///
/// * `Err(GridError::IncompleteFill)` - Gap filling failed its invariant
/// * `Err(GridError::EmptyGrid)` - The grid has no slices or no layers
pub fn build_model_pack(grid: &AtmosphereGrid) -> Result<ModelPack, GridError> {
    if grid.slices().is_empty() {
        return Err(GridError::EmptyGrid("no metallicity slices".into()));
    }
    if grid.nlayers() == 0 {
        return Err(GridError::EmptyGrid("atmospheres have no layers".into()));
    }

    info!("searching for minimum/maximum values in each atmosphere layer");
    let bounds = scan_value_bounds(grid);

    info!(
        slices = grid.slices().len(),
        layers = grid.nlayers(),
        "building interpolation models"
    );
    let slices: Vec<SliceModels> = grid
        .slices()
        .par_iter()
        .map(|slice| build_slice(slice, grid, &bounds))
        .collect::<Result<Vec<_>, GridError>>()?;

    let mut surfaces = Vec::with_capacity(slices.len());
    let mut proximity = Vec::with_capacity(slices.len());
    for slice in slices {
        surfaces.push(slice.surfaces);
        proximity.push(slice.proximity);
    }

    ModelPack::new(
        surfaces,
        proximity,
        grid.teff_range().to_vec(),
        grid.logg_range().to_vec(),
        grid.mh_range().to_vec(),
        grid.nlayers(),
    )
}

/// Global per-quantity min/max over every layer of every real atmosphere.
fn scan_value_bounds(grid: &AtmosphereGrid) -> [ValueBounds; Quantity::COUNT] {
    let mut bounds = [ValueBounds {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    }; Quantity::COUNT];
    for slice in grid.slices() {
        for atmosphere in slice.atmospheres() {
            for layer in atmosphere.layers() {
                for quantity in Quantity::ALL {
                    let v = layer.get(quantity);
                    let b = &mut bounds[quantity.index()];
                    b.min = b.min.min(v);
                    b.max = b.max.max(v);
                }
            }
        }
    }
    bounds
}

/// Build every surface model of one metallicity slice.
fn build_slice(
    slice: &MetallicitySlice,
    grid: &AtmosphereGrid,
    bounds: &[ValueBounds; Quantity::COUNT],
) -> Result<SliceModels, GridError> {
    let teff_range = grid.teff_range();
    let logg_range = grid.logg_range();
    let nlayers = grid.nlayers();

    let first_atmosphere = slice
        .atmospheres()
        .first()
        .ok_or_else(|| GridError::EmptyGrid("metallicity slice has no atmospheres".into()))?;

    // Grid coordinates of each atmosphere; identical for every layer and
    // quantity of the slice since whole atmospheres are read or rejected
    // together.
    let positions = slice
        .atmospheres()
        .iter()
        .map(|atmosphere| {
            Ok((
                axis_index(teff_range, atmosphere.teff())?,
                axis_index(logg_range, atmosphere.logg())?,
            ))
        })
        .collect::<Result<Vec<(usize, usize)>, GridError>>()?;

    let mut warned: HashSet<String> = HashSet::new();
    let mut default_fill: Option<f64> = None;
    let mut layer_models: Vec<Vec<SurfaceModel>> = Vec::with_capacity(nlayers);
    let mut proximity_grid: Option<Vec<Vec<f64>>> = None;

    for layer in 0..nlayers {
        debug!(
            metallicity = slice.metallicity(),
            layer, "fitting surface models"
        );
        let mut models = Vec::with_capacity(Quantity::COUNT);
        for quantity in Quantity::ALL {
            let mut values: ValueGrid =
                vec![vec![f64::NAN; logg_range.len()]; teff_range.len()];
            for (atmosphere, &(ti, gj)) in slice.atmospheres().iter().zip(&positions) {
                values[ti][gj] = atmosphere.layers()[layer].get(quantity);
            }

            let filler = GapFiller::new(
                teff_range,
                logg_range,
                slice.metallicity(),
                bounds[quantity.index()],
            );
            let outcome = filler.fill(&mut values, default_fill, &mut warned)?;
            if layer == 0 && quantity.index() == 0 {
                proximity_grid = Some(outcome.proximity);
            }
            default_fill = Some(grid_mean(&values));

            let model = if quantity == Quantity::MicroturbulentVelocity {
                // Constant for all layers and atmospheres of the slice.
                SurfaceModel::constant(
                    first_atmosphere.layers()[layer].microturbulent_velocity(),
                )
            } else {
                SurfaceModel::Spline(SplineSurface::new(teff_range, logg_range, values)?)
            };
            models.push(model);
        }
        layer_models.push(models);
    }

    let proximity_values = proximity_grid
        .ok_or_else(|| GridError::EmptyGrid("no proximity grid was derived".into()))?;
    let grid_max = proximity_values
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, &v| acc.max(v));
    let proximity = ProximityModel::new(
        SplineSurface::new(teff_range, logg_range, proximity_values)?,
        grid_max,
    );

    Ok(SliceModels {
        surfaces: layer_models,
        proximity,
    })
}

/// Exact position of a grid value on its axis.
fn axis_index(axis: &[f64], value: f64) -> Result<usize, GridError> {
    axis.iter().position(|&v| v == value).ok_or_else(|| {
        GridError::MalformedPack(format!("value {} missing from its grid axis", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use atmos_core::surfaces::Surface;
    use atmos_core::types::{AtmosphereModel, LayerValues};

    /// Layer stack with values linear in (teff, logg); microturbulence
    /// fixed per metallicity.
    fn layers(nlayers: usize, teff: f64, logg: f64, vmicro: f64) -> Vec<LayerValues> {
        (0..nlayers)
            .map(|l| {
                let depth = (l + 1) as f64;
                LayerValues::new([
                    1e-3 * depth,
                    0.8 * teff + 15.0 * depth,
                    50.0 * logg + depth,
                    1e10 + teff,
                    1e-4 * depth,
                    1e-2 * logg,
                    vmicro,
                ])
            })
            .collect()
    }

    fn full_grid() -> AtmosphereGrid {
        let mut models = Vec::new();
        for &mh in &[-1.0, 0.0] {
            for &teff in &[5000.0, 5500.0, 6000.0] {
                for &logg in &[4.0, 4.5] {
                    models.push(AtmosphereModel::new(
                        teff,
                        logg,
                        mh,
                        layers(3, teff, logg, 2.0 + mh),
                    ));
                }
            }
        }
        AtmosphereGrid::from_models(models, 3).unwrap()
    }

    // ========================================
    // Build Tests
    // ========================================

    #[test]
    fn test_build_full_grid() {
        let pack = build_model_pack(&full_grid()).unwrap();
        assert_eq!(pack.mh_range(), &[-1.0, 0.0]);
        assert_eq!(pack.teff_range(), &[5000.0, 5500.0, 6000.0]);
        assert_eq!(pack.logg_range(), &[4.0, 4.5]);
        assert_eq!(pack.nlayers(), 3);
    }

    #[test]
    fn test_surfaces_reproduce_real_values() {
        let grid = full_grid();
        let pack = build_model_pack(&grid).unwrap();
        // Quantity surfaces pass through the real grid knots.
        let atmosphere = &grid.slices()[1].atmospheres()[0];
        for (layer_idx, layer) in atmosphere.layers().iter().enumerate() {
            for quantity in Quantity::ALL {
                let surface = pack.surface(1, layer_idx, quantity.index());
                let fitted = surface
                    .evaluate(atmosphere.teff(), atmosphere.logg())
                    .unwrap();
                let expected = layer.get(quantity);
                assert!(
                    (fitted - expected).abs() <= 1e-8 * expected.abs().max(1.0),
                    "layer {} {}: {} vs {}",
                    layer_idx,
                    quantity,
                    fitted,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_microturbulence_is_constant_model() {
        let pack = build_model_pack(&full_grid()).unwrap();
        let surface = pack.surface(0, 0, Quantity::MicroturbulentVelocity.index());
        match surface {
            SurfaceModel::Constant(c) => assert_eq!(c.value(), 1.0),
            other => panic!("expected a constant model, got {:?}", other),
        }
        // Every other quantity is a spline.
        assert!(matches!(
            pack.surface(0, 0, Quantity::Temperature.index()),
            SurfaceModel::Spline(_)
        ));
    }

    #[test]
    fn test_proximity_zero_on_full_grid() {
        let pack = build_model_pack(&full_grid()).unwrap();
        for model in pack.proximity() {
            assert_eq!(model.grid_max(), 0.0);
        }
    }

    #[test]
    fn test_proximity_marks_missing_cells() {
        // Drop one atmosphere from the solar slice; its cell becomes a
        // stage-1 interpolation and the proximity surface records it.
        let mut models = Vec::new();
        for &teff in &[5000.0, 5500.0, 6000.0] {
            for &logg in &[4.0, 4.5] {
                if teff == 5500.0 && logg == 4.5 {
                    continue;
                }
                models.push(AtmosphereModel::new(teff, logg, 0.0, layers(3, teff, logg, 2.0)));
            }
        }
        let grid = AtmosphereGrid::from_models(models, 3).unwrap();
        let pack = build_model_pack(&grid).unwrap();
        let model = &pack.proximity()[0];
        assert_eq!(model.grid_max(), 1.0);
        let at_missing = model.surface().evaluate(5500.0, 4.5).unwrap();
        assert!((at_missing - 1.0).abs() < 1e-8);
        let at_real = model.surface().evaluate(5000.0, 4.0).unwrap();
        assert!(at_real.abs() < 1e-8);
    }

    #[test]
    fn test_scan_value_bounds() {
        let grid = full_grid();
        let bounds = scan_value_bounds(&grid);
        let temp = bounds[Quantity::Temperature.index()];
        // 0.8*5000 + 15 = 4015 up to 0.8*6000 + 45 = 4845.
        assert_eq!(temp.min, 4015.0);
        assert_eq!(temp.max, 4845.0);
    }
}
