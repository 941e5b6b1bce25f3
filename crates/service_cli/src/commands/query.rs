//! `atmosgrid query` - interpolate an atmosphere from a built pack.

use std::path::Path;

use atmos_grid::{write_atmosphere, write_atmosphere_to, ModelPack};

use crate::error::{CliError, Result};

pub fn run(
    pack_path: &Path,
    teff: f64,
    logg: f64,
    mh: f64,
    output: Option<&Path>,
) -> Result<()> {
    let pack = ModelPack::load(pack_path)?;

    if !pack.valid_atmosphere_target(teff, logg, mh) {
        return Err(CliError::InvalidTarget(format!(
            "(teff {}, logg {}, MH {}) is outside the grid: teff [{}, {}], logg [{}, {}], MH [{}, {}]",
            teff,
            logg,
            mh,
            pack.teff_range()[0],
            pack.teff_range()[pack.teff_range().len() - 1],
            pack.logg_range()[0],
            pack.logg_range()[pack.logg_range().len() - 1],
            pack.mh_range()[0],
            pack.mh_range()[pack.mh_range().len() - 1],
        )));
    }

    let layers = pack.interpolate_atmosphere_layers(teff, logg, mh)?;
    let proximity = pack.estimate_proximity_to_real_atmospheres(teff, logg, mh);

    let written = match output {
        Some(path) => {
            write_atmosphere_to(path, teff, logg, mh, &layers)?;
            path.to_path_buf()
        }
        None => write_atmosphere(teff, logg, mh, &layers)?,
    };

    println!(
        "interpolated atmosphere: teff {:.1} K, logg {:.2}, [M/H] {:.2}",
        teff, logg, mh
    );
    println!("layers: {}", layers.len());
    if let Some(surface_layer) = layers.first() {
        println!(
            "surface layer: T = {:.1} K, vmicro = {:.2} m/s",
            surface_layer.temperature(),
            surface_layer.microturbulent_velocity()
        );
    }
    println!("proximity to real atmospheres: {:.2}", proximity);
    println!("written to: {}", written.display());
    Ok(())
}
