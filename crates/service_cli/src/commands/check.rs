//! `atmosgrid check` - load a pack and report its coverage.

use std::path::Path;

use atmos_core::types::Quantity;
use atmos_grid::ModelPack;

use crate::error::Result;

pub fn run(pack_path: &Path) -> Result<()> {
    let pack = ModelPack::load(pack_path)?;

    println!("model pack: {}", pack_path.display());
    println!(
        "  teff:  {} points in [{}, {}] K",
        pack.teff_range().len(),
        pack.teff_range()[0],
        pack.teff_range()[pack.teff_range().len() - 1]
    );
    println!(
        "  logg:  {} points in [{}, {}]",
        pack.logg_range().len(),
        pack.logg_range()[0],
        pack.logg_range()[pack.logg_range().len() - 1]
    );
    println!(
        "  MH:    {} slices in [{}, {}]",
        pack.mh_range().len(),
        pack.mh_range()[0],
        pack.mh_range()[pack.mh_range().len() - 1]
    );
    println!("  layers: {}", pack.nlayers());
    let quantities: Vec<&str> = Quantity::ALL.iter().map(|q| q.as_str()).collect();
    println!("  quantities: {}", quantities.join(", "));

    for (mh, proximity) in pack.mh_range().iter().zip(pack.proximity()) {
        if proximity.grid_max() == 0.0 {
            println!("  [M/H] {:+.2}: fully covered by real atmospheres", mh);
        } else {
            println!(
                "  [M/H] {:+.2}: gap-filled cells up to derivation distance {}",
                mh,
                proximity.grid_max()
            );
        }
    }
    Ok(())
}
