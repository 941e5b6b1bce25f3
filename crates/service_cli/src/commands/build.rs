//! `atmosgrid build` - read model files and build a pack.

use std::path::{Path, PathBuf};

use atmos_grid::{build_model_pack, metallicity_from_filename, read_kurucz_atmospheres};
use tracing::info;

use crate::config::CliConfig;
use crate::error::{CliError, Result};

pub fn run(atmospheres: &[PathBuf], output: &Path, config: &CliConfig) -> Result<()> {
    let files = collect_model_files(atmospheres)?;
    info!(files = files.len(), "reading atmosphere model files");

    let grid = read_kurucz_atmospheres(&files, &config.reader_config())?;
    info!(
        metallicities = grid.mh_range().len(),
        teff_points = grid.teff_range().len(),
        logg_points = grid.logg_range().len(),
        "parsed reference grid"
    );

    let pack = build_model_pack(&grid)?;
    pack.save(output)?;

    println!(
        "built model pack: {} metallicities x {} layers over {} teff x {} logg -> {}",
        pack.mh_range().len(),
        pack.nlayers(),
        pack.teff_range().len(),
        pack.logg_range().len(),
        output.display()
    );
    Ok(())
}

/// Expand directory arguments into their `.dat` files and order everything
/// from lower to higher metallicity.
fn collect_model_files(atmospheres: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in atmospheres {
        if path.is_dir() {
            for entry in std::fs::read_dir(path)? {
                let entry_path = entry?.path();
                if entry_path.extension().and_then(|e| e.to_str()) == Some("dat") {
                    files.push(entry_path);
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    if files.is_empty() {
        return Err(CliError::InvalidTarget(
            "no atmosphere model files found".into(),
        ));
    }

    let mut keyed = files
        .into_iter()
        .map(|file| {
            let metallicity = metallicity_from_filename(&file)?;
            Ok((metallicity, file))
        })
        .collect::<Result<Vec<(f64, PathBuf)>>>()?;
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, file)| file).collect())
}
