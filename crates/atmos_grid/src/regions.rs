//! Wavelength region file I/O.
//!
//! Continuum and line regions are exchanged as tab-delimited text with a
//! `wave_base`/`wave_top` header, one segment per row. The wider pipeline
//! (continuum fitting, line masks) consumes these; here only the file
//! interface lives.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// One wavelength segment, `wave_base < wave_top`, both in nm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavelengthRegion {
    /// Lower wavelength bound (nm)
    pub wave_base: f64,
    /// Upper wavelength bound (nm)
    pub wave_top: f64,
}

impl WavelengthRegion {
    /// Segment width in nm.
    #[inline]
    pub fn width(&self) -> f64 {
        self.wave_top - self.wave_base
    }

    /// Whether a wavelength falls inside the segment (inclusive).
    #[inline]
    pub fn contains(&self, wavelength: f64) -> bool {
        wavelength >= self.wave_base && wavelength <= self.wave_top
    }
}

/// Read a tab-delimited region file.
///
/// # Returns
///
/// * `Err(GridError::Parse)` - A row with `wave_top <= wave_base`
/// * `Err(GridError::Csv)` - Malformed delimited input
pub fn read_regions<P: AsRef<Path>>(path: P) -> Result<Vec<WavelengthRegion>, GridError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;
    let mut regions = Vec::new();
    for (idx, record) in reader.deserialize().enumerate() {
        let region: WavelengthRegion = record?;
        if region.wave_top <= region.wave_base {
            return Err(GridError::Parse {
                file: path.display().to_string(),
                // Header occupies line 1.
                line: idx + 2,
                message: format!(
                    "wave_base {} is not below wave_top {}",
                    region.wave_base, region.wave_top
                ),
            });
        }
        regions.push(region);
    }
    Ok(regions)
}

/// Write a tab-delimited region file with a `wave_base`/`wave_top` header.
pub fn write_regions<P: AsRef<Path>>(
    path: P,
    regions: &[WavelengthRegion],
) -> Result<(), GridError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;
    for region in regions {
        writer.serialize(region)?;
    }
    writer.flush()?;
    Ok(())
}
