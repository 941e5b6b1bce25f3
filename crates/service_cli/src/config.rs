//! CLI configuration file handling.

use std::path::Path;

use atmos_grid::ReaderConfig;
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, Result};

/// Reader parameters from `atmosgrid.toml`.
///
/// Every field is optional in the file; absent fields keep the standard
/// Kurucz defaults. A missing file is not an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Required layer count per atmosphere
    pub required_layers: usize,
    /// Lower bound of the accepted teff window (K)
    pub teff_min: f64,
    /// Upper bound of the accepted teff window (K)
    pub teff_max: f64,
    /// Lower bound of the accepted logg window (dex)
    pub logg_min: f64,
    /// Upper bound of the accepted logg window (dex)
    pub logg_max: f64,
}

impl Default for CliConfig {
    fn default() -> Self {
        let reader = ReaderConfig::default();
        CliConfig {
            required_layers: reader.required_layers,
            teff_min: reader.teff_window.0,
            teff_max: reader.teff_window.1,
            logg_min: reader.logg_window.0,
            logg_max: reader.logg_window.1,
        }
    }
}

impl CliConfig {
    /// Load the configuration, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(CliConfig::default());
        }
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// The reader configuration these settings describe.
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            required_layers: self.required_layers,
            teff_window: (self.teff_min, self.teff_max),
            logg_window: (self.logg_min, self.logg_max),
        }
    }
}
