//! Grid pipeline error types.

use atmos_core::surfaces::SurfaceError;
use thiserror::Error;

/// Grid axis identifiers, used in out-of-range reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Effective temperature (K)
    Teff,
    /// Surface gravity (dex)
    Logg,
    /// Metallicity [M/H] (dex)
    Metallicity,
}

impl Axis {
    /// Short axis label.
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Teff => "teff",
            Axis::Logg => "logg",
            Axis::Metallicity => "MH",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from reading, building, persisting, and querying atmosphere grids.
///
/// # Variants
///
/// - `Parse`: malformed input line (fatal, aborts the read)
/// - `OutOfRange`: query target outside the grid axis bounds
/// - `IncompleteFill`: gap filling left missing cells (internal-consistency
///   defect, never expected on a non-empty grid)
/// - `LayerCount`: atmosphere with the wrong number of layers handed to
///   the grid assembler
/// - `EmptyGrid`: no usable atmospheres
/// - `Surface`: wrapped surface construction/evaluation error
/// - `MalformedPack`: persisted pack with inconsistent dimensions
/// - `Io` / `Serde` / `Csv`: wrapped I/O and (de)serialisation failures
#[derive(Error, Debug)]
pub enum GridError {
    /// Malformed input line.
    #[error("Parse error in {file} at line {line}: {message}")]
    Parse {
        /// Source file
        file: String,
        /// 1-based line number (0 when the whole file name is at fault)
        line: usize,
        /// What was wrong
        message: String,
    },

    /// Query target outside the grid axis bounds.
    #[error("Out of range: {axis} = {value} not in [{min}, {max}]")]
    OutOfRange {
        /// Which axis was violated
        axis: Axis,
        /// The offending target value
        value: f64,
        /// Axis minimum
        min: f64,
        /// Axis maximum
        max: f64,
    },

    /// Gap filling left missing cells.
    #[error("Gap filling left {remaining} missing cells for [M/H] = {metallicity}")]
    IncompleteFill {
        /// Metallicity slice where the invariant broke
        metallicity: f64,
        /// Number of cells still missing
        remaining: usize,
    },

    /// Atmosphere with an unexpected layer count.
    #[error("Atmosphere has {got} layers, expected {expected}")]
    LayerCount {
        /// Number of layers found
        got: usize,
        /// Number of layers required
        expected: usize,
    },

    /// No usable atmospheres.
    #[error("Empty atmosphere grid: {0}")]
    EmptyGrid(String),

    /// Surface construction or evaluation error.
    #[error("Surface model error: {0}")]
    Surface(#[from] SurfaceError),

    /// Persisted pack with inconsistent dimensions.
    #[error("Malformed model pack: {0}")]
    MalformedPack(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialisation failure.
    #[error("Serialisation error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Region file (de)serialisation failure.
    #[error("Region file error: {0}")]
    Csv(#[from] csv::Error),
}
