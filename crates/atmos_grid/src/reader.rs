//! Kurucz/Castelli atmosphere model reading.
//!
//! Source files are plain text, one or more atmospheres per file. Each
//! atmosphere opens with a `TEFF <teff> GRAVITY <logg> ...` header, a
//! `READ ...` line introduces the layer block, and a `PRADK ...` line
//! closes it. Metallicity is not stored in the file; it follows from the
//! file name convention (`a` + sign letter + two digits, e.g. `am50k2.dat`
//! is [M/H] = -5.0).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use atmos_core::types::{AtmosphereModel, LayerValues, Quantity};
use tracing::{debug, info, warn};

use crate::error::GridError;

/// Acceptance configuration for the grid reader.
///
/// Atmospheres outside the windows are dropped on purpose: the downstream
/// spectral synthesis is only trusted inside this regime, so the grid is
/// restricted to it at read time.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Exact number of depth layers an atmosphere must have to be accepted
    pub required_layers: usize,
    /// Inclusive effective temperature window (K)
    pub teff_window: (f64, f64),
    /// Inclusive surface gravity window (dex)
    pub logg_window: (f64, f64),
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            required_layers: 56,
            teff_window: (2500.0, 9000.0),
            logg_window: (0.0, 5.0),
        }
    }
}

/// All accepted atmospheres sharing one metallicity.
#[derive(Debug, Clone)]
pub struct MetallicitySlice {
    metallicity: f64,
    atmospheres: Vec<AtmosphereModel>,
}

impl MetallicitySlice {
    /// Metallicity [M/H] of this slice.
    #[inline]
    pub fn metallicity(&self) -> f64 {
        self.metallicity
    }

    /// The accepted atmospheres of this slice.
    #[inline]
    pub fn atmospheres(&self) -> &[AtmosphereModel] {
        &self.atmospheres
    }
}

/// Parsed reference grid: metallicity slices plus the shared axes.
///
/// The (teff, logg) axes are the union of values observed across all
/// files, so every slice sees the same rectangular grid even though its
/// own occupancy may be sparse.
#[derive(Debug, Clone)]
pub struct AtmosphereGrid {
    slices: Vec<MetallicitySlice>,
    teff_range: Vec<f64>,
    logg_range: Vec<f64>,
    mh_range: Vec<f64>,
    nlayers: usize,
}

impl AtmosphereGrid {
    /// Assemble a grid from already-parsed atmospheres.
    ///
    /// Groups by metallicity and derives the axis unions. Every model must
    /// carry exactly `required_layers` layers; parameters are taken at
    /// face value (the file reader has already rounded them to the
    /// two-decimal header precision).
    ///
    /// # Returns
    ///
    /// * `Err(GridError::LayerCount)` - A model has the wrong layer count
    /// * `Err(GridError::EmptyGrid)` - No models were provided
    pub fn from_models(
        models: Vec<AtmosphereModel>,
        required_layers: usize,
    ) -> Result<Self, GridError> {
        if models.is_empty() {
            return Err(GridError::EmptyGrid("no atmosphere models".into()));
        }
        if required_layers == 0 {
            return Err(GridError::EmptyGrid("required_layers must be positive".into()));
        }

        let mut teff_range = Vec::with_capacity(models.len());
        let mut logg_range = Vec::with_capacity(models.len());
        for model in &models {
            if model.nlayers() != required_layers {
                return Err(GridError::LayerCount {
                    got: model.nlayers(),
                    expected: required_layers,
                });
            }
            if !(model.teff().is_finite()
                && model.logg().is_finite()
                && model.metallicity().is_finite())
            {
                return Err(GridError::MalformedPack(
                    "atmosphere parameters must be finite".into(),
                ));
            }
            teff_range.push(model.teff());
            logg_range.push(model.logg());
        }
        sort_dedup(&mut teff_range);
        sort_dedup(&mut logg_range);

        let mut models = models;
        models.sort_by(|a, b| a.metallicity().total_cmp(&b.metallicity()));
        let mut slices: Vec<MetallicitySlice> = Vec::new();
        for model in models {
            match slices.last_mut() {
                Some(slice) if slice.metallicity == model.metallicity() => {
                    slice.atmospheres.push(model);
                }
                _ => slices.push(MetallicitySlice {
                    metallicity: model.metallicity(),
                    atmospheres: vec![model],
                }),
            }
        }
        let mh_range = slices.iter().map(|s| s.metallicity).collect();

        Ok(AtmosphereGrid {
            slices,
            teff_range,
            logg_range,
            mh_range,
            nlayers: required_layers,
        })
    }

    /// Metallicity slices, ordered by increasing [M/H].
    #[inline]
    pub fn slices(&self) -> &[MetallicitySlice] {
        &self.slices
    }

    /// Sorted union of observed effective temperatures (K).
    #[inline]
    pub fn teff_range(&self) -> &[f64] {
        &self.teff_range
    }

    /// Sorted union of observed surface gravities (dex).
    #[inline]
    pub fn logg_range(&self) -> &[f64] {
        &self.logg_range
    }

    /// Sorted distinct metallicities (dex).
    #[inline]
    pub fn mh_range(&self) -> &[f64] {
        &self.mh_range
    }

    /// Depth layers per atmosphere.
    #[inline]
    pub fn nlayers(&self) -> usize {
        self.nlayers
    }
}

/// Read Kurucz/Castelli atmosphere model files into a reference grid.
///
/// Files should be ordered from lower to higher metallicity (the grid is
/// re-grouped by parsed metallicity either way). Atmospheres with a layer
/// count other than `config.required_layers`, or outside the teff/logg
/// acceptance windows, are silently dropped; files contributing nothing
/// are logged and skipped.
///
/// # Returns
///
/// * `Err(GridError::Parse)` - Malformed header or layer line (fatal for
///   the whole read; no partial grid is returned)
/// * `Err(GridError::EmptyGrid)` - Nothing was accepted from any file
pub fn read_kurucz_atmospheres<P: AsRef<Path>>(
    paths: &[P],
    config: &ReaderConfig,
) -> Result<AtmosphereGrid, GridError> {
    let mut models: Vec<AtmosphereModel> = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let metallicity = metallicity_from_filename(path)?;
        let accepted = parse_kurucz_file(path, metallicity, config)?;
        info!(
            file = %path.display(),
            metallicity,
            accepted = accepted.len(),
            "read atmosphere model file"
        );
        if accepted.is_empty() {
            warn!(
                file = %path.display(),
                "file contributed no accepted atmospheres; dropping its metallicity slice"
            );
        }
        models.extend(accepted);
    }
    if models.is_empty() {
        return Err(GridError::EmptyGrid(
            "no atmospheres accepted from any input file".into(),
        ));
    }
    AtmosphereGrid::from_models(models, config.required_layers)
}

/// Metallicity from the file name convention: character 1 is the sign
/// (`m` for negative), characters 2 and 3 the digits, read as `d.d` dex.
///
/// # Example
///
/// ```
/// use atmos_grid::reader::metallicity_from_filename;
/// use std::path::Path;
///
/// let mh = metallicity_from_filename(Path::new("input/am50k2.dat")).unwrap();
/// assert_eq!(mh, -5.0);
/// ```
pub fn metallicity_from_filename(path: &Path) -> Result<f64, GridError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| name_error(path, "file name is not valid UTF-8"))?;
    let chars: Vec<char> = name.chars().collect();
    if chars.len() < 4 {
        return Err(name_error(
            path,
            "file name too short for the metallicity convention (sign + two digits)",
        ));
    }
    let whole = chars[2]
        .to_digit(10)
        .ok_or_else(|| name_error(path, "expected a digit at position 2"))?;
    let tenth = chars[3]
        .to_digit(10)
        .ok_or_else(|| name_error(path, "expected a digit at position 3"))?;
    let mut metallicity = whole as f64 + tenth as f64 / 10.0;
    if chars[1] == 'm' {
        metallicity = -metallicity;
    }
    Ok(metallicity)
}

fn name_error(path: &Path, message: &str) -> GridError {
    GridError::Parse {
        file: path.display().to_string(),
        line: 0,
        message: message.into(),
    }
}

/// Parse one file, returning only the accepted atmospheres.
fn parse_kurucz_file(
    path: &Path,
    metallicity: f64,
    config: &ReaderConfig,
) -> Result<Vec<AtmosphereModel>, GridError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let parse_error = |line: usize, message: String| GridError::Parse {
        file: path.display().to_string(),
        line,
        message,
    };

    let mut teff: Option<f64> = None;
    let mut logg: Option<f64> = None;
    let mut in_layers = false;
    let mut current: Vec<LayerValues> = Vec::new();
    let mut accepted: Vec<AtmosphereModel> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.first() {
            Some(&"TEFF") => {
                let t = tokens
                    .get(1)
                    .and_then(|s| s.parse::<f64>().ok())
                    .ok_or_else(|| parse_error(line_no, "unreadable TEFF value".into()))?;
                let g = tokens
                    .get(3)
                    .and_then(|s| s.parse::<f64>().ok())
                    .ok_or_else(|| parse_error(line_no, "unreadable GRAVITY value".into()))?;
                teff = Some(round2(t));
                logg = Some(round2(g));
            }
            Some(&"READ") => {
                in_layers = true;
                current.clear();
            }
            Some(&"PRADK") if in_layers => {
                in_layers = false;
                let t = teff
                    .ok_or_else(|| parse_error(line_no, "PRADK before any TEFF header".into()))?;
                let g = logg
                    .ok_or_else(|| parse_error(line_no, "PRADK before any TEFF header".into()))?;
                let n = current.len();
                let (teff_lo, teff_hi) = config.teff_window;
                let (logg_lo, logg_hi) = config.logg_window;
                if n == config.required_layers
                    && t >= teff_lo
                    && t <= teff_hi
                    && g >= logg_lo
                    && g <= logg_hi
                {
                    accepted.push(AtmosphereModel::new(
                        t,
                        g,
                        metallicity,
                        std::mem::take(&mut current),
                    ));
                } else {
                    debug!(
                        teff = t,
                        logg = g,
                        layers = n,
                        "dropping atmosphere outside the acceptance window"
                    );
                    current.clear();
                }
            }
            Some(_) if in_layers => {
                if tokens.len() < Quantity::COUNT {
                    return Err(parse_error(
                        line_no,
                        format!(
                            "expected at least {} layer values, found {}",
                            Quantity::COUNT,
                            tokens.len()
                        ),
                    ));
                }
                let mut values = [0.0; Quantity::COUNT];
                for (v, token) in values.iter_mut().zip(tokens.iter()) {
                    *v = token.parse::<f64>().map_err(|_| {
                        parse_error(line_no, format!("unreadable layer value '{}'", token))
                    })?;
                }
                current.push(LayerValues::new(values));
            }
            _ => {}
        }
    }

    Ok(accepted)
}

/// Round to two decimals, matching the header precision the grid axes use.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn sort_dedup(values: &mut Vec<f64>) {
    values.sort_by(f64::total_cmp);
    values.dedup();
}
