//! Plane-parallel atmosphere output.
//!
//! Serialises an interpolated layer stack to the fixed text format
//! consumed by external radiative-transfer codes: a `teff logg MH nlayers`
//! header followed by one line per layer with the seven quantities, the
//! temperature in plain decimal and everything else in C-style scientific
//! notation.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use atmos_core::types::{LayerValues, Quantity};

use crate::error::GridError;

/// Write an interpolated atmosphere to a persisted temporary file and
/// return its path.
///
/// The file is created in the system temp directory and NOT removed on
/// drop; the caller (typically an external synthesis run) owns it.
pub fn write_atmosphere(
    teff: f64,
    logg: f64,
    metallicity: f64,
    layers: &[LayerValues],
) -> Result<PathBuf, GridError> {
    let mut file = tempfile::Builder::new()
        .prefix("atmosphere_")
        .suffix(".atm")
        .tempfile()?;
    write_layers(&mut file, teff, logg, metallicity, layers)?;
    file.flush()?;
    let path = file
        .into_temp_path()
        .keep()
        .map_err(|persist| persist.error)?;
    Ok(path)
}

/// Write an interpolated atmosphere to a caller-chosen path.
pub fn write_atmosphere_to<P: AsRef<Path>>(
    path: P,
    teff: f64,
    logg: f64,
    metallicity: f64,
    layers: &[LayerValues],
) -> Result<(), GridError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_layers(&mut out, teff, logg, metallicity, layers)?;
    out.flush()?;
    Ok(())
}

fn write_layers<W: Write>(
    out: &mut W,
    teff: f64,
    logg: f64,
    metallicity: f64,
    layers: &[LayerValues],
) -> std::io::Result<()> {
    writeln!(
        out,
        "{:.1}  {:.5}  {:.2}  {}",
        teff,
        logg,
        metallicity,
        layers.len()
    )?;
    for layer in layers {
        let v = layer.as_array();
        writeln!(
            out,
            "{}   {:.1} {} {} {} {} {}",
            sci(v[0], 8),
            v[1],
            sci(v[2], 3),
            sci(v[3], 3),
            sci(v[4], 3),
            sci(v[5], 3),
            sci(v[6], 3)
        )?;
    }
    Ok(())
}

/// Parse a file previously produced by [`write_atmosphere`].
///
/// The round-trip partner of the writer; recovers the header parameters
/// and every layer value at the written precision.
pub fn read_atmosphere<P: AsRef<Path>>(
    path: P,
) -> Result<atmos_core::types::AtmosphereModel, GridError> {
    let path = path.as_ref();
    let parse_error = |line: usize, message: String| GridError::Parse {
        file: path.display().to_string(),
        line,
        message,
    };

    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| parse_error(1, "missing header line".into()))?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(parse_error(
            1,
            format!("expected 4 header fields, found {}", fields.len()),
        ));
    }
    let mut header_values = [0.0_f64; 3];
    for (value, field) in header_values.iter_mut().zip(fields.iter()) {
        *value = field
            .parse::<f64>()
            .map_err(|_| parse_error(1, format!("unreadable header value '{}'", field)))?;
    }
    let nlayers: usize = fields[3]
        .parse()
        .map_err(|_| parse_error(1, format!("unreadable layer count '{}'", fields[3])))?;

    let mut layers = Vec::with_capacity(nlayers);
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != Quantity::COUNT {
            return Err(parse_error(
                line_no,
                format!(
                    "expected {} layer values, found {}",
                    Quantity::COUNT,
                    tokens.len()
                ),
            ));
        }
        let mut values = [0.0; Quantity::COUNT];
        for (value, token) in values.iter_mut().zip(tokens.iter()) {
            *value = token
                .parse::<f64>()
                .map_err(|_| parse_error(line_no, format!("unreadable layer value '{}'", token)))?;
        }
        layers.push(LayerValues::new(values));
    }
    if layers.len() != nlayers {
        return Err(parse_error(
            0,
            format!("header promised {} layers, found {}", nlayers, layers.len()),
        ));
    }

    Ok(atmos_core::types::AtmosphereModel::new(
        header_values[0],
        header_values[1],
        header_values[2],
        layers,
    ))
}

/// C-style `%.*e` formatting: one mantissa digit, a signed two-digit
/// exponent (`1.235e+02`), which Rust's `{:e}` does not produce.
fn sci(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return format!("{:.*}e+00", precision, 0.0);
    }
    let mut exponent = value.abs().log10().floor() as i32;
    let mut mantissa = value / 10f64.powi(exponent);
    // Rounding at the requested precision can carry the mantissa to 10.
    let scale = 10f64.powi(precision as i32);
    mantissa = (mantissa * scale).round() / scale;
    if mantissa.abs() >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    format!(
        "{:.*}e{}{:02}",
        precision,
        mantissa,
        if exponent < 0 { '-' } else { '+' },
        exponent.abs()
    )
}
