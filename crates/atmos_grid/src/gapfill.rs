//! Three-stage gap filling for sparse quantity grids.
//!
//! One gap filler run covers a single (metallicity, layer, quantity)
//! grid of shape `[n_teff][n_logg]` with `NaN` at the cells for which no
//! reference atmosphere exists. Cells are derived in three stages of
//! decreasing quality:
//!
//! 1. **Interpolation** — 1D linear interpolation along each axis inside
//!    the span of known values, both-axis results averaged. Sweeps run in
//!    row-major order (teff outer, logg inner) filling in place, so cells
//!    filled earlier in a sweep are visible to later ones; sweeps repeat
//!    until one fixes nothing. Never extrapolates.
//! 2. **Extrapolation** — linear extrapolation from the two nearest known
//!    values on each axis, only for cells outside the known span, each
//!    axis result clamped to the global per-quantity bounds observed over
//!    the real atmospheres. An "averaged" pass requires both axes and
//!    combines them weighted by closeness; a "simple" pass (accepting a
//!    single axis) runs only when an averaged pass fixes nothing. Iterated
//!    to a fixed point over start-of-pass snapshots.
//! 3. **Copy/default** — copy the single known row/column partner (or the
//!    weighted average of both), falling back to a caller-provided default
//!    value; each such cell is warned about once.
//!
//! After stage 3 no cell may remain missing; a violation is the fatal
//! [`GridError::IncompleteFill`].
//!
//! Alongside the values, the filler tracks per-cell [`Provenance`] and a
//! numeric proximity grid (0 for real cells, 1 for interpolated, one more
//! per extrapolation pass, copied cells one beyond the last pass) used to
//! build the per-metallicity proximity surface.

use std::collections::HashSet;

use tracing::warn;

use crate::error::GridError;

/// Value grid for one (metallicity, layer, quantity), indexed
/// `[teff][logg]`; `NaN` marks a missing cell.
pub type ValueGrid = Vec<Vec<f64>>;

/// How a grid cell obtained its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Read from a reference atmosphere
    Real,
    /// Stage-1 linear interpolation
    Interpolated,
    /// Stage-2 extrapolation averaged over both axes
    AveragedExtrapolated,
    /// Stage-2 extrapolation from a single axis
    SimpleExtrapolated,
    /// Stage-3 copy of a lone neighbour or default fill
    Copied,
}

/// Global clamp bounds for one physical quantity, observed across every
/// real atmosphere of the whole grid (all metallicities).
#[derive(Debug, Clone, Copy)]
pub struct ValueBounds {
    /// Smallest observed value
    pub min: f64,
    /// Largest observed value
    pub max: f64,
}

impl ValueBounds {
    /// Clamp an extrapolated value into the observed range.
    #[inline]
    pub fn clamp(&self, v: f64) -> f64 {
        v.max(self.min).min(self.max)
    }
}

/// Result of one gap filler run.
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// Per-cell provenance tags
    pub provenance: Vec<Vec<Provenance>>,
    /// Per-cell derivation distance (0 = real)
    pub proximity: Vec<Vec<f64>>,
    /// Cells fixed by stage 1
    pub interpolated: usize,
    /// Cells fixed by stage 2 (both sub-stages)
    pub extrapolated: usize,
    /// Cells fixed by stage 3
    pub copied: usize,
}

/// Gap filler for one (metallicity, layer, quantity) grid.
pub struct GapFiller<'a> {
    teff_range: &'a [f64],
    logg_range: &'a [f64],
    metallicity: f64,
    bounds: ValueBounds,
}

impl<'a> GapFiller<'a> {
    /// Create a filler for grids over the given axes.
    pub fn new(
        teff_range: &'a [f64],
        logg_range: &'a [f64],
        metallicity: f64,
        bounds: ValueBounds,
    ) -> Self {
        GapFiller {
            teff_range,
            logg_range,
            metallicity,
            bounds,
        }
    }

    /// Fill every missing cell of `grid` in place.
    ///
    /// `default_fill` is the stage-3 fallback value (the mean of the
    /// previously completed grid of the same slice); `warned` deduplicates
    /// stage-3 warnings per (teff, logg, metallicity) and is threaded
    /// through by the caller rather than kept as ambient state.
    ///
    /// # Returns
    ///
    /// * `Ok(FillOutcome)` - Provenance/proximity grids and fill counters
    /// * `Err(GridError::IncompleteFill)` - Missing cells survived stage 3
    pub fn fill(
        &self,
        grid: &mut ValueGrid,
        default_fill: Option<f64>,
        warned: &mut HashSet<String>,
    ) -> Result<FillOutcome, GridError> {
        let nteff = self.teff_range.len();
        let nlogg = self.logg_range.len();
        debug_assert_eq!(grid.len(), nteff);
        debug_assert!(grid.iter().all(|row| row.len() == nlogg));

        let mut provenance = vec![vec![Provenance::Real; nlogg]; nteff];
        let mut proximity = vec![vec![0.0; nlogg]; nteff];

        // Stage 1: interpolation sweeps until a sweep fixes nothing.
        let mut interpolated = 0;
        loop {
            let fixed = self.interpolation_sweep(grid, &mut provenance, &mut proximity);
            interpolated += fixed;
            if fixed == 0 {
                break;
            }
        }

        // Stage 2: extrapolation passes to a fixed point. `iteration` is
        // the proximity class of the next pass (stage 1 fills are 1).
        let mut iteration = 1.0;
        let mut extrapolated = 0;
        if count_missing(grid) > 0 {
            let mut fixed = usize::MAX;
            while fixed > 0 {
                let (averaged_fixed, missing) =
                    self.extrapolation_pass(grid, true, &mut provenance, &mut proximity, &mut iteration);
                extrapolated += averaged_fixed;
                fixed = averaged_fixed;
                if missing == 0 {
                    break;
                }
                if fixed == 0 {
                    let (simple_fixed, missing) = self.extrapolation_pass(
                        grid,
                        false,
                        &mut provenance,
                        &mut proximity,
                        &mut iteration,
                    );
                    extrapolated += simple_fixed;
                    fixed = simple_fixed;
                    if missing == 0 {
                        break;
                    }
                }
            }
        }

        // Stage 3: copy the closest value or assign the default.
        let mut copied = 0;
        if count_missing(grid) > 0 {
            copied = self.copy_closest_pass(
                grid,
                default_fill,
                warned,
                &mut provenance,
                &mut proximity,
                iteration + 1.0,
            );
        }

        let remaining = count_missing(grid);
        if remaining > 0 {
            return Err(GridError::IncompleteFill {
                metallicity: self.metallicity,
                remaining,
            });
        }

        Ok(FillOutcome {
            provenance,
            proximity,
            interpolated,
            extrapolated,
            copied,
        })
    }

    /// One in-place interpolation sweep; returns the number of fixed cells.
    fn interpolation_sweep(
        &self,
        grid: &mut ValueGrid,
        provenance: &mut [Vec<Provenance>],
        proximity: &mut [Vec<f64>],
    ) -> usize {
        let nteff = self.teff_range.len();
        let nlogg = self.logg_range.len();
        let mut fixed = 0;
        for i in 0..nteff {
            for j in 0..nlogg {
                if !grid[i][j].is_nan() {
                    continue;
                }
                let row_known = known_cols(grid, i);
                let along_logg = if row_known.len() >= 2 {
                    interp_within(self.logg_range, |k| grid[i][k], &row_known, self.logg_range[j])
                } else {
                    None
                };
                let col_known = known_rows(grid, j);
                let along_teff = if col_known.len() >= 2 {
                    interp_within(self.teff_range, |k| grid[k][j], &col_known, self.teff_range[i])
                } else {
                    None
                };
                let derived = match (along_logg, along_teff) {
                    (Some(a), Some(b)) => Some((a + b) / 2.0),
                    (Some(a), None) => Some(a),
                    (None, Some(b)) => Some(b),
                    (None, None) => None,
                };
                if let Some(value) = derived {
                    grid[i][j] = value;
                    provenance[i][j] = Provenance::Interpolated;
                    proximity[i][j] = 1.0;
                    fixed += 1;
                }
            }
        }
        fixed
    }

    /// One extrapolation pass over a start-of-pass snapshot.
    ///
    /// Returns (cells fixed, cells still missing afterwards).
    fn extrapolation_pass(
        &self,
        grid: &mut ValueGrid,
        only_averaged: bool,
        provenance: &mut [Vec<Provenance>],
        proximity: &mut [Vec<f64>],
        iteration: &mut f64,
    ) -> (usize, usize) {
        let nteff = self.teff_range.len();
        let nlogg = self.logg_range.len();
        let snapshot = grid.clone();
        *iteration += 1.0;
        let mut fixed = 0;
        let mut missing = 0;
        for i in 0..nteff {
            for j in 0..nlogg {
                if !snapshot[i][j].is_nan() {
                    continue;
                }
                missing += 1;

                let row_known = known_cols(&snapshot, i);
                let along_logg = if row_known.len() >= 2 {
                    extrap_outside(self.logg_range, |k| snapshot[i][k], &row_known, j)
                        .map(|(v, limit)| (self.bounds.clamp(v), limit))
                } else {
                    None
                };
                let col_known = known_rows(&snapshot, j);
                let along_teff = if col_known.len() >= 2 {
                    extrap_outside(self.teff_range, |k| snapshot[k][j], &col_known, i)
                        .map(|(v, limit)| (self.bounds.clamp(v), limit))
                } else {
                    None
                };

                let derived = match (along_logg, along_teff) {
                    (Some((logg_value, logg_limit)), Some((teff_value, teff_limit))) => {
                        // The axis whose known boundary is closer gets
                        // more weight.
                        let logg_jumps = (j as f64 - logg_limit as f64).abs();
                        let teff_jumps = (i as f64 - teff_limit as f64).abs();
                        let total = logg_jumps + teff_jumps;
                        Some(
                            logg_value * (1.0 - logg_jumps / total)
                                + teff_value * (1.0 - teff_jumps / total),
                        )
                    }
                    (Some((logg_value, _)), None) if !only_averaged => Some(logg_value),
                    (None, Some((teff_value, _))) if !only_averaged => Some(teff_value),
                    _ => None,
                };

                if let Some(value) = derived {
                    grid[i][j] = value;
                    provenance[i][j] = if only_averaged {
                        Provenance::AveragedExtrapolated
                    } else {
                        Provenance::SimpleExtrapolated
                    };
                    proximity[i][j] = *iteration;
                    fixed += 1;
                }
            }
        }
        (fixed, missing - fixed)
    }

    /// Stage-3 pass; returns the number of fixed cells. Cells it cannot
    /// derive (no default available on an empty grid) stay missing and are
    /// caught by the caller's invariant check.
    fn copy_closest_pass(
        &self,
        grid: &mut ValueGrid,
        default_fill: Option<f64>,
        warned: &mut HashSet<String>,
        provenance: &mut [Vec<Provenance>],
        proximity: &mut [Vec<f64>],
        class: f64,
    ) -> usize {
        let nteff = self.teff_range.len();
        let nlogg = self.logg_range.len();
        let snapshot = grid.clone();
        let mut fixed = 0;
        for i in 0..nteff {
            for j in 0..nlogg {
                if !snapshot[i][j].is_nan() {
                    continue;
                }
                let teff = self.teff_range[i];
                let logg = self.logg_range[j];
                let key = format!("{:.1}_{:.2}_{:.2}", teff, logg, self.metallicity);
                if warned.insert(key) {
                    warn!(
                        "[Atmosphere: {:.1}, {:.2}, {:.2}] interpolation and extrapolation were \
                         not possible; the closest value has been copied or an averaged value \
                         assigned",
                        teff, logg, self.metallicity
                    );
                }

                let row_known = known_cols(&snapshot, i);
                let col_known = known_rows(&snapshot, j);
                let derived = if row_known.len() == 1 && col_known.len() == 1 {
                    let logg_jumps = (j as f64 - row_known[0] as f64).abs();
                    let teff_jumps = (i as f64 - col_known[0] as f64).abs();
                    let total = logg_jumps + teff_jumps;
                    let along_logg = snapshot[i][row_known[0]];
                    let along_teff = snapshot[col_known[0]][j];
                    Some(
                        along_logg * (1.0 - logg_jumps / total)
                            + along_teff * (1.0 - teff_jumps / total),
                    )
                } else if row_known.len() == 1 {
                    Some(snapshot[i][row_known[0]])
                } else if col_known.len() == 1 {
                    Some(snapshot[col_known[0]][j])
                } else {
                    // Row and column are both empty (or both ambiguous):
                    // fall back to the mean of the previously completed
                    // grid, or of this grid's own known cells.
                    default_fill.or_else(|| known_mean(&snapshot))
                };

                if let Some(value) = derived {
                    grid[i][j] = value;
                    provenance[i][j] = Provenance::Copied;
                    proximity[i][j] = class;
                    fixed += 1;
                }
            }
        }
        fixed
    }
}

/// Mean over every cell of a completed grid.
pub fn grid_mean(grid: &ValueGrid) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for row in grid {
        for &v in row {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Number of missing (NaN) cells.
pub fn count_missing(grid: &ValueGrid) -> usize {
    grid.iter()
        .map(|row| row.iter().filter(|v| v.is_nan()).count())
        .sum()
}

/// Mean over the known cells only, if any.
fn known_mean(grid: &ValueGrid) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for row in grid {
        for &v in row {
            if !v.is_nan() {
                sum += v;
                count += 1;
            }
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Column indices with known values in row `i`.
fn known_cols(grid: &ValueGrid, i: usize) -> Vec<usize> {
    (0..grid[i].len()).filter(|&k| !grid[i][k].is_nan()).collect()
}

/// Row indices with known values in column `j`.
fn known_rows(grid: &ValueGrid, j: usize) -> Vec<usize> {
    (0..grid.len()).filter(|&k| !grid[k][j].is_nan()).collect()
}

/// 1D linear interpolation over the known points of one axis; `None`
/// outside their span (no extrapolation in stage 1).
fn interp_within<F: Fn(usize) -> f64>(
    axis: &[f64],
    value_at: F,
    known: &[usize],
    target: f64,
) -> Option<f64> {
    let first = known[0];
    let last = known[known.len() - 1];
    if target < axis[first] || target > axis[last] {
        return None;
    }
    for pair in known.windows(2) {
        let (k0, k1) = (pair[0], pair[1]);
        if target >= axis[k0] && target <= axis[k1] {
            let (x0, x1) = (axis[k0], axis[k1]);
            let (y0, y1) = (value_at(k0), value_at(k1));
            return Some(y0 + (y1 - y0) * (target - x0) / (x1 - x0));
        }
    }
    None
}

/// Linear extrapolation from the two nearest known points, only when the
/// target index lies outside the known span. Returns the raw value and
/// the index of the known boundary it extends from.
fn extrap_outside<F: Fn(usize) -> f64>(
    axis: &[f64],
    value_at: F,
    known: &[usize],
    target_idx: usize,
) -> Option<(f64, usize)> {
    let first = known[0];
    let last = known[known.len() - 1];
    if target_idx < first {
        let (k0, k1) = (known[0], known[1]);
        Some((
            extend_line(axis[target_idx], axis[k0], value_at(k0), axis[k1], value_at(k1)),
            first,
        ))
    } else if target_idx > last {
        let (k0, k1) = (known[known.len() - 2], known[known.len() - 1]);
        Some((
            extend_line(axis[target_idx], axis[k0], value_at(k0), axis[k1], value_at(k1)),
            last,
        ))
    } else {
        // Inside the known span: stage 3 handles whatever stage 1 left.
        None
    }
}

#[inline]
fn extend_line(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}
