//! Property tests for the gap filler invariants.

use std::collections::HashSet;

use atmos_grid::gapfill::{count_missing, GapFiller, Provenance, ValueBounds};
use proptest::prelude::*;

fn axes(rows: usize, cols: usize) -> (Vec<f64>, Vec<f64>) {
    let teff = (0..rows).map(|i| 3000.0 + 250.0 * i as f64).collect();
    let logg = (0..cols).map(|j| 1.0 + 0.5 * j as f64).collect();
    (teff, logg)
}

/// Real bounds over the known cells, or a wide default for empty grids.
fn real_bounds(grid: &[Vec<f64>]) -> ValueBounds {
    let mut bounds = ValueBounds {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };
    for row in grid {
        for &v in row {
            if !v.is_nan() {
                bounds.min = bounds.min.min(v);
                bounds.max = bounds.max.max(v);
            }
        }
    }
    bounds
}

/// Rectangular grids (2..=5 per side) with ~40% of the cells missing and
/// at least one known value.
fn sparse_grid() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2usize..=5, 2usize..=5)
        .prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(
                proptest::collection::vec(
                    (0.0f64..100.0, proptest::bool::weighted(0.6)),
                    cols..=cols,
                ),
                rows..=rows,
            )
        })
        .prop_map(|rows| {
            let mut grid: Vec<Vec<f64>> = rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|(v, known)| if known { v } else { f64::NAN })
                        .collect()
                })
                .collect();
            if count_missing(&grid) == grid.len() * grid[0].len() {
                grid[0][0] = 50.0;
            }
            grid
        })
}

/// Fully populated grids of the same shapes.
fn full_grid() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2usize..=5, 2usize..=5).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(
            proptest::collection::vec(0.0f64..100.0, cols..=cols),
            rows..=rows,
        )
    })
}

proptest! {
    /// Gap filling is total and every derived value stays inside the
    /// global bounds observed over the real cells (the extrapolation
    /// clamp invariant), with real cells untouched.
    #[test]
    fn prop_fill_is_total_and_clamped(mut grid in sparse_grid()) {
        let (teff, logg) = axes(grid.len(), grid[0].len());
        let bounds = real_bounds(&grid);
        let original = grid.clone();
        let mut warned = HashSet::new();
        let outcome = GapFiller::new(&teff, &logg, 0.0, bounds)
            .fill(&mut grid, None, &mut warned)
            .unwrap();

        prop_assert_eq!(count_missing(&grid), 0);
        for (i, row) in grid.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                prop_assert!(v.is_finite());
                prop_assert!(
                    v >= bounds.min - 1e-9 && v <= bounds.max + 1e-9,
                    "cell ({}, {}) = {} outside [{}, {}]",
                    i, j, v, bounds.min, bounds.max
                );
                if !original[i][j].is_nan() {
                    prop_assert_eq!(v, original[i][j]);
                    prop_assert_eq!(outcome.provenance[i][j], Provenance::Real);
                    prop_assert_eq!(outcome.proximity[i][j], 0.0);
                } else {
                    prop_assert!(outcome.provenance[i][j] != Provenance::Real);
                    prop_assert!(outcome.proximity[i][j] >= 1.0);
                }
            }
        }
    }

    /// A grid without gaps passes through untouched.
    #[test]
    fn prop_full_grid_is_noop(mut grid in full_grid()) {
        let (teff, logg) = axes(grid.len(), grid[0].len());
        let bounds = real_bounds(&grid);
        let original = grid.clone();
        let mut warned = HashSet::new();
        let outcome = GapFiller::new(&teff, &logg, 0.0, bounds)
            .fill(&mut grid, None, &mut warned)
            .unwrap();

        prop_assert_eq!(grid, original);
        prop_assert_eq!(outcome.interpolated, 0);
        prop_assert_eq!(outcome.extrapolated, 0);
        prop_assert_eq!(outcome.copied, 0);
        prop_assert!(warned.is_empty());
    }

    /// Filling an already-filled grid changes nothing.
    #[test]
    fn prop_fill_is_idempotent(mut grid in sparse_grid()) {
        let (teff, logg) = axes(grid.len(), grid[0].len());
        let bounds = real_bounds(&grid);
        let filler = GapFiller::new(&teff, &logg, 0.0, bounds);
        let mut warned = HashSet::new();
        filler.fill(&mut grid, None, &mut warned).unwrap();
        let first = grid.clone();
        filler.fill(&mut grid, None, &mut warned).unwrap();
        prop_assert_eq!(grid, first);
    }
}
