//! End-to-end pipeline test: synthetic Kurucz files through reading,
//! gap filling, pack building, persistence, querying, and plane-parallel
//! output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use approx::assert_abs_diff_eq;
use atmos_core::types::Quantity;
use atmos_grid::{
    build_model_pack, read_atmosphere, read_kurucz_atmospheres, write_atmosphere_to, Axis,
    GridError, ModelPack, ReaderConfig,
};

const NLAYERS: usize = 4;

/// Analytic layer values, linear in every coordinate so exact-interpolation
/// splines reproduce them everywhere.
fn layer_values(teff: f64, logg: f64, mh: f64, layer: usize) -> [f64; 7] {
    let depth = (layer + 1) as f64;
    [
        1e-3 * depth,
        0.8 * teff + 100.0 * mh + 15.0 * depth,
        50.0 * logg + depth,
        1e8 + 1000.0 * teff,
        1e-4 * depth,
        1e-2 * logg,
        2.0 + mh,
    ]
}

fn write_block(out: &mut impl Write, teff: f64, logg: f64, mh: f64, nlayers: usize) {
    writeln!(out, "TEFF   {:.0}.  GRAVITY {:.5} LTE", teff, logg).unwrap();
    writeln!(out, "TITLE SYNTHETIC TEST GRID").unwrap();
    writeln!(out, "READ DECK6 {} RHOX,T,P,XNE,ABROSS,ACCRAD,VTURB", nlayers).unwrap();
    for layer in 0..nlayers {
        let v = layer_values(teff, logg, mh, layer);
        // Full precision keeps the synthetic data exactly linear.
        writeln!(out, " {} {} {} {} {} {} {}", v[0], v[1], v[2], v[3], v[4], v[5], v[6]).unwrap();
    }
    writeln!(out, "PRADK 1.4828E+00").unwrap();
}

/// Two metallicity files; the metal-poor slice is missing its
/// (5500, 4.5) atmosphere and carries two rejects (wrong layer count,
/// outside the temperature window).
fn write_grid_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let poor = dir.join("am10k2.dat");
    let mut out = File::create(&poor).unwrap();
    for &teff in &[5000.0, 5500.0, 6000.0] {
        for &logg in &[4.0, 4.5] {
            if teff == 5500.0 && logg == 4.5 {
                continue;
            }
            write_block(&mut out, teff, logg, -1.0, NLAYERS);
        }
    }
    write_block(&mut out, 5500.0, 4.5, -1.0, NLAYERS - 1); // wrong layer count
    write_block(&mut out, 9500.0, 4.5, -1.0, NLAYERS); // too hot
    drop(out);

    let solar = dir.join("ap00k2.dat");
    let mut out = File::create(&solar).unwrap();
    for &teff in &[5000.0, 5500.0, 6000.0] {
        for &logg in &[4.0, 4.5] {
            write_block(&mut out, teff, logg, 0.0, NLAYERS);
        }
    }
    drop(out);

    vec![poor, solar]
}

fn build_pack(dir: &Path) -> ModelPack {
    let files = write_grid_files(dir);
    let config = ReaderConfig {
        required_layers: NLAYERS,
        ..ReaderConfig::default()
    };
    let grid = read_kurucz_atmospheres(&files, &config).unwrap();
    assert_eq!(grid.mh_range(), &[-1.0, 0.0]);
    assert_eq!(grid.teff_range(), &[5000.0, 5500.0, 6000.0]);
    assert_eq!(grid.logg_range(), &[4.0, 4.5]);
    assert_eq!(grid.slices()[0].atmospheres().len(), 5);
    assert_eq!(grid.slices()[1].atmospheres().len(), 6);
    build_model_pack(&grid).unwrap()
}

#[test]
fn pipeline_builds_persists_and_queries() {
    let dir = tempfile::tempdir().unwrap();
    let pack = build_pack(dir.path());

    // Persistence round trip.
    let pack_path = dir.path().join("pack.json");
    pack.save(&pack_path).unwrap();
    let pack = ModelPack::load(&pack_path).unwrap();
    assert_eq!(pack.nlayers(), NLAYERS);

    // Validity is boundary-inclusive on every axis.
    assert!(pack.valid_atmosphere_target(5000.0, 4.0, -1.0));
    assert!(pack.valid_atmosphere_target(6000.0, 4.5, 0.0));
    assert!(pack.valid_atmosphere_target(5777.0, 4.44, -0.3));
    assert!(!pack.valid_atmosphere_target(4999.0, 4.0, 0.0));
    assert!(!pack.valid_atmosphere_target(5000.0, 4.51, 0.0));
    assert!(!pack.valid_atmosphere_target(5000.0, 4.0, 0.1));

    // A real grid point reproduces its source layers.
    let layers = pack.interpolate_atmosphere_layers(6000.0, 4.0, 0.0).unwrap();
    assert_eq!(layers.len(), NLAYERS);
    for (l, layer) in layers.iter().enumerate() {
        let expected = layer_values(6000.0, 4.0, 0.0, l);
        for quantity in Quantity::ALL {
            let got = layer.get(quantity);
            let want = expected[quantity.index()];
            assert!(
                (got - want).abs() <= 1e-6 * want.abs().max(1.0),
                "layer {} {}: {} vs {}",
                l,
                quantity,
                got,
                want
            );
        }
    }

    // Between grid points the synthetic linear data stays exact.
    let layers = pack
        .interpolate_atmosphere_layers(5250.0, 4.25, -0.5)
        .unwrap();
    for (l, layer) in layers.iter().enumerate() {
        let expected = layer_values(5250.0, 4.25, -0.5, l);
        assert!(
            (layer.temperature() - expected[1]).abs() <= 1e-6 * expected[1],
            "layer {}: {} vs {}",
            l,
            layer.temperature(),
            expected[1]
        );
    }
}

#[test]
fn pipeline_proximity_tracks_gap_filling() {
    let dir = tempfile::tempdir().unwrap();
    let pack = build_pack(dir.path());

    // The metal-poor slice interpolated its missing (5500, 4.5) cell.
    let at_gap_poor = pack.estimate_proximity_to_real_atmospheres(5500.0, 4.5, -1.0);
    assert_abs_diff_eq!(at_gap_poor, 1.0, epsilon = 1e-8);

    // The solar slice is fully real there.
    let at_gap_solar = pack.estimate_proximity_to_real_atmospheres(5500.0, 4.5, 0.0);
    assert_abs_diff_eq!(at_gap_solar, 0.0, epsilon = 1e-8);

    // Halfway in metallicity the estimate interpolates linearly.
    let halfway = pack.estimate_proximity_to_real_atmospheres(5500.0, 4.5, -0.5);
    assert_abs_diff_eq!(halfway, 0.5, epsilon = 1e-8);

    // Real grid points are at zero distance.
    assert!(pack
        .estimate_proximity_to_real_atmospheres(5000.0, 4.0, -1.0)
        .abs()
        < 1e-8);

    // Never fails, never negative, even far outside the grid.
    let clamped = pack.estimate_proximity_to_real_atmospheres(20000.0, -3.0, 7.0);
    assert!(clamped >= 0.0);
}

#[test]
fn pipeline_out_of_range_queries_fail_hard() {
    let dir = tempfile::tempdir().unwrap();
    let pack = build_pack(dir.path());

    match pack.interpolate_atmosphere_layers(5500.0, 4.25, 0.2).unwrap_err() {
        GridError::OutOfRange { axis, .. } => assert_eq!(axis, Axis::Metallicity),
        other => panic!("expected OutOfRange, got {:?}", other),
    }
    assert!(matches!(
        pack.interpolate_atmosphere_layers(4000.0, 4.25, 0.0).unwrap_err(),
        GridError::Surface(_)
    ));
}

#[test]
fn pipeline_written_atmosphere_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let pack = build_pack(dir.path());

    let layers = pack
        .interpolate_atmosphere_layers(5777.0, 4.44, -0.25)
        .unwrap();
    let path = dir.path().join("interpolated.atm");
    write_atmosphere_to(&path, 5777.0, 4.44, -0.25, &layers).unwrap();

    let atmosphere = read_atmosphere(&path).unwrap();
    assert_eq!(atmosphere.teff(), 5777.0);
    assert_eq!(atmosphere.logg(), 4.44);
    assert_eq!(atmosphere.metallicity(), -0.25);
    assert_eq!(atmosphere.nlayers(), NLAYERS);
    for (got, want) in atmosphere.layers().iter().zip(layers.iter()) {
        for quantity in Quantity::ALL {
            let g = got.get(quantity);
            let w = want.get(quantity);
            let tolerance = match quantity {
                Quantity::Temperature => 0.05,
                Quantity::MassDepth => 5e-9 * w.abs(),
                _ => 5e-4 * w.abs().max(1e-12),
            };
            assert!((g - w).abs() <= tolerance, "{}: {} vs {}", quantity, g, w);
        }
    }
}
