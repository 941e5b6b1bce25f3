//! Atmosgrid CLI - Command Line Operations for the Atmosphere Grid Pipeline
//!
//! This is the operational entry point for the atmosphere interpolation
//! library.
//!
//! # Commands
//!
//! - `atmosgrid build` - Read Kurucz model files and build a model pack
//! - `atmosgrid query` - Interpolate an atmosphere from a built pack
//! - `atmosgrid check` - Load a pack and report its coverage
//!
//! # Architecture
//!
//! As the service layer of the workspace, this crate orchestrates the
//! foundation (`atmos_core`) and pipeline (`atmos_grid`) layers behind a
//! unified command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

/// Atmosphere grid interpolation CLI
#[derive(Parser)]
#[command(name = "atmosgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "atmosgrid.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read Kurucz atmosphere model files and build a model pack
    Build {
        /// Atmosphere model files, or a directory of .dat files
        #[arg(short, long, required = true, num_args = 1..)]
        atmospheres: Vec<PathBuf>,

        /// Output pack file
        #[arg(short, long, default_value = "pack.json")]
        output: PathBuf,

        /// Override the configured layer count requirement
        #[arg(short, long)]
        layers: Option<usize>,
    },

    /// Interpolate a full atmosphere from a built pack
    Query {
        /// Model pack file
        #[arg(short, long, default_value = "pack.json")]
        pack: PathBuf,

        /// Effective temperature target (K)
        #[arg(long)]
        teff: f64,

        /// Surface gravity target (dex)
        #[arg(long)]
        logg: f64,

        /// Metallicity target (dex)
        #[arg(long)]
        mh: f64,

        /// Write the plane-parallel atmosphere to this path
        /// (a persisted temporary file when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a pack and report its coverage
    Check {
        /// Model pack file
        #[arg(short, long, default_value = "pack.json")]
        pack: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialise tracing; --verbose lowers the default threshold, an
    // explicit RUST_LOG still wins.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let config = config::CliConfig::load(&cli.config)?;
    if cli.verbose {
        info!(config = ?config, "verbose mode enabled");
    }

    match cli.command {
        Commands::Build {
            atmospheres,
            output,
            layers,
        } => {
            let mut config = config;
            if let Some(layers) = layers {
                config.required_layers = layers;
            }
            commands::build::run(&atmospheres, &output, &config)
        }
        Commands::Query {
            pack,
            teff,
            logg,
            mh,
            output,
        } => commands::query::run(&pack, teff, logg, mh, output.as_deref()),
        Commands::Check { pack } => commands::check::run(&pack),
    }
}
