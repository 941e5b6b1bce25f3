//! CLI error type.

use atmos_grid::GridError;
use thiserror::Error;

/// Errors surfaced by the CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// Grid pipeline failure.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// I/O failure outside the pipeline.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query target outside the grid coverage.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;
