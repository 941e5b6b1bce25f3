//! Numerical building blocks for the grid modelling pipeline.

pub mod interpolators;
