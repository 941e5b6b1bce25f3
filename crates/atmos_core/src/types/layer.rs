//! Layer and atmosphere model types.
//!
//! A plane-parallel model atmosphere is a stack of depth layers, each
//! carrying seven physical quantities in a fixed order. The first layer
//! represents the surface.

use serde::{Deserialize, Serialize};

/// Named indices into a layer's value tuple.
///
/// The ordering is significant and fixed; it matches the column order of
/// the Kurucz/Castelli source files and of the plane-parallel output
/// format consumed by external radiative-transfer codes.
///
/// # Example
///
/// ```
/// use atmos_core::types::Quantity;
///
/// assert_eq!(Quantity::Temperature.index(), 1);
/// assert_eq!(Quantity::MicroturbulentVelocity.as_str(), "microturbulent_velocity");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Mass depth (g/cm^2)
    MassDepth,
    /// Temperature (K)
    Temperature,
    /// Gas pressure
    GasPressure,
    /// Electron density
    ElectronDensity,
    /// Mean absorption coefficient
    MeanAbsorption,
    /// Radiation pressure
    RadiationPressure,
    /// Microturbulent velocity (m/s), layer-invariant per atmosphere
    MicroturbulentVelocity,
}

impl Quantity {
    /// Number of physical quantities per layer.
    pub const COUNT: usize = 7;

    /// All quantities in layer-tuple order.
    pub const ALL: [Quantity; Quantity::COUNT] = [
        Quantity::MassDepth,
        Quantity::Temperature,
        Quantity::GasPressure,
        Quantity::ElectronDensity,
        Quantity::MeanAbsorption,
        Quantity::RadiationPressure,
        Quantity::MicroturbulentVelocity,
    ];

    /// Position of this quantity within a layer's value tuple.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name of the quantity.
    pub fn as_str(self) -> &'static str {
        match self {
            Quantity::MassDepth => "mass_depth",
            Quantity::Temperature => "temperature",
            Quantity::GasPressure => "gas_pressure",
            Quantity::ElectronDensity => "electron_density",
            Quantity::MeanAbsorption => "mean_absorption",
            Quantity::RadiationPressure => "radiation_pressure",
            Quantity::MicroturbulentVelocity => "microturbulent_velocity",
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The seven physical quantities of one atmospheric depth layer.
///
/// A thin newtype over `[f64; 7]` in [`Quantity::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerValues([f64; Quantity::COUNT]);

impl LayerValues {
    /// Construct from values in [`Quantity::ALL`] order.
    #[inline]
    pub fn new(values: [f64; Quantity::COUNT]) -> Self {
        LayerValues(values)
    }

    /// Value of the given quantity.
    #[inline]
    pub fn get(&self, quantity: Quantity) -> f64 {
        self.0[quantity.index()]
    }

    /// The raw value tuple in [`Quantity::ALL`] order.
    #[inline]
    pub fn as_array(&self) -> &[f64; Quantity::COUNT] {
        &self.0
    }

    /// Mass depth (g/cm^2).
    #[inline]
    pub fn mass_depth(&self) -> f64 {
        self.get(Quantity::MassDepth)
    }

    /// Temperature (K).
    #[inline]
    pub fn temperature(&self) -> f64 {
        self.get(Quantity::Temperature)
    }

    /// Gas pressure.
    #[inline]
    pub fn gas_pressure(&self) -> f64 {
        self.get(Quantity::GasPressure)
    }

    /// Electron density.
    #[inline]
    pub fn electron_density(&self) -> f64 {
        self.get(Quantity::ElectronDensity)
    }

    /// Mean absorption coefficient.
    #[inline]
    pub fn mean_absorption(&self) -> f64 {
        self.get(Quantity::MeanAbsorption)
    }

    /// Radiation pressure.
    #[inline]
    pub fn radiation_pressure(&self) -> f64 {
        self.get(Quantity::RadiationPressure)
    }

    /// Microturbulent velocity (m/s).
    #[inline]
    pub fn microturbulent_velocity(&self) -> f64 {
        self.get(Quantity::MicroturbulentVelocity)
    }
}

impl From<[f64; Quantity::COUNT]> for LayerValues {
    fn from(values: [f64; Quantity::COUNT]) -> Self {
        LayerValues(values)
    }
}

/// One empirical reference atmosphere, immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereModel {
    teff: f64,
    logg: f64,
    metallicity: f64,
    layers: Vec<LayerValues>,
}

impl AtmosphereModel {
    /// Construct a reference atmosphere from its parameters and layer stack.
    pub fn new(teff: f64, logg: f64, metallicity: f64, layers: Vec<LayerValues>) -> Self {
        AtmosphereModel {
            teff,
            logg,
            metallicity,
            layers,
        }
    }

    /// Effective temperature (K).
    #[inline]
    pub fn teff(&self) -> f64 {
        self.teff
    }

    /// Surface gravity (dex).
    #[inline]
    pub fn logg(&self) -> f64 {
        self.logg
    }

    /// Metallicity [M/H] (dex).
    #[inline]
    pub fn metallicity(&self) -> f64 {
        self.metallicity
    }

    /// The ordered layer stack, surface first.
    #[inline]
    pub fn layers(&self) -> &[LayerValues] {
        &self.layers
    }

    /// Number of depth layers.
    #[inline]
    pub fn nlayers(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_layer() -> LayerValues {
        LayerValues::new([1e-3, 4500.0, 1e2, 1e10, 1e-4, 1e-2, 2000.0])
    }

    // ========================================
    // Quantity Tests
    // ========================================

    #[test]
    fn test_quantity_indices_match_all_order() {
        for (i, q) in Quantity::ALL.iter().enumerate() {
            assert_eq!(q.index(), i);
        }
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(format!("{}", Quantity::GasPressure), "gas_pressure");
        assert_eq!(format!("{}", Quantity::MassDepth), "mass_depth");
    }

    // ========================================
    // LayerValues Tests
    // ========================================

    #[test]
    fn test_layer_accessors() {
        let layer = sample_layer();
        assert_eq!(layer.mass_depth(), 1e-3);
        assert_eq!(layer.temperature(), 4500.0);
        assert_eq!(layer.gas_pressure(), 1e2);
        assert_eq!(layer.electron_density(), 1e10);
        assert_eq!(layer.mean_absorption(), 1e-4);
        assert_eq!(layer.radiation_pressure(), 1e-2);
        assert_eq!(layer.microturbulent_velocity(), 2000.0);
    }

    #[test]
    fn test_layer_get_matches_array() {
        let layer = sample_layer();
        for q in Quantity::ALL {
            assert_eq!(layer.get(q), layer.as_array()[q.index()]);
        }
    }

    #[test]
    fn test_layer_serde_roundtrip() {
        let layer = sample_layer();
        let json = serde_json::to_string(&layer).unwrap();
        let parsed: LayerValues = serde_json::from_str(&json).unwrap();
        assert_eq!(layer, parsed);
    }

    // ========================================
    // AtmosphereModel Tests
    // ========================================

    #[test]
    fn test_atmosphere_model_accessors() {
        let atm = AtmosphereModel::new(5777.0, 4.44, 0.0, vec![sample_layer(); 56]);
        assert_eq!(atm.teff(), 5777.0);
        assert_eq!(atm.logg(), 4.44);
        assert_eq!(atm.metallicity(), 0.0);
        assert_eq!(atm.nlayers(), 56);
        assert_eq!(atm.layers().len(), 56);
    }
}
