//! Temperature and volume shared by every substance in a chamber.

use vle_core::constants::R_GAS;
use vle_core::{ensure_finite, ensure_positive};

use crate::error::{ThermoError, ThermoResult};

/// Ideal-gas pressure (Pa) of `moles` in `volume_l` at `temperature_k`.
#[inline]
pub fn ideal_gas_pressure(moles: f64, temperature_k: f64, volume_l: f64) -> f64 {
    moles * R_GAS * temperature_k / volume_l
}

/// Ideal-gas volume (L) of `moles` at `temperature_k` and `pressure_pa`.
#[inline]
pub fn ideal_gas_volume(moles: f64, temperature_k: f64, pressure_pa: f64) -> f64 {
    moles * R_GAS * temperature_k / pressure_pa
}

/// Chamber-owned state that substances read but never store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    temperature_k: f64,
    volume_l: f64,
}

impl Conditions {
    pub fn new(temperature_k: f64, volume_l: f64) -> ThermoResult<Self> {
        let temperature_k = ensure_positive(temperature_k, "temperature_k")?;
        let volume_l = ensure_finite(volume_l, "volume_l")?;
        if volume_l < 0.0 {
            return Err(ThermoError::InvalidArg {
                what: "volume_l must be non-negative",
            });
        }
        Ok(Self {
            temperature_k,
            volume_l,
        })
    }

    /// Conditions of `moles` of gas found at `temperature_k` and `pressure_pa`.
    pub fn from_ideal_gas(moles: f64, temperature_k: f64, pressure_pa: f64) -> ThermoResult<Self> {
        let moles = ensure_positive(moles, "moles")?;
        let temperature_k = ensure_positive(temperature_k, "temperature_k")?;
        let pressure_pa = ensure_positive(pressure_pa, "pressure_pa")?;
        Self::new(
            temperature_k,
            ideal_gas_volume(moles, temperature_k, pressure_pa),
        )
    }

    pub fn temperature_k(&self) -> f64 {
        self.temperature_k
    }

    pub fn volume_l(&self) -> f64 {
        self.volume_l
    }

    pub fn apply_temperature_delta(&mut self, delta_k: f64) -> f64 {
        self.temperature_k += delta_k;
        self.temperature_k
    }

    /// Whether `delta_l` keeps the volume non-negative.
    pub fn accepts_volume_delta(&self, delta_l: f64) -> bool {
        self.volume_l + delta_l >= 0.0
    }

    /// Change the volume by `delta_l`.
    ///
    /// # Panics
    ///
    /// If the volume becomes negative. Callers check
    /// [`accepts_volume_delta`](Self::accepts_volume_delta) first.
    pub fn apply_volume_delta(&mut self, delta_l: f64) -> f64 {
        self.volume_l += delta_l;
        assert!(
            self.volume_l >= 0.0,
            "chamber volume went negative: {} L after delta {} L",
            self.volume_l,
            delta_l
        );
        self.volume_l
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideal_gas_round_trip() {
        let v = ideal_gas_volume(0.5, 300.0, 50_000.0);
        let p = ideal_gas_pressure(0.5, 300.0, v);
        assert!((p - 50_000.0).abs() < 1e-6);
    }

    #[test]
    fn from_ideal_gas_derives_volume() {
        let c = Conditions::from_ideal_gas(1.0, 373.0, 1e5).unwrap();
        assert_eq!(c.temperature_k(), 373.0);
        assert!((c.volume_l() - R_GAS * 373.0 / 1e5).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_construction() {
        assert!(Conditions::new(0.0, 1.0).is_err());
        assert!(Conditions::new(300.0, -1.0).is_err());
        assert!(Conditions::from_ideal_gas(1.0, 300.0, 0.0).is_err());
    }

    #[test]
    fn volume_delta_guard() {
        let mut c = Conditions::new(300.0, 2.0).unwrap();
        assert!(c.accepts_volume_delta(-2.0));
        assert!(!c.accepts_volume_delta(-2.5));
        assert_eq!(c.apply_volume_delta(0.5), 2.5);
        assert_eq!(c.apply_temperature_delta(-1.0), 299.0);
    }

    #[test]
    #[should_panic(expected = "chamber volume went negative")]
    fn negative_volume_is_a_defect() {
        let mut c = Conditions::new(300.0, 1.0).unwrap();
        c.apply_volume_delta(-1.5);
    }
}
