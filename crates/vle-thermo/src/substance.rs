//! A volatile species sharing its chamber's volume and temperature.

use vle_core::{ensure_finite, ensure_positive};

use crate::conditions::{Conditions, ideal_gas_pressure};
use crate::error::{ThermoError, ThermoResult};
use crate::vapor_pressure::VaporPressureCurve;

/// Direction the gas/liquid split has to move to reach equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTrend {
    /// Below saturation with liquid left: liquid should evaporate.
    Evaporating,
    /// Above saturation: vapor should condense.
    Condensing,
    /// Within tolerance of equilibrium.
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Substance {
    name: String,
    total_moles: f64,
    gas_moles: f64,
    curve: VaporPressureCurve,
    /// Absolute pressure error (Pa) accepted around saturation.
    tolerance_pa: f64,
}

impl Substance {
    /// A substance that starts entirely in the gas phase.
    pub fn new(
        name: impl Into<String>,
        total_moles: f64,
        curve: VaporPressureCurve,
        tolerance_pa: f64,
    ) -> ThermoResult<Self> {
        let total_moles = ensure_positive(total_moles, "total_moles")?;
        let tolerance_pa = ensure_finite(tolerance_pa, "tolerance_pa")?;
        if tolerance_pa < 0.0 {
            return Err(ThermoError::InvalidArg {
                what: "tolerance_pa must be non-negative",
            });
        }
        Ok(Self {
            name: name.into(),
            total_moles,
            gas_moles: total_moles,
            curve,
            tolerance_pa,
        })
    }

    /// Start from a given gas/liquid split instead of all gas.
    pub fn with_gas_moles(mut self, gas_moles: f64) -> ThermoResult<Self> {
        let gas_moles = ensure_finite(gas_moles, "gas_moles")?;
        if !(0.0..=self.total_moles).contains(&gas_moles) {
            return Err(ThermoError::InvalidArg {
                what: "gas_moles must lie within [0, total_moles]",
            });
        }
        self.gas_moles = gas_moles;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_moles(&self) -> f64 {
        self.total_moles
    }

    pub fn gas_moles(&self) -> f64 {
        self.gas_moles
    }

    pub fn curve(&self) -> &VaporPressureCurve {
        &self.curve
    }

    pub fn tolerance_pa(&self) -> f64 {
        self.tolerance_pa
    }

    /// Moles condensed into the liquid phase.
    ///
    /// # Panics
    ///
    /// If the gas phase holds more than the total amount.
    pub fn liquid_moles(&self) -> f64 {
        let n = self.total_moles - self.gas_moles;
        assert!(
            n >= 0.0,
            "{}: negative liquid amount {} mol",
            self.name,
            n
        );
        n
    }

    pub fn partial_pressure(&self, cond: &Conditions) -> f64 {
        ideal_gas_pressure(self.gas_moles, cond.temperature_k(), cond.volume_l())
    }

    pub fn saturation_pressure(&self, temperature_k: f64) -> f64 {
        self.curve.pressure(temperature_k)
    }

    /// At or below saturation, unless liquid is left while the gas sits
    /// detectably below saturation.
    pub fn is_at_equilibrium(&self, cond: &Conditions) -> bool {
        let p = self.partial_pressure(cond);
        let p_sat = self.saturation_pressure(cond.temperature_k());
        p <= p_sat + self.tolerance_pa
            && !(p <= p_sat - self.tolerance_pa && self.liquid_moles() > 0.0)
    }

    pub fn phase_trend(&self, cond: &Conditions) -> PhaseTrend {
        let p = self.partial_pressure(cond);
        let p_sat = self.saturation_pressure(cond.temperature_k());
        if p <= p_sat - self.tolerance_pa && self.liquid_moles() > 0.0 {
            PhaseTrend::Evaporating
        } else if p > p_sat + self.tolerance_pa {
            PhaseTrend::Condensing
        } else {
            PhaseTrend::Settled
        }
    }

    /// Move `delta_moles` between the phases toward saturation and return the
    /// resulting partial pressure. The step size is fixed, not proportional
    /// to the pressure gap.
    pub fn drive_toward_equilibrium(&mut self, cond: &Conditions, delta_moles: f64) -> f64 {
        match self.phase_trend(cond) {
            PhaseTrend::Evaporating => {
                self.gas_moles = (self.gas_moles + delta_moles).min(self.total_moles);
            }
            PhaseTrend::Condensing => {
                self.gas_moles = (self.gas_moles - delta_moles).max(0.0);
            }
            PhaseTrend::Settled => {}
        }
        self.partial_pressure(cond)
    }
}
