//! Fixed set of substances sharing one volume and one temperature.

use vle_thermo::{Conditions, Substance};

use crate::error::{SolverError, SolverResult};

/// Per-substance outcome of a temperature change, in substance order.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureResponse {
    pub partial_pressures: Vec<f64>,
    pub at_equilibrium: bool,
}

#[derive(Debug, Clone)]
pub struct Chamber {
    /// Name for diagnostics
    pub name: String,
    conditions: Conditions,
    substances: Vec<Substance>,
}

impl Chamber {
    pub fn new(
        name: impl Into<String>,
        conditions: Conditions,
        substances: Vec<Substance>,
    ) -> SolverResult<Self> {
        let name = name.into();
        if substances.is_empty() {
            return Err(SolverError::ProblemSetup {
                what: format!("chamber '{name}' has no substances"),
            });
        }
        Ok(Self {
            name,
            conditions,
            substances,
        })
    }

    /// Size the chamber so that its first substance, all gas, sits at
    /// `reference_pressure_pa`.
    pub fn from_reference_pressure(
        name: impl Into<String>,
        temperature_k: f64,
        reference_pressure_pa: f64,
        substances: Vec<Substance>,
    ) -> SolverResult<Self> {
        let name = name.into();
        let reference = substances.first().ok_or_else(|| SolverError::ProblemSetup {
            what: format!("chamber '{name}' has no substances"),
        })?;
        let conditions = Conditions::from_ideal_gas(
            reference.total_moles(),
            temperature_k,
            reference_pressure_pa,
        )?;
        Self::new(name, conditions, substances)
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn substances(&self) -> &[Substance] {
        &self.substances
    }

    pub fn substance(&self, name: &str) -> Option<&Substance> {
        self.substances.iter().find(|s| s.name() == name)
    }

    pub fn volume(&self) -> f64 {
        self.conditions.volume_l()
    }

    pub fn temperature(&self) -> f64 {
        self.conditions.temperature_k()
    }

    /// Total pressure: sum of partial pressures (Dalton).
    pub fn pressure(&self) -> f64 {
        self.substances
            .iter()
            .map(|s| s.partial_pressure(&self.conditions))
            .sum()
    }

    pub fn total_gas_moles(&self) -> f64 {
        self.substances.iter().map(Substance::gas_moles).sum()
    }

    pub fn total_liquid_moles(&self) -> f64 {
        self.substances.iter().map(Substance::liquid_moles).sum()
    }

    pub fn is_at_equilibrium(&self) -> bool {
        self.substances
            .iter()
            .all(|s| s.is_at_equilibrium(&self.conditions))
    }

    pub fn apply_temperature_delta(&mut self, delta_k: f64) -> TemperatureResponse {
        self.conditions.apply_temperature_delta(delta_k);
        let partial_pressures = self
            .substances
            .iter()
            .map(|s| s.partial_pressure(&self.conditions))
            .collect();
        TemperatureResponse {
            partial_pressures,
            at_equilibrium: self.is_at_equilibrium(),
        }
    }

    /// Change the shared volume by `delta_l`. Returns `false` without
    /// touching anything if the volume would become negative.
    pub fn apply_volume_delta(&mut self, delta_l: f64) -> bool {
        if !self.conditions.accepts_volume_delta(delta_l) {
            return false;
        }
        self.conditions.apply_volume_delta(delta_l);
        true
    }

    pub fn drive_toward_equilibrium(&mut self, delta_moles: f64) {
        let conditions = self.conditions;
        for s in &mut self.substances {
            s.drive_toward_equilibrium(&conditions, delta_moles);
        }
    }
}
