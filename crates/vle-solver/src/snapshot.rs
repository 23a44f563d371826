//! Read-only, serialisable view of the solver state for renderers and storage.

use serde::{Deserialize, Serialize};
use vle_core::mean;
use vle_thermo::{Conditions, Substance, VaporPressureCurve};

use crate::chamber::Chamber;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceSnapshot {
    pub name: String,
    pub total_moles: f64,
    pub gas_moles: f64,
    pub liquid_moles: f64,
    pub partial_pressure_pa: f64,
    pub saturation_pressure_pa: f64,
    pub at_equilibrium: bool,
    /// Lets a renderer plot the saturation curve on its own
    pub curve: VaporPressureCurve,
}

impl SubstanceSnapshot {
    pub fn capture(substance: &Substance, cond: &Conditions) -> Self {
        Self {
            name: substance.name().to_string(),
            total_moles: substance.total_moles(),
            gas_moles: substance.gas_moles(),
            liquid_moles: substance.liquid_moles(),
            partial_pressure_pa: substance.partial_pressure(cond),
            saturation_pressure_pa: substance.saturation_pressure(cond.temperature_k()),
            at_equilibrium: substance.is_at_equilibrium(cond),
            curve: *substance.curve(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChamberSnapshot {
    pub name: String,
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub volume_l: f64,
    pub gas_moles: f64,
    pub liquid_moles: f64,
    pub at_equilibrium: bool,
    pub substances: Vec<SubstanceSnapshot>,
}

impl ChamberSnapshot {
    pub fn capture(chamber: &Chamber) -> Self {
        let cond = chamber.conditions();
        Self {
            name: chamber.name.clone(),
            temperature_k: chamber.temperature(),
            pressure_pa: chamber.pressure(),
            volume_l: chamber.volume(),
            gas_moles: chamber.total_gas_moles(),
            liquid_moles: chamber.total_liquid_moles(),
            at_equilibrium: chamber.is_at_equilibrium(),
            substances: chamber
                .substances()
                .iter()
                .map(|s| SubstanceSnapshot::capture(s, cond))
                .collect(),
        }
    }

    pub fn substance(&self, name: &str) -> Option<&SubstanceSnapshot> {
        self.substances.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub temperature_k: f64,
    pub mean_pressure_pa: f64,
    pub chambers: Vec<ChamberSnapshot>,
}

impl SystemSnapshot {
    pub fn capture(chambers: &[Chamber]) -> Self {
        let chambers: Vec<ChamberSnapshot> = chambers.iter().map(ChamberSnapshot::capture).collect();
        Self {
            temperature_k: chambers.first().map(|c| c.temperature_k).unwrap_or(0.0),
            mean_pressure_pa: mean(chambers.iter().map(|c| c.pressure_pa)).unwrap_or(0.0),
            chambers,
        }
    }

    pub fn chamber(&self, name: &str) -> Option<&ChamberSnapshot> {
        self.chambers.iter().find(|c| c.name == name)
    }

    pub fn total_volume_l(&self) -> f64 {
        self.chambers.iter().map(|c| c.volume_l).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vle_thermo::Conditions;

    #[test]
    fn capture_mirrors_chamber() {
        let cond = Conditions::new(300.0, 20.0).unwrap();
        let s = Substance::new("nitrogen", 0.5, VaporPressureCurve::inert(), 0.0).unwrap();
        let chamber = Chamber::new("a", cond, vec![s]).unwrap();

        let snap = SystemSnapshot::capture(std::slice::from_ref(&chamber));
        assert_eq!(snap.temperature_k, 300.0);
        assert_eq!(snap.mean_pressure_pa, chamber.pressure());
        assert_eq!(snap.total_volume_l(), 20.0);

        let c = snap.chamber("a").unwrap();
        assert_eq!(c.volume_l, 20.0);
        let n2 = c.substance("nitrogen").unwrap();
        assert_eq!(n2.gas_moles + n2.liquid_moles, 0.5);
        assert_eq!(n2.curve, VaporPressureCurve::inert());
    }

    #[test]
    fn snapshot_serializes() {
        let cond = Conditions::new(300.0, 20.0).unwrap();
        let s = Substance::new("nitrogen", 0.5, VaporPressureCurve::inert(), 0.0).unwrap();
        let chamber = Chamber::new("a", cond, vec![s]).unwrap();
        let snap = SystemSnapshot::capture(&[chamber]);

        let json = serde_json::to_string(&snap).unwrap();
        let back: SystemSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
