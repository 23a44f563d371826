//! Scenario schema definitions.

use serde::{Deserialize, Serialize};
use vle_solver::SolverConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDef {
    pub version: u32,
    pub name: String,
    pub initial_temperature_k: f64,
    pub target_temperature_k: f64,
    #[serde(default = "default_steps_per_kelvin")]
    pub steps_per_kelvin: u32,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub chambers: Vec<ChamberDef>,
}

fn default_steps_per_kelvin() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChamberDef {
    pub name: String,
    #[serde(default)]
    pub substances: Vec<SubstanceDef>,
}

/// Substances start entirely as gas. The first substance of a chamber
/// carries the pressure that sizes the chamber.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubstanceDef {
    pub name: String,
    pub moles: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_pressure_pa: Option<f64>,
    #[serde(default)]
    pub tolerance_pa: f64,
    pub vapor_pressure: VaporPressureDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VaporPressureDef {
    /// Two `[temperature_k, pressure_pa]` measurements.
    TwoPoint { samples: [[f64; 2]; 2] },
    Constant { pressure_pa: f64 },
    /// Never condenses.
    Inert,
}

impl ScenarioDef {
    pub fn chamber(&self, name: &str) -> Option<&ChamberDef> {
        self.chambers.iter().find(|c| c.name == name)
    }
}

impl ChamberDef {
    pub fn substance(&self, name: &str) -> Option<&SubstanceDef> {
        self.substances.iter().find(|s| s.name == name)
    }
}
