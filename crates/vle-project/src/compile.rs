//! Scenario -> solver compilation.

use vle_solver::{Chamber, EquilibriumSolver, TemperatureSchedule};
use vle_thermo::{Substance, VaporPressureCurve};

use crate::schema::{ChamberDef, ScenarioDef, VaporPressureDef};
use crate::validate::validate_scenario;
use crate::{ProjectError, ProjectResult};

/// A solver positioned at the initial temperature plus the ramp to run.
#[derive(Debug)]
pub struct CompiledScenario {
    pub solver: EquilibriumSolver,
    pub schedule: TemperatureSchedule,
}

pub fn compile_curve(def: &VaporPressureDef) -> ProjectResult<VaporPressureCurve> {
    let curve = match def {
        VaporPressureDef::TwoPoint { samples } => VaporPressureCurve::fit(samples[0], samples[1])?,
        VaporPressureDef::Constant { pressure_pa } => VaporPressureCurve::constant(*pressure_pa)?,
        VaporPressureDef::Inert => VaporPressureCurve::inert(),
    };
    Ok(curve)
}

fn compile_chamber(def: &ChamberDef, temperature_k: f64) -> ProjectResult<Chamber> {
    let substances = def
        .substances
        .iter()
        .map(|s| -> ProjectResult<Substance> {
            let curve = compile_curve(&s.vapor_pressure)?;
            Ok(Substance::new(s.name.clone(), s.moles, curve, s.tolerance_pa)?)
        })
        .collect::<ProjectResult<Vec<_>>>()?;

    let reference_p = def
        .substances
        .first()
        .and_then(|s| s.initial_pressure_pa)
        .ok_or_else(|| {
            ProjectError::Validation(crate::ValidationError::MissingField {
                field: "initial_pressure_pa".to_string(),
                context: format!("chamber '{}'", def.name),
            })
        })?;

    Ok(Chamber::from_reference_pressure(
        def.name.clone(),
        temperature_k,
        reference_p,
        substances,
    )?)
}

pub fn compile_scenario(scenario: &ScenarioDef) -> ProjectResult<CompiledScenario> {
    validate_scenario(scenario)?;

    let chambers = scenario
        .chambers
        .iter()
        .map(|c| compile_chamber(c, scenario.initial_temperature_k))
        .collect::<ProjectResult<Vec<_>>>()?;

    let solver = EquilibriumSolver::new(
        chambers,
        scenario.initial_temperature_k,
        scenario.solver.clone(),
    )?;
    let schedule =
        TemperatureSchedule::new(scenario.target_temperature_k, scenario.steps_per_kelvin)?;

    Ok(CompiledScenario { solver, schedule })
}
