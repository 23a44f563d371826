//! Scenario validation logic.

use crate::schema::{ChamberDef, ScenarioDef, SubstanceDef, VaporPressureDef};
use std::collections::HashSet;
use vle_thermo::ideal_gas_volume;

/// Relative mismatch allowed between volumes implied by substances of one chamber.
const VOLUME_REL_TOL: f64 = 1e-6;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error(
        "Inconsistent volume in chamber {chamber}: {substance} implies {found_l} L, expected {expected_l} L"
    )]
    InconsistentVolume {
        chamber: String,
        substance: String,
        expected_l: f64,
        found_l: f64,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn require_positive(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be a positive number"))
    }
}

pub fn validate_scenario(scenario: &ScenarioDef) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    require_positive("initial_temperature_k", scenario.initial_temperature_k)?;
    require_positive("target_temperature_k", scenario.target_temperature_k)?;
    if scenario.steps_per_kelvin == 0 {
        return Err(invalid("steps_per_kelvin", 0, "must be at least 1"));
    }
    if let Err(e) = scenario.solver.validate() {
        return Err(invalid("solver", format!("{:?}", scenario.solver), &e.to_string()));
    }

    if scenario.chambers.is_empty() {
        return Err(invalid("chambers", "[]", "at least one chamber is required"));
    }

    let mut chamber_names = HashSet::new();
    for chamber in &scenario.chambers {
        if !chamber_names.insert(&chamber.name) {
            return Err(ValidationError::DuplicateId {
                id: chamber.name.clone(),
                context: "chambers".to_string(),
            });
        }
        validate_chamber(chamber, scenario.initial_temperature_k)?;
    }

    Ok(())
}

fn validate_chamber(chamber: &ChamberDef, temperature_k: f64) -> Result<(), ValidationError> {
    let context = format!("chamber '{}'", chamber.name);

    let Some(reference) = chamber.substances.first() else {
        return Err(invalid(
            format!("{context} substances"),
            "[]",
            "at least one substance is required",
        ));
    };

    let mut names = HashSet::new();
    for substance in &chamber.substances {
        if !names.insert(&substance.name) {
            return Err(ValidationError::DuplicateId {
                id: substance.name.clone(),
                context: format!("{context} substances"),
            });
        }
        validate_substance(substance, &context)?;
    }

    let Some(reference_p) = reference.initial_pressure_pa else {
        return Err(ValidationError::MissingField {
            field: "initial_pressure_pa".to_string(),
            context: format!("{context} substance '{}'", reference.name),
        });
    };
    let expected_l = ideal_gas_volume(reference.moles, temperature_k, reference_p);

    for substance in chamber.substances.iter().skip(1) {
        if let Some(p) = substance.initial_pressure_pa {
            let found_l = ideal_gas_volume(substance.moles, temperature_k, p);
            if (found_l - expected_l).abs() > VOLUME_REL_TOL * expected_l {
                return Err(ValidationError::InconsistentVolume {
                    chamber: chamber.name.clone(),
                    substance: substance.name.clone(),
                    expected_l,
                    found_l,
                });
            }
        }
    }

    Ok(())
}

fn validate_substance(substance: &SubstanceDef, context: &str) -> Result<(), ValidationError> {
    let field = |name: &str| format!("{context} substance '{}' {name}", substance.name);

    require_positive(field("moles"), substance.moles)?;
    if let Some(p) = substance.initial_pressure_pa {
        require_positive(field("initial_pressure_pa"), p)?;
    }
    if !(substance.tolerance_pa.is_finite() && substance.tolerance_pa >= 0.0) {
        return Err(invalid(
            field("tolerance_pa"),
            substance.tolerance_pa,
            "must be non-negative",
        ));
    }

    match &substance.vapor_pressure {
        VaporPressureDef::TwoPoint { samples } => {
            for [t, p] in samples {
                require_positive(field("sample temperature"), *t)?;
                require_positive(field("sample pressure"), *p)?;
            }
            if samples[0][0] == samples[1][0] {
                return Err(invalid(
                    field("samples"),
                    format!("{samples:?}"),
                    "sample temperatures must differ",
                ));
            }
        }
        VaporPressureDef::Constant { pressure_pa } => {
            require_positive(field("pressure_pa"), *pressure_pa)?;
        }
        VaporPressureDef::Inert => {}
    }

    Ok(())
}
