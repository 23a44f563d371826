//! Query helpers for extracting plot data from loaded runs.
//!
//! Series are keyed by temperature, the natural x-axis of a cool-down.

use crate::types::StepRecord;
use crate::{ResultsError, ResultsResult};
use vle_solver::{ChamberSnapshot, SubstanceSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Temperature of the first and last record
    pub temperature_range: (f64, f64),
    pub record_count: usize,
    pub chamber_count: usize,
    pub substance_count: usize,
    pub non_converged_steps: usize,
}

pub fn run_summary(records: &[StepRecord]) -> ResultsResult<RunSummary> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Err(ResultsError::EmptyRun);
    };

    Ok(RunSummary {
        temperature_range: (first.temperature_k, last.temperature_k),
        record_count: records.len(),
        chamber_count: first.snapshot.chambers.len(),
        substance_count: first
            .snapshot
            .chambers
            .iter()
            .map(|c| c.substances.len())
            .sum(),
        non_converged_steps: records.iter().filter(|r| !r.converged).count(),
    })
}

pub fn list_chambers(records: &[StepRecord]) -> Vec<String> {
    records
        .first()
        .map(|r| r.snapshot.chambers.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default()
}

pub fn list_substances(records: &[StepRecord], chamber: &str) -> ResultsResult<Vec<String>> {
    let first = records.first().ok_or(ResultsError::EmptyRun)?;
    let snapshot = find_chamber(&first.snapshot.chambers, chamber)?;
    Ok(snapshot.substances.iter().map(|s| s.name.clone()).collect())
}

fn find_chamber<'a>(chambers: &'a [ChamberSnapshot], name: &str) -> ResultsResult<&'a ChamberSnapshot> {
    chambers
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| ResultsError::UnknownEntity {
            kind: "chamber",
            name: name.to_string(),
        })
}

fn find_substance<'a>(
    chamber: &'a ChamberSnapshot,
    name: &str,
) -> ResultsResult<&'a SubstanceSnapshot> {
    chamber
        .substance(name)
        .ok_or_else(|| ResultsError::UnknownEntity {
            kind: "substance",
            name: format!("{}/{}", chamber.name, name),
        })
}

fn chamber_value(chamber: &ChamberSnapshot, variable: &str) -> ResultsResult<f64> {
    let value = match variable {
        "p_pa" | "pressure" => chamber.pressure_pa,
        "t_k" | "temperature" => chamber.temperature_k,
        "v_l" | "volume" => chamber.volume_l,
        "gas_moles" => chamber.gas_moles,
        "liquid_moles" => chamber.liquid_moles,
        _ => return Err(ResultsError::UnknownVariable(variable.to_string())),
    };
    Ok(value)
}

fn substance_value(substance: &SubstanceSnapshot, variable: &str) -> ResultsResult<f64> {
    let value = match variable {
        "p_pa" | "partial_pressure" | "pressure" => substance.partial_pressure_pa,
        "p_sat_pa" | "saturation_pressure" => substance.saturation_pressure_pa,
        "gas_moles" => substance.gas_moles,
        "liquid_moles" => substance.liquid_moles,
        _ => return Err(ResultsError::UnknownVariable(variable.to_string())),
    };
    Ok(value)
}

/// `(temperature_k, value)` pairs for a chamber variable.
pub fn extract_chamber_series(
    records: &[StepRecord],
    chamber: &str,
    variable: &str,
) -> ResultsResult<Vec<(f64, f64)>> {
    records
        .iter()
        .map(|record| {
            let c = find_chamber(&record.snapshot.chambers, chamber)?;
            Ok((record.temperature_k, chamber_value(c, variable)?))
        })
        .collect()
}

/// `(temperature_k, value)` pairs for a substance variable.
pub fn extract_substance_series(
    records: &[StepRecord],
    chamber: &str,
    substance: &str,
    variable: &str,
) -> ResultsResult<Vec<(f64, f64)>> {
    records
        .iter()
        .map(|record| {
            let c = find_chamber(&record.snapshot.chambers, chamber)?;
            let s = find_substance(c, substance)?;
            Ok((record.temperature_k, substance_value(s, variable)?))
        })
        .collect()
}
