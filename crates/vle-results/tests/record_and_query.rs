use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use vle_project::{ChamberDef, ScenarioDef, SubstanceDef, VaporPressureDef};
use vle_results::{
    ResultsError, RunStore, ensure_run, extract_chamber_series, extract_substance_series,
    list_chambers, list_substances, record_scenario, run_summary,
};
use vle_solver::SolverConfig;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn nitrogen(moles: f64) -> SubstanceDef {
    SubstanceDef {
        name: "nitrogen".to_string(),
        moles,
        initial_pressure_pa: Some(1.0e5),
        tolerance_pa: 0.0,
        vapor_pressure: VaporPressureDef::Inert,
    }
}

fn inert_scenario() -> ScenarioDef {
    ScenarioDef {
        version: 1,
        name: "inert-cooldown".to_string(),
        initial_temperature_k: 300.0,
        target_temperature_k: 295.0,
        steps_per_kelvin: 1,
        solver: SolverConfig::default(),
        chambers: vec![
            ChamberDef {
                name: "a".to_string(),
                substances: vec![nitrogen(1.0)],
            },
            ChamberDef {
                name: "b".to_string(),
                substances: vec![nitrogen(0.5)],
            },
        ],
    }
}

#[test]
fn record_keeps_initial_state_and_every_step() {
    let scenario = inert_scenario();
    let mut seen = 0;
    let mut progress = |_: &vle_solver::ScheduleEvent<'_>| seen += 1;
    let run = record_scenario(&scenario, Some(&mut progress)).unwrap();

    assert_eq!(seen, 5);
    assert_eq!(run.records.len(), 6);
    assert_eq!(run.manifest.steps, 5);
    assert_eq!(run.manifest.non_converged_steps, 0);
    assert!(!run.loaded_from_cache);
    assert_eq!(run.records[0].step, 0);
    assert_eq!(run.records[0].temperature_k, 300.0);
    assert_eq!(run.records[5].temperature_k, 295.0);
}

#[test]
fn queries_follow_the_cooldown() {
    let run = record_scenario(&inert_scenario(), None).unwrap();

    let summary = run_summary(&run.records).unwrap();
    assert_eq!(summary.record_count, 6);
    assert_eq!(summary.temperature_range, (300.0, 295.0));
    assert_eq!(summary.chamber_count, 2);
    assert_eq!(summary.substance_count, 2);

    assert_eq!(list_chambers(&run.records), vec!["a", "b"]);
    assert_eq!(list_substances(&run.records, "b").unwrap(), vec!["nitrogen"]);

    // Ideal gas at fixed volume: pressure falls with temperature.
    let pressure = extract_chamber_series(&run.records, "a", "pressure").unwrap();
    assert_eq!(pressure.len(), 6);
    assert!(pressure.windows(2).all(|w| w[1].1 < w[0].1));

    let liquid = extract_substance_series(&run.records, "a", "nitrogen", "liquid_moles").unwrap();
    assert!(liquid.iter().all(|(_, n)| *n == 0.0));
}

#[test]
fn unknown_names_are_errors() {
    let run = record_scenario(&inert_scenario(), None).unwrap();

    assert!(matches!(
        extract_chamber_series(&run.records, "zz", "pressure"),
        Err(ResultsError::UnknownEntity { kind: "chamber", .. })
    ));
    assert!(matches!(
        extract_chamber_series(&run.records, "a", "enthalpy"),
        Err(ResultsError::UnknownVariable(_))
    ));
    assert!(matches!(
        extract_substance_series(&run.records, "a", "argon", "gas_moles"),
        Err(ResultsError::UnknownEntity { kind: "substance", .. })
    ));
    assert!(matches!(run_summary(&[]), Err(ResultsError::EmptyRun)));
}

#[test]
fn ensure_run_uses_cache_on_second_call() {
    let project_dir = unique_temp_dir("vle_results_project");
    fs::create_dir_all(&project_dir).expect("failed to create temp project dir");
    let scenario_path = project_dir.join("scenario.yaml");
    let store = RunStore::for_scenario(&scenario_path).expect("failed to create run store");
    let scenario = inert_scenario();

    let first = ensure_run(&store, &scenario, true, None).unwrap();
    assert!(!first.loaded_from_cache);

    let second = ensure_run(&store, &scenario, true, None).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(second.manifest.run_id, first.manifest.run_id);
    assert_eq!(second.records.len(), first.records.len());

    let forced = ensure_run(&store, &scenario, false, None).unwrap();
    assert!(!forced.loaded_from_cache);

    let runs = store.list_runs("inert-cooldown").unwrap();
    assert_eq!(runs.len(), 1);

    let _ = fs::remove_dir_all(&project_dir);
}
