use vle_results::{RunManifest, RunStore, StepRecord};
use vle_solver::{ChamberSnapshot, SystemSnapshot};

fn manifest(run_id: &str, scenario: &str, timestamp: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        scenario_name: scenario.to_string(),
        timestamp: timestamp.to_string(),
        solver_version: "0.1.0".to_string(),
        initial_temperature_k: 300.0,
        target_temperature_k: 299.0,
        steps: 1,
        non_converged_steps: 0,
        unbalanced_steps: 0,
    }
}

fn record(step: usize, temperature_k: f64) -> StepRecord {
    let snapshot = SystemSnapshot {
        temperature_k,
        mean_pressure_pa: 1.0e5,
        chambers: vec![ChamberSnapshot {
            name: "a".to_string(),
            temperature_k,
            pressure_pa: 1.0e5,
            volume_l: 24.9,
            gas_moles: 1.0,
            liquid_moles: 0.0,
            at_equilibrium: true,
            substances: Vec::new(),
        }],
    };
    StepRecord {
        step,
        temperature_k,
        iterations: 1,
        converged: true,
        pressure_balanced: true,
        snapshot,
    }
}

#[test]
fn store_smoke_test() {
    let temp_dir = std::env::temp_dir().join("vle_results_test");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    let m = manifest("test_run_123", "cooldown", "2026-01-01T00:00:00Z");
    let records = vec![record(0, 300.0), record(1, 299.0)];

    store.save_run(&m, &records).unwrap();
    assert!(store.has_run("test_run_123"));

    let (loaded_manifest, loaded_records) = store.load_run("test_run_123").unwrap();
    assert_eq!(loaded_manifest, m);
    assert_eq!(loaded_records, records);

    store.delete_run("test_run_123").unwrap();
    assert!(!store.has_run("test_run_123"));

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn list_runs_filters_by_scenario_and_sorts() {
    let temp_dir = std::env::temp_dir().join("vle_results_test_list");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    store
        .save_run(&manifest("late", "cooldown", "2026-01-02T00:00:00Z"), &[])
        .unwrap();
    store
        .save_run(&manifest("early", "cooldown", "2026-01-01T00:00:00Z"), &[])
        .unwrap();
    store
        .save_run(&manifest("other", "warmup", "2026-01-01T00:00:00Z"), &[])
        .unwrap();

    let runs = store.list_runs("cooldown").unwrap();
    let ids: Vec<&str> = runs.iter().map(|m| m.run_id.as_str()).collect();
    assert_eq!(ids, vec!["early", "late"]);

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn missing_run_is_reported() {
    let temp_dir = std::env::temp_dir().join("vle_results_test_missing");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    assert!(matches!(
        store.load_manifest("nope"),
        Err(vle_results::ResultsError::RunNotFound { .. })
    ));

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn streamed_steps_only_count_once_the_manifest_is_written() {
    let temp_dir = std::env::temp_dir().join("vle_results_test_stream");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    let m = manifest("streamed", "cooldown", "2026-01-01T00:00:00Z");

    let mut steps = store.begin_run("streamed").unwrap();
    steps.append(&record(0, 300.0)).unwrap();
    steps.append(&record(1, 299.0)).unwrap();
    assert_eq!(steps.written(), 2);
    assert_eq!(steps.finish().unwrap(), 2);

    // Steps on disk but no manifest yet: an unfinished run.
    assert!(!store.has_run("streamed"));
    assert!(store.list_runs("cooldown").unwrap().is_empty());
    assert_eq!(store.load_steps("streamed").unwrap().len(), 2);

    store.write_manifest(&m).unwrap();
    assert!(store.has_run("streamed"));
    assert_eq!(store.list_runs("cooldown").unwrap().len(), 1);

    // Restarting the same id drops the old manifest until the new one lands.
    let steps = store.begin_run("streamed").unwrap();
    assert!(!store.has_run("streamed"));
    assert_eq!(steps.finish().unwrap(), 0);
    assert!(store.load_steps("streamed").unwrap().is_empty());

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn run_ids_cannot_escape_the_store() {
    let temp_dir = std::env::temp_dir().join("vle_results_test_escape");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.join("runs")).unwrap();
    let m = manifest("../outside", "cooldown", "2026-01-01T00:00:00Z");

    assert!(matches!(
        store.save_run(&m, &[]),
        Err(vle_results::ResultsError::InvalidPath { .. })
    ));
    assert!(!temp_dir.join("outside").exists());
    assert!(matches!(
        store.load_steps("a/b"),
        Err(vle_results::ResultsError::InvalidPath { .. })
    ));

    let _ = std::fs::remove_dir_all(&temp_dir);
}
