//! Run a scenario end to end and keep one record per temperature step.

use tracing::info;
use vle_project::{CompiledScenario, ScenarioDef, compile_scenario};
use vle_solver::{SOLVER_VERSION, ScheduleEvent, run_schedule};

use crate::ResultsResult;
use crate::hash::compute_run_id;
use crate::store::{RunStore, StepWriter};
use crate::types::{RunManifest, StepRecord};

#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub manifest: RunManifest,
    pub records: Vec<StepRecord>,
    pub loaded_from_cache: bool,
}

/// Compile and run `scenario`, recording the initial state and every step.
pub fn record_scenario(
    scenario: &ScenarioDef,
    progress: Option<&mut dyn FnMut(&ScheduleEvent<'_>)>,
) -> ResultsResult<RecordedRun> {
    record(scenario, None, progress)
}

fn record(
    scenario: &ScenarioDef,
    mut sink: Option<&mut StepWriter>,
    mut progress: Option<&mut dyn FnMut(&ScheduleEvent<'_>)>,
) -> ResultsResult<RecordedRun> {
    let CompiledScenario {
        mut solver,
        schedule,
    } = compile_scenario(scenario)?;

    let initial = StepRecord::initial(solver.snapshot(), solver.is_pressure_balanced());
    if let Some(writer) = sink.as_mut() {
        writer.append(&initial)?;
    }
    let mut records = vec![initial];

    // The observer cannot fail; the first write error is kept and returned
    // once the schedule finishes.
    let mut write_error = None;
    let mut observer = |event: &ScheduleEvent<'_>| {
        let record = StepRecord::from_report(event.step, &event.report, event.solver.snapshot());
        if write_error.is_none()
            && let Some(writer) = sink.as_mut()
            && let Err(e) = writer.append(&record)
        {
            write_error = Some(e);
        }
        records.push(record);
        if let Some(cb) = progress.as_mut() {
            cb(event);
        }
    };
    let summary = run_schedule(&mut solver, &schedule, Some(&mut observer))?;
    if let Some(e) = write_error {
        return Err(e);
    }

    info!(
        scenario = %scenario.name,
        steps = summary.steps,
        non_converged_steps = summary.non_converged_steps,
        final_temperature_k = summary.final_temperature_k,
        "scenario run finished"
    );

    let manifest = RunManifest {
        run_id: compute_run_id(scenario, SOLVER_VERSION),
        scenario_name: scenario.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        solver_version: SOLVER_VERSION.to_string(),
        initial_temperature_k: scenario.initial_temperature_k,
        target_temperature_k: scenario.target_temperature_k,
        steps: summary.steps,
        non_converged_steps: summary.non_converged_steps,
        unbalanced_steps: summary.unbalanced_steps,
    };

    Ok(RecordedRun {
        manifest,
        records,
        loaded_from_cache: false,
    })
}

/// Load the cached run for `scenario` if there is one. Otherwise run it,
/// streaming each step into the store, and write the manifest at the end.
pub fn ensure_run(
    store: &RunStore,
    scenario: &ScenarioDef,
    use_cache: bool,
    progress: Option<&mut dyn FnMut(&ScheduleEvent<'_>)>,
) -> ResultsResult<RecordedRun> {
    let run_id = compute_run_id(scenario, SOLVER_VERSION);

    if use_cache && store.has_run(&run_id) {
        let (manifest, records) = store.load_run(&run_id)?;
        return Ok(RecordedRun {
            manifest,
            records,
            loaded_from_cache: true,
        });
    }

    let mut steps = store.begin_run(&run_id)?;
    let run = record(scenario, Some(&mut steps), progress)?;
    let written = steps.finish()?;
    store.write_manifest(&run.manifest)?;
    info!(%run_id, records = written, "run saved");

    Ok(run)
}
