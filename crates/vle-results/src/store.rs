//! On-disk run cache.
//!
//! Each run lives in `<root>/<run_id>/` as `steps.jsonl` (one [`StepRecord`]
//! per line, appended while the schedule runs) and `manifest.json`. The
//! manifest is written last, so a directory without one is an unfinished run
//! and is never served from the cache.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::types::{RunManifest, StepRecord};
use crate::{ResultsError, ResultsResult};

const MANIFEST_FILE: &str = "manifest.json";
const STEPS_FILE: &str = "steps.jsonl";

#[derive(Debug, Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

/// Appends step records to a run's `steps.jsonl` as they are produced.
#[derive(Debug)]
pub struct StepWriter {
    writer: BufWriter<File>,
    written: usize,
}

impl StepWriter {
    pub fn append(&mut self, record: &StepRecord) -> ResultsResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered lines and return how many records were written.
    pub fn finish(mut self) -> ResultsResult<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    /// Store next to the scenario file, under `.vle/runs`.
    pub fn for_scenario(scenario_path: &Path) -> ResultsResult<Self> {
        let scenario_dir = scenario_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "scenario path has no parent directory".to_string(),
            })?;
        Self::new(scenario_dir.join(".vle").join("runs"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Directory for `run_id`, which must be a single plain path component.
    fn run_dir(&self, run_id: &str) -> ResultsResult<PathBuf> {
        let mut components = Path::new(run_id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == run_id => {
                Ok(self.root_dir.join(run_id))
            }
            _ => Err(ResultsError::InvalidPath {
                message: format!("invalid run id '{run_id}'"),
            }),
        }
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id)
            .map(|dir| dir.join(MANIFEST_FILE).is_file())
            .unwrap_or(false)
    }

    /// Start a run: creates its directory and an empty `steps.jsonl`.
    ///
    /// Any manifest left from an earlier run with the same id is removed
    /// first, so the run only counts as cached once
    /// [`write_manifest`](Self::write_manifest) succeeds.
    pub fn begin_run(&self, run_id: &str) -> ResultsResult<StepWriter> {
        let run_dir = self.run_dir(run_id)?;
        fs::create_dir_all(&run_dir)?;
        match fs::remove_file(run_dir.join(MANIFEST_FILE)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        let file = File::create(run_dir.join(STEPS_FILE))?;
        Ok(StepWriter {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write_manifest(&self, manifest: &RunManifest) -> ResultsResult<()> {
        let path = self.run_dir(&manifest.run_id)?.join(MANIFEST_FILE);
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, manifest)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a complete run in one go.
    pub fn save_run(&self, manifest: &RunManifest, records: &[StepRecord]) -> ResultsResult<()> {
        let mut steps = self.begin_run(&manifest.run_id)?;
        for record in records {
            steps.append(record)?;
        }
        steps.finish()?;
        self.write_manifest(manifest)
    }

    fn open(&self, run_id: &str, file: &str) -> ResultsResult<BufReader<File>> {
        let path = self.run_dir(run_id)?.join(file);
        match File::open(path) {
            Ok(f) => Ok(BufReader::new(f)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let reader = self.open(run_id, MANIFEST_FILE)?;
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load_steps(&self, run_id: &str) -> ResultsResult<Vec<StepRecord>> {
        let reader = self.open(run_id, STEPS_FILE)?;
        serde_json::Deserializer::from_reader(reader)
            .into_iter::<StepRecord>()
            .map(|record| record.map_err(ResultsError::from))
            .collect()
    }

    pub fn load_run(&self, run_id: &str) -> ResultsResult<(RunManifest, Vec<StepRecord>)> {
        Ok((self.load_manifest(run_id)?, self.load_steps(run_id)?))
    }

    /// Finished runs of `scenario_name`, oldest first.
    pub fn list_runs(&self, scenario_name: &str) -> ResultsResult<Vec<RunManifest>> {
        let entries = match fs::read_dir(&self.root_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut runs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().into_owned();
            match self.load_manifest(&run_id) {
                Ok(manifest) if manifest.scenario_name == scenario_name => runs.push(manifest),
                Ok(_) => {}
                Err(e) => debug!(%run_id, error = %e, "skipping unfinished or unreadable run"),
            }
        }

        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        match fs::remove_dir_all(self.run_dir(run_id)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
