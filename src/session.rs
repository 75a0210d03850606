//! Run Session - lifecycle of benchmarking runs plus a one-slot dataset cache
//!
//! ```text
//! NotStarted ──begin──> Active ──update*──> Active ──end──> Concluded
//!                         ^                                    │
//!                         └───────────────begin────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{Catalog, OpenMlCatalog, TaskDataset};
use crate::config::ClientConfig;
use crate::orchestrator::{HttpTransport, OrchestratorClient, OrchestratorTransport};
use crate::{Error, Result};

/// Lifecycle state of a session's current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// No run has been started.
    NotStarted,
    /// A run is in progress and accepts updates.
    Active,
    /// The last run was ended.
    Concluded,
}

/// A run assigned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunHandle {
    run_id: String,
    experiment: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl RunHandle {
    fn start(run_id: String, experiment: &str) -> Self {
        Self {
            run_id,
            experiment: experiment.to_string(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the experiment name.
    #[must_use]
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Get the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get the end timestamp, if the run has ended.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Whether the run is still in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// One caller's sequence of runs against an experiment.
///
/// Holds the most recently loaded task dataset; loading the same task again
/// is served from memory, loading a different task replaces it.
pub struct RunSession<T = HttpTransport, C = OpenMlCatalog> {
    client: OrchestratorClient<T>,
    catalog: C,
    run: Option<RunHandle>,
    cache: Option<(String, TaskDataset)>,
}

impl RunSession<HttpTransport, OpenMlCatalog> {
    /// Create a session talking to the configured orchestrator and catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if an HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(
            OrchestratorClient::from_config(config)?,
            OpenMlCatalog::new(config)?,
        ))
    }
}

impl<T: OrchestratorTransport, C: Catalog> RunSession<T, C> {
    /// Create a session from an orchestrator client and a catalog.
    #[must_use]
    pub const fn new(client: OrchestratorClient<T>, catalog: C) -> Self {
        Self {
            client,
            catalog,
            run: None,
            cache: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        match &self.run {
            None => RunState::NotStarted,
            Some(run) if run.is_active() => RunState::Active,
            Some(_) => RunState::Concluded,
        }
    }

    /// The current (or last) run.
    #[must_use]
    pub const fn run(&self) -> Option<&RunHandle> {
        self.run.as_ref()
    }

    /// Task id of the cached dataset, if any.
    #[must_use]
    pub fn last_task_id(&self) -> Option<&str> {
        self.cache.as_ref().map(|(task_id, _)| task_id.as_str())
    }

    /// Start a new run of `experiment`; returns its run id.
    ///
    /// Starting while a run is active abandons that run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExperimentConcluded`] if no runs remain, leaving the
    /// session state unchanged; [`Error::Transport`] if the request fails.
    pub fn begin(&mut self, experiment: &str) -> Result<String> {
        let run_id = self.client.begin_run(experiment)?;
        Ok(self.start(experiment, run_id))
    }

    /// Like [`begin`](Self::begin), but asks the orchestrator to prefer the
    /// task whose dataset is cached (empty hint when nothing is cached).
    ///
    /// # Errors
    ///
    /// Same as [`begin`](Self::begin).
    pub fn begin_sticky(&mut self, experiment: &str) -> Result<String> {
        let last_task = self.last_task_id().unwrap_or_default();
        let run_id = self.client.begin_sticky_run(experiment, last_task)?;
        Ok(self.start(experiment, run_id))
    }

    fn start(&mut self, experiment: &str, run_id: String) -> String {
        if let Some(previous) = self.run.as_ref().filter(|run| run.is_active()) {
            warn!(run_id = previous.run_id(), "abandoning active run");
        }
        let handle = RunHandle::start(run_id, experiment);
        let run_id = handle.run_id.clone();
        self.run = Some(handle);
        run_id
    }

    fn active_run_id(&self, operation: &str) -> Result<&str> {
        match &self.run {
            Some(run) if run.is_active() => Ok(run.run_id()),
            Some(run) => Err(Error::InvalidState(format!(
                "cannot {operation}: run '{}' already ended",
                run.run_id()
            ))),
            None => Err(Error::InvalidState(format!(
                "cannot {operation}: no run started, use 'begin'"
            ))),
        }
    }

    /// Send metrics for the active run; returns the orchestrator's response unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless a run is active,
    /// [`Error::Transport`] if the request fails.
    pub fn update(&self, metrics: &Value) -> Result<String> {
        let run_id = self.active_run_id("update")?;
        self.client.update_run(run_id, metrics)
    }

    /// Fetch the active run's record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless a run is active.
    pub fn get_run(&self) -> Result<Value> {
        let run_id = self.active_run_id("get run")?;
        self.client.get_run(run_id)
    }

    /// End the active run; returns its final record.
    ///
    /// If the request fails the run stays active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless a run is active,
    /// [`Error::Transport`] if the request fails.
    pub fn end(&mut self) -> Result<Value> {
        let record = self.client.end_run(self.active_run_id("end")?)?;
        if let Some(run) = self.run.as_mut() {
            run.ended_at = Some(Utc::now());
        }
        Ok(record)
    }

    /// Load a task's dataset, reusing the cached one when `task_id` matches it.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors; the previous cache entry is kept on failure.
    pub fn load_dataset(&mut self, task_id: &str) -> Result<&TaskDataset> {
        let entry = match self.cache.take() {
            Some(entry) if entry.0 == task_id => {
                debug!(task_id, "dataset cache hit");
                entry
            }
            previous => {
                debug!(task_id, "dataset cache miss");
                match self.catalog.load_task(task_id) {
                    Ok(dataset) => (task_id.to_string(), dataset),
                    Err(err) => {
                        self.cache = previous;
                        return Err(err);
                    }
                }
            }
        };

        let (_, dataset) = &*self.cache.insert(entry);
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::Endpoint;
    use arrow::array::{ArrayRef, Float64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;

    /// Orchestrator that hands out run ids `"r1"`, `"r2"`, ... in quotes.
    #[derive(Default)]
    struct FakeOrchestrator {
        runs: Cell<u32>,
        concluded: Cell<bool>,
        sticky_hints: RefCell<Vec<String>>,
    }

    impl OrchestratorTransport for FakeOrchestrator {
        fn post(&self, endpoint: Endpoint, body: &Value) -> Result<String> {
            match endpoint {
                Endpoint::BeginRun | Endpoint::BeginStickyRun => {
                    if let Some(hint) = body["last_task"].as_str() {
                        self.sticky_hints.borrow_mut().push(hint.to_string());
                    }
                    if self.concluded.get() {
                        return Ok("\"experiment concluded\"".to_string());
                    }
                    self.runs.set(self.runs.get() + 1);
                    Ok(format!("\"r{}\"", self.runs.get()))
                }
                Endpoint::UpdateRun => Ok(format!("updated {}", body["run"].as_str().unwrap_or_default())),
                Endpoint::GetRun | Endpoint::EndRun => Ok(json!({"_id": body["run"], "done": true}).to_string()),
                _ => Err(Error::Transport(format!("unexpected {endpoint:?}"))),
            }
        }
    }

    #[derive(Default)]
    struct CountingCatalog {
        fetches: Cell<usize>,
    }

    impl Catalog for CountingCatalog {
        fn suite_tasks(&self, _suite_id: u32) -> Result<Vec<u64>> {
            Ok(Vec::new())
        }

        fn load_task(&self, task_id: &str) -> Result<TaskDataset> {
            if task_id == "broken" {
                return Err(Error::Catalog("broken task".to_string()));
            }
            self.fetches.set(self.fetches.get() + 1);
            let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Float64, false)]));
            let features = RecordBatch::try_new(schema, vec![Arc::new(Float64Array::from(vec![1.0, 2.0]))])?;
            let labels: ArrayRef = Arc::new(Float64Array::from(vec![0.0, 1.0]));
            TaskDataset::new(features, labels, vec![false], vec!["x".to_string()])
        }
    }

    fn session() -> RunSession<FakeOrchestrator, CountingCatalog> {
        RunSession::new(
            OrchestratorClient::new(FakeOrchestrator::default()),
            CountingCatalog::default(),
        )
    }

    #[test]
    fn test_lifecycle() {
        let mut session = session();
        assert_eq!(session.state(), RunState::NotStarted);

        assert_eq!(session.begin("exp").unwrap(), "r1");
        assert_eq!(session.state(), RunState::Active);
        assert_eq!(session.update(&json!({"acc": 0.9})).unwrap(), "updated r1");
        assert_eq!(session.update(&json!({"acc": 0.95})).unwrap(), "updated r1");

        let record = session.end().unwrap();
        assert_eq!(record["_id"], "r1");
        assert_eq!(session.state(), RunState::Concluded);
        assert!(session.run().unwrap().ended_at().is_some());
    }

    #[test]
    fn test_update_and_end_require_active_run() {
        let mut session = session();
        assert!(matches!(session.update(&json!({})), Err(Error::InvalidState(_))));
        assert!(matches!(session.end(), Err(Error::InvalidState(_))));

        session.begin("exp").unwrap();
        session.end().unwrap();
        assert!(matches!(session.update(&json!({})), Err(Error::InvalidState(_))));
        assert!(matches!(session.end(), Err(Error::InvalidState(_))));
        assert!(matches!(session.get_run(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_begin_while_active_abandons_run() {
        let mut session = session();
        assert_eq!(session.begin("exp").unwrap(), "r1");
        let first_started = session.run().unwrap().started_at();

        assert_eq!(session.begin("exp").unwrap(), "r2");
        assert_eq!(session.state(), RunState::Active);
        let run = session.run().unwrap();
        assert_eq!(run.run_id(), "r2");
        assert!(run.started_at() >= first_started);

        assert_eq!(session.update(&json!({"acc": 0.5})).unwrap(), "updated r2");
        assert_eq!(session.end().unwrap()["_id"], "r2");
    }

    #[test]
    fn test_begin_after_conclusion_starts_new_run() {
        let mut session = session();
        session.begin("exp").unwrap();
        session.end().unwrap();

        assert_eq!(session.begin("exp").unwrap(), "r2");
        assert_eq!(session.state(), RunState::Active);
    }

    #[test]
    fn test_concluded_experiment_leaves_state() {
        let mut session = session();
        session.client.transport().concluded.set(true);

        let err = session.begin("exp").unwrap_err();
        assert!(matches!(err, Error::ExperimentConcluded(_)));
        assert_eq!(session.state(), RunState::NotStarted);
        assert!(session.run().is_none());
    }

    #[test]
    fn test_begin_sticky_hints_cached_task() {
        let mut session = session();
        session.begin_sticky("exp").unwrap();
        session.load_dataset("336-1").unwrap();
        session.begin_sticky("exp").unwrap();

        let hints = session.client.transport().sticky_hints.borrow().clone();
        assert_eq!(hints, vec!["", "336-1"]);
    }

    #[test]
    fn test_dataset_cache_single_slot() {
        let mut session = session();
        session.load_dataset("336-1").unwrap();
        session.load_dataset("336-1").unwrap();
        assert_eq!(session.catalog.fetches.get(), 1);

        session.load_dataset("337-2").unwrap();
        assert_eq!(session.catalog.fetches.get(), 2);
        assert_eq!(session.last_task_id(), Some("337-2"));

        session.load_dataset("336-1").unwrap();
        assert_eq!(session.catalog.fetches.get(), 3);
    }

    #[test]
    fn test_failed_load_keeps_cache() {
        let mut session = session();
        session.load_dataset("336-1").unwrap();
        assert!(session.load_dataset("broken").is_err());
        assert_eq!(session.last_task_id(), Some("336-1"));

        session.load_dataset("336-1").unwrap();
        assert_eq!(session.catalog.fetches.get(), 1);
    }
}
