//! Orchestrator client: typed calls over an [`OrchestratorTransport`]

use serde_json::{json, Value};
use tracing::{debug, info};

use super::{Endpoint, HttpTransport, OrchestratorTransport};
use crate::config::ClientConfig;
use crate::definition::{ExperimentDefinition, HyperparameterSpace};
use crate::{Error, Result};

/// Response the orchestrator sends instead of a run id once every run is assigned
pub const EXPERIMENT_CONCLUDED: &str = "experiment concluded";

/// Strip the quote characters the orchestrator wraps string responses in.
///
/// Removes one leading and one trailing `"` when present; anything else is
/// returned unchanged.
#[must_use]
pub fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Typed orchestrator calls.
#[derive(Debug, Clone)]
pub struct OrchestratorClient<T = HttpTransport> {
    transport: T,
}

impl OrchestratorClient<HttpTransport> {
    /// Create an HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: OrchestratorTransport> OrchestratorClient<T> {
    /// Wrap a transport.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Get the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Register an experiment definition; returns the orchestrator's response text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the request fails.
    pub fn register(&self, definition: &ExperimentDefinition) -> Result<String> {
        let response = self
            .transport
            .post(Endpoint::RegisterExperiment, &definition.to_payload()?)?;
        info!(experiment = definition.name(), %response, "experiment registered");
        Ok(response)
    }

    /// Request a new run of `experiment`; returns the run id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExperimentConcluded`] when no runs remain,
    /// [`Error::Transport`] if the request fails or yields an empty run id.
    pub fn begin_run(&self, experiment: &str) -> Result<String> {
        let response = self
            .transport
            .post(Endpoint::BeginRun, &json!({ "experiment": experiment }))?;
        Self::run_id_from(Endpoint::BeginRun, experiment, &response)
    }

    /// Request a new run, hinting that `last_task` should be reused if possible.
    ///
    /// # Errors
    ///
    /// Same as [`begin_run`](Self::begin_run).
    pub fn begin_sticky_run(&self, experiment: &str, last_task: &str) -> Result<String> {
        let response = self.transport.post(
            Endpoint::BeginStickyRun,
            &json!({ "experiment": experiment, "last_task": last_task }),
        )?;
        Self::run_id_from(Endpoint::BeginStickyRun, experiment, &response)
    }

    fn run_id_from(endpoint: Endpoint, experiment: &str, response: &str) -> Result<String> {
        let run_id = strip_quotes(response);
        if run_id == EXPERIMENT_CONCLUDED {
            return Err(Error::ExperimentConcluded(experiment.to_string()));
        }
        if run_id.trim().is_empty() {
            return Err(Error::Transport(format!(
                "{} returned no run id for '{experiment}' (response {response:?})",
                endpoint.path()
            )));
        }
        info!(experiment, run_id, "new run");
        Ok(run_id.to_string())
    }

    /// Fetch the run record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the request fails, [`Error::Json`] if the
    /// record is not JSON.
    pub fn get_run(&self, run_id: &str) -> Result<Value> {
        let response = self.transport.post(Endpoint::GetRun, &json!({ "run": run_id }))?;
        Ok(serde_json::from_str(&response)?)
    }

    /// Attach metrics to a run; returns the orchestrator's response text unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the request fails.
    pub fn update_run(&self, run_id: &str, metrics: &Value) -> Result<String> {
        let response = self
            .transport
            .post(Endpoint::UpdateRun, &json!({ "run": run_id, "metrics": metrics }))?;
        debug!(run_id, %response, "run updated");
        Ok(response)
    }

    /// Conclude a run; returns the final run record.
    ///
    /// # Errors
    ///
    /// Same as [`get_run`](Self::get_run).
    pub fn end_run(&self, run_id: &str) -> Result<Value> {
        let response = self.transport.post(Endpoint::EndRun, &json!({ "run": run_id }))?;
        let record: Value = serde_json::from_str(&response)?;
        info!(run_id, %record, "completed run");
        Ok(record)
    }

    /// Draw `n` points from a hyperparameter space using the orchestrator's sampler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the request fails, [`Error::Json`] if the
    /// response is not a JSON sequence.
    pub fn sample_space(&self, space: &HyperparameterSpace, n: usize) -> Result<Vec<Value>> {
        let response = self
            .transport
            .post(Endpoint::SampleSpace, &json!({ "space": space, "n": n }))?;
        Ok(serde_json::from_str(&response)?)
    }
}
