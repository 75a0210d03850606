//! Orchestrator endpoints

/// Orchestrator endpoints. Every request is a JSON `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Register an experiment definition
    RegisterExperiment,
    /// Start a new run of an experiment
    BeginRun,
    /// Start a new run, preferring the previously used task
    BeginStickyRun,
    /// Fetch a run record
    GetRun,
    /// Attach metrics to a run
    UpdateRun,
    /// Conclude a run (served by the same endpoint as [`Endpoint::GetRun`])
    EndRun,
    /// Draw sample points from a hyperparameter space
    SampleSpace,
}

impl Endpoint {
    /// Path relative to the orchestrator base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::RegisterExperiment => "registerExperiment",
            Self::BeginRun => "beginRun",
            Self::BeginStickyRun => "beginRunSticky",
            Self::GetRun | Self::EndRun => "getRun",
            Self::UpdateRun => "updateRun",
            Self::SampleSpace => "monteCarloSampleSpace",
        }
    }
}
