//! Experiment Definition - the frozen document registered with the orchestrator

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Applications, DataGroups, ModelGroups};
use crate::Result;

/// Groups and applications making up an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionBody {
    data_groups: DataGroups,
    model_groups: ModelGroups,
    applications: Applications,
}

/// A complete experiment definition.
///
/// Produced by [`ExperimentDefinitionBuilder::finalize`](super::ExperimentDefinitionBuilder::finalize);
/// serializes to the registration body:
///
/// ```text
/// { "name": ..., "runs_per_pair": ..., "definition": { "data_groups", "model_groups", "applications" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDefinition {
    name: String,
    runs_per_pair: u32,
    definition: DefinitionBody,
}

impl ExperimentDefinition {
    pub(crate) fn new(
        name: impl Into<String>,
        runs_per_pair: u32,
        data_groups: DataGroups,
        model_groups: ModelGroups,
        applications: Applications,
    ) -> Self {
        Self {
            name: name.into(),
            runs_per_pair,
            definition: DefinitionBody {
                data_groups,
                model_groups,
                applications,
            },
        }
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get how many times each (hyperparameter, task) pair is run.
    #[must_use]
    pub const fn runs_per_pair(&self) -> u32 {
        self.runs_per_pair
    }

    /// Get the data groups.
    #[must_use]
    pub const fn data_groups(&self) -> &DataGroups {
        &self.definition.data_groups
    }

    /// Get the model groups.
    #[must_use]
    pub const fn model_groups(&self) -> &ModelGroups {
        &self.definition.model_groups
    }

    /// Get the applications.
    #[must_use]
    pub const fn applications(&self) -> &Applications {
        &self.definition.applications
    }

    /// Registration request body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
