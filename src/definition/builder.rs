//! Experiment Definition Builder - accumulates and validates groups before registration

use serde_json::Value;
use tracing::debug;

use super::application::{parse_applications, validate_applications};
use super::data_group::partition_catalog_tasks;
use super::{Applications, DataGroups, ExperimentDefinition, ModelGroup, ModelGroups};
use crate::{Error, Result};

/// Builds an [`ExperimentDefinition`] in three steps: model groups, data
/// groups, then applications.
///
/// Each setter replaces what was stored before; nothing is merged. Setters
/// that validate leave the stored value untouched when they fail.
///
/// ```rust
/// use tabular_experiment_client::definition::ExperimentDefinitionBuilder;
/// use serde_json::json;
///
/// let mut builder = ExperimentDefinitionBuilder::new();
/// builder.set_model_groups(&json!({
///     "knn": {"model": "knn", "hype": {"k": {"distribution": "int_uniform", "min": 1, "max": 32}}}
/// }))?;
/// builder.set_data_groups_from_catalog(&["336-361072", "337-361055"]);
/// builder.set_applications(&json!({"opml_reg_purnum_group": ["knn"]}))?;
///
/// let definition = builder.finalize("knn-baseline", 60)?;
/// assert_eq!(definition.applications()["opml_reg_purnum_group"], vec!["knn"]);
/// # Ok::<(), tabular_experiment_client::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExperimentDefinitionBuilder {
    model_groups: Option<ModelGroups>,
    data_groups: Option<DataGroups>,
    applications: Option<Applications>,
}

impl ExperimentDefinitionBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set model groups from user-supplied JSON.
    ///
    /// `groups` must map group ids to `{"model": <string>, "hype": <mapping>}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] on the first malformed group.
    pub fn set_model_groups(&mut self, groups: &Value) -> Result<&mut Self> {
        let Some(entries) = groups.as_object() else {
            return Err(Error::Validation(format!(
                "model groups should be a mapping of group id to model group, got {groups}"
            )));
        };

        let mut parsed = ModelGroups::new();
        for (group_id, value) in entries {
            parsed.insert(group_id.clone(), ModelGroup::from_json(group_id, value)?);
        }

        Ok(self.set_model_group_map(parsed))
    }

    /// Set already-typed model groups.
    pub fn set_model_group_map(&mut self, groups: ModelGroups) -> &mut Self {
        debug!(count = groups.len(), "model groups defined");
        self.model_groups = Some(groups);
        self
    }

    /// Set data groups by partitioning suite-tagged catalog task identifiers.
    ///
    /// See [`partition_catalog_tasks`](super::partition_catalog_tasks).
    pub fn set_data_groups_from_catalog<S: AsRef<str>>(&mut self, task_ids: &[S]) -> &mut Self {
        let groups = partition_catalog_tasks(task_ids);
        debug!(
            tasks = groups.values().map(Vec::len).sum::<usize>(),
            "data groups defined from catalog"
        );
        self.data_groups = Some(groups);
        self
    }

    /// Custom data groups.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotSupported`].
    pub fn set_data_groups_custom(&mut self, _groups: DataGroups) -> Result<&mut Self> {
        Err(Error::NotSupported(
            "custom data groups are not yet supported, use 'set_data_groups_from_catalog'".to_string(),
        ))
    }

    /// Set applications from user-supplied JSON.
    ///
    /// `applications` maps data group ids to sequences of model group ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] if model or data groups are not set yet,
    /// [`Error::Validation`] on the first bad key or value.
    pub fn set_applications(&mut self, applications: &Value) -> Result<&mut Self> {
        let (data_groups, model_groups) = self.groups_for_applications()?;
        let parsed = parse_applications(applications, data_groups, model_groups)?;
        self.applications = Some(parsed);
        Ok(self)
    }

    /// Set already-typed applications.
    ///
    /// # Errors
    ///
    /// Same as [`set_applications`](Self::set_applications), minus shape errors.
    pub fn set_application_map(&mut self, applications: Applications) -> Result<&mut Self> {
        let (data_groups, model_groups) = self.groups_for_applications()?;
        validate_applications(&applications, data_groups, model_groups)?;
        self.applications = Some(applications);
        Ok(self)
    }

    fn groups_for_applications(&self) -> Result<(&DataGroups, &ModelGroups)> {
        let Some(model_groups) = self.model_groups.as_ref() else {
            return Err(Error::Precondition(
                "model groups must be defined before applications, use 'set_model_groups'".to_string(),
            ));
        };
        let Some(data_groups) = self.data_groups.as_ref() else {
            return Err(Error::Precondition(
                "data groups must be defined before applications, use 'set_data_groups_from_catalog'"
                    .to_string(),
            ));
        };
        Ok((data_groups, model_groups))
    }

    /// Freeze the current state into an [`ExperimentDefinition`].
    ///
    /// Performs no I/O; the builder is left unchanged and can be finalized again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteDefinition`] naming the first missing piece,
    /// or [`Error::Validation`] if `runs_per_pair` is zero.
    pub fn finalize(&self, name: &str, runs_per_pair: u32) -> Result<ExperimentDefinition> {
        let model_groups = self.model_groups.as_ref().ok_or(Error::IncompleteDefinition {
            missing: "model_groups",
            hint: "set_model_groups",
        })?;
        let data_groups = self.data_groups.as_ref().ok_or(Error::IncompleteDefinition {
            missing: "data_groups",
            hint: "set_data_groups_from_catalog",
        })?;
        let applications = self.applications.as_ref().ok_or(Error::IncompleteDefinition {
            missing: "applications",
            hint: "set_applications",
        })?;

        if runs_per_pair == 0 {
            return Err(Error::Validation("runs_per_pair must be at least 1".to_string()));
        }

        Ok(ExperimentDefinition::new(
            name,
            runs_per_pair,
            data_groups.clone(),
            model_groups.clone(),
            applications.clone(),
        ))
    }

    /// Get the model groups, if set.
    #[must_use]
    pub const fn model_groups(&self) -> Option<&ModelGroups> {
        self.model_groups.as_ref()
    }

    /// Get the data groups, if set.
    #[must_use]
    pub const fn data_groups(&self) -> Option<&DataGroups> {
        self.data_groups.as_ref()
    }

    /// Get the applications, if set.
    #[must_use]
    pub const fn applications(&self) -> Option<&Applications> {
        self.applications.as_ref()
    }
}
