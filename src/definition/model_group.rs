//! Model groups: a model identifier paired with its hyperparameter space

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::distribution::{DistributionSpec, HyperparameterSpace};
use crate::{Error, Result};

/// Model groups keyed by group id.
pub type ModelGroups = BTreeMap<String, ModelGroup>;

/// A model and the space its hyperparameters are searched in.
///
/// The group id and the model id are often identical but need not be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelGroup {
    model: String,
    hype: HyperparameterSpace,
}

impl ModelGroup {
    /// Create a model group.
    #[must_use]
    pub fn new(model: impl Into<String>, hype: HyperparameterSpace) -> Self {
        Self {
            model: model.into(),
            hype,
        }
    }

    /// Get the model id.
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model
    }

    /// Get the hyperparameter space.
    #[must_use]
    pub const fn hyperparameters(&self) -> &HyperparameterSpace {
        &self.hype
    }

    /// Parse a user-supplied model group, checking its shape rule by rule.
    ///
    /// The value must be a mapping whose keys are exactly `model` and `hype`,
    /// `model` must be a string and `hype` a mapping of distributions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming `group_id` and the first rule violated.
    pub fn from_json(group_id: &str, value: &Value) -> Result<Self> {
        let Some(fields) = value.as_object() else {
            return Err(Error::Validation(format!(
                "model group '{group_id}' does not have a corresponding mapping, got {value}"
            )));
        };

        let exact_keys = fields.len() == 2 && fields.contains_key("model") && fields.contains_key("hype");
        if !exact_keys {
            let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
            return Err(Error::Validation(format!(
                "model group '{group_id}' does not have the correct attributes of 'model' and 'hype', exclusively (found {keys:?})"
            )));
        }

        let Some(model) = fields["model"].as_str() else {
            return Err(Error::Validation(format!(
                "model group '{group_id}' has a non-string model (aka model id) attribute"
            )));
        };

        let Some(hype) = fields["hype"].as_object() else {
            return Err(Error::Validation(format!(
                "model group '{group_id}' has a non-mapping hype (aka hyperparameter space) attribute"
            )));
        };

        let mut space = HyperparameterSpace::new();
        for (name, spec) in hype {
            let spec: DistributionSpec = serde_json::from_value(spec.clone()).map_err(|e| {
                Error::Validation(format!(
                    "model group '{group_id}' hyperparameter '{name}' is not a valid distribution: {e}"
                ))
            })?;
            space.insert(name.clone(), spec);
        }

        Ok(Self::new(model, space))
    }
}
