//! Applications: which model groups run on which data group

use std::collections::BTreeMap;

use serde_json::Value;

use super::data_group::DataGroups;
use super::model_group::ModelGroups;
use crate::{Error, Result};

/// Applications keyed by data group id; each lists model group ids.
pub type Applications = BTreeMap<String, Vec<String>>;

fn known_keys<V>(map: &BTreeMap<String, V>) -> Vec<&str> {
    map.keys().map(String::as_str).collect()
}

fn check_data_group(key: &str, data_groups: &DataGroups) -> Result<()> {
    if data_groups.contains_key(key) {
        return Ok(());
    }
    Err(Error::Validation(format!(
        "data group '{key}' in application not in {:?}, which are the data groups specified",
        known_keys(data_groups)
    )))
}

fn check_model_group(model_id: &str, key: &str, model_groups: &ModelGroups) -> Result<()> {
    if model_groups.contains_key(model_id) {
        return Ok(());
    }
    Err(Error::Validation(format!(
        "model id '{model_id}', in '{key}', could not be found in defined model groups: {:?}",
        known_keys(model_groups)
    )))
}

/// Check every reference in a typed application map.
pub(crate) fn validate_applications(
    applications: &Applications,
    data_groups: &DataGroups,
    model_groups: &ModelGroups,
) -> Result<()> {
    for (key, model_ids) in applications {
        check_data_group(key, data_groups)?;
        for model_id in model_ids {
            check_model_group(model_id, key, model_groups)?;
        }
    }
    Ok(())
}

/// Parse user-supplied applications, stopping at the first violation.
pub(crate) fn parse_applications(
    value: &Value,
    data_groups: &DataGroups,
    model_groups: &ModelGroups,
) -> Result<Applications> {
    let Some(entries) = value.as_object() else {
        return Err(Error::Validation(format!(
            "applications should be a mapping of data group id to a sequence of model group ids, got {value}"
        )));
    };

    let mut applications = Applications::new();
    for (key, model_ids) in entries {
        check_data_group(key, data_groups)?;

        let Some(model_ids) = model_ids.as_array() else {
            let shape = if model_ids.is_string() { "a bare string" } else { "a non-sequence" };
            return Err(Error::Validation(format!(
                "at data group '{key}', {model_ids} should be a sequence of model group ids, not {shape}"
            )));
        };

        let mut ids = Vec::with_capacity(model_ids.len());
        for model_id in model_ids {
            let Some(model_id) = model_id.as_str() else {
                return Err(Error::Validation(format!(
                    "model id {model_id}, in '{key}', should be a string"
                )));
            };
            check_model_group(model_id, key, model_groups)?;
            ids.push(model_id.to_string());
        }
        applications.insert(key.clone(), ids);
    }

    Ok(applications)
}
