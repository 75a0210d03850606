//! Dataset catalog: benchmark suites, their tasks and the tasks' datasets

mod dataset;
mod openml;

pub use dataset::{is_categorical, TaskDataset};
pub use openml::{parse_task_id, OpenMlCatalog};

use tracing::debug;

use crate::config::SuiteSelection;
use crate::definition::task_identifier;
use crate::Result;

/// Source of benchmark suites and task datasets.
///
/// Implementations block until the catalog responds.
pub trait Catalog {
    /// Task ids belonging to a suite.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be reached or answers malformed data.
    fn suite_tasks(&self, suite_id: u32) -> Result<Vec<u64>>;

    /// Load the dataset of a task (`"<suite>-<task>"` or bare task id).
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be reached or answers malformed data.
    fn load_task(&self, task_id: &str) -> Result<TaskDataset>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn suite_tasks(&self, suite_id: u32) -> Result<Vec<u64>> {
        (**self).suite_tasks(suite_id)
    }

    fn load_task(&self, task_id: &str) -> Result<TaskDataset> {
        (**self).load_task(task_id)
    }
}

/// Suite-tagged identifiers (`"<suite>-<task>"`) of every task in the selected suites.
///
/// Suites are visited in [`SuiteSelection::suite_ids`] order, tasks in catalog order.
///
/// # Errors
///
/// Propagates the first catalog error.
pub fn catalog_task_ids<C: Catalog + ?Sized>(catalog: &C, suites: &SuiteSelection) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for suite_id in suites.suite_ids() {
        let tasks = catalog.suite_tasks(suite_id)?;
        debug!(suite_id, tasks = tasks.len(), "loaded suite");
        ids.extend(tasks.into_iter().map(|task| task_identifier(suite_id, task)));
    }
    Ok(ids)
}
