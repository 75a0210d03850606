//! Experiment definitions: model groups, data groups and applications
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentDefinition
//!   ├── model_groups:  group id ─> ModelGroup { model, hype: name ─> DistributionSpec }
//!   ├── data_groups:   group id ─> [task id]          ("<suite>-<task>")
//!   └── applications:  data group id ─> [model group id]
//! ```
//!
//! [`ExperimentDefinitionBuilder`] enforces the order model groups → data
//! groups → applications and checks every cross reference before
//! [`finalize`](ExperimentDefinitionBuilder::finalize) freezes the document.

mod application;
mod builder;
mod data_group;
mod distribution;
mod experiment_definition;
mod model_group;

pub use application::Applications;
pub use builder::ExperimentDefinitionBuilder;
pub use data_group::{partition_catalog_tasks, task_identifier, CatalogBucket, DataGroups};
pub use distribution::{Bound, DistributionSpec, HyperparameterSpace};
pub use experiment_definition::{DefinitionBody, ExperimentDefinition};
pub use model_group::{ModelGroup, ModelGroups};
