//! # Tabular Experiment Client
//!
//! Client for distributed tabular ML benchmarking. It defines experiments
//! (model groups × data groups), registers them with a remote orchestrator,
//! and drives individual runs: begin, report metrics, end. Task datasets come
//! from a public catalog (OpenML) with a one-slot cache.
//!
//! ## Architecture
//!
//! ```text
//! ExperimentDefinitionBuilder ──finalize──> ExperimentDefinition ──register──> Orchestrator
//!                                                                                  │
//! RunSession ── begin / update / end ──────────────────────────────────────────────┘
//!     └── load_dataset(task) ──> Catalog (cached: last task only)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use serde_json::json;
//! use tabular_experiment_client::catalog::{catalog_task_ids, OpenMlCatalog};
//! use tabular_experiment_client::definition::ExperimentDefinitionBuilder;
//! use tabular_experiment_client::orchestrator::OrchestratorClient;
//! use tabular_experiment_client::{ClientConfig, RunSession};
//!
//! let config = ClientConfig::from_env()?;
//! let catalog = OpenMlCatalog::new(&config)?;
//!
//! let mut builder = ExperimentDefinitionBuilder::new();
//! builder.set_model_groups(&json!({"knn": {"model": "knn", "hype": {}}}))?;
//! builder.set_data_groups_from_catalog(&catalog_task_ids(&catalog, &config.suites())?);
//! builder.set_applications(&json!({"opml_reg_purnum_group": ["knn"]}))?;
//! let definition = builder.finalize("knn-baseline", config.runs_per_pair())?;
//! OrchestratorClient::from_config(&config)?.register(&definition)?;
//!
//! let mut session = RunSession::from_config(&config)?;
//! session.begin("knn-baseline")?;
//! session.update(&json!({"rmse": 0.42}))?;
//! session.end()?;
//! # Ok::<(), tabular_experiment_client::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod catalog;
pub mod config;
pub mod definition;
pub mod error;
pub mod orchestrator;
pub mod session;

pub use config::{ClientConfig, Credentials, SuiteSelection};
pub use error::{Error, Result};
pub use session::{RunHandle, RunSession, RunState};
