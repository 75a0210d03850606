//! Experiment Registration Example
//!
//! Builds an experiment from catalog suites and registers it with the orchestrator.
//!
//! Run with: TETC_ORCH_NAME=... TETC_ORCH_SECRET=... cargo run --example register_experiment

use anyhow::Context;
use serde_json::json;
use tabular_experiment_client::catalog::{catalog_task_ids, OpenMlCatalog};
use tabular_experiment_client::definition::ExperimentDefinitionBuilder;
use tabular_experiment_client::orchestrator::OrchestratorClient;
use tabular_experiment_client::ClientConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ClientConfig::from_env().context("orchestrator credentials")?;

    // -------------------------------------------------------------------------
    // 1. Model groups
    // -------------------------------------------------------------------------
    let mut builder = ExperimentDefinitionBuilder::new();
    builder.set_model_groups(&json!({
        "mlp": {"model": "mlp", "hype": {
            "hidden_layers": {"distribution": "int_uniform", "min": 1, "max": 4},
            "learning_rate": {"distribution": "log_uniform", "min": 0.0001, "max": 0.1},
            "activation": {"distribution": "categorical", "values": ["relu", "tanh"]}
        }},
        "xgb": {"model": "xgboost", "hype": {
            "max_depth": {"distribution": "int_uniform", "min": 2, "max": 12},
            "subsample": {"distribution": "float_uniform", "min": 0.5, "max": 1.0},
            "n_estimators": {"distribution": "constant", "value": 500}
        }}
    }))?;

    // -------------------------------------------------------------------------
    // 2. Data groups from the catalog suites
    // -------------------------------------------------------------------------
    let catalog = OpenMlCatalog::new(&config)?;
    let task_ids = catalog_task_ids(&catalog, &config.suites()).context("loading catalog suites")?;
    println!("{} catalog tasks", task_ids.len());
    builder.set_data_groups_from_catalog(&task_ids);

    // -------------------------------------------------------------------------
    // 3. Applications, then register
    // -------------------------------------------------------------------------
    builder.set_applications(&json!({
        "opml_reg_purnum_group": ["mlp", "xgb"],
        "opml_class_purnum_group": ["mlp", "xgb"],
        "opml_reg_numcat_group": ["xgb"],
        "opml_class_numcat_group": ["xgb"]
    }))?;

    let definition = builder.finalize("mlp-vs-xgb", config.runs_per_pair())?;
    println!("{}", serde_json::to_string_pretty(&definition)?);

    let client = OrchestratorClient::from_config(&config)?;
    let response = client.register(&definition)?;
    println!("orchestrator: {response}");

    Ok(())
}
