//! Benchmark Run Example
//!
//! Pulls runs from the orchestrator until the experiment concludes, loading
//! each run's task dataset and reporting placeholder metrics.
//!
//! Run with: TETC_ORCH_NAME=... TETC_ORCH_SECRET=... cargo run --example benchmark_run -- <experiment>

use anyhow::Context;
use serde_json::json;
use tabular_experiment_client::{ClientConfig, Error, RunSession};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let experiment = std::env::args().nth(1).context("usage: benchmark_run <experiment>")?;
    let config = ClientConfig::from_env()?;
    let mut session = RunSession::from_config(&config)?;

    loop {
        match session.begin_sticky(&experiment) {
            Ok(run_id) => println!("run {run_id}"),
            Err(Error::ExperimentConcluded(_)) => {
                println!("experiment '{experiment}' concluded");
                break;
            }
            Err(err) => return Err(err.into()),
        }

        let run = session.get_run()?;
        let task_id = run["task"].as_str().context("run record without task")?.to_string();

        let dataset = session.load_dataset(&task_id)?;
        let (rows, columns) = (dataset.num_rows(), dataset.attribute_names().len());
        println!("task {task_id}: {rows} rows x {columns} features");

        session.update(&json!({"rows": rows, "features": columns}))?;
        session.end()?;
    }

    Ok(())
}
