//! OpenML catalog over its JSON REST API
//!
//! ```text
//! GET /api/v1/json/study/{suite}  ─> task ids
//! GET /api/v1/json/task/{task}    ─> dataset id + target column
//! GET /api/v1/json/data/{dataset} ─> parquet_url ─> RecordBatch
//! ```

use arrow::compute::concat_batches;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{Catalog, TaskDataset};
use crate::config::ClientConfig;
use crate::{Error, Result};

/// Catalog ids arrive as strings or numbers depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(u64),
    Text(String),
}

impl WireId {
    fn value(&self) -> Result<u64> {
        match self {
            Self::Number(id) => Ok(*id),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| Error::Catalog(format!("'{text}' is not a numeric catalog id"))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StudyResponse {
    study: Study,
}

#[derive(Debug, Deserialize)]
struct Study {
    tasks: StudyTasks,
}

#[derive(Debug, Deserialize)]
struct StudyTasks {
    task_id: Vec<WireId>,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    task: Task,
}

#[derive(Debug, Deserialize)]
struct Task {
    input: Vec<TaskInput>,
}

#[derive(Debug, Deserialize)]
struct TaskInput {
    name: String,
    #[serde(default)]
    data_set: Option<TaskDataSet>,
}

#[derive(Debug, Deserialize)]
struct TaskDataSet {
    data_set_id: WireId,
    target_feature: String,
}

#[derive(Debug, Deserialize)]
struct DataResponse {
    data_set_description: DataDescription,
}

#[derive(Debug, Deserialize)]
struct DataDescription {
    #[serde(default)]
    parquet_url: Option<String>,
    #[serde(default)]
    row_id_attribute: Option<OneOrMany>,
    #[serde(default)]
    ignore_attribute: Option<OneOrMany>,
}

/// Parse `"<suite>-<task>"` or a bare task id into the numeric task id.
///
/// # Errors
///
/// Returns [`Error::Catalog`] if the task part is not numeric.
pub fn parse_task_id(task_id: &str) -> Result<u64> {
    let task = task_id.rsplit('-').next().unwrap_or(task_id);
    task.parse()
        .map_err(|_| Error::Catalog(format!("'{task_id}' is not a valid task identifier")))
}

/// OpenML-compatible catalog.
#[derive(Debug, Clone)]
pub struct OpenMlCatalog {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenMlCatalog {
    /// Create a catalog client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.catalog_url().trim_end_matches('/').to_string(),
            api_key: config.catalog_api_key().map(str::to_string),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/api/v1/json/{path}", self.base_url);
        debug!(%url, "catalog request");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key)]);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "catalog {path} returned status {status}: {}",
                response.text().unwrap_or_default()
            )));
        }
        Ok(response.json()?)
    }

    fn download_table(&self, url: &str) -> Result<arrow::record_batch::RecordBatch> {
        debug!(%url, "downloading dataset");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("dataset download returned status {status}")));
        }

        let builder = ParquetRecordBatchReaderBuilder::try_new(response.bytes()?)?;
        let schema = builder.schema().clone();
        let batches = builder
            .build()?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(concat_batches(&schema, &batches)?)
    }
}

impl Catalog for OpenMlCatalog {
    fn suite_tasks(&self, suite_id: u32) -> Result<Vec<u64>> {
        let response: StudyResponse = self.get_json(&format!("study/{suite_id}"))?;
        response.study.tasks.task_id.iter().map(WireId::value).collect()
    }

    fn load_task(&self, task_id: &str) -> Result<TaskDataset> {
        let task: TaskResponse = self.get_json(&format!("task/{}", parse_task_id(task_id)?))?;
        let source = task
            .task
            .input
            .into_iter()
            .find(|input| input.name == "source_data")
            .and_then(|input| input.data_set)
            .ok_or_else(|| Error::Catalog(format!("task '{task_id}' has no source data")))?;

        let dataset_id = source.data_set_id.value()?;
        let data: DataResponse = self.get_json(&format!("data/{dataset_id}"))?;
        let description = data.data_set_description;
        let url = description
            .parquet_url
            .ok_or_else(|| Error::Catalog(format!("dataset {dataset_id} has no parquet file")))?;

        let dropped: Vec<String> = description
            .row_id_attribute
            .into_iter()
            .chain(description.ignore_attribute)
            .flat_map(OneOrMany::into_vec)
            .collect();

        let table = self.download_table(&url)?;
        TaskDataset::from_table(&table, &source.target_feature, &dropped)
    }
}
