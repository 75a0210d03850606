//! Task datasets: feature table, label column and per-column metadata

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::{Error, Result};

/// A task's tabular dataset, split into features and labels.
#[derive(Debug, Clone)]
pub struct TaskDataset {
    features: RecordBatch,
    labels: ArrayRef,
    categorical_indicator: Vec<bool>,
    attribute_names: Vec<String>,
}

/// Whether a column of this type holds categorical values.
#[must_use]
pub fn is_categorical(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Dictionary(_, _)
            | DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Utf8View
            | DataType::Boolean
    )
}

impl TaskDataset {
    /// Assemble a dataset from parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalog`] if the label length, indicator length or
    /// attribute names disagree with the feature table.
    pub fn new(
        features: RecordBatch,
        labels: ArrayRef,
        categorical_indicator: Vec<bool>,
        attribute_names: Vec<String>,
    ) -> Result<Self> {
        if labels.len() != features.num_rows() {
            return Err(Error::Catalog(format!(
                "label column has {} rows, feature table has {}",
                labels.len(),
                features.num_rows()
            )));
        }
        if categorical_indicator.len() != features.num_columns()
            || attribute_names.len() != features.num_columns()
        {
            return Err(Error::Catalog(format!(
                "feature table has {} columns but {} categorical flags and {} attribute names",
                features.num_columns(),
                categorical_indicator.len(),
                attribute_names.len()
            )));
        }

        Ok(Self {
            features,
            labels,
            categorical_indicator,
            attribute_names,
        })
    }

    /// Split `target` out of a full table; remaining columns become features.
    ///
    /// Columns named in `dropped` (row ids, ignored attributes) are removed.
    /// Categorical flags are derived from the Arrow column types.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalog`] if `target` is not a column of `table`.
    pub fn from_table(table: &RecordBatch, target: &str, dropped: &[String]) -> Result<Self> {
        let schema = table.schema();
        let (target_index, _) = schema
            .column_with_name(target)
            .ok_or_else(|| Error::Catalog(format!("target column '{target}' not found in dataset")))?;

        let keep: Vec<usize> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, field)| *i != target_index && !dropped.contains(field.name()))
            .map(|(i, _)| i)
            .collect();

        let features = table.project(&keep)?;
        let categorical_indicator = features
            .schema()
            .fields()
            .iter()
            .map(|field| is_categorical(field.data_type()))
            .collect();
        let attribute_names = features
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect();

        Self::new(
            features,
            table.column(target_index).clone(),
            categorical_indicator,
            attribute_names,
        )
    }

    /// Get the feature table.
    #[must_use]
    pub const fn features(&self) -> &RecordBatch {
        &self.features
    }

    /// Get the label column.
    #[must_use]
    pub const fn labels(&self) -> &ArrayRef {
        &self.labels
    }

    /// Get the per-feature categorical flags.
    #[must_use]
    pub fn categorical_indicator(&self) -> &[bool] {
        &self.categorical_indicator
    }

    /// Get the feature column names.
    #[must_use]
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.features.num_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn table() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("row_id", DataType::Int64, false),
            Field::new("size", DataType::Float64, false),
            Field::new("color", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![0, 1, 2])),
                Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])),
                Arc::new(StringArray::from(vec!["red", "blue", "red"])),
                Arc::new(Float64Array::from(vec![9.5, 7.25, 3.0])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_table_splits_target() {
        let dataset = TaskDataset::from_table(&table(), "price", &["row_id".to_string()]).unwrap();

        assert_eq!(dataset.attribute_names(), ["size", "color"]);
        assert_eq!(dataset.categorical_indicator(), [false, true]);
        assert_eq!(dataset.labels().len(), 3);
        assert_eq!(dataset.num_rows(), 3);
    }

    #[test]
    fn test_from_table_missing_target() {
        let err = TaskDataset::from_table(&table(), "weight", &[]).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_new_rejects_mismatched_labels() {
        let table = table();
        let labels: ArrayRef = Arc::new(Float64Array::from(vec![1.0]));
        let err = TaskDataset::new(table, labels, vec![false; 4], vec![String::new(); 4]).unwrap_err();
        assert!(err.to_string().contains("label column has 1 rows"));
    }
}
