//! Data groups: named collections of catalog task identifiers

use std::collections::BTreeMap;

use crate::config::{
    SUITE_CLASSIFICATION_CATEGORICAL, SUITE_CLASSIFICATION_NUMERIC, SUITE_REGRESSION_CATEGORICAL,
    SUITE_REGRESSION_NUMERIC,
};

/// Data groups keyed by group id; each is an ordered list of task identifiers.
pub type DataGroups = BTreeMap<String, Vec<String>>;

/// Fixed data groups derived from the catalog, one per benchmark suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogBucket {
    /// Regression targets, pure numeric features
    RegressionNumeric,
    /// Classification targets, pure numeric features
    ClassificationNumeric,
    /// Regression targets, numeric and categorical features
    RegressionCategorical,
    /// Classification targets, numeric and categorical features
    ClassificationCategorical,
}

impl CatalogBucket {
    /// All buckets, in output order.
    pub const ALL: [Self; 4] = [
        Self::RegressionNumeric,
        Self::ClassificationNumeric,
        Self::RegressionCategorical,
        Self::ClassificationCategorical,
    ];

    /// Catalog suite id feeding this bucket.
    #[must_use]
    pub const fn suite_id(self) -> u32 {
        match self {
            Self::RegressionNumeric => SUITE_REGRESSION_NUMERIC,
            Self::ClassificationNumeric => SUITE_CLASSIFICATION_NUMERIC,
            Self::RegressionCategorical => SUITE_REGRESSION_CATEGORICAL,
            Self::ClassificationCategorical => SUITE_CLASSIFICATION_CATEGORICAL,
        }
    }

    /// Data group id used in experiment definitions.
    #[must_use]
    pub const fn group_id(self) -> &'static str {
        match self {
            Self::RegressionNumeric => "opml_reg_purnum_group",
            Self::ClassificationNumeric => "opml_class_purnum_group",
            Self::RegressionCategorical => "opml_reg_numcat_group",
            Self::ClassificationCategorical => "opml_class_numcat_group",
        }
    }

    /// Bucket for a suite id, if it is one of the four known suites.
    #[must_use]
    pub fn from_suite_id(suite_id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.suite_id() == suite_id)
    }
}

/// Format a task identifier as `"<suite_id>-<task_id>"`.
#[must_use]
pub fn task_identifier(suite_id: u32, task_id: u64) -> String {
    format!("{suite_id}-{task_id}")
}

/// Partition suite-tagged task identifiers into the four catalog buckets.
///
/// The bucket is chosen by the numeric value of the identifier's first three
/// characters. Identifiers whose prefix is not one of the known suite ids
/// (or not numeric at all) land in no bucket. All four buckets are always
/// present in the result, possibly empty, and keep input order.
///
/// ```rust
/// use tabular_experiment_client::definition::partition_catalog_tasks;
///
/// let groups = partition_catalog_tasks(&["336-1", "334-4", "bogus"]);
/// assert_eq!(groups["opml_reg_purnum_group"], vec!["336-1"]);
/// assert_eq!(groups["opml_class_numcat_group"], vec!["334-4"]);
/// assert!(groups["opml_reg_numcat_group"].is_empty());
/// ```
#[must_use]
pub fn partition_catalog_tasks<S: AsRef<str>>(task_ids: &[S]) -> DataGroups {
    let mut groups: DataGroups = CatalogBucket::ALL
        .iter()
        .map(|bucket| (bucket.group_id().to_string(), Vec::new()))
        .collect();

    for task_id in task_ids {
        let task_id = task_id.as_ref();
        let bucket = task_id
            .get(..3)
            .and_then(|prefix| prefix.parse::<u32>().ok())
            .and_then(CatalogBucket::from_suite_id);

        if let Some(bucket) = bucket {
            if let Some(group) = groups.get_mut(bucket.group_id()) {
                group.push(task_id.to_string());
            }
        }
    }

    groups
}
