//! Hyperparameter distributions sampled by the orchestrator's random search

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hyperparameter space: hyperparameter name to its distribution.
pub type HyperparameterSpace = BTreeMap<String, DistributionSpec>;

/// Numeric bound of a range distribution, kept in the form it was written.
///
/// `0` stays an integer and `0.0` stays a float on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    /// Integer bound
    Int(i64),
    /// Floating-point bound
    Float(f64),
}

impl Bound {
    /// Bound as a float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Distribution a single hyperparameter is drawn from.
///
/// Serializes to the orchestrator's wire form, tagged by `distribution`.
/// Keys other than the tag and the variant's own fields are rejected:
///
/// ```rust
/// use tabular_experiment_client::definition::DistributionSpec;
///
/// let spec = DistributionSpec::int_uniform(0, 2);
/// let json = serde_json::to_value(&spec).unwrap();
/// assert_eq!(json, serde_json::json!({"distribution": "int_uniform", "min": 0, "max": 2}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case", deny_unknown_fields)]
pub enum DistributionSpec {
    /// Always the same value.
    Constant {
        /// The value
        value: Value,
    },
    /// One of a fixed set of values, uniformly.
    Categorical {
        /// Candidate values
        values: Vec<Value>,
    },
    /// Integer drawn uniformly from `[min, max]`.
    IntUniform {
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },
    /// Float drawn uniformly from `[min, max]`.
    FloatUniform {
        /// Lower bound
        min: Bound,
        /// Upper bound
        max: Bound,
    },
    /// Float drawn log-uniformly from `[min, max]`.
    LogUniform {
        /// Lower bound
        min: Bound,
        /// Upper bound
        max: Bound,
    },
}

impl DistributionSpec {
    /// Constant distribution.
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant {
            value: value.into(),
        }
    }

    /// Categorical distribution over `values`.
    #[must_use]
    pub fn categorical<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Categorical {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Uniform integer distribution.
    #[must_use]
    pub const fn int_uniform(min: i64, max: i64) -> Self {
        Self::IntUniform { min, max }
    }

    /// Uniform float distribution.
    #[must_use]
    pub fn float_uniform(min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        Self::FloatUniform {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Log-uniform float distribution.
    #[must_use]
    pub fn log_uniform(min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        Self::LogUniform {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Wire name of the distribution kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::Categorical { .. } => "categorical",
            Self::IntUniform { .. } => "int_uniform",
            Self::FloatUniform { .. } => "float_uniform",
            Self::LogUniform { .. } => "log_uniform",
        }
    }
}
