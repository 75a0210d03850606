//! Client configuration: orchestrator credentials, catalog access and suite selection
//!
//! Configuration is an explicit value handed to the client and session types.
//! There is no process-wide state.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::{Error, Result};

/// Default orchestrator endpoint base (endpoint names are appended)
pub const DEFAULT_ORCHESTRATOR_URL: &str =
    "https://us-west-2.aws.data.mongodb-api.com/app/experimentmanager-sjmvq/endpoint/";

/// Default dataset catalog base URL
pub const DEFAULT_CATALOG_URL: &str = "https://www.openml.org";

/// Default request timeout for both services
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// How many times a (hyperparameter, task) pair is run by default
pub const DEFAULT_RUNS_PER_PAIR: u32 = 60;

/// Catalog suite: regression targets, pure numeric features
pub const SUITE_REGRESSION_NUMERIC: u32 = 336;
/// Catalog suite: classification targets, pure numeric features
pub const SUITE_CLASSIFICATION_NUMERIC: u32 = 337;
/// Catalog suite: regression targets, numeric and categorical features
pub const SUITE_REGRESSION_CATEGORICAL: u32 = 335;
/// Catalog suite: classification targets, numeric and categorical features
pub const SUITE_CLASSIFICATION_CATEGORICAL: u32 = 334;

/// Orchestrator credentials, sent as the `Name` and `Secret` headers.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    name: String,
    secret: String,
}

impl Credentials {
    /// Create credentials from explicit strings.
    #[must_use]
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }

    /// Read the secret from a text file, dropping trailing whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn with_secret_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let secret = std::fs::read_to_string(path)?;
        Ok(Self::new(name, secret.trim_end()))
    }

    /// Value of the `Name` header.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the `Secret` header.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Which catalog benchmark suites feed the catalog-derived data groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SuiteSelection {
    /// Tasks with regression targets
    pub regression: bool,
    /// Tasks with classification targets
    pub classification: bool,
    /// Tasks with purely numeric features
    pub pure_numeric: bool,
    /// Tasks with numeric and categorical features
    pub numeric_categorical: bool,
}

impl Default for SuiteSelection {
    fn default() -> Self {
        Self {
            regression: true,
            classification: true,
            pure_numeric: true,
            numeric_categorical: true,
        }
    }
}

impl SuiteSelection {
    /// Suite ids selected, regression suites first.
    #[must_use]
    pub fn suite_ids(&self) -> Vec<u32> {
        let mut ids = Vec::with_capacity(4);
        if self.regression {
            if self.pure_numeric {
                ids.push(SUITE_REGRESSION_NUMERIC);
            }
            if self.numeric_categorical {
                ids.push(SUITE_REGRESSION_CATEGORICAL);
            }
        }
        if self.classification {
            if self.pure_numeric {
                ids.push(SUITE_CLASSIFICATION_NUMERIC);
            }
            if self.numeric_categorical {
                ids.push(SUITE_CLASSIFICATION_CATEGORICAL);
            }
        }
        ids
    }
}

/// Complete client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    orchestrator_url: String,
    credentials: Credentials,
    catalog_url: String,
    catalog_api_key: Option<String>,
    timeout: Duration,
    runs_per_pair: u32,
    suites: SuiteSelection,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        ClientConfigBuilder::new(credentials).build()
    }

    /// Create a builder for a configuration with optional fields.
    #[must_use]
    pub fn builder(credentials: Credentials) -> ClientConfigBuilder {
        ClientConfigBuilder::new(credentials)
    }

    /// Load configuration from `TETC_*` environment variables.
    ///
    /// `TETC_ORCH_NAME` and `TETC_ORCH_SECRET` are required; `TETC_ORCH_URL`,
    /// `TETC_CATALOG_URL` and `TETC_CATALOG_API_KEY` are optional.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] if a required variable is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            var(key).ok_or_else(|| Error::Precondition(format!("environment variable {key} is not set")))
        };
        let credentials = Credentials::new(required("TETC_ORCH_NAME")?, required("TETC_ORCH_SECRET")?);

        let mut builder = Self::builder(credentials);
        if let Some(url) = var("TETC_ORCH_URL") {
            builder = builder.orchestrator_url(url);
        }
        if let Some(url) = var("TETC_CATALOG_URL") {
            builder = builder.catalog_url(url);
        }
        if let Some(key) = var("TETC_CATALOG_API_KEY") {
            builder = builder.catalog_api_key(key);
        }
        Ok(builder.build())
    }

    /// Orchestrator base URL.
    #[must_use]
    pub fn orchestrator_url(&self) -> &str {
        &self.orchestrator_url
    }

    /// Orchestrator credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Catalog base URL.
    #[must_use]
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    /// Catalog API key, if any.
    #[must_use]
    pub fn catalog_api_key(&self) -> Option<&str> {
        self.catalog_api_key.as_deref()
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs per (hyperparameter, task) pair used when finalizing definitions.
    #[must_use]
    pub const fn runs_per_pair(&self) -> u32 {
        self.runs_per_pair
    }

    /// Selected catalog suites.
    #[must_use]
    pub const fn suites(&self) -> SuiteSelection {
        self.suites
    }
}

/// Builder for `ClientConfig`.
#[derive(Debug)]
pub struct ClientConfigBuilder {
    orchestrator_url: String,
    credentials: Credentials,
    catalog_url: String,
    catalog_api_key: Option<String>,
    timeout: Duration,
    runs_per_pair: u32,
    suites: SuiteSelection,
}

impl ClientConfigBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            orchestrator_url: DEFAULT_ORCHESTRATOR_URL.to_string(),
            credentials,
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_api_key: None,
            timeout: DEFAULT_TIMEOUT,
            runs_per_pair: DEFAULT_RUNS_PER_PAIR,
            suites: SuiteSelection::default(),
        }
    }

    /// Set the orchestrator base URL.
    #[must_use]
    pub fn orchestrator_url(mut self, url: impl Into<String>) -> Self {
        self.orchestrator_url = url.into();
        self
    }

    /// Set the catalog base URL.
    #[must_use]
    pub fn catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    /// Set the catalog API key.
    #[must_use]
    pub fn catalog_api_key(mut self, key: impl Into<String>) -> Self {
        self.catalog_api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set runs per (hyperparameter, task) pair.
    #[must_use]
    pub const fn runs_per_pair(mut self, runs: u32) -> Self {
        self.runs_per_pair = runs;
        self
    }

    /// Set which catalog suites are used.
    #[must_use]
    pub const fn suites(mut self, suites: SuiteSelection) -> Self {
        self.suites = suites;
        self
    }

    /// Build the `ClientConfig`.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            orchestrator_url: self.orchestrator_url,
            credentials: self.credentials,
            catalog_url: self.catalog_url,
            catalog_api_key: self.catalog_api_key,
            timeout: self.timeout,
            runs_per_pair: self.runs_per_pair,
            suites: self.suites,
        }
    }
}
