//! Orchestrator transport: how request bodies reach the service

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use super::Endpoint;
use crate::config::{ClientConfig, Credentials};
use crate::{Error, Result};

/// Header carrying the orchestrator user name
pub const NAME_HEADER: &str = "Name";
/// Header carrying the orchestrator secret
pub const SECRET_HEADER: &str = "Secret";

/// Sends a JSON body to an orchestrator endpoint and returns the raw response text.
///
/// Implementations block until the response arrives.
pub trait OrchestratorTransport {
    /// Post `body` to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure, timeout or a non-2xx status.
    fn post(&self, endpoint: Endpoint, body: &Value) -> Result<String>;
}

impl<T: OrchestratorTransport + ?Sized> OrchestratorTransport for &T {
    fn post(&self, endpoint: Endpoint, body: &Value) -> Result<String> {
        (**self).post(endpoint, body)
    }
}

/// HTTP transport over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpTransport {
    /// Create a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        let mut base_url = config.orchestrator_url().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            credentials: config.credentials().clone(),
        })
    }

    /// Full URL for an endpoint.
    #[must_use]
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl OrchestratorTransport for HttpTransport {
    fn post(&self, endpoint: Endpoint, body: &Value) -> Result<String> {
        let url = self.url(endpoint);
        debug!(%url, "orchestrator request");

        let response = self
            .client
            .post(&url)
            .header(NAME_HEADER, self.credentials.name())
            .header(SECRET_HEADER, self.credentials.secret())
            .json(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "{} returned status {status}: {text}",
                endpoint.path()
            )));
        }

        Ok(text)
    }
}
