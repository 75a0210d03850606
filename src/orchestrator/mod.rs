//! Orchestrator access
//!
//! The orchestrator is a JSON-over-HTTP service. Every request is a `POST`
//! carrying the `Name` and `Secret` credential headers.
//!
//! ```text
//! OrchestratorClient ──> OrchestratorTransport::post(Endpoint, body) ──> response text
//!                              │
//!                              └── HttpTransport (reqwest, blocking)
//! ```

mod client;
mod endpoint;
mod transport;

pub use client::{strip_quotes, OrchestratorClient, EXPERIMENT_CONCLUDED};
pub use endpoint::Endpoint;
pub use transport::{HttpTransport, OrchestratorTransport, NAME_HEADER, SECRET_HEADER};
