//! Orchestrator over HTTP: headers, bodies, status handling and the run lifecycle
//!
//! The client is blocking, so each call runs on tokio's blocking pool while
//! the mock server keeps serving on the runtime.

use std::time::Duration;

use serde_json::json;
use tabular_experiment_client::definition::ExperimentDefinitionBuilder;
use tabular_experiment_client::orchestrator::{OrchestratorClient, OrchestratorTransport};
use tabular_experiment_client::{ClientConfig, Credentials, Error, RunSession, RunState};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder(Credentials::new("alice", "s3cr3t"))
        .orchestrator_url(server.uri())
        .catalog_url(server.uri())
        .timeout(Duration::from_millis(500))
        .build()
}

async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.expect("blocking task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_sends_definition_with_credentials() {
    let server = MockServer::start().await;

    let mut builder = ExperimentDefinitionBuilder::new();
    builder
        .set_model_groups(&json!({"knn": {"model": "knn", "hype": {}}}))
        .unwrap();
    builder.set_data_groups_from_catalog(&["336-1"]);
    builder
        .set_applications(&json!({"opml_reg_purnum_group": ["knn"]}))
        .unwrap();
    let definition = builder.finalize("knn-baseline", 60).unwrap();

    Mock::given(method("POST"))
        .and(path("/registerExperiment"))
        .and(header("Name", "alice"))
        .and(header("Secret", "s3cr3t"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(definition.to_payload().unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"registered\""))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let response = blocking(move || {
        OrchestratorClient::from_config(&config)?.register(&definition)
    })
    .await
    .unwrap();

    assert_eq!(response, "\"registered\"");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_success_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/beginRun"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let err = blocking(move || OrchestratorClient::from_config(&config)?.begin_run("exp"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("boom"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/getRun"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let err = blocking(move || OrchestratorClient::from_config(&config)?.get_run("r1"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_session_lifecycle_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/beginRun"))
        .and(body_json(json!({"experiment": "exp"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"abc123\""))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/updateRun"))
        .and(body_json(json!({"run": "abc123", "metrics": {"rmse": 0.5}})))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"ok\""))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/getRun"))
        .and(body_json(json!({"run": "abc123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "abc123", "status": "done"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    blocking(move || {
        let mut session = RunSession::from_config(&config).unwrap();

        assert_eq!(session.begin("exp").unwrap(), "abc123");
        assert_eq!(session.update(&json!({"rmse": 0.5})).unwrap(), "\"ok\"");

        let record = session.end().unwrap();
        assert_eq!(record["status"], "done");
        assert_eq!(session.state(), RunState::Concluded);
        assert!(matches!(session.update(&json!({})), Err(Error::InvalidState(_))));
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_session_concluded_experiment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/beginRunSticky"))
        .and(body_json(json!({"experiment": "exp", "last_task": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"experiment concluded\""))
        .mount(&server)
        .await;

    let config = config_for(&server);
    blocking(move || {
        let mut session = RunSession::from_config(&config).unwrap();
        let err = session.begin_sticky("exp").unwrap_err();

        assert!(matches!(err, Error::ExperimentConcluded(_)));
        assert_eq!(session.state(), RunState::NotStarted);
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transport_url_joining() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/updateRun"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder(Credentials::new("alice", "s3cr3t"))
        .orchestrator_url(format!("{}/api", server.uri()))
        .build();
    let reply = blocking(move || {
        let client = OrchestratorClient::from_config(&config)?;
        client
            .transport()
            .post(tabular_experiment_client::orchestrator::Endpoint::UpdateRun, &json!({}))
    })
    .await
    .unwrap();

    assert_eq!(reply, "fine");
}
