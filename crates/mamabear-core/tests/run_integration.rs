use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;

use mamabear_api::{InventoryListener, ListenerEvent, TRANSMIT_STEP, TransmissionOutcome};
use mamabear_client::TransmissionClient;
use mamabear_core::*;
use mamabear_exec::{CommandExecutor, CommandKey, CommandResult, ExecError};
use mamabear_inventory::{FactCatalog, FactSource, InventoryCollector};

/// Answers every command with the same two `label: value` lines
struct MockExecutor;

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn run(&self, _cmd: &CommandKey) -> Result<CommandResult, ExecError> {
        Ok(CommandResult {
            status: 0,
            stdout: "ProductName: macOS\nProductVersion: 14.0\n".to_string(),
            stderr: String::new(),
            duration: Duration::from_millis(1),
        })
    }

    async fn run_with_timeout(
        &self,
        cmd: &CommandKey,
        _timeout: Duration,
    ) -> Result<CommandResult, ExecError> {
        self.run(cmd).await
    }
}

/// Listener that writes every callback to a transcript
#[derive(Default)]
struct Transcript {
    lines: Vec<String>,
    result: Option<(bool, Map<String, Value>)>,
}

impl InventoryListener for Transcript {
    fn work_started(&mut self, total_steps: usize) {
        self.lines.push(format!("work_started {total_steps}"));
    }

    fn step_started(&mut self, name: &str) {
        self.lines.push(format!("step_started {name}"));
    }

    fn step_completed(&mut self) {
        self.lines.push("step_completed".to_string());
    }

    fn work_completed(&mut self, success: bool, result: Map<String, Value>) {
        self.lines.push(format!("work_completed {success}"));
        self.result = Some((success, result));
    }
}

fn catalog() -> FactCatalog {
    FactCatalog::new()
        .with("software_version", FactSource::SoftwareVersion)
        .with("osx_screensaver", FactSource::Placeholder)
}

fn collector() -> InventoryCollector {
    InventoryCollector::new(Arc::new(MockExecutor), catalog())
}

/// Backend that echoes the received inventory under `received`
async fn echo_backend() -> String {
    let app = Router::new().route(
        "/inventory/mamabear",
        post(|Json(body): Json<Value>| async move { Json(json!({ "received": body })) }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/inventory/mamabear")
}

fn refused_url() -> String {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    format!("http://127.0.0.1:{port}/inventory/mamabear")
}

#[tokio::test]
async fn test_successful_run_drives_listener() {
    let client = TransmissionClient::new(echo_backend().await).unwrap();
    let run = InventoryRun::new(collector(), client);
    assert_eq!(run.total_steps(), 3);

    let mut transcript = Transcript::default();
    let outcome = run.start().drive(&mut transcript).await.unwrap();

    assert_eq!(
        transcript.lines,
        vec![
            "work_started 3".to_string(),
            "step_started software_version".to_string(),
            "step_completed".to_string(),
            "step_started osx_screensaver".to_string(),
            "step_completed".to_string(),
            format!("step_started {TRANSMIT_STEP}"),
            "work_completed true".to_string(),
        ]
    );

    let expected = json!({
        "received": {
            "software_version": "macOS 14.0",
            "osx_screensaver": "",
        }
    });
    let Some((true, result)) = transcript.result else {
        panic!("listener did not see a successful completion");
    };
    assert_eq!(Value::Object(result.clone()), expected);
    assert_eq!(outcome, TransmissionOutcome::Success(result));
}

#[tokio::test]
async fn test_failed_transmission_reports_error_map() {
    let client = TransmissionClient::new(refused_url()).unwrap();
    let run = InventoryRun::new(collector(), client);

    let mut transcript = Transcript::default();
    let outcome = run.start().drive(&mut transcript).await.unwrap();

    assert!(!outcome.is_success());
    assert_eq!(transcript.lines.last().map(String::as_str), Some("work_completed false"));

    let Some((false, result)) = transcript.result else {
        panic!("listener did not see a failed completion");
    };
    let message = result.get("err").and_then(Value::as_str).unwrap();
    assert_eq!(Some(message), outcome.error_message());
}

#[tokio::test]
async fn test_event_stream_ends_with_single_completion() {
    let client = TransmissionClient::new(refused_url()).unwrap();
    let mut handle = InventoryRun::new(collector(), client).start();

    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }

    assert_eq!(events.len(), 1 + 2 * 2 + 1 + 1);
    assert_eq!(events[0], ListenerEvent::WorkStarted { total_steps: 3 });
    assert_eq!(
        events[5],
        ListenerEvent::StepStarted {
            name: TRANSMIT_STEP.to_string()
        }
    );
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    assert!(events[6].is_terminal());
}

#[tokio::test]
async fn test_from_config_rejects_bad_url() {
    let mut config = Config::default();
    config.fleet.backend_url = "ftp://example.com/inventory".to_string();

    assert!(matches!(
        InventoryRun::from_config(&config),
        Err(CoreError::ConfigError(_))
    ));
}
