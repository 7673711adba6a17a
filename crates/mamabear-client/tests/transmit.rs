use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use mamabear_api::{InventoryRecord, TransmissionOutcome};
use mamabear_client::{TransmissionClient, USER_AGENT};

/// Serve `app` on an ephemeral port and return the inventory endpoint URL
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/inventory/mamabear")
}

fn sample_record() -> InventoryRecord {
    let mut record = InventoryRecord::new();
    record.insert("serial_number", "C02XK0ABJGH5");
    record.insert("users", vec!["alice".to_string(), "bob".to_string()]);
    record
}

#[tokio::test]
async fn test_success_passes_payload_through() {
    let app = Router::new().route(
        "/inventory/mamabear",
        post(|| async { Json(json!({"ok": true})) }),
    );
    let client = TransmissionClient::new(serve(app).await).unwrap();

    let outcome = client.transmit(&sample_record()).await;

    let TransmissionOutcome::Success(payload) = outcome else {
        panic!("expected success");
    };
    assert_eq!(Value::Object(payload), json!({"ok": true}));
}

/// Backend that echoes the request headers and body
fn echo_app() -> Router {
    Router::new().route(
        "/inventory/mamabear",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let header_text = |name: header::HeaderName| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            };
            Json(json!({
                "content_type": header_text(header::CONTENT_TYPE),
                "user_agent": header_text(header::USER_AGENT),
                "body": body,
            }))
        }),
    )
}

#[tokio::test]
async fn test_request_shape() {
    let client = TransmissionClient::new(serve(echo_app()).await).unwrap();

    let outcome = client.transmit(&sample_record()).await;

    let TransmissionOutcome::Success(payload) = outcome else {
        panic!("expected success");
    };
    assert_eq!(payload["content_type"], json!("application/json"));
    assert_eq!(payload["user_agent"], json!(USER_AGENT));
    assert_eq!(
        payload["body"],
        json!({"serial_number": "C02XK0ABJGH5", "users": ["alice", "bob"]})
    );
}

#[tokio::test]
async fn test_custom_client_still_sends_user_agent() {
    let url = serve(echo_app()).await;
    let client = TransmissionClient::with_client(url, reqwest::Client::new()).unwrap();

    let outcome = client.transmit(&sample_record()).await;

    let TransmissionOutcome::Success(payload) = outcome else {
        panic!("expected success");
    };
    assert_eq!(payload["user_agent"], json!(USER_AGENT));
}

#[tokio::test]
async fn test_server_error_names_status() {
    let app = Router::new().route(
        "/inventory/mamabear",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client = TransmissionClient::new(serve(app).await).unwrap();

    let outcome = client.transmit(&sample_record()).await;

    let message = outcome.error_message().expect("expected failure");
    assert!(message.contains("500"), "{message}");
}

#[tokio::test]
async fn test_only_200_counts_as_success() {
    let app = Router::new().route(
        "/inventory/mamabear",
        post(|| async { (StatusCode::CREATED, Json(json!({"ok": true}))) }),
    );
    let client = TransmissionClient::new(serve(app).await).unwrap();

    let outcome = client.transmit(&sample_record()).await;

    assert_eq!(
        outcome,
        TransmissionOutcome::Failure("The backend responded with HTTP error 201.".to_string())
    );
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let app = Router::new().route("/inventory/mamabear", post(|| async { "not json" }));
    let client = TransmissionClient::new(serve(app).await).unwrap();

    let outcome = client.transmit(&sample_record()).await;

    assert_eq!(
        outcome,
        TransmissionOutcome::Failure(
            "The backend didn't respond with a valid response.".to_string()
        )
    );
}

#[tokio::test]
async fn test_json_array_body_is_invalid_response() {
    let app = Router::new().route(
        "/inventory/mamabear",
        post(|| async { Json(json!([1, 2, 3])) }),
    );
    let client = TransmissionClient::new(serve(app).await).unwrap();

    let outcome = client.transmit(&sample_record()).await;

    assert_eq!(
        outcome.error_message(),
        Some("The backend didn't respond with a valid response.")
    );
}

#[tokio::test]
async fn test_connection_refused_reports_transport_error() {
    // Bind then drop to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = TransmissionClient::new(format!("http://127.0.0.1:{port}/inventory")).unwrap();

    let outcome = client.transmit(&sample_record()).await;

    let message = outcome.error_message().expect("expected failure");
    assert!(!message.is_empty());
    assert!(!message.contains("HTTP error"));
    assert!(!message.contains("valid response"));
}

#[tokio::test]
async fn test_spawn_transmit_delivers_once() {
    let app = Router::new().route(
        "/inventory/mamabear",
        post(|| async { Json(json!({"ok": true})) }),
    );
    let client = TransmissionClient::new(serve(app).await).unwrap();

    let outcome = client.spawn_transmit(sample_record()).await.unwrap();

    assert!(outcome.is_success());
}
