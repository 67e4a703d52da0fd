// Exercises the fetch client against a local stand-in for the 511 API.
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use muniboard::muni_data::{self, Config};
use reqwest::ClientBuilder;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const FIXTURE: &str = include_str!("fixtures/stop_monitoring_response.json");

/// Records every stopCode the stub was asked for, and answers each stop with
/// the canned (status, body) configured for it.
#[derive(Clone, Default)]
struct Stub {
    calls: Arc<Mutex<Vec<String>>>,
    responses: Arc<HashMap<String, (StatusCode, String)>>,
}

impl Stub {
    fn new(responses: impl IntoIterator<Item = (&'static str, StatusCode, String)>) -> Self {
        let responses = responses
            .into_iter()
            .map(|(stop_id, status, body)| (stop_id.to_string(), (status, body)))
            .collect();
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(responses),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("stub lock").clone()
    }
}

async fn stop_monitoring(
    State(stub): State<Stub>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let stop_id = params.get("stopCode").cloned().unwrap_or_default();
    stub.calls.lock().expect("stub lock").push(stop_id.clone());
    let (status, body) = stub
        .responses
        .get(&stop_id)
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, "no such stop".to_string()));
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

async fn spawn_stub(stub: Stub) -> String {
    let app = Router::new()
        .route("/transit/StopMonitoring", get(stop_monitoring))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });
    format!("http://{addr}/transit/StopMonitoring")
}

fn test_config(api_url: String) -> Config {
    let client = ClientBuilder::default()
        .connect_timeout(Duration::from_secs(1))
        .timeout(Duration::from_secs(1))
        .build()
        .expect("build client");
    Config::new("test-key".to_string(), "SF".to_string(), api_url, client)
}

#[tokio::test]
async fn fetches_and_parses_each_requested_stop() {
    let stub = Stub::new([
        ("15726", StatusCode::OK, FIXTURE.to_string()),
        ("15727", StatusCode::OK, FIXTURE.to_string()),
    ]);
    let config = test_config(spawn_stub(stub.clone()).await);

    let results = muni_data::fetch_all(&config, &["15726", "15727"]).await;

    assert_eq!(results.len(), 2);
    let payload = results["15726"].as_ref().expect("payload for 15726");
    let visits = &payload
        .service_delivery
        .as_ref()
        .expect("service delivery")
        .stop_monitoring_delivery
        .as_ref()
        .expect("stop monitoring delivery")
        .monitored_stop_visit;
    assert!(!visits.is_empty());

    let mut calls = stub.calls();
    calls.sort();
    assert_eq!(calls, vec!["15726", "15727"]);
}

#[tokio::test]
async fn duplicate_stop_ids_are_fetched_once() {
    let stub = Stub::new([("15726", StatusCode::OK, FIXTURE.to_string())]);
    let config = test_config(spawn_stub(stub.clone()).await);

    let results = muni_data::fetch_all(&config, &["15726", "15726", "15726"]).await;

    assert_eq!(results.len(), 1);
    assert_eq!(stub.calls(), vec!["15726"]);
}

#[tokio::test]
async fn one_failing_stop_does_not_disturb_the_others() {
    let stub = Stub::new([
        ("15726", StatusCode::OK, FIXTURE.to_string()),
        (
            "15727",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        ),
    ]);
    let config = test_config(spawn_stub(stub.clone()).await);

    let results = muni_data::fetch_all(&config, &["15726", "15727"]).await;

    assert_eq!(results.len(), 2);
    assert!(results["15726"].is_some());
    assert!(results["15727"].is_none());
    assert_eq!(stub.calls().len(), 2);
}

#[tokio::test]
async fn strips_a_leading_byte_order_mark() {
    let stub = Stub::new([(
        "15726",
        StatusCode::OK,
        format!("\u{feff}{FIXTURE}"),
    )]);
    let config = test_config(spawn_stub(stub).await);

    let results = muni_data::fetch_all(&config, &["15726"]).await;

    assert!(results["15726"].is_some());
}

#[tokio::test]
async fn rate_limiting_marks_the_stop_absent() {
    let stub = Stub::new([(
        "15726",
        StatusCode::TOO_MANY_REQUESTS,
        "Rate limited".to_string(),
    )]);
    let config = test_config(spawn_stub(stub).await);

    let results = muni_data::fetch_all(&config, &["15726"]).await;

    assert_eq!(results.len(), 1);
    assert!(results["15726"].is_none());
}

#[tokio::test]
async fn unparseable_body_marks_the_stop_absent() {
    let stub = Stub::new([("15726", StatusCode::OK, "<html>not json</html>".to_string())]);
    let config = test_config(spawn_stub(stub).await);

    let results = muni_data::fetch_all(&config, &["15726"]).await;

    assert!(results["15726"].is_none());
}

#[tokio::test]
async fn unreachable_upstream_marks_every_stop_absent() {
    // Nothing listens here
    let config = test_config("http://127.0.0.1:9/transit/StopMonitoring".to_string());

    let results = muni_data::fetch_all(&config, &["15726", "15727"]).await;

    assert_eq!(results.len(), 2);
    assert!(results.values().all(|payload| payload.is_none()));
}
