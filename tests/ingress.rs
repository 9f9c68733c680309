//! Router tests for the ingress and health endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use doc_change_forwarder::http::{self, AppState};
use doc_change_forwarder::metrics::ForwarderMetrics;
use doc_change_forwarder::{EventForwarder, ForwarderConfig, HttpApiClient};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn app(endpoint: String) -> Router {
    let config = ForwarderConfig::new(endpoint);
    let metrics = Arc::new(ForwarderMetrics::detached());
    let client = tokio_test::assert_ok!(HttpApiClient::new(&config));

    http::router(AppState {
        forwarder: Arc::new(EventForwarder::new(&config, client, Arc::clone(&metrics))),
        metrics,
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_event(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/events")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn ingest_forwards_and_reports_outcome() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::body_json(json!({"name": "Alice", "id": "42"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(server.uri())
        .oneshot(post_event(json!({
            "document": {"name": "Alice"},
            "metadata": {"id": "42", "cas": 1}
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await, json!({"outcome": "delivered", "status": 200}));
}

#[tokio::test]
async fn ingest_skips_marked_document() {
    let server = MockServer::start().await;

    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = app(server.uri())
        .oneshot(post_event(json!({
            "document": {"embedding": [0.1, 0.2], "name": "Alice"},
            "metadata": {"id": "42"}
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await, json!({"outcome": "skipped"}));
}

#[tokio::test]
async fn ingest_accepts_event_when_endpoint_is_down() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let response = app(format!("http://{addr}"))
        .oneshot(post_event(json!({
            "document": {"name": "Alice"},
            "metadata": {"id": "42"}
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(
        body_json(response).await,
        json!({"outcome": "failed", "error_type": "transport"})
    );
}

#[tokio::test]
async fn ingest_rejects_event_without_metadata_id() {
    let response = app("http://127.0.0.1:9".to_string())
        .oneshot(post_event(json!({"document": {"name": "Alice"}, "metadata": {}})))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn health_and_ready_endpoints() {
    let app = app("http://127.0.0.1:9".to_string());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], json!("healthy"));

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ready = body_json(response).await;
    assert_eq!(ready["ready"], json!(true));
    assert_eq!(ready["marker_field"], json!("embedding"));
    assert_eq!(ready["events"]["received"], json!(0));
}

#[tokio::test]
async fn ready_reflects_handled_events() {
    let app = app("http://127.0.0.1:9".to_string());

    let response = app
        .clone()
        .oneshot(post_event(json!({
            "document": {"embedding": []},
            "metadata": {"id": "1"}
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let ready = body_json(response).await;
    assert_eq!(ready["events"]["received"], json!(1));
    assert_eq!(ready["events"]["skipped"], json!(1));
}
