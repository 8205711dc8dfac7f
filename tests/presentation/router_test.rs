use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use tunecourier::presentation::{AppState, create_router};

use crate::helpers::{ExtractorScript, Harness, MockTransport};

fn create_test_app(harness: &Harness) -> axum::Router {
    create_router(AppState {
        orchestrator: harness.orchestrator.clone(),
    })
}

fn single_track() -> ExtractorScript {
    ExtractorScript::Single {
        id: "v1",
        title: Some("Song"),
    }
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn given_running_server_when_health_check_then_returns_ok() {
    let harness = Harness::new(single_track(), MockTransport::default());

    let response = get(create_test_app(&harness), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn given_valid_link_when_resolving_and_delivering_then_returns_success() {
    let harness = Harness::new(single_track(), MockTransport::default());

    let response = get(
        create_test_app(&harness),
        "/resolve-and-deliver?chat_id=12345&query=https%3A%2F%2Fexample.com%2Fvideo123",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"status": "success"})
    );
    assert_eq!(
        harness.extractor.targets(),
        vec!["https://example.com/video123"]
    );
    assert!(!harness.path("v1.mp3").exists());
}

#[tokio::test]
async fn given_legacy_route_and_music_param_when_requesting_then_searches_for_text() {
    let harness = Harness::new(single_track(), MockTransport::default());

    let response = get(
        create_test_app(&harness),
        "/indir?chat_id=12345&music=some%20song%20name",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(harness.extractor.targets(), vec!["ytsearch1:some song name"]);
}

#[tokio::test]
async fn given_extraction_failure_when_requesting_then_returns_error_record() {
    let harness = Harness::new(
        ExtractorScript::Fail("ERROR: Video unavailable"),
        MockTransport::default(),
    );

    let response = get(
        create_test_app(&harness),
        "/resolve-and-deliver?chat_id=12345&query=gone",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "error");
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("Video unavailable")
    );
}

#[tokio::test]
async fn given_missing_chat_id_when_requesting_then_returns_bad_request() {
    let harness = Harness::new(single_track(), MockTransport::default());

    let response = get(create_test_app(&harness), "/resolve-and-deliver?query=song").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"status": "error", "message": "chat_id is required"})
    );
    assert!(harness.transport.texts().is_empty());
}

#[tokio::test]
async fn given_blank_query_when_requesting_then_returns_bad_request() {
    let harness = Harness::new(single_track(), MockTransport::default());

    let response = get(
        create_test_app(&harness),
        "/resolve-and-deliver?chat_id=12345&query=%20%20",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(harness.extractor.targets().is_empty());
}

#[tokio::test]
async fn given_both_query_and_music_when_requesting_then_returns_json_error_record() {
    let harness = Harness::new(single_track(), MockTransport::default());

    let response = get(create_test_app(&harness), "/indir?chat_id=1&query=a&music=b").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert!(harness.extractor.targets().is_empty());
    assert!(harness.transport.texts().is_empty());
}

#[tokio::test]
async fn given_cross_origin_request_when_requesting_then_allows_any_origin() {
    let harness = Harness::new(single_track(), MockTransport::default());

    let response = create_test_app(&harness)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "https://someone.github.io")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn given_request_without_id_when_any_endpoint_then_response_contains_request_id() {
    let harness = Harness::new(single_track(), MockTransport::default());

    let response = get(create_test_app(&harness), "/health").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn given_request_with_id_when_any_endpoint_then_response_echoes_request_id() {
    let harness = Harness::new(single_track(), MockTransport::default());

    let response = create_test_app(&harness)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "test-request-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-request-123"
    );
}
