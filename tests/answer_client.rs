use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use portalchat::api::{AnswerService, AskRequest, HttpAnswerService};
use portalchat::PortalError;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Received {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

async fn handle_ask(
    State(received): State<Received>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    received.auth.lock().unwrap().push(auth);
    let question = body["question"].as_str().unwrap_or_default().to_string();
    received.bodies.lock().unwrap().push(body);
    Json(json!({ "answer": format!("echo: {}", question), "next_resume_code": "rc-7" }))
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "ok": true, "label": "Maat2.0", "phase": 7 }))
}

async fn spawn_server(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn spawn_answer_server() -> (String, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/ask", post(handle_ask))
        .route("/health", get(handle_health))
        .with_state(received.clone());
    (spawn_server(app).await, received)
}

#[tokio::test]
async fn test_ask_posts_question_and_parses_answer() {
    let (url, received) = spawn_answer_server().await;
    let service = HttpAnswerService::new(&url, None, None).unwrap();

    let mut request = AskRequest::new("hello");
    request.portal_id = Some("awakening".to_string());
    let response = service.ask(&request).await.unwrap();

    assert_eq!(response.answer, "echo: hello");
    assert_eq!(response.next_resume_code.as_deref(), Some("rc-7"));

    let bodies = received.bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["question"], "hello");
    assert_eq!(bodies[0]["portal_id"], "awakening");
    assert!(bodies[0].get("resume_code").is_none());
    assert_eq!(received.auth.lock().unwrap()[0], None);
}

#[tokio::test]
async fn test_endpoint_with_ask_suffix_and_token() {
    let (url, received) = spawn_answer_server().await;
    let service = HttpAnswerService::new(&format!("{}/ask/", url), Some("t0k"), None).unwrap();

    service.ask(&AskRequest::new("hi")).await.unwrap();

    assert_eq!(
        received.auth.lock().unwrap()[0].as_deref(),
        Some("Bearer t0k")
    );
}

#[tokio::test]
async fn test_non_success_status_is_remote_failure() {
    let app = Router::new().route(
        "/ask",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "No LLM configured") }),
    );
    let url = spawn_server(app).await;
    let service = HttpAnswerService::new(&url, None, None).unwrap();

    let result = service.ask(&AskRequest::new("hi")).await;

    assert!(matches!(result, Err(PortalError::RemoteCallFailed(msg)) if msg.contains("503")));
}

#[tokio::test]
async fn test_malformed_json_is_remote_failure() {
    let app = Router::new().route("/ask", post(|| async { "this is not json" }));
    let url = spawn_server(app).await;
    let service = HttpAnswerService::new(&url, None, None).unwrap();

    let result = service.ask(&AskRequest::new("hi")).await;

    assert!(matches!(result, Err(PortalError::RemoteCallFailed(_))));
}

#[tokio::test]
async fn test_unreachable_service_is_remote_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let service = HttpAnswerService::new(&format!("http://{addr}"), None, None).unwrap();

    let result = service.ask(&AskRequest::new("hi")).await;

    assert!(matches!(result, Err(PortalError::RemoteCallFailed(_))));
}

#[tokio::test]
async fn test_request_timeout_is_remote_failure() {
    let app = Router::new().route(
        "/ask",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "answer": "too late" }))
        }),
    );
    let url = spawn_server(app).await;
    let service =
        HttpAnswerService::new(&url, None, Some(Duration::from_millis(200))).unwrap();

    let result = service.ask(&AskRequest::new("hi")).await;

    assert!(matches!(result, Err(PortalError::RemoteCallFailed(_))));
}

#[tokio::test]
async fn test_health_reports_extras() {
    let (url, _received) = spawn_answer_server().await;
    let service = HttpAnswerService::new(&url, None, None).unwrap();

    let status = service.health().await.unwrap();

    assert!(status.ok);
    assert_eq!(status.label.as_deref(), Some("Maat2.0"));
    assert_eq!(status.extra["phase"], 7);
}
