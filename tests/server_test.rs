//! HTTP routes over the session manager.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use eos::{SessionManager, router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    router(SessionManager::standard().unwrap())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seated(app: &Router) {
    let (status, _) = send(app, "POST", "/sessions", Some(json!({"session_id": "g1"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    for (id, name) in [("alice", "Alice"), ("bob", "Bob")] {
        let (status, _) = send(
            app,
            "POST",
            "/sessions/g1/players",
            Some(json!({"player_id": id, "name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_create_and_list_sessions() {
    let app = app();
    let (status, body) = send(&app, "POST", "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["session_id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([id]));

    let (status, body) = send(&app, "GET", &format!("/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn_phase"], "select");
    assert_eq!(body["current_turn"], "player1");
}

#[tokio::test]
async fn test_actions_return_snapshots() {
    let app = app();
    seated(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/sessions/g1/actions",
        Some(json!({"player_id": "alice", "action": {"type": "select", "piece": 10}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn_phase"], "action");
    assert_eq!(body["active_piece"], 10);

    let (status, body) = send(
        &app,
        "POST",
        "/sessions/g1/actions",
        Some(json!({"player_id": "alice", "action": {"type": "move", "to": "C3"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn_phase"], "locked");
    assert_eq!(body["move_log"][0]["to"], "C3");
    assert_eq!(body["move_log"][0]["piece_type_name"], "Steward");
}

#[tokio::test]
async fn test_error_statuses() {
    let app = app();
    seated(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/sessions/g1/actions",
        Some(json!({"player_id": "bob", "action": {"type": "end_turn"}})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("Not your turn"));

    let (status, _) = send(
        &app,
        "POST",
        "/sessions/g1/actions",
        Some(json!({"player_id": "alice", "action": {"type": "end_turn"}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/sessions/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/sessions/g1/players",
        Some(json!({"player_id": "carol", "name": "Carol"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_resign_and_score() {
    let app = app();
    seated(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/sessions/g1/resign",
        Some(json!({"player_id": "bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"]["condition"], "resignation");

    let (status, body) = send(&app, "GET", "/sessions/g1/score", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player1"]["total"], 30);
    assert_eq!(body["player2"]["total"], 0);
}

#[tokio::test]
async fn test_delete_session() {
    let app = app();
    seated(&app).await;

    let (status, body) = send(&app, "DELETE", "/sessions/g1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, "GET", "/sessions/g1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/sessions/g1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
