//! End-to-end scenarios against the router backed by a temporary SQLite file

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use habitcommit_server::{build_router, AppState, SqliteStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("habits.db")).await.unwrap();
        let router = build_router(AppState::new(Arc::new(store)));
        Self { _dir: dir, router }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn exercise() -> Value {
    json!({
        "id": "h1",
        "name": "Exercise",
        "color": "#ff0000",
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn habit_and_commit_lifecycle() {
    let app = TestApp::new().await;

    let (status, created) = app.send("POST", "/habits", Some(exercise())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, exercise());

    let (status, fetched) = app.send("GET", "/habits/h1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, exercise());

    let commit = json!({ "id": "c1", "habitId": "h1", "date": "2024-01-02" });
    let (status, created) = app.send("POST", "/commits", Some(commit.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["habitId"], "h1");
    assert_eq!(created["date"], "2024-01-02");
    assert!(created["timestamp"].is_string());

    let (status, body) = app.send("POST", "/commits", Some(commit)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({ "error": "Commit already exists for this habit today" })
    );

    let (status, body) = app.send("DELETE", "/habits/h1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Habit deleted successfully" }));

    let (status, body) = app.send("GET", "/commits/habit/h1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_habit_missing_fields_is_400_without_row() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/habits", Some(json!({ "id": "h2" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required fields: name, color" }));

    let (status, _) = app.send("GET", "/habits/h2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn commit_for_unknown_habit_is_rejected() {
    let app = TestApp::new().await;

    let commit = json!({ "id": "c1", "habitId": "ghost", "date": "2024-01-02" });
    let (status, _) = app.send("POST", "/commits", Some(commit)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, commits) = app.send("GET", "/commits", None).await;
    assert_eq!(commits, json!([]));
}

#[tokio::test]
async fn unknown_habit_is_404() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/habits/doesnotexist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Habit not found" }));

    let update = json!({ "name": "Read", "color": "blue" });
    let (status, _) = app.send("PUT", "/habits/doesnotexist", Some(update)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", "/habits/doesnotexist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_changes_name_and_color_only() {
    let app = TestApp::new().await;
    app.send("POST", "/habits", Some(exercise())).await;

    let (status, body) = app
        .send("PUT", "/habits/h1", Some(json!({ "name": "Run", "color": "green" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": "h1",
            "name": "Run",
            "color": "green",
            "createdAt": "2024-01-01T00:00:00Z"
        })
    );

    let (status, body) = app
        .send("PUT", "/habits/h1", Some(json!({ "name": "Run" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required fields: color" }));
}

#[tokio::test]
async fn duplicate_habit_id_is_500() {
    let app = TestApp::new().await;
    app.send("POST", "/habits", Some(exercise())).await;

    let (status, body) = app.send("POST", "/habits", Some(exercise())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "habit 'h1' already exists" }));
}

#[tokio::test]
async fn listings_are_ordered() {
    let app = TestApp::new().await;
    for (id, created_at) in [("b", "2024-02-01"), ("a", "2024-01-01"), ("c", "2024-03-01")] {
        let habit = json!({ "id": id, "name": id, "color": "red", "createdAt": created_at });
        app.send("POST", "/habits", Some(habit)).await;
    }

    let (_, habits) = app.send("GET", "/habits", None).await;
    let ids: Vec<_> = habits
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);

    for (id, habit, date, timestamp) in [
        ("c1", "a", "2024-04-01", "2024-04-01T07:00:00Z"),
        ("c2", "b", "2024-04-01", "2024-04-01T09:00:00Z"),
        ("c3", "a", "2024-04-02", "2024-04-02T06:00:00Z"),
    ] {
        let commit = json!({ "id": id, "habitId": habit, "date": date, "timestamp": timestamp });
        let (status, _) = app.send("POST", "/commits", Some(commit)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, commits) = app.send("GET", "/commits", None).await;
    let ids: Vec<_> = commits
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["c3", "c2", "c1"]);

    let (_, today) = app.send("GET", "/commits/today/2024-04-01", None).await;
    assert_eq!(today.as_array().unwrap().len(), 2);

    let (_, by_habit) = app.send("GET", "/commits/habit/a", None).await;
    let dates: Vec<_> = by_habit
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["date"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dates, ["2024-04-02", "2024-04-01"]);
}

#[tokio::test]
async fn commit_missing_date_is_400() {
    let app = TestApp::new().await;
    app.send("POST", "/habits", Some(exercise())).await;

    let (status, body) = app
        .send("POST", "/commits", Some(json!({ "id": "c1", "habitId": "h1" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required fields: date" }));
}

#[tokio::test]
async fn reused_commit_id_for_other_habit_is_409() {
    let app = TestApp::new().await;
    app.send("POST", "/habits", Some(exercise())).await;
    let reading = json!({ "id": "h2", "name": "Read", "color": "blue" });
    app.send("POST", "/habits", Some(reading)).await;

    let first = json!({ "id": "c1", "habitId": "h1", "date": "2024-01-02" });
    let (status, _) = app.send("POST", "/commits", Some(first)).await;
    assert_eq!(status, StatusCode::CREATED);

    let reused = json!({ "id": "c1", "habitId": "h2", "date": "2024-01-03" });
    let (status, _) = app.send("POST", "/commits", Some(reused)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, commits) = app.send("GET", "/commits", None).await;
    let commits = commits.as_array().unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0]["habitId"], "h1");
}
