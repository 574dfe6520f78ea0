//! In-process mock of the TechLearns REST API.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use techlearns_client::{ClientConfig, TechLearnsClient};
use techlearns_core::{Session, SessionContext, UserInfo, UserType};

pub const TOKEN: &str = "test-token";

/// Request counters and captured values.
#[derive(Default)]
pub struct Calls {
    pub execute: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub get: AtomicUsize,
    pub login: AtomicUsize,
    pub register: AtomicUsize,
    pub updated_ids: Mutex<Vec<String>>,
    pub last_body: Mutex<Option<Value>>,
}

impl Calls {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    pub calls: Arc<Calls>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let calls = Arc::new(Calls::default());
        let app = Router::new()
            .route("/api/execute", post(execute))
            .route("/api/notebooks", post(create_notebook))
            .route("/api/notebooks/{id}", get(get_notebook).put(update_notebook))
            .route("/api/{role}/login", post(login))
            .route("/api/{role}/register", post(register))
            .route("/api/competitions", get(competitions))
            .route("/api/mock-tests/my-results", get(my_results))
            .with_state(calls.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, calls }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(format!("http://{}", self.addr))
    }

    pub fn client(&self) -> TechLearnsClient {
        TechLearnsClient::new(self.config()).unwrap()
    }
}

pub fn logged_in() -> SessionContext {
    SessionContext::with_session(Session::new(
        TOKEN,
        UserInfo {
            id: Some("u1".into()),
            name: "Test Learner".into(),
            email: "learner@example.com".into(),
            extra: Default::default(),
        },
        UserType::User,
    ))
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn execute(
    State(calls): State<Arc<Calls>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    calls.execute.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        let body = Json(json!({"message": "Not authorized"}));
        return (StatusCode::UNAUTHORIZED, body).into_response();
    }
    let code = body["code"].as_str().unwrap_or_default().to_string();
    let language = body["language"].as_str().unwrap_or_default().to_string();
    let stdin = body["stdin"].as_str().unwrap_or_default().to_string();
    *calls.last_body.lock().unwrap() = Some(body);

    if code.contains("SLOW") {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    if code.contains("CRASH") {
        let body = Json(json!({"error": "executor crashed"}));
        return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
    }
    if code.contains("REJECT") {
        let body = Json(json!({"error": "Compilation failed"}));
        return (StatusCode::BAD_REQUEST, body).into_response();
    }
    if code.contains("RUNTIME") {
        return Json(json!({"error": "ZeroDivisionError"})).into_response();
    }
    if code.contains("SILENT") {
        return Json(json!({"output": ""})).into_response();
    }
    Json(json!({"output": format!("{language}:{stdin}")})).into_response()
}

async fn create_notebook(
    State(calls): State<Arc<Calls>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let n = calls.create.fetch_add(1, Ordering::SeqCst) + 1;
    body["_id"] = json!(format!("nb-{n}"));
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_notebook(
    State(calls): State<Arc<Calls>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    calls.update.fetch_add(1, Ordering::SeqCst);
    calls.updated_ids.lock().unwrap().push(id.clone());
    body["_id"] = json!(id);
    Json(json!({"notebook": body})).into_response()
}

async fn get_notebook(
    State(calls): State<Arc<Calls>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    calls.get.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != "known" {
        let body = Json(json!({"message": "Notebook not found"}));
        return (StatusCode::NOT_FOUND, body).into_response();
    }
    Json(json!({
        "_id": "known",
        "title": "Sorting",
        "content": "print(sorted([3, 1, 2]))",
        "language": "python",
        "isPublic": true,
        "tags": ["algorithms"],
        "user": "u1"
    }))
    .into_response()
}

async fn login(
    State(calls): State<Arc<Calls>>,
    Path(role): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    calls.login.fetch_add(1, Ordering::SeqCst);
    if body["password"] != "correct-horse" {
        let body = Json(json!({"message": "Invalid email or password"}));
        return (StatusCode::UNAUTHORIZED, body).into_response();
    }
    let profile = json!({"_id": "p1", "name": "Profile", "email": body["email"], "role": role});
    match role.as_str() {
        "mentors" => Json(json!({"token": TOKEN, "mentor": profile})).into_response(),
        "schools" => Json(json!({"token": TOKEN, "school": profile})).into_response(),
        _ => Json(json!({"token": TOKEN, "user": profile})).into_response(),
    }
}

async fn register(
    State(calls): State<Arc<Calls>>,
    Path(role): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    calls.register.fetch_add(1, Ordering::SeqCst);
    if role == "schools" {
        let body = Json(json!({"message": "Registration pending approval"}));
        return (StatusCode::CREATED, body).into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({"token": TOKEN, "_id": "new", "name": body["name"], "email": body["email"]})),
    )
        .into_response()
}

async fn competitions() -> Json<Value> {
    Json(json!([
        {"_id": "1", "title": "Past Internal", "competitionType": "internal", "endDate": "2020-01-01T00:00:00Z"},
        {"_id": "2", "title": "Future Internal", "competitionType": "internal", "endDate": "2099-01-01T00:00:00Z"},
        {"_id": "3", "title": "Future External", "competitionType": "external", "endDate": "2099-01-01T00:00:00Z"},
        {"_id": "4", "title": "Past External", "competitionType": "external", "endDate": "2020-01-01T00:00:00Z"},
        {"_id": "5", "title": "No End Date", "competitionType": "internal", "endDate": null},
        {"_id": "6", "competitionType": "internal", "endDate": "2099-01-01T00:00:00Z"}
    ]))
}

async fn my_results(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"results": [
        {"testTitle": "Arrays", "score": 8, "totalMarks": 10},
        {"testTitle": "Graphs", "score": 9, "totalMarks": 10},
        {"testTitle": "Unscored", "totalMarks": 10}
    ]}))
    .into_response()
}
