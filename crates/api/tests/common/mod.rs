#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use todos_api::config::{ServerConfig, StoreBackend, StoreConfig};
use todos_api::router::build_app_router;
use todos_api::state::AppState;
use todos_core::clock::Clock;
use todos_core::pagination::Page;
use todos_core::types::{Timestamp, TodoId};
use todos_db::models::todo::{Todo, TodoChanges, TodoFilter};
use todos_db::repositories::{InMemoryTodoRepo, TodoRepo};
use todos_db::StoreError;

/// Start of every test clock: 2024-06-01T00:00:00Z.
pub const EPOCH: Timestamp = 1_717_200_000;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// A store whose every operation fails with a detail-rich error.
pub struct FailingTodoRepo;

fn outage() -> StoreError {
    StoreError::Decode("connection refused by 10.0.0.7:9042 (keyspace todo_app)".into())
}

#[async_trait]
impl TodoRepo for FailingTodoRepo {
    async fn insert(&self, _todo: &Todo) -> Result<(), StoreError> {
        Err(outage())
    }

    async fn find_by_id(&self, _id: TodoId) -> Result<Option<Todo>, StoreError> {
        Err(outage())
    }

    async fn update(&self, _id: TodoId, _changes: &TodoChanges) -> Result<bool, StoreError> {
        Err(outage())
    }

    async fn delete(&self, _id: TodoId) -> Result<(), StoreError> {
        Err(outage())
    }

    async fn list(&self, _filter: &TodoFilter, _page: Page) -> Result<Vec<Todo>, StoreError> {
        Err(outage())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(outage())
    }

    async fn close(&self) {}
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        log_json: false,
        store: StoreConfig {
            backend: StoreBackend::Memory,
            nodes: vec!["127.0.0.1:9042".to_string()],
            keyspace: "todo_app".to_string(),
            connect_timeout_secs: 5,
        },
    }
}

/// Handles kept by a test so it can poke the store and the clock directly.
pub struct TestApp {
    pub router: Router,
    pub todos: Arc<dyn TodoRepo>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// App over a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_repo(Arc::new(InMemoryTodoRepo::new()))
    }

    pub fn with_repo(todos: Arc<dyn TodoRepo>) -> Self {
        Self::with_config(todos, test_config())
    }

    pub fn with_config(todos: Arc<dyn TodoRepo>, config: ServerConfig) -> Self {
        let clock = Arc::new(ManualClock::new(EPOCH));
        let state = AppState {
            todos: Arc::clone(&todos),
            clock: clock.clone(),
            config: Arc::new(config),
        };

        Self {
            router: build_app_router(state),
            todos,
            clock,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> Response {
        self.send(json_request(Method::POST, uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: &str) -> Response {
        self.send(json_request(Method::PUT, uri, body)).await
    }

    /// Create a todo through the API and return the response body.
    pub async fn create(&self, user_id: &str, title: &str, status: &str) -> serde_json::Value {
        let body = serde_json::json!({
            "user_id": user_id,
            "title": title,
            "status": status,
        });
        let response = self.post_json("/todos", &body.to_string()).await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
        body_json(response).await
    }
}

pub fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
