//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the router with a mock
//! audiobook source injected, so sessions can be exercised without a
//! catalog file.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use audioshelf_core::{
    testing::MockAudiobookSource, AudiobookSource, CatalogConfig, Config, DatabaseConfig,
    ServerConfig, SqliteViewStateStore, ViewConfig, ViewStateStore,
};
use audioshelf_server::state::AppState;

/// Re-export fixtures for test convenience
pub use audioshelf_core::testing::fixtures;

/// Test fixture with a mock audiobook source.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_create_session() {
///     let fixture = TestFixture::new().await;
///     let response = fixture.post("/api/v1/sessions", json!({})).await;
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Application state behind the router
    pub state: Arc<AppState>,
    /// Mock source - configure audiobooks and failures
    pub source: Arc<MockAudiobookSource>,
    /// View state store backing persisted sessions
    pub view_store: Arc<SqliteViewStateStore>,
    /// Temporary directory for the view state database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture serving the sample catalog with session-only state.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let source = Arc::new(MockAudiobookSource::with_items(fixtures::sample_catalog()));
        let view_store =
            Arc::new(SqliteViewStateStore::new(&db_path).expect("Failed to create view store"));

        let config = Config {
            server: ServerConfig {
                session_idle_secs: test_config.session_idle_secs,
                ..Default::default()
            },
            catalog: CatalogConfig {
                page_size: 50,
                ..Default::default()
            },
            view: ViewConfig {
                search_debounce_ms: test_config.search_debounce.as_millis() as u64,
                persist_hide_set: test_config.persist_hide_set,
                persist_multi_cast_toggle: test_config.persist_multi_cast_toggle,
                ..Default::default()
            },
            database: DatabaseConfig { path: db_path },
            ..Default::default()
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&source) as Arc<dyn AudiobookSource>,
            Arc::clone(&view_store) as Arc<dyn ViewStateStore>,
        ));

        let router = audioshelf_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            state,
            source,
            view_store,
            temp_dir,
        }
    }

    /// Create a session and return its id.
    pub async fn create_session(&self, body: Value) -> String {
        let response = self.post("/api/v1/sessions", body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["session_id"]
            .as_str()
            .expect("session_id missing")
            .to_string()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub search_debounce: Duration,
    pub persist_hide_set: bool,
    pub persist_multi_cast_toggle: bool,
    pub session_idle_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(10),
            persist_hide_set: false,
            persist_multi_cast_toggle: false,
            session_idle_secs: 1800,
        }
    }
}

impl TestConfig {
    /// Create config that keeps both hidden ids and the multi-cast toggle.
    pub fn durable() -> Self {
        Self {
            persist_hide_set: true,
            persist_multi_cast_toggle: true,
            ..Default::default()
        }
    }
}

/// Collect the ids of the rendered items in order.
pub fn item_ids(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .expect("items missing")
        .iter()
        .map(|item| item["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
