//! Test harness for Tally integration tests.
//!
//! Provides a [`TestEnv`] wiring the in-memory row store, a deterministic
//! clock and the real router together, plus request helpers that drive the
//! service through `tower::ServiceExt::oneshot` without binding a socket.

pub mod fixtures;

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tally_api::{create_router, AppState};
use tally_core::{Clock, MemoryStore, RowStore, TestClock};
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

/// Default table name used by the harness, matching the service default.
pub const TEST_TABLE: &str = "Submissions";

/// System time every harness clock starts at: 2023-11-14T22:13:20Z.
pub const TEST_EPOCH_SECS: u64 = 1_700_000_000;

/// Test environment with in-memory infrastructure and the real router.
pub struct TestEnv {
    /// The row store behind the router, for direct state assertions.
    pub store: Arc<MemoryStore>,
    /// Deterministic clock injected into the service.
    pub clock: TestClock,
    router: Router,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    /// Creates a test environment around the default table name.
    pub fn new() -> Self {
        Self::with_table(TEST_TABLE)
    }

    /// Creates a test environment around a custom table name.
    pub fn with_table(table: &str) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("warn,tally=debug")),
            )
            .with_test_writer()
            .try_init();

        let store = Arc::new(MemoryStore::new());
        let clock = TestClock::with_start_time(
            SystemTime::UNIX_EPOCH + Duration::from_secs(TEST_EPOCH_SECS),
        );

        let state = AppState::new(
            store.clone() as Arc<dyn RowStore>,
            Arc::new(clock.clone()) as Arc<dyn Clock>,
            table,
        );
        let router = create_router(state, Duration::from_secs(5));

        Self { store, clock, router }
    }

    /// Advances the injected clock.
    pub fn advance_time(&self, duration: Duration) {
        self.clock.advance(duration);
    }

    /// Posts a JSON submission payload.
    pub async fn post_submission(&self, payload: &Value) -> (StatusCode, Value) {
        self.post_raw(&payload.to_string()).await
    }

    /// Posts a raw request body, valid JSON or not.
    pub async fn post_raw(&self, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/submissions")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("build ingest request");

        self.request(request).await
    }

    /// Fetches submissions, optionally with an explicit `action` parameter.
    pub async fn get_submissions(&self, action: Option<&str>) -> (StatusCode, Value) {
        let uri = match action {
            Some(action) => format!("/api/submissions?action={action}"),
            None => "/api/submissions".to_string(),
        };
        self.get(&uri).await
    }

    /// Performs a GET request against an arbitrary path.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request =
            Request::builder().method("GET").uri(uri).body(Body::empty()).expect("build request");
        self.request(request).await
    }

    async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("route request");
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };

        (status, body)
    }
}
